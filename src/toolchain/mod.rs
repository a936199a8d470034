pub mod expo_cli;

pub use expo_cli::{EXPO_CLI_PACKAGE, ExpoCli, ToolchainSession};
