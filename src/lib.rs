//! Build step that ejects a managed Expo project into a standalone native
//! project, optionally logging in, publishing and pinning `react-native`.

pub mod core;
pub mod manifest;
pub mod orchestration;
pub mod security;
pub mod toolchain;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use self::core::*;
pub use orchestration::{EjectReport, run_eject};
pub use security::{CommandError, CommandRunner, Invocation, StreamingExecutor};
