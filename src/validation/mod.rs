pub mod input_validator;

pub use input_validator::{validate_config, validate_credentials, validate_workdir};
