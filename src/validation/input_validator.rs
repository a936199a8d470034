//! Input Validator - checks step inputs before any external tool runs
//!
//! - Account credentials must be given together or not at all
//! - An explicit workdir must exist

use crate::core::{Result, StepConfig, StepError};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;

/// Checks that user name and password are both set or both empty
pub fn validate_credentials(user_name: Option<&str>, password: Option<&SecretString>) -> Result<()> {
    let has_user = user_name.is_some_and(|u| !u.is_empty());
    let has_password = password.is_some_and(|p| !p.expose_secret().is_empty());

    match (has_user, has_password) {
        (true, false) => Err(StepError::configuration(
            "user name is specified but password is not provided",
        )),
        (false, true) => Err(StepError::configuration(
            "password is specified but user name is not provided",
        )),
        _ => Ok(()),
    }
}

/// Checks that the workdir exists when one is given
pub fn validate_workdir(workdir: Option<&Path>) -> Result<()> {
    let Some(dir) = workdir.filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };

    match dir.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(StepError::configuration(format!(
            "workdir does not exist: {}",
            dir.display()
        ))),
        Err(source) => Err(StepError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Runs every input check against a configuration
pub fn validate_config(config: &StepConfig) -> Result<()> {
    if config.expo_cli_version.trim().is_empty() {
        return Err(StepError::configuration("expo_cli_version is required"));
    }
    validate_credentials(config.user_name.as_deref(), config.password.as_ref())?;
    validate_workdir(config.workdir.as_deref())
}
