//! Eject workflow
//!
//! Runs the step in a fixed order:
//!
//! 1. validate inputs
//! 2. derive the `--eject-method`
//! 3. install expo-cli
//! 4. log in (expoKit only)
//! 5. eject
//! 6. publish (when requested)
//! 7. pin `react-native` in package.json (when requested)
//! 8. log out
//!
//! Logging out is owned by [`LogoutGuard`], which is created right after
//! step 4 and runs when it goes out of scope, so steps 5-7 cannot skip it by
//! returning an error or panicking.

use crate::core::{EjectMethod, Result, StepConfig, StepError};
use crate::manifest::force_react_native_version;
use crate::security::CommandRunner;
use crate::toolchain::{ExpoCli, ToolchainSession};
use crate::validation::validate_config;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EjectReport {
    pub method: EjectMethod,
    pub logged_in: bool,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patched_manifest: Option<PathBuf>,
}

/// Picks the eject method from the account inputs and logs the decision
pub fn select_eject_method(config: &StepConfig) -> EjectMethod {
    log::info!("Define --eject-method");
    let method = config.eject_method();
    match method {
        EjectMethod::ExpoKit => log::info!(
            "Expo account credentials have been provided => Set the --eject-method to {}",
            method
        ),
        EjectMethod::Plain => log::info!(
            "Expo account credentials have not been provided => Set the --eject-method to {}",
            method
        ),
    }
    method
}

/// Logs out of Expo when dropped
///
/// Owns the client for the rest of the run; use it through `Deref`.
pub struct LogoutGuard<R: CommandRunner> {
    cli: ExpoCli<R>,
}

impl<R: CommandRunner> LogoutGuard<R> {
    pub fn new(cli: ExpoCli<R>) -> Self {
        Self { cli }
    }
}

impl<R: CommandRunner> Deref for LogoutGuard<R> {
    type Target = ExpoCli<R>;

    fn deref(&self) -> &Self::Target {
        &self.cli
    }
}

impl<R: CommandRunner> DerefMut for LogoutGuard<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cli
    }
}

impl<R: CommandRunner> Drop for LogoutGuard<R> {
    fn drop(&mut self) {
        log::info!("Logging out from Expo");
        if !self.cli.session().method.requires_login() {
            log::info!("You were not logged in => Skip...");
            return;
        }
        // A panic escaping here while the run already unwinds would abort.
        match panic::catch_unwind(AssertUnwindSafe(|| self.cli.logout())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("Failed to log out from your Expo account, error: {}", e);
            }
            Err(_) => log::warn!("Logging out from your Expo account panicked"),
        }
    }
}

/// Runs the whole step against `runner`
///
/// On error, logout has already run by the time this returns.
pub fn run_eject<R: CommandRunner>(config: &StepConfig, runner: R) -> Result<EjectReport> {
    validate_config(config)?;

    let method = select_eject_method(config);
    let session = ToolchainSession::new(&config.expo_cli_version, method, config.workdir.as_deref());
    log::debug!("Toolchain session: {:?}", session);
    let mut cli = ExpoCli::new(session, runner);

    log::info!("Install Expo CLI version: {}", config.expo_cli_version);
    cli.install()?;

    log::info!("Login to Expo");
    let logged_in = match method {
        EjectMethod::ExpoKit => {
            let (Some(user_name), Some(password)) =
                (config.user_name.as_deref(), config.password.as_ref())
            else {
                return Err(StepError::configuration(
                    "expoKit eject method requires both user name and password",
                ));
            };
            cli.login(user_name, password)?;
            true
        }
        EjectMethod::Plain => {
            log::info!("--eject-method has been set to plain => Skip...");
            false
        }
    };

    let mut cli = LogoutGuard::new(cli);

    log::info!("Eject project");
    cli.eject()?;

    let published = if config.should_publish() {
        log::info!("Publish project");
        cli.publish()?;
        true
    } else {
        log::debug!("run_publish is {:?} => Skip publishing", config.run_publish);
        false
    };

    let patched_manifest = match config.force_react_native_version.as_deref() {
        Some(version) => {
            log::info!("Force react-native version: {}", version);
            Some(force_react_native_version(config.workdir_path(), version)?)
        }
        None => None,
    };

    Ok(EjectReport {
        method,
        logged_in,
        published,
        patched_manifest,
    })
}
