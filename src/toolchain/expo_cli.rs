//! Expo CLI client
//!
//! Thin typed surface over the expo-cli commands the step needs. Every
//! command runs with `--non-interactive` so the CLI never waits for input.

use crate::core::{EjectMethod, LATEST_VERSION, Result, StepError};
use crate::security::{CommandError, CommandRunner, Invocation};
use secrecy::SecretString;
use std::path::{Path, PathBuf};

/// npm package that provides the `expo` binary
pub const EXPO_CLI_PACKAGE: &str = "expo-cli";

const NON_INTERACTIVE: &str = "--non-interactive";

/// Parameters shared by every expo-cli invocation of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSession {
    pub version: String,
    pub method: EjectMethod,
    pub workdir: Option<PathBuf>,
}

impl ToolchainSession {
    pub fn new(version: impl Into<String>, method: EjectMethod, workdir: Option<&Path>) -> Self {
        Self {
            version: version.into(),
            method,
            workdir: workdir.map(Path::to_path_buf),
        }
    }

    /// `expo-cli` or `expo-cli@<version>`
    pub fn package_spec(&self) -> String {
        if self.version == LATEST_VERSION {
            EXPO_CLI_PACKAGE.to_string()
        } else {
            format!("{}@{}", EXPO_CLI_PACKAGE, self.version)
        }
    }
}

/// Runs expo-cli commands through a [`CommandRunner`]
#[derive(Debug)]
pub struct ExpoCli<R> {
    session: ToolchainSession,
    runner: R,
}

impl<R: CommandRunner> ExpoCli<R> {
    pub fn new(session: ToolchainSession, runner: R) -> Self {
        Self { session, runner }
    }

    pub fn session(&self) -> &ToolchainSession {
        &self.session
    }

    /// `npm install -g expo-cli[@version]`
    pub fn install(&mut self) -> Result<()> {
        let invocation = Invocation::new("npm")
            .args(["install", "-g"])
            .arg(self.session.package_spec());
        self.runner.run(&invocation).map_err(|e| {
            StepError::external_tool(
                format!(
                    "install the selected ({}) version for Expo CLI",
                    self.session.version
                ),
                e,
            )
        })
    }

    /// Logs in to the Expo account; the password is redacted from the echo
    pub fn login(&mut self, user_name: &str, password: &SecretString) -> Result<()> {
        let invocation = Invocation::new("expo")
            .args(["login", NON_INTERACTIVE, "-u", user_name, "-p"])
            .secret_arg(password);
        self.runner
            .run(&invocation)
            .map_err(|e| StepError::external_tool("log in to your provided Expo account", e))
    }

    /// Logs out; callers decide whether a failure matters
    pub fn logout(&mut self) -> std::result::Result<(), CommandError> {
        self.runner
            .run(&Invocation::new("expo").args(["logout", NON_INTERACTIVE]))
    }

    /// Creates the Xcode and Android Studio projects
    pub fn eject(&mut self) -> Result<()> {
        let invocation = Invocation::new("expo")
            .args([
                "eject",
                NON_INTERACTIVE,
                "--eject-method",
                self.session.method.as_str(),
            ])
            .current_dir(self.session.workdir.as_deref());
        self.runner
            .run(&invocation)
            .map_err(|e| StepError::external_tool("eject project", e))
    }

    pub fn publish(&mut self) -> Result<()> {
        let invocation = Invocation::new("expo")
            .args(["publish", NON_INTERACTIVE])
            .current_dir(self.session.workdir.as_deref());
        self.runner
            .run(&invocation)
            .map_err(|e| StepError::external_tool("publish project", e))
    }
}
