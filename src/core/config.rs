//! Step configuration and the values derived from it
//!
//! The configuration is built once from the step inputs and never mutated
//! afterwards. Empty inputs are normalized to `None` so that an unset
//! environment variable and an empty one behave the same.

use crate::security::mask;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Version sentinel that installs the newest published expo-cli
pub const LATEST_VERSION: &str = "latest";

/// Publish input value that enables `expo publish`
pub const PUBLISH_ENABLED: &str = "yes";

/// The `--eject-method` passed to `expo eject`
///
/// With `Plain`, Expo SDK imports stop working in the ejected project.
/// `ExpoKit` keeps them but needs a logged-in Expo account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EjectMethod {
    #[serde(rename = "plain")]
    Plain,
    #[serde(rename = "expoKit")]
    ExpoKit,
}

impl EjectMethod {
    /// Derive the method from the account inputs
    pub fn for_account(user_name: Option<&str>) -> Self {
        match user_name {
            Some(name) if !name.is_empty() => Self::ExpoKit,
            _ => Self::Plain,
        }
    }

    /// Value of the `--eject-method` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::ExpoKit => "expoKit",
        }
    }

    /// Whether this method requires an authenticated session
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::ExpoKit)
    }
}

impl fmt::Display for EjectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved step inputs
#[derive(Debug)]
pub struct StepConfig {
    /// Project directory; `None` means the current directory
    pub workdir: Option<PathBuf>,
    /// expo-cli version to install, or [`LATEST_VERSION`]
    pub expo_cli_version: String,
    /// Expo account user name
    pub user_name: Option<String>,
    /// Expo account password
    pub password: Option<SecretString>,
    /// Raw publish input; only [`PUBLISH_ENABLED`] turns publishing on
    pub run_publish: String,
    /// Version to pin `react-native` to after ejecting
    pub force_react_native_version: Option<String>,
    /// Raise the log level to debug
    pub verbose_log: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl StepConfig {
    /// Create a configuration that installs the given expo-cli version
    pub fn new(expo_cli_version: impl Into<String>) -> Self {
        Self {
            workdir: None,
            expo_cli_version: expo_cli_version.into(),
            user_name: None,
            password: None,
            run_publish: String::new(),
            force_react_native_version: None,
            verbose_log: false,
        }
    }

    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn with_account(mut self, user_name: Option<String>, password: Option<String>) -> Self {
        self.user_name = non_empty(user_name);
        self.password = non_empty(password).map(|p| SecretString::new(p.into()));
        self
    }

    pub fn with_publish(mut self, run_publish: impl Into<String>) -> Self {
        self.run_publish = run_publish.into();
        self
    }

    pub fn with_forced_react_native_version(mut self, version: Option<String>) -> Self {
        self.force_react_native_version = non_empty(version);
        self
    }

    pub fn with_verbose_log(mut self, verbose_log: bool) -> Self {
        self.verbose_log = verbose_log;
        self
    }

    /// Project directory as a path; empty when the current directory is used
    pub fn workdir_path(&self) -> &Path {
        self.workdir.as_deref().unwrap_or(Path::new(""))
    }

    /// Whether `expo publish` should run after ejecting
    pub fn should_publish(&self) -> bool {
        self.run_publish == PUBLISH_ENABLED
    }

    /// The eject method implied by the account inputs
    pub fn eject_method(&self) -> EjectMethod {
        EjectMethod::for_account(self.user_name.as_deref())
    }
}

impl fmt::Display for StepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "- Workdir: {}", self.workdir_path().display())?;
        writeln!(f, "- ExpoCLIVersion: {}", self.expo_cli_version)?;
        writeln!(f, "- UserName: {}", self.user_name.as_deref().unwrap_or(""))?;
        let password = self
            .password
            .as_ref()
            .map(|p| mask(p.expose_secret()))
            .unwrap_or("");
        writeln!(f, "- Password: {}", password)?;
        writeln!(f, "- RunPublish: {}", self.run_publish)?;
        write!(
            f,
            "- ForceReactNativeVersion: {}",
            self.force_react_native_version.as_deref().unwrap_or("")
        )
    }
}
