//! Expo Eject step
//!
//! Reads its inputs from the environment (or flags) and ejects the project.

use anyhow::Result;
use clap::Parser;
use expo_eject_step::{StepConfig, StepError, StreamingExecutor, VERBOSE_HINT, run_eject};
use std::path::PathBuf;
use std::process;

/// Eject a managed Expo project into native iOS and Android projects
#[derive(Parser)]
#[command(name = "expo-eject")]
#[command(version)]
#[command(about = "Eject a managed Expo project into native iOS and Android projects", long_about = None)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, env = "workdir")]
    workdir: Option<PathBuf>,

    /// expo-cli version to install, or "latest"
    #[arg(long, env = "expo_cli_version")]
    expo_cli_version: Option<String>,

    /// Misspelled name older pipelines still set
    #[arg(long = "expo-cli-verson", env = "expo_cli_verson", hide = true)]
    expo_cli_verson: Option<String>,

    /// Expo account user name; selects the expoKit eject method
    #[arg(long, env = "user_name")]
    user_name: Option<String>,

    /// Expo account password
    #[arg(long, env = "password", hide_env_values = true)]
    password: Option<String>,

    /// Run `expo publish` after ejecting ("yes" to enable)
    #[arg(long, env = "run_publish", default_value = "no")]
    run_publish: String,

    /// Pin react-native in package.json to this version
    #[arg(long, env = "force_react_native_version")]
    force_react_native_version: Option<String>,

    /// Enable debug logs ("yes" to enable)
    #[arg(long, env = "verbose_log", default_value = "no")]
    verbose_log: String,
}

impl Cli {
    fn uses_legacy_version(&self) -> bool {
        is_unset(&self.expo_cli_version) && !is_unset(&self.expo_cli_verson)
    }

    fn into_config(self) -> StepConfig {
        let verbose = matches!(self.verbose_log.as_str(), "yes" | "true");
        let version = self
            .expo_cli_version
            .filter(|v| !v.is_empty())
            .or(self.expo_cli_verson)
            .unwrap_or_default();
        StepConfig::new(version)
            .with_workdir(self.workdir)
            .with_account(self.user_name, self.password)
            .with_publish(self.run_publish)
            .with_forced_react_native_version(self.force_react_native_version)
            .with_verbose_log(verbose)
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn fail(error: &anyhow::Error) -> ! {
    log::error!("{}", error);
    if let Some(step_error) = error.downcast_ref::<StepError>() {
        log::debug!("{} ({:?})", step_error.code(), step_error);
        for action in step_error.suggested_actions() {
            log::info!("  - {}", action);
        }
    }
    log::warn!("{}", VERBOSE_HINT);
    process::exit(1);
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            init_logging(false);
            fail(&anyhow::anyhow!("Issue with input: {}", e));
        }
    };

    let legacy_version = cli.uses_legacy_version();
    let config = cli.into_config();
    init_logging(config.verbose_log);
    if legacy_version {
        log::warn!("expo_cli_verson is deprecated, use expo_cli_version instead");
    }

    match run(&config) {
        Ok(()) => process::exit(0),
        Err(e) => fail(&e),
    }
}

fn run(config: &StepConfig) -> Result<()> {
    log::info!("{}", config);

    let report = run_eject(config, StreamingExecutor::inherit())?;
    log::debug!("Run report: {}", serde_json::to_string(&report)?);

    log::info!("Successfully ejected your project");
    Ok(())
}
