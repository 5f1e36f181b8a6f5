use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use thiserror::Error;

/// Failures raised while setting up or running a session.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Terminal error: {0}")]
    Terminal(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(AppError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::Config(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::App(AppError::Io(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Terminal(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Terminal(err.to_string())
    }
}
