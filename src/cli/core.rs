//! Core CLI loop, dispatch, and shell context helpers.

use std::{cell::RefCell, fs, io, path::PathBuf, rc::Rc};

use dialoguer::theme::ColorfulTheme;
use fintrack_config::{Config, ConfigError, ConfigManager};
use fintrack_core::{AmountFormatter, CoreError, SymbolFormatter, Tracker};
use fintrack_storage_json::JsonFileStore;
use tracing::{debug, warn};

use crate::cli::commands;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::render::{self, TerminalRenderer};
pub use crate::errors::CliError;
use crate::utils::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Session state shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: Tracker<JsonFileStore>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatter: Rc<RefCell<SymbolFormatter>>,
    pub theme: ColorfulTheme,
    pub home: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, paths::app_home_dir())
    }

    /// Opens config and store under `home`, creating it if needed.
    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        fs::create_dir_all(&home)?;
        let config_manager = ConfigManager::with_base_dir(&home)?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "config unreadable; using defaults");
                Config::default()
            }
        };

        let store_paths = paths::store_paths(&home, &config);
        debug!(store = %store_paths.store_file.display(), "opening store");
        let store = JsonFileStore::with_retention(store_paths, config.backup_retention)?;
        let mut tracker = Tracker::open(store);

        let formatter = Rc::new(RefCell::new(formatter_for(&config)));
        tracker.subscribe(render::announce_changes(Rc::clone(&formatter)));

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            tracker,
            config_manager,
            config,
            formatter,
            theme: ColorfulTheme::default(),
            home,
            last_command: None,
            running: true,
        };
        context.apply_output_preferences();
        Ok(context)
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.completions()
    }

    pub fn prompt(&self) -> String {
        format!("fintrack [{}]> ", self.format_amount(self.tracker.ledger().current_balance()))
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.formatter.borrow().format_amount(amount)
    }

    /// Renderer writing to stdout with the current formatter.
    pub fn renderer(&self) -> TerminalRenderer<io::Stdout> {
        TerminalRenderer::stdout(self.formatter.borrow().clone(), self.color_enabled())
    }

    fn color_enabled(&self) -> bool {
        self.config.ui_color_enabled && self.is_interactive()
    }

    /// Re-applies formatter, colors and retention after a config change.
    pub(crate) fn apply_config(&mut self) {
        *self.formatter.borrow_mut() = formatter_for(&self.config);
        self.tracker
            .store_mut()
            .set_retention(self.config.backup_retention);
        self.apply_output_preferences();
    }

    fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color: self.color_enabled(),
        });
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            debug!(command, args = args.len(), "dispatching command");
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(name) = self.registry.closest(input) {
            output::hint(format!("Did you mean `{}`?", name));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit FinTrack?", true).map_err(CliError::from)
    }

    /// Command failures are reported and the loop continues; only terminal
    /// failures escape.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(CoreError::Storage(message)) => {
                output::error(format!("Could not save changes: {}", message));
                output::hint("The change is kept for this session and will be saved with the next successful write.");
                Ok(())
            }
            CommandError::Core(err) => {
                output::error(err);
                Ok(())
            }
            CommandError::Dialoguer(err) if !self.is_interactive() => {
                Err(CliError::Terminal(err.to_string()))
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}

fn formatter_for(config: &Config) -> SymbolFormatter {
    SymbolFormatter::new(config.currency_symbol.clone(), usize::from(config.precision))
}

#[cfg(test)]
pub(crate) fn process_script(home: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_home(CliMode::Script, home)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}
