pub mod build_info;
pub mod paths;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "fintrack=info";

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean; a set `RUST_LOG` replaces the default directive.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn log_filter(rust_log: Option<String>) -> EnvFilter {
    match rust_log.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => EnvFilter::try_new(raw).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_takes_precedence_over_default() {
        let filter = log_filter(Some("fintrack=debug".into()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Some("fintrack=warn".into()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn unset_or_blank_rust_log_uses_default() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("  ".into())).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
