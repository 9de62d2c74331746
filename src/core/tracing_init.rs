use crate::core::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber; `RUST_LOG` overrides the configured level
///
/// `console = true` forces human-readable output even when `format = "json"`.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if uses_console_output(config) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_line_number(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init();
    }
}

fn uses_console_output(config: &LoggingConfig) -> bool {
    config.console || config.format == "console"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(format: &str, console: bool) -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            format: format.to_string(),
            console,
        }
    }

    #[test]
    fn test_output_selection() {
        assert!(!uses_console_output(&logging("json", false)));
        assert!(uses_console_output(&logging("console", false)));
        assert!(uses_console_output(&logging("json", true)));
    }
}
