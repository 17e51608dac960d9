//! Subscriber setup for the binary. The library only emits events.

use is_terminal::IsTerminal;
use ledgerpack::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directives, read before the config file's `logging.filter`.
pub const ENV_LOG: &str = "LEDGERPACK_LOG";

const DEFAULT_FILTER: &str = "info";

pub fn init(config: &LoggingConfig, verbose: u8) {
    let filter = build_filter(std::env::var(ENV_LOG).ok(), config, verbose);
    let json = use_json(config.format, std::io::stderr().is_terminal());

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] logging already initialised: {}", e);
    }
}

fn directives(env: Option<String>, config: &LoggingConfig, verbose: u8) -> String {
    if let Some(env) = env.filter(|s| !s.trim().is_empty()) {
        return env;
    }
    match verbose {
        0 => config
            .filter
            .clone()
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn build_filter(env: Option<String>, config: &LoggingConfig, verbose: u8) -> EnvFilter {
    let directives = directives(env, config, verbose);
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("[WARN] invalid log filter '{}': {}", directives, e);
        EnvFilter::new(DEFAULT_FILTER)
    })
}

fn use_json(format: LogFormat, stderr_is_terminal: bool) -> bool {
    match format {
        LogFormat::Json => true,
        LogFormat::Pretty => false,
        LogFormat::Auto => !stderr_is_terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_wins_over_config_and_verbosity() {
        let config = LoggingConfig {
            filter: Some("ledgerpack=warn".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(directives(Some("error".into()), &config, 2), "error");
        assert_eq!(directives(None, &config, 0), "ledgerpack=warn");
        assert_eq!(directives(Some("  ".into()), &config, 1), "debug");
        assert_eq!(directives(None, &LoggingConfig::default(), 0), "info");
    }

    #[test]
    fn auto_format_follows_the_terminal() {
        assert!(use_json(LogFormat::Auto, false));
        assert!(!use_json(LogFormat::Auto, true));
        assert!(use_json(LogFormat::Json, true));
        assert!(!use_json(LogFormat::Pretty, false));
    }
}
