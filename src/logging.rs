// Logging setup
//
// Trading decisions are emitted as structured events on AUDIT_TARGET so they
// can be routed or silenced independently of the operational log.

use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Tracing target for the trading-decision audit trail
pub const AUDIT_TARGET: &str = "grid_signal_engine::audit";

/// Build the target filter for the given verbosity and switches
pub fn filter(verbose: bool, config: &LoggingConfig) -> Targets {
    let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let audit_level = if config.enable_signal_logging { LevelFilter::INFO } else { LevelFilter::OFF };

    Targets::new()
        .with_default(default_level)
        .with_target(AUDIT_TARGET, audit_level)
}

/// Install the global fmt subscriber. Returns false if one was already set.
pub fn init(verbose: bool, config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(verbose))
        .with(filter(verbose, config))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_audit_can_be_silenced() {
        let config = LoggingConfig {
            enable_price_logging: false,
            enable_signal_logging: false,
        };
        let targets = filter(false, &config);
        assert!(!targets.would_enable(AUDIT_TARGET, &Level::INFO));
        assert!(targets.would_enable("grid_signal_engine::runner", &Level::INFO));
    }

    #[test]
    fn test_verbose_enables_debug() {
        let targets = filter(true, &LoggingConfig::default());
        assert!(targets.would_enable("grid_signal_engine::core", &Level::DEBUG));
        assert!(targets.would_enable(AUDIT_TARGET, &Level::INFO));

        let quiet = filter(false, &LoggingConfig::default());
        assert!(!quiet.would_enable("grid_signal_engine::core", &Level::DEBUG));
    }
}
