//! Error types for the signal engine
//!
//! Construction paths (settings parsing, config loading) return these errors.
//! The evaluation entry points never do: they log the error and return an
//! empty result so one bad bot cannot stall a shared evaluation loop.

use crate::config::ConfigError;

/// Why a bot configuration (or a price handed to it) was rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConfiguration {
    #[error("current price must be a finite number, got {0}")]
    NonFinitePrice(f64),

    #[error("{field} must be a finite number, got {value}")]
    NonFiniteLimit { field: &'static str, value: f64 },

    #[error("upper_limit ({upper}) must be greater than lower_limit ({lower})")]
    InvertedLimits { lower: f64, upper: f64 },

    #[error("num_grids must be at least 2, got {0}")]
    TooFewGrids(usize),

    #[error("missing required setting '{0}'")]
    MissingField(String),

    #[error("setting '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown bot type '{0}' (expected grid, momentum or dca)")]
    UnknownBotType(String),

    #[error("parameter '{0}' {1}")]
    InvalidParameter(&'static str, String),
}

impl InvalidConfiguration {
    /// Name of the setting the error is about, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            InvalidConfiguration::NonFinitePrice(_) => Some("current_price"),
            InvalidConfiguration::NonFiniteLimit { field, .. } => Some(*field),
            InvalidConfiguration::InvertedLimits { .. } => Some("upper_limit"),
            InvalidConfiguration::TooFewGrids(_) => Some("num_grids"),
            InvalidConfiguration::MissingField(field) => Some(field.as_str()),
            InvalidConfiguration::InvalidField { field, .. } => Some(field.as_str()),
            InvalidConfiguration::UnknownBotType(_) => Some("bot_type"),
            InvalidConfiguration::InvalidParameter(field, _) => Some(*field),
        }
    }
}

/// Top-level error for the library and CLI
#[derive(Debug, thiserror::Error)]
pub enum TradingError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfiguration),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("price feed error: {0}")]
    PriceFeed(String),
}

impl TradingError {
    /// A user-facing message with a hint on how to fix the problem
    pub fn user_message(&self) -> String {
        match self {
            TradingError::InvalidConfiguration(err) => format!(
                "Bot configuration rejected: {}\n\n\
                 💡 Check the bot entry in your config file and run: grid-signal validate",
                err
            ),
            TradingError::Config(ConfigError::FileRead(msg)) => format!(
                "Could not read configuration: {}\n\n\
                 💡 Create one with: grid-signal init",
                msg
            ),
            TradingError::PriceFeed(msg) => format!(
                "Could not read prices: {}\n\n\
                 💡 Price files hold one number per line",
                msg
            ),
            other => other.to_string(),
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            TradingError::InvalidConfiguration(_) | TradingError::Config(_) => "config",
            TradingError::Io(_) => "io",
            TradingError::PriceFeed(_) => "feed",
        }
    }
}

/// Result type alias using TradingError
pub type TradingResult<T> = Result<T, TradingError>;
