// Grid Signal Engine Library
//
// Turns trading-bot settings and price readings into trade actions for an
// external order executor. Grid, momentum and DCA strategies.

pub mod core;
pub mod config;
pub mod error;       // Error types
pub mod logging;     // Subscriber setup and audit target
pub mod strategy;    // Typed per-strategy settings
pub mod runner;      // Tick loop and batch evaluation

// Re-export core signal types
pub use crate::core::{
    evaluate, evaluate_settings, evaluate_with_report, grid_levels, level_at, partition_levels,
    ActionKind, GridAction, GridEvaluation, LevelPartition, MAX_REPORT_LEVELS,
    momentum_signal, MomentumSignal,
    dca_actions, should_invest_now, DcaAction, DcaState,
};

// Re-export error types
pub use error::{InvalidConfiguration, TradingError, TradingResult};

// Re-export configuration
pub use config::{Config, ConfigError, LoggingConfig};
pub use strategy::{BotConfiguration, BotSettings, DcaConfig, Frequency, GridConfiguration, MaType, MomentumConfig};

// Re-export runner components
pub use runner::{evaluate_all, BotDecision, BotRunner, PriceTick, RunSummary};
