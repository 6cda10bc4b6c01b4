// Core signal logic modules

pub mod types;
pub mod indicators;
pub mod grid_engine;
pub mod momentum;
pub mod dca;

// Re-export commonly used types
pub use types::{ActionKind, DcaAction, GridAction, MomentumSignal};
pub use grid_engine::{evaluate, evaluate_settings, evaluate_with_report, grid_levels, level_at, partition_levels, GridEvaluation, LevelPartition, MAX_REPORT_LEVELS};
pub use momentum::momentum_signal;
pub use dca::{dca_actions, should_invest_now, DcaState};
