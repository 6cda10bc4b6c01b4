// Common test utilities and helpers
#![allow(dead_code)]

use grid_signal_engine::{
    BotConfiguration, BotSettings, Config, DcaConfig, Frequency, GridConfiguration, LoggingConfig,
    MomentumConfig,
};
use rand::Rng;
use std::path::PathBuf;
use tempfile::TempDir;

/// The 40000–50000 BTC grid with five lines used throughout the tests
pub fn btc_grid() -> GridConfiguration {
    GridConfiguration::new("BTCUSDT", 40000.0, 50000.0, 5).expect("valid grid")
}

/// Create a test configuration with one bot of each type
pub fn create_test_config() -> Config {
    let mut dca = DcaConfig::new("ETHUSDT", 25.0, Frequency::Weekly);
    dca.trailing_stop_pct = Some(8.0);

    let mut momentum = BotConfiguration::new("momentum", BotSettings::Momentum(MomentumConfig::new("BTCUSDT")));
    momentum.is_active = false;

    Config {
        logging: LoggingConfig {
            enable_price_logging: false,
            enable_signal_logging: false,
        },
        bots: vec![
            BotConfiguration::new("btc-grid", BotSettings::Grid(btc_grid())),
            BotConfiguration::new(
                "eth-grid",
                BotSettings::Grid(GridConfiguration::new("ETHUSDT", 3000.0, 3500.0, 6).expect("valid grid")),
            ),
            momentum,
            BotConfiguration::new("eth-dca", BotSettings::Dca(dca)),
        ],
    }
}

/// Create a temporary directory holding a config path
pub fn create_temp_config_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("bots.toml");
    (temp_dir, config_path)
}

/// Random valid grid: finite limits, lower < upper, at least two lines
pub fn random_grid<R: Rng>(rng: &mut R) -> GridConfiguration {
    let lower = rng.gen_range(0.01..100_000.0);
    let width = rng.gen_range(0.01..50_000.0);
    let grids = rng.gen_range(2..60);
    GridConfiguration::new("RANDUSDT", lower, lower + width, grids).expect("valid grid")
}

/// Random price around a grid, sometimes landing exactly on a level
pub fn random_price<R: Rng>(rng: &mut R, grid: &GridConfiguration, levels: &[f64]) -> f64 {
    if rng.gen_bool(0.2) {
        levels[rng.gen_range(0..levels.len())]
    } else {
        let span = grid.upper_limit - grid.lower_limit;
        rng.gen_range(grid.lower_limit - span..grid.upper_limit + span)
    }
}
