// Integration tests for configuration loading and validation

mod common;

use grid_signal_engine::{BotSettings, Config, ConfigError, InvalidConfiguration, TradingError};
use common::{create_temp_config_path, create_test_config};
use std::fs;
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_config_file_round_trip() {
    let (_temp_dir, config_path) = create_temp_config_path();
    let config = create_test_config();

    assert_ok!(config.to_file(&config_path));
    let loaded = assert_ok!(Config::from_file(&config_path));

    assert_eq!(loaded.bots, config.bots);
    assert!(!loaded.logging.enable_signal_logging);
}

#[test]
fn test_load_or_create_writes_default() {
    let (_temp_dir, config_path) = create_temp_config_path();
    assert!(!config_path.exists());

    let created = assert_ok!(Config::load_or_create(&config_path));
    assert!(config_path.exists());

    let reloaded = assert_ok!(Config::load_or_create(&config_path));
    assert_eq!(created.bots, reloaded.bots);
}

#[test]
fn test_active_grid_bots_skip_other_strategies() {
    let config = create_test_config();
    let names: Vec<&str> = config.active_grid_bots().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["btc-grid", "eth-grid"]);
    assert!(matches!(
        config.find_bot("eth-dca").map(|bot| &bot.settings),
        Some(BotSettings::Dca(_))
    ));
}

#[test]
fn test_missing_file() {
    let (_temp_dir, config_path) = create_temp_config_path();
    let err = assert_err!(Config::from_file(&config_path));
    assert!(matches!(err, ConfigError::FileRead(_)));

    let trading: TradingError = err.into();
    assert!(trading.user_message().contains("grid-signal init"));
}

#[test]
fn test_malformed_toml() {
    let (_temp_dir, config_path) = create_temp_config_path();
    fs::write(&config_path, "this is not valid toml {{{").expect("Failed to write malformed config");

    assert!(matches!(Config::from_file(&config_path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_unknown_bot_type_rejected() {
    let text = r#"
[[bots]]
name = "mystery"
bot_type = "arbitrage"
symbol = "BTCUSDT"
"#;
    assert!(matches!(Config::from_toml_str(text), Err(ConfigError::Parse(_))));
}

#[test]
fn test_grid_with_too_few_lines_rejected() {
    let text = r#"
[[bots]]
name = "thin"
is_active = true
bot_type = "grid"
symbol = "BTCUSDT"
upper_limit = 50000.0
lower_limit = 40000.0
num_grids = 1
"#;
    let err = assert_err!(Config::from_toml_str(text));
    match err {
        ConfigError::InvalidBot { name, source } => {
            assert_eq!(name, "thin");
            assert_eq!(source, InvalidConfiguration::TooFewGrids(1));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_dca_and_momentum_parse_with_defaults() {
    let text = r#"
[logging]
enable_price_logging = true
enable_signal_logging = true

[[bots]]
name = "momo"
bot_type = "momentum"
symbol = "SOLUSDT"
ma_short_period = 5

[[bots]]
name = "stack"
is_active = true
bot_type = "dca"
symbol = "BTCUSDT"
investment_amount = 100.0
frequency = "hourly"
smart_dip_pct = 3.0
smart_dip_ma_type = "ema"
"#;
    let config = assert_ok!(Config::from_toml_str(text));
    assert!(config.logging.enable_price_logging);

    match &config.bots[0].settings {
        BotSettings::Momentum(momentum) => {
            assert_eq!(momentum.ma_short_period, 5);
            assert_eq!(momentum.ma_long_period, 21);
            assert_eq!(momentum.rsi_period, 14);
        }
        other => panic!("unexpected settings {:?}", other),
    }
    match &config.bots[1].settings {
        BotSettings::Dca(dca) => {
            assert_eq!(dca.smart_dip_ma_period, 20);
            assert_eq!(dca.smart_dip_multiplier, 1.0);
            assert_eq!(dca.trailing_stop_pct, None);
        }
        other => panic!("unexpected settings {:?}", other),
    }
}
