// Configuration management for the signal engine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::InvalidConfiguration;
use crate::strategy::{
    BotConfiguration, BotSettings, DcaConfig, Frequency, GridConfiguration, MomentumConfig,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log every price tick the runner receives at info level
    pub enable_price_logging: bool,
    /// Emit the trading-decision audit trail
    pub enable_signal_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_price_logging: false,
            enable_signal_logging: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub bots: Vec<BotConfiguration>,
}

impl Default for Config {
    fn default() -> Self {
        let grid = GridConfiguration {
            symbol: "BTCUSDT".to_string(),
            upper_limit: 50000.0,
            lower_limit: 40000.0,
            num_grids: 5,
            investment_per_grid: Some(100.0),
        };

        let mut dca_settings = DcaConfig::new("ETHUSDT", 50.0, Frequency::Daily);
        dca_settings.smart_dip_pct = Some(5.0);
        dca_settings.smart_dip_multiplier = 1.5;
        dca_settings.trailing_stop_pct = Some(10.0);

        let mut momentum = BotConfiguration::new("BTC momentum", BotSettings::Momentum(MomentumConfig::new("BTCUSDT")));
        momentum.is_active = false;
        let mut dca = BotConfiguration::new("ETH daily DCA", BotSettings::Dca(dca_settings));
        dca.is_active = false;

        Self {
            logging: LoggingConfig::default(),
            bots: vec![
                BotConfiguration::new("BTC grid", BotSettings::Grid(grid)),
                momentum,
                dca,
            ],
        }
    }
}

impl Config {
    /// Load the bot list from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            bots = config.bots.len(),
            active_grids = config.active_grid_bots().len(),
            "Loaded bot configuration"
        );
        Ok(config)
    }

    /// Parse TOML text and reject any misconfigured bot
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the bot list to a TOML file. A bot list that would not load back
    /// is refused before anything is written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Load the bot list, or write the starter bots when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Self::default();
        config.to_file(path)?;
        info!(
            path = %path.display(),
            bots = config.bots.len(),
            "Created starter bot configuration"
        );
        Ok(config)
    }

    /// Grid settings of every active grid bot, with the bot name
    pub fn active_grid_bots(&self) -> Vec<(&str, &GridConfiguration)> {
        self.bots
            .iter()
            .filter(|bot| bot.is_active)
            .filter_map(|bot| bot.settings.as_grid().map(|grid| (bot.name.as_str(), grid)))
            .collect()
    }

    pub fn find_bot(&self, name: &str) -> Option<&BotConfiguration> {
        self.bots.iter().find(|bot| bot.name == name)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();

        for bot in &self.bots {
            if bot.name.trim().is_empty() {
                return Err(ConfigError::Validation("bot name must not be empty".to_string()));
            }
            if !names.insert(bot.name.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate bot name '{}'", bot.name)));
            }
            if bot.settings.symbol().trim().is_empty() {
                return Err(ConfigError::InvalidBot {
                    name: bot.name.clone(),
                    source: InvalidConfiguration::MissingField("symbol".to_string()),
                });
            }
            bot.settings.validate().map_err(|source| ConfigError::InvalidBot {
                name: bot.name.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read bot configuration {0}")]
    FileRead(String),

    #[error("cannot write bot configuration {0}")]
    FileWrite(String),

    #[error("bot configuration is not valid TOML: {0}")]
    Parse(String),

    #[error("cannot encode bot configuration: {0}")]
    Serialize(String),

    #[error("bot list rejected: {0}")]
    Validation(String),

    #[error("Bot '{name}' is misconfigured: {source}")]
    InvalidBot {
        name: String,
        #[source]
        source: InvalidConfiguration,
    },
}
