//! Typed bot settings
//!
//! Each strategy has its own validated settings struct, selected through the
//! `bot_type` tag. Optional parameters get their defaults here, when the
//! settings are constructed, never inside an evaluation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::InvalidConfiguration;

/// Settings for the grid strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfiguration {
    pub symbol: String,
    pub upper_limit: f64,
    pub lower_limit: f64,
    /// Number of grid lines; the grid has `num_grids - 1` intervals
    pub num_grids: usize,
    /// Passed through to the executor; the signal logic ignores it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_per_grid: Option<f64>,
}

impl GridConfiguration {
    /// Build a validated grid configuration
    pub fn new(
        symbol: impl Into<String>,
        lower_limit: f64,
        upper_limit: f64,
        num_grids: usize,
    ) -> Result<Self, InvalidConfiguration> {
        let config = Self {
            symbol: symbol.into(),
            upper_limit,
            lower_limit,
            num_grids,
            investment_per_grid: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Full check for stored settings: the grid shape plus the executor's
    /// per-grid investment
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        self.validate_grid()?;
        if let Some(amount) = self.investment_per_grid {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(InvalidConfiguration::InvalidParameter(
                    "investment_per_grid",
                    format!("must be a positive number, got {}", amount),
                ));
            }
        }
        Ok(())
    }

    /// The checks a signal evaluation depends on: finite ordered limits and at
    /// least two grid lines. `investment_per_grid` is not looked at.
    pub fn validate_grid(&self) -> Result<(), InvalidConfiguration> {
        if !self.upper_limit.is_finite() {
            return Err(InvalidConfiguration::NonFiniteLimit {
                field: "upper_limit",
                value: self.upper_limit,
            });
        }
        if !self.lower_limit.is_finite() {
            return Err(InvalidConfiguration::NonFiniteLimit {
                field: "lower_limit",
                value: self.lower_limit,
            });
        }
        if self.upper_limit <= self.lower_limit {
            return Err(InvalidConfiguration::InvertedLimits {
                lower: self.lower_limit,
                upper: self.upper_limit,
            });
        }
        if self.num_grids < 2 {
            return Err(InvalidConfiguration::TooFewGrids(self.num_grids));
        }
        Ok(())
    }
}

fn default_interval() -> String { "1h".to_string() }
fn default_rsi_period() -> usize { 14 }
fn default_rsi_oversold() -> f64 { 30.0 }
fn default_rsi_overbought() -> f64 { 70.0 }
fn default_macd_fast() -> usize { 12 }
fn default_macd_slow() -> usize { 26 }
fn default_macd_signal() -> usize { 9 }
fn default_ma_short_period() -> usize { 9 }
fn default_ma_long_period() -> usize { 21 }
fn default_kline_limit() -> usize { 100 }

/// Settings for the momentum strategy (SMA crossover confirmed by MACD and RSI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    #[serde(default = "default_ma_short_period")]
    pub ma_short_period: usize,
    #[serde(default = "default_ma_long_period")]
    pub ma_long_period: usize,
    /// How many candles the caller should fetch
    #[serde(default = "default_kline_limit")]
    pub kline_limit: usize,
}

impl MomentumConfig {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: default_interval(),
            rsi_period: default_rsi_period(),
            rsi_oversold: default_rsi_oversold(),
            rsi_overbought: default_rsi_overbought(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            ma_short_period: default_ma_short_period(),
            ma_long_period: default_ma_long_period(),
            kline_limit: default_kline_limit(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ma_short_period", self.ma_short_period),
            ("ma_long_period", self.ma_long_period),
            ("kline_limit", self.kline_limit),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(InvalidConfiguration::InvalidParameter(name, "must be at least 1".to_string()));
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(InvalidConfiguration::InvalidParameter(
                "macd_fast",
                format!("must be below macd_slow ({})", self.macd_slow),
            ));
        }
        if self.ma_short_period >= self.ma_long_period {
            return Err(InvalidConfiguration::InvalidParameter(
                "ma_short_period",
                format!("must be below ma_long_period ({})", self.ma_long_period),
            ));
        }
        let thresholds_ok = self.rsi_oversold.is_finite()
            && self.rsi_overbought.is_finite()
            && self.rsi_oversold >= 0.0
            && self.rsi_overbought <= 100.0
            && self.rsi_oversold < self.rsi_overbought;
        if !thresholds_ok {
            return Err(InvalidConfiguration::InvalidParameter(
                "rsi_oversold",
                format!(
                    "thresholds must satisfy 0 <= oversold < overbought <= 100, got {} / {}",
                    self.rsi_oversold, self.rsi_overbought
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
}

impl Frequency {
    pub fn period(&self) -> chrono::Duration {
        match self {
            Frequency::Hourly => chrono::Duration::hours(1),
            Frequency::Daily => chrono::Duration::days(1),
            Frequency::Weekly => chrono::Duration::weeks(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaType {
    #[default]
    Sma,
    Ema,
}

fn default_smart_dip_ma_period() -> usize { 20 }
fn default_smart_dip_multiplier() -> f64 { 1.0 }

/// Settings for dollar-cost averaging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcaConfig {
    pub symbol: String,
    /// Quote-currency amount per scheduled buy
    pub investment_amount: f64,
    pub frequency: Frequency,
    /// Buy extra when price is this many percent below the moving average
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_dip_pct: Option<f64>,
    #[serde(default = "default_smart_dip_ma_period")]
    pub smart_dip_ma_period: usize,
    #[serde(default)]
    pub smart_dip_ma_type: MaType,
    #[serde(default = "default_smart_dip_multiplier")]
    pub smart_dip_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_stop_pct: Option<f64>,
}

impl DcaConfig {
    pub fn new(symbol: impl Into<String>, investment_amount: f64, frequency: Frequency) -> Self {
        Self {
            symbol: symbol.into(),
            investment_amount,
            frequency,
            smart_dip_pct: None,
            smart_dip_ma_period: default_smart_dip_ma_period(),
            smart_dip_ma_type: MaType::default(),
            smart_dip_multiplier: default_smart_dip_multiplier(),
            trailing_stop_pct: None,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if !self.investment_amount.is_finite() || self.investment_amount <= 0.0 {
            return Err(InvalidConfiguration::InvalidParameter(
                "investment_amount",
                format!("must be a positive number, got {}", self.investment_amount),
            ));
        }
        if let Some(pct) = self.smart_dip_pct {
            if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
                return Err(InvalidConfiguration::InvalidParameter(
                    "smart_dip_pct",
                    format!("must be between 0 and 100, got {}", pct),
                ));
            }
        }
        if self.smart_dip_ma_period == 0 {
            return Err(InvalidConfiguration::InvalidParameter(
                "smart_dip_ma_period",
                "must be at least 1".to_string(),
            ));
        }
        if !self.smart_dip_multiplier.is_finite() || self.smart_dip_multiplier <= 0.0 {
            return Err(InvalidConfiguration::InvalidParameter(
                "smart_dip_multiplier",
                format!("must be a positive number, got {}", self.smart_dip_multiplier),
            ));
        }
        if let Some(pct) = self.trailing_stop_pct {
            if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
                return Err(InvalidConfiguration::InvalidParameter(
                    "trailing_stop_pct",
                    format!("must be between 0 and 100, got {}", pct),
                ));
            }
        }
        Ok(())
    }
}

/// Strategy settings, discriminated by `bot_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "bot_type", rename_all = "lowercase")]
pub enum BotSettings {
    Grid(GridConfiguration),
    Momentum(MomentumConfig),
    Dca(DcaConfig),
}

impl BotSettings {
    /// Build typed settings from a bot type name and a loose settings map
    pub fn from_value(bot_type: &str, settings: serde_json::Value) -> Result<Self, InvalidConfiguration> {
        let parsed = match bot_type.trim().to_ascii_lowercase().as_str() {
            "grid" => BotSettings::Grid(parse_settings(settings)?),
            "momentum" => BotSettings::Momentum(parse_settings(settings)?),
            "dca" => BotSettings::Dca(parse_settings(settings)?),
            other => return Err(InvalidConfiguration::UnknownBotType(other.to_string())),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        match self {
            BotSettings::Grid(config) => config.validate(),
            BotSettings::Momentum(config) => config.validate(),
            BotSettings::Dca(config) => config.validate(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            BotSettings::Grid(config) => &config.symbol,
            BotSettings::Momentum(config) => &config.symbol,
            BotSettings::Dca(config) => &config.symbol,
        }
    }

    pub fn bot_type(&self) -> &'static str {
        match self {
            BotSettings::Grid(_) => "grid",
            BotSettings::Momentum(_) => "momentum",
            BotSettings::Dca(_) => "dca",
        }
    }

    pub fn as_grid(&self) -> Option<&GridConfiguration> {
        match self {
            BotSettings::Grid(config) => Some(config),
            _ => None,
        }
    }
}

/// A named bot as stored by the surrounding application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfiguration {
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(flatten)]
    pub settings: BotSettings,
}

impl BotConfiguration {
    pub fn new(name: impl Into<String>, settings: BotSettings) -> Self {
        Self { name: name.into(), is_active: true, settings }
    }
}

/// Deserialize a settings map, turning serde's messages into field-level errors
pub(crate) fn parse_settings<T: DeserializeOwned>(settings: serde_json::Value) -> Result<T, InvalidConfiguration> {
    serde_json::from_value(settings).map_err(|err| {
        let message = err.to_string();
        match missing_field_name(&message) {
            Some(field) => InvalidConfiguration::MissingField(field),
            None => InvalidConfiguration::InvalidField {
                field: "settings".to_string(),
                reason: message,
            },
        }
    })
}

fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
