// Dollar-cost averaging decisions
//
// Pure: price, time, position state and close history all come from the
// caller. Updating the state after an action is the caller's job too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::indicators::{ema, sma};
use crate::core::types::DcaAction;
use crate::logging::AUDIT_TARGET;
use crate::strategy::{DcaConfig, Frequency, MaType};

/// Position state a DCA bot needs between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DcaState {
    pub last_investment_time: Option<DateTime<Utc>>,
    pub average_purchase_price: Option<f64>,
    pub highest_price_since_purchase: Option<f64>,
    #[serde(default)]
    pub position_active: bool,
}

/// True when no investment was made yet or a full period has passed since the last one
pub fn should_invest_now(frequency: Frequency, last_investment_time: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_investment_time {
        None => true,
        Some(last) => now >= last + frequency.period(),
    }
}

/// Trailing stop price, when the state carries everything needed to compute one
pub fn trailing_stop_price(config: &DcaConfig, state: &DcaState) -> Option<f64> {
    if !state.position_active {
        return None;
    }
    let pct = config.trailing_stop_pct?;
    if state.average_purchase_price.is_none() {
        return None;
    }
    let highest = state.highest_price_since_purchase?;
    Some(highest * (1.0 - pct / 100.0))
}

/// Decide DCA actions for the current price.
///
/// `daily_closes` feeds the smart-dip moving average (oldest first) and may be
/// empty when smart dip is not configured. Always returns at least one action;
/// HOLD when nothing else applies.
pub fn dca_actions(
    config: &DcaConfig,
    state: &DcaState,
    current_price: f64,
    daily_closes: &[f64],
    now: DateTime<Utc>,
) -> Vec<DcaAction> {
    if let Err(err) = config.validate() {
        warn!(symbol = %config.symbol, reason = %err, "DCA bot: invalid configuration, holding");
        return vec![DcaAction::Hold { price: None }];
    }
    if !current_price.is_finite() || current_price <= 0.0 {
        warn!(symbol = %config.symbol, price = current_price, "DCA bot: unusable price, holding");
        return vec![DcaAction::Hold { price: None }];
    }

    if let Some(stop) = trailing_stop_price(config, state) {
        if current_price < stop {
            info!(
                target: AUDIT_TARGET,
                symbol = %config.symbol,
                price = current_price,
                stop,
                "DCA bot: trailing stop triggered"
            );
            return vec![DcaAction::TrailingStopSell { price: current_price }];
        }
    }

    let mut actions = Vec::new();

    let invest_now = should_invest_now(config.frequency, state.last_investment_time, now);
    if invest_now {
        info!(target: AUDIT_TARGET, symbol = %config.symbol, price = current_price, "DCA bot: scheduled investment");
        actions.push(DcaAction::DcaBuy {
            amount: config.investment_amount,
            price: current_price,
        });
    }

    if !invest_now {
        if let Some(threshold) = dip_threshold(config, daily_closes) {
            if current_price < threshold {
                info!(
                    target: AUDIT_TARGET,
                    symbol = %config.symbol,
                    price = current_price,
                    threshold,
                    "DCA bot: smart dip detected"
                );
                actions.push(DcaAction::SmartDipBuy {
                    amount: config.investment_amount * config.smart_dip_multiplier,
                    price: current_price,
                });
            }
        }
    }

    if actions.is_empty() {
        actions.push(DcaAction::Hold { price: Some(current_price) });
    }
    actions
}

/// Price below which a smart-dip buy fires
pub fn dip_threshold(config: &DcaConfig, daily_closes: &[f64]) -> Option<f64> {
    let pct = config.smart_dip_pct?;
    let series = match config.smart_dip_ma_type {
        MaType::Sma => sma(daily_closes, config.smart_dip_ma_period),
        MaType::Ema => ema(daily_closes, config.smart_dip_ma_period),
    };
    let last_ma = series.last().copied().flatten()?;
    Some(last_ma * (1.0 - pct / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn eth_config() -> DcaConfig {
        let mut config = DcaConfig::new("ETHUSDT", 50.0, Frequency::Daily);
        config.smart_dip_pct = Some(5.0);
        config.smart_dip_ma_period = 5;
        config.smart_dip_multiplier = 1.5;
        config.trailing_stop_pct = Some(10.0);
        config
    }

    #[test]
    fn test_should_invest_now() {
        assert!(should_invest_now(Frequency::Daily, None, now()));
        assert!(should_invest_now(Frequency::Daily, Some(now() - Duration::days(1)), now()));
        assert!(!should_invest_now(Frequency::Daily, Some(now() - Duration::hours(5)), now()));
        assert!(should_invest_now(Frequency::Hourly, Some(now() - Duration::hours(5)), now()));
        assert!(!should_invest_now(Frequency::Weekly, Some(now() - Duration::days(6)), now()));
    }

    #[test]
    fn test_scheduled_buy() {
        let state = DcaState {
            last_investment_time: Some(now() - Duration::days(2)),
            ..DcaState::default()
        };
        let actions = dca_actions(&eth_config(), &state, 3000.0, &[], now());
        assert_eq!(actions, vec![DcaAction::DcaBuy { amount: 50.0, price: 3000.0 }]);
    }

    #[test]
    fn test_smart_dip_buy() {
        let state = DcaState {
            last_investment_time: Some(now() - Duration::hours(5)),
            ..DcaState::default()
        };
        let closes = vec![3000.0; 10];
        // threshold = 3000 * 0.95 = 2850
        let actions = dca_actions(&eth_config(), &state, 2800.0, &closes, now());
        assert_eq!(actions, vec![DcaAction::SmartDipBuy { amount: 75.0, price: 2800.0 }]);

        let actions = dca_actions(&eth_config(), &state, 2900.0, &closes, now());
        assert_eq!(actions, vec![DcaAction::Hold { price: Some(2900.0) }]);
    }

    #[test]
    fn test_smart_dip_skipped_on_scheduled_buy() {
        let closes = vec![3000.0; 10];
        let actions = dca_actions(&eth_config(), &DcaState::default(), 2800.0, &closes, now());
        assert_eq!(actions, vec![DcaAction::DcaBuy { amount: 50.0, price: 2800.0 }]);
    }

    #[test]
    fn test_smart_dip_needs_history() {
        let state = DcaState {
            last_investment_time: Some(now() - Duration::hours(5)),
            ..DcaState::default()
        };
        let actions = dca_actions(&eth_config(), &state, 100.0, &[3000.0, 3000.0], now());
        assert!(actions[0].is_hold());
    }

    #[test]
    fn test_trailing_stop_sells_first() {
        let state = DcaState {
            last_investment_time: Some(now() - Duration::days(5)),
            average_purchase_price: Some(3000.0),
            highest_price_since_purchase: Some(3500.0),
            position_active: true,
        };
        // stop = 3500 * 0.9 = 3150
        let actions = dca_actions(&eth_config(), &state, 3100.0, &[], now());
        assert_eq!(actions, vec![DcaAction::TrailingStopSell { price: 3100.0 }]);

        let actions = dca_actions(&eth_config(), &state, 3200.0, &[], now());
        assert_eq!(actions, vec![DcaAction::DcaBuy { amount: 50.0, price: 3200.0 }]);
    }

    #[test]
    fn test_trailing_stop_requires_position() {
        let state = DcaState {
            average_purchase_price: Some(3000.0),
            highest_price_since_purchase: Some(3500.0),
            position_active: false,
            ..DcaState::default()
        };
        assert_eq!(trailing_stop_price(&eth_config(), &state), None);
    }

    #[test]
    fn test_bad_price_holds() {
        let actions = dca_actions(&eth_config(), &DcaState::default(), f64::NAN, &[], now());
        assert_eq!(actions, vec![DcaAction::Hold { price: None }]);
    }
}
