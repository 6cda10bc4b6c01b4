// Common signal types shared by the strategy engines

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Buy,
    Sell,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Buy => write!(f, "BUY"),
            ActionKind::Sell => write!(f, "SELL"),
        }
    }
}

/// A single grid trade action, produced fresh by each evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAction {
    pub action: ActionKind,
    /// Grid level price the action refers to
    pub price: f64,
    /// 0-based index into the ordered level array (0 = lowest)
    pub grid_level: usize,
}

impl GridAction {
    pub fn buy(price: f64, grid_level: usize) -> Self {
        Self { action: ActionKind::Buy, price, grid_level }
    }

    pub fn sell(price: f64, grid_level: usize) -> Self {
        Self { action: ActionKind::Sell, price, grid_level }
    }
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.2} (level {})", self.action, self.price, self.grid_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MomentumSignal {
    Buy,
    Sell,
    Hold,
}

/// DCA decisions. Amounts are in quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DcaAction {
    DcaBuy { amount: f64, price: f64 },
    SmartDipBuy { amount: f64, price: f64 },
    TrailingStopSell { price: f64 },
    Hold { price: Option<f64> },
}

impl DcaAction {
    pub fn is_hold(&self) -> bool {
        matches!(self, DcaAction::Hold { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_action_serializes_uppercase() {
        let json = serde_json::to_value(GridAction::buy(40000.0, 0)).unwrap();
        assert_eq!(json["action"], "BUY");
        assert_eq!(json["grid_level"], 0);
    }

    #[test]
    fn test_dca_action_tagging() {
        let json = serde_json::to_value(DcaAction::TrailingStopSell { price: 3100.0 }).unwrap();
        assert_eq!(json["action"], "TRAILING_STOP_SELL");
        assert!(!DcaAction::DcaBuy { amount: 50.0, price: 1.0 }.is_hold());
    }
}
