//! Price-tick evaluation loop
//!
//! Feeds each incoming price to every active grid bot trading that symbol and
//! forwards the resulting actions to whoever executes orders. Nothing is kept
//! between ticks, so the same boundary action is forwarded again on every tick
//! that stays outside the grid.

use rayon::prelude::*;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::grid_engine::evaluate;
use crate::core::types::GridAction;
use crate::strategy::GridConfiguration;

/// A price reading for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub symbol: String,
    pub price: f64,
}

impl PriceTick {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self { symbol: symbol.into(), price }
    }
}

/// Actions one bot produced for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotDecision {
    pub bot: String,
    pub symbol: String,
    pub price: f64,
    pub actions: Vec<GridAction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: usize,
    pub decisions: usize,
}

pub struct BotRunner {
    bots: Vec<(String, GridConfiguration)>,
    log_prices: bool,
}

impl BotRunner {
    pub fn new(bots: Vec<(String, GridConfiguration)>) -> Self {
        Self { bots, log_prices: false }
    }

    /// Runner over the active grid bots of a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let bots = config
            .active_grid_bots()
            .into_iter()
            .map(|(name, grid)| (name.to_string(), grid.clone()))
            .collect();
        Self {
            bots,
            log_prices: config.logging.enable_price_logging,
        }
    }

    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }

    /// Evaluate every bot trading the tick's symbol. Bots without actions are
    /// left out of the result.
    pub fn evaluate_tick(&self, tick: &PriceTick) -> Vec<BotDecision> {
        if self.log_prices {
            info!(symbol = %tick.symbol, price = tick.price, "Price tick");
        } else {
            debug!(symbol = %tick.symbol, price = tick.price, "Price tick");
        }

        self.bots
            .iter()
            .filter(|(_, grid)| grid.symbol.eq_ignore_ascii_case(&tick.symbol))
            .filter_map(|(name, grid)| {
                let actions = evaluate(grid, tick.price);
                if actions.is_empty() {
                    None
                } else {
                    Some(BotDecision {
                        bot: name.clone(),
                        symbol: grid.symbol.clone(),
                        price: tick.price,
                        actions,
                    })
                }
            })
            .collect()
    }

    /// Consume ticks until the feed closes or the executor hangs up
    pub async fn run(
        &self,
        mut ticks: mpsc::Receiver<PriceTick>,
        decisions: mpsc::Sender<BotDecision>,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(bots = self.bots.len(), "Evaluation loop started");

        while let Some(tick) = ticks.recv().await {
            summary.ticks += 1;

            for decision in self.evaluate_tick(&tick) {
                if decisions.send(decision).await.is_err() {
                    warn!("Decision receiver dropped, stopping evaluation loop");
                    return summary;
                }
                summary.decisions += 1;
            }
        }

        info!(ticks = summary.ticks, decisions = summary.decisions, "Price feed closed, evaluation loop finished");
        summary
    }
}

/// Evaluate many grids against one price snapshot in parallel. The output is
/// aligned with `configs`.
pub fn evaluate_all(configs: &[GridConfiguration], current_price: f64) -> Vec<Vec<GridAction>> {
    configs
        .par_iter()
        .map(|config| evaluate(config, current_price))
        .collect()
}
