// Grid signal engine
//
// Stateless: every call recomputes the grid from its inputs. Only prices
// outside the grid's span produce actions; crossing an inner level is not
// detected because nothing is remembered between calls.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::types::GridAction;
use crate::error::InvalidConfiguration;
use crate::logging::AUDIT_TARGET;
use crate::strategy::{parse_settings, GridConfiguration};

/// Grids with more lines than this are evaluated from their boundaries only;
/// the report then carries no level list.
pub const MAX_REPORT_LEVELS: usize = 10_000;

/// Everything one evaluation computed, for callers that want more than the actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridEvaluation {
    pub symbol: String,
    pub current_price: f64,
    /// Empty when the grid has more than [`MAX_REPORT_LEVELS`] lines, in which
    /// case the index fields below are `None` as well
    pub levels: Vec<f64>,
    /// Index of the nearest level strictly below the price
    pub closest_lower: Option<usize>,
    /// Index of the nearest level strictly above the price
    pub closest_upper: Option<usize>,
    /// Index of a level exactly equal to the price
    pub at_level: Option<usize>,
    pub actions: Vec<GridAction>,
}

/// Where a price sits relative to an ascending level array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPartition {
    /// Levels strictly below the price
    pub below: usize,
    /// Levels strictly above the price
    pub above: usize,
    pub closest_lower: Option<usize>,
    pub closest_upper: Option<usize>,
}

/// Price of grid line `index`. The first line is `lower` and the last is
/// `upper`, exactly.
pub fn level_at(lower: f64, upper: f64, num_grids: usize, index: usize) -> f64 {
    if index == 0 || num_grids < 2 {
        return lower;
    }
    let last = num_grids - 1;
    if index >= last {
        return upper;
    }

    let span = upper - lower;
    if span.is_finite() {
        lower + span / last as f64 * index as f64
    } else {
        // limits near f64::MAX with opposite signs
        let t = index as f64 / last as f64;
        lower * (1.0 - t) + upper * t
    }
}

/// `num_grids` evenly spaced levels from `lower` to `upper`, both inclusive.
/// Allocates one value per line.
pub fn grid_levels(lower: f64, upper: f64, num_grids: usize) -> Vec<f64> {
    (0..num_grids)
        .map(|index| level_at(lower, upper, num_grids, index))
        .collect()
}

/// Split `levels` (ascending) around `price`. A level equal to the price is
/// counted on neither side.
pub fn partition_levels(levels: &[f64], price: f64) -> LevelPartition {
    let below = levels.iter().filter(|&&level| level < price).count();
    let above = levels.iter().filter(|&&level| level > price).count();

    LevelPartition {
        below,
        above,
        closest_lower: below.checked_sub(1),
        closest_upper: if above > 0 { Some(levels.len() - above) } else { None },
    }
}

/// Evaluate a grid against the current price.
///
/// Returns a BUY at the lowest level when the price is below the grid, a SELL
/// at the highest level when it is above, and nothing otherwise. Invalid input
/// is logged and yields an empty list.
pub fn evaluate(config: &GridConfiguration, current_price: f64) -> Vec<GridAction> {
    match evaluate_with_report(config, current_price) {
        Ok(report) => report.actions,
        Err(_) => Vec::new(),
    }
}

/// Like [`evaluate`] but returns the full evaluation, or the rejection reason.
/// Rejections are logged here as well, so callers may simply discard the error.
pub fn evaluate_with_report(
    config: &GridConfiguration,
    current_price: f64,
) -> Result<GridEvaluation, InvalidConfiguration> {
    if let Err(err) = check_inputs(config, current_price) {
        warn!(symbol = %config.symbol, reason = %err, "Grid bot: invalid configuration, no actions");
        return Err(err);
    }

    let mut actions = Vec::with_capacity(2);
    let lowest = config.lower_limit;
    let highest = config.upper_limit;

    if current_price < lowest {
        actions.push(GridAction::buy(lowest, 0));
    }
    if current_price > highest {
        actions.push(GridAction::sell(highest, config.num_grids - 2));
    }

    let (levels, partition, at_level) = if config.num_grids <= MAX_REPORT_LEVELS {
        let levels = grid_levels(config.lower_limit, config.upper_limit, config.num_grids);
        let partition = partition_levels(&levels, current_price);
        let at_level = levels.iter().position(|&level| level == current_price);
        (levels, Some(partition), at_level)
    } else {
        (Vec::new(), None, None)
    };

    debug!(
        symbol = %config.symbol,
        num_grids = config.num_grids,
        below = ?partition.map(|p| p.below),
        above = ?partition.map(|p| p.above),
        closest_lower = ?partition.and_then(|p| p.closest_lower),
        closest_upper = ?partition.and_then(|p| p.closest_upper),
        "Grid bot: price position"
    );

    let report = GridEvaluation {
        symbol: config.symbol.clone(),
        current_price,
        levels,
        closest_lower: partition.and_then(|p| p.closest_lower),
        closest_upper: partition.and_then(|p| p.closest_upper),
        at_level,
        actions,
    };
    log_evaluation(&report);
    Ok(report)
}

/// Evaluate loosely typed settings, such as a bot's stored settings map.
/// Missing or mistyped fields are treated like any other invalid configuration.
/// `investment_per_grid` is dropped before parsing, so a malformed amount
/// cannot block the signal.
pub fn evaluate_settings(settings: &serde_json::Value, current_price: f64) -> Vec<GridAction> {
    let mut settings = settings.clone();
    if let Some(map) = settings.as_object_mut() {
        map.remove("investment_per_grid");
    }

    match parse_settings::<GridConfiguration>(settings.clone()) {
        Ok(config) => evaluate(&config, current_price),
        Err(err) => {
            let symbol = settings
                .get("symbol")
                .and_then(|value| value.as_str())
                .unwrap_or("unknown");
            warn!(symbol = %symbol, reason = %err, "Grid bot: invalid configuration, no actions");
            Vec::new()
        }
    }
}

fn check_inputs(config: &GridConfiguration, current_price: f64) -> Result<(), InvalidConfiguration> {
    if !current_price.is_finite() {
        return Err(InvalidConfiguration::NonFinitePrice(current_price));
    }
    config.validate_grid()
}

fn log_evaluation(report: &GridEvaluation) {
    let levels: Vec<f64> = report.levels.iter().map(|&level| round2(level)).collect();
    let actions: Vec<String> = report.actions.iter().map(|action| action.to_string()).collect();
    info!(
        target: AUDIT_TARGET,
        symbol = %report.symbol,
        price = report.current_price,
        levels = ?levels,
        actions = ?actions,
        "Grid bot evaluation"
    );
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
