// Signal command implementations
use std::fs;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

use grid_signal_engine::{
    evaluate_with_report, grid_levels, BotDecision, BotRunner, Config, GridConfiguration,
    InvalidConfiguration, PriceTick, TradingError, TradingResult, MAX_REPORT_LEVELS,
};

pub fn init_config(config_path: &str, force: bool) -> TradingResult<()> {
    if Path::new(config_path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", config_path);
        return Ok(());
    }

    Config::default().to_file(config_path)?;
    info!("📝 Created {}", config_path);
    info!("💡 Next steps:");
    info!("   1. Edit the [[bots]] entries in {}", config_path);
    info!("   2. Run: grid-signal validate");
    info!("   3. Run: grid-signal evaluate --price <PRICE>");
    Ok(())
}

pub fn validate_config(config: &Config) -> TradingResult<()> {
    info!("✅ Configuration is valid ({} bots)", config.bots.len());
    for bot in &config.bots {
        let state = if bot.is_active { "active" } else { "inactive" };
        info!(
            "   • {} [{}] {} ({})",
            bot.name,
            bot.settings.bot_type(),
            bot.settings.symbol(),
            state
        );
    }
    Ok(())
}

pub fn show_levels(lower: f64, upper: f64, grids: usize) -> TradingResult<()> {
    let config = GridConfiguration::new("-", lower, upper, grids)?;
    if config.num_grids > MAX_REPORT_LEVELS {
        return Err(InvalidConfiguration::InvalidParameter(
            "grids",
            format!("is too many to list, at most {} lines are printed", MAX_REPORT_LEVELS),
        )
        .into());
    }
    let levels = grid_levels(config.lower_limit, config.upper_limit, config.num_grids);

    info!("📏 {} levels, {} intervals", levels.len(), levels.len() - 1);
    for (index, level) in levels.iter().enumerate() {
        println!("{:>4}  {:.2}", index, level);
    }
    Ok(())
}

pub fn evaluate_price(config: &Config, price: f64, symbol: Option<&str>) -> TradingResult<()> {
    let bots: Vec<_> = config
        .active_grid_bots()
        .into_iter()
        .filter(|(_, grid)| symbol.map_or(true, |s| grid.symbol.eq_ignore_ascii_case(s)))
        .collect();

    if bots.is_empty() {
        warn!("⚠️  No active grid bots to evaluate");
        return Ok(());
    }

    for (name, grid) in bots {
        let report = evaluate_with_report(grid, price)?;
        if report.actions.is_empty() {
            println!("{} ({}): no action at {}", name, report.symbol, price);
        }
        for action in &report.actions {
            println!("{} ({}): {}", name, report.symbol, action);
        }
    }
    Ok(())
}

pub async fn replay_prices(config: &Config, prices_path: &str, default_symbol: Option<&str>) -> TradingResult<()> {
    let content = fs::read_to_string(prices_path)?;
    let ticks = parse_price_lines(&content, default_symbol)?;

    let runner = BotRunner::from_config(config);
    info!("▶️  Replaying {} ticks through {} grid bots", ticks.len(), runner.bot_count());

    let (tick_tx, tick_rx) = mpsc::channel::<PriceTick>(64);
    let (decision_tx, mut decision_rx) = mpsc::channel::<BotDecision>(64);

    let feeder = tokio::spawn(async move {
        for tick in ticks {
            if tick_tx.send(tick).await.is_err() {
                break;
            }
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(decision) = decision_rx.recv().await {
            for action in &decision.actions {
                println!("{} ({} @ {}): {}", decision.bot, decision.symbol, decision.price, action);
            }
        }
    });

    let summary = runner.run(tick_rx, decision_tx).await;
    feeder
        .await
        .map_err(|e| TradingError::PriceFeed(e.to_string()))?;
    printer
        .await
        .map_err(|e| TradingError::PriceFeed(e.to_string()))?;

    info!("📊 {} ticks, {} decisions", summary.ticks, summary.decisions);
    Ok(())
}

/// One tick per line: `PRICE`, `SYMBOL PRICE` or `SYMBOL,PRICE`. Blank lines
/// and `#` comments are skipped.
pub fn parse_price_lines(content: &str, default_symbol: Option<&str>) -> TradingResult<Vec<PriceTick>> {
    let mut ticks = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();

        let (symbol, price_text) = match fields.as_slice() {
            [price] => match default_symbol {
                Some(symbol) => (symbol, *price),
                None => {
                    return Err(TradingError::PriceFeed(format!(
                        "line {}: no symbol given and no --symbol default",
                        index + 1
                    )))
                }
            },
            [symbol, price] => (*symbol, *price),
            _ => {
                return Err(TradingError::PriceFeed(format!(
                    "line {}: expected PRICE or SYMBOL PRICE, got '{}'",
                    index + 1,
                    line
                )))
            }
        };

        let price: f64 = price_text.parse().map_err(|_| {
            TradingError::PriceFeed(format!("line {}: '{}' is not a number", index + 1, price_text))
        })?;
        ticks.push(PriceTick::new(symbol, price));
    }

    Ok(ticks)
}
