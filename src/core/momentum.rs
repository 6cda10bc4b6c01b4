// Momentum signal: SMA crossover confirmed by MACD and filtered by RSI

use tracing::{debug, info, warn};

use crate::core::indicators::{macd, rsi, sma, MacdPoint};
use crate::core::types::MomentumSignal;
use crate::logging::AUDIT_TARGET;
use crate::strategy::MomentumConfig;

#[derive(Debug, Clone, Copy)]
struct Row {
    sma_short: f64,
    sma_long: f64,
    rsi: f64,
    macd: MacdPoint,
}

/// Compute the momentum signal for a series of closes, oldest first.
///
/// Only candles where every indicator is defined are considered; with fewer
/// than two such candles the answer is HOLD.
pub fn momentum_signal(config: &MomentumConfig, closes: &[f64]) -> MomentumSignal {
    if let Err(err) = config.validate() {
        warn!(symbol = %config.symbol, reason = %err, "Momentum bot: invalid configuration, holding");
        return MomentumSignal::Hold;
    }
    if closes.iter().any(|close| !close.is_finite()) {
        warn!(symbol = %config.symbol, "Momentum bot: non-finite close in series, holding");
        return MomentumSignal::Hold;
    }

    let rows = indicator_rows(config, closes);
    let (prev, latest) = match rows.as_slice() {
        [.., prev, latest] => (*prev, *latest),
        _ => {
            debug!(
                symbol = %config.symbol,
                closes = closes.len(),
                "Momentum bot: not enough data for indicators, holding"
            );
            return MomentumSignal::Hold;
        }
    };

    let ma_cross_bullish = prev.sma_short <= prev.sma_long && latest.sma_short > latest.sma_long;
    let macd_bullish = latest.macd.macd > latest.macd.signal && latest.macd.histogram > 0.0;
    let rsi_buy_ok = latest.rsi < config.rsi_overbought;

    let ma_cross_bearish = prev.sma_short >= prev.sma_long && latest.sma_short < latest.sma_long;
    let macd_bearish = latest.macd.macd < latest.macd.signal && latest.macd.histogram < 0.0;
    let rsi_sell_ok = latest.rsi > config.rsi_oversold;

    let signal = if ma_cross_bullish && macd_bullish && rsi_buy_ok {
        MomentumSignal::Buy
    } else if ma_cross_bearish && macd_bearish && rsi_sell_ok {
        MomentumSignal::Sell
    } else {
        MomentumSignal::Hold
    };

    info!(
        target: AUDIT_TARGET,
        symbol = %config.symbol,
        signal = ?signal,
        rsi = latest.rsi,
        sma_short = latest.sma_short,
        sma_long = latest.sma_long,
        macd = latest.macd.macd,
        "Momentum bot evaluation"
    );

    signal
}

fn indicator_rows(config: &MomentumConfig, closes: &[f64]) -> Vec<Row> {
    let short = sma(closes, config.ma_short_period);
    let long = sma(closes, config.ma_long_period);
    let rsi_values = rsi(closes, config.rsi_period);
    let macd_values = macd(closes, config.macd_fast, config.macd_slow, config.macd_signal);

    (0..closes.len())
        .filter_map(|i| {
            Some(Row {
                sma_short: short[i]?,
                sma_long: long[i]?,
                rsi: rsi_values[i]?,
                macd: macd_values[i]?,
            })
        })
        .collect()
}
