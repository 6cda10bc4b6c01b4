// Technical indicators over close-price series
//
// Every function returns a series aligned with its input; warm-up positions
// are `None`.

/// Simple moving average
pub fn sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut result = Vec::with_capacity(prices.len());
    let mut window_sum = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        window_sum += price;
        if i >= period {
            window_sum -= prices[i - period];
        }
        if i + 1 >= period {
            result.push(Some(window_sum / period as f64));
        } else {
            result.push(None);
        }
    }

    result
}

/// Exponential moving average, seeded with the SMA of the first `period` values
pub fn ema(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    smoothed(prices, period, 2.0 / (period as f64 + 1.0))
}

/// Relative strength index with Wilder smoothing
pub fn rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if prices.len() < 2 || period == 0 {
        return vec![None; prices.len()];
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);
    for window in prices.windows(2) {
        let change = window[1] - window[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let alpha = 1.0 / period as f64;
    let avg_gains = smoothed(&gains, period, alpha);
    let avg_losses = smoothed(&losses, period, alpha);

    let mut result = Vec::with_capacity(prices.len());
    result.push(None);
    for (avg_gain, avg_loss) in avg_gains.into_iter().zip(avg_losses) {
        let value = match (avg_gain, avg_loss) {
            (Some(_), Some(loss)) if loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => Some(100.0 - 100.0 / (1.0 + gain / loss)),
            _ => None,
        };
        result.push(value);
    }

    result
}

/// One row of MACD output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line (fast EMA - slow EMA), its signal EMA and the histogram
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<Option<MacdPoint>> {
    let fast_ema = ema(prices, fast);
    let slow_ema = ema(prices, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let mut result = vec![None; prices.len()];
    let Some(start) = line.iter().position(Option::is_some) else {
        return result;
    };

    let defined: Vec<f64> = line[start..].iter().flatten().copied().collect();
    let signal_line = ema(&defined, signal);

    for (offset, (value, signal_value)) in defined.iter().zip(signal_line).enumerate() {
        if let Some(signal_value) = signal_value {
            result[start + offset] = Some(MacdPoint {
                macd: *value,
                signal: signal_value,
                histogram: value - signal_value,
            });
        }
    }

    result
}

fn smoothed(values: &[f64], period: usize, alpha: f64) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    if period == 0 || values.len() < period {
        result.resize(values.len(), None);
        return result;
    }

    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    result.resize(period - 1, None);
    result.push(Some(current));

    for &value in &values[period..] {
        current = alpha * value + (1.0 - alpha) * current;
        result.push(Some(current));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&prices, 3);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(2.0));
        assert_eq!(result[3], Some(3.0));
        assert_eq!(result[4], Some(4.0));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let prices = vec![2.0, 4.0, 6.0, 8.0];
        let result = ema(&prices, 3);

        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(4.0));
        // alpha = 0.5
        assert_eq!(result[3], Some(6.0));
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&prices, 14);

        assert!(result[13].is_none());
        assert_eq!(result[14], Some(100.0));
        assert_eq!(result[19], Some(100.0));
    }

    #[test]
    fn test_rsi_bounds() {
        let prices = vec![10.0, 11.0, 10.5, 10.8, 10.2, 10.9, 11.4, 11.1, 10.7, 11.0];
        for value in rsi(&prices, 3).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_macd_warm_up_and_histogram() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let result = macd(&prices, 3, 6, 4);

        // slow EMA defined at 5, signal needs 4 MACD values
        assert!(result[7].is_none());
        let point = result[8].unwrap();
        assert!((point.histogram - (point.macd - point.signal)).abs() < 1e-12);
        assert!(result.iter().skip(8).all(Option::is_some));
    }

    #[test]
    fn test_short_input() {
        assert!(sma(&[1.0], 3).iter().all(Option::is_none));
        assert!(rsi(&[1.0], 14).iter().all(Option::is_none));
        assert_eq!(macd(&[], 12, 26, 9).len(), 0);
    }
}
