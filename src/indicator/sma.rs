use crate::indicator::IndicatorSeries;

//arithmetic mean of a window of prices
fn mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let value = prices.iter().sum::<f64>() / prices.len() as f64;
    value.is_finite().then_some(value)
}

//simple moving average over a trailing window of closes
//undefined until `window` closes are available; a zero window is never defined
pub fn compute_sma(closes: &[f64], window: usize) -> IndicatorSeries {
    if window == 0 {
        return vec![None; closes.len()];
    }

    (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                mean(&closes[i + 1 - window..=i])
            }
        })
        .collect()
}
