pub mod dema;
pub mod signal;
pub mod sma;

pub use dema::{compute_dema, compute_ema};
pub use signal::{derive_signals, Signal};
pub use sma::compute_sma;

use crate::config::{CrossoverParams, IndicatorKind};
use crate::data::PricePoint;

//one smoothed value per price point, None while the indicator is still warming up
pub type IndicatorSeries = Vec<Option<f64>>;

//extracts the close prices of a series
pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}

//builds the (fast, slow) pair the crossover signals are derived from
pub fn build_crossover_series(
    closes: &[f64],
    kind: IndicatorKind,
    params: &CrossoverParams,
) -> (IndicatorSeries, IndicatorSeries) {
    match kind {
        IndicatorKind::Sma => (
            compute_sma(closes, params.fast_window),
            compute_sma(closes, params.slow_window),
        ),
        IndicatorKind::Dema => (
            compute_dema(closes, params.fast_window),
            compute_dema(closes, params.slow_window),
        ),
    }
}
