use crate::indicator::IndicatorSeries;

//exponential moving average with alpha = 2/(span+1), seeded by the first value
pub fn compute_ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    for &value in values {
        let next = match out.last() {
            Some(&prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        out.push(next);
    }

    out
}

//double exponential moving average: 2 * ema - ema(ema)
pub fn compute_dema(closes: &[f64], span: usize) -> IndicatorSeries {
    if span == 0 {
        return vec![None; closes.len()];
    }

    let ema = compute_ema(closes, span);
    let ema_of_ema = compute_ema(&ema, span);

    ema.iter()
        .zip(&ema_of_ema)
        .map(|(e1, e2)| {
            let value = 2.0 * e1 - e2;
            value.is_finite().then_some(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_is_seeded_by_first_value() {
        let ema = compute_ema(&[10.0, 20.0, 30.0], 3);
        let alpha = 0.5;
        assert_relative_eq!(ema[0], 10.0);
        assert_relative_eq!(ema[1], alpha * 20.0 + (1.0 - alpha) * 10.0);
        assert_relative_eq!(ema[2], alpha * 30.0 + (1.0 - alpha) * 15.0);
    }

    #[test]
    fn dema_hand_computed() {
        let dema = compute_dema(&[10.0, 20.0, 30.0], 3);

        //ema1 = [10, 15, 22.5], ema2 = [10, 12.5, 17.5]
        assert_relative_eq!(dema[0].unwrap(), 10.0);
        assert_relative_eq!(dema[1].unwrap(), 17.5);
        assert_relative_eq!(dema[2].unwrap(), 27.5);
    }

    #[test]
    fn dema_of_constant_series_is_constant() {
        let dema = compute_dema(&[42.0; 8], 5);
        for value in dema {
            assert_relative_eq!(value.unwrap(), 42.0);
        }
    }

    #[test]
    fn dema_edge_cases() {
        assert!(compute_dema(&[], 5).is_empty());
        assert_eq!(compute_dema(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn dema_lags_less_than_ema_on_a_trend() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let ema = compute_ema(&closes, 10);
        let dema = compute_dema(&closes, 10);

        let last = closes.len() - 1;
        assert!(dema[last].unwrap() > ema[last]);
        assert!(dema[last].unwrap() <= closes[last] + 1e-9);
    }
}
