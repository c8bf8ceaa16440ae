use serde::{Deserialize, Serialize};
use std::fmt;

//crossover signal for one price point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Signal {
    #[default]
    Hold,
    Buy,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Hold => write!(f, "Hold"),
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

//compares fast against slow at a point and the one before it
//any undefined value forces hold
fn crossover(prev: (Option<f64>, Option<f64>), curr: (Option<f64>, Option<f64>)) -> Signal {
    let (Some(prev_fast), Some(prev_slow), Some(fast), Some(slow)) = (prev.0, prev.1, curr.0, curr.1)
    else {
        return Signal::Hold;
    };

    //bullish crossover fast crosses above slow
    if fast > slow && prev_fast <= prev_slow {
        return Signal::Buy;
    }
    //bearish crossover fast crosses below slow
    if fast < slow && prev_fast >= prev_slow {
        return Signal::Sell;
    }
    Signal::Hold
}

//derives one signal per index from a fast and a slow series
//index 0 is always hold, output length is that of the shorter series
pub fn derive_signals(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Signal> {
    let len = fast.len().min(slow.len());

    (0..len)
        .map(|i| {
            if i == 0 {
                Signal::Hold
            } else {
                crossover((fast[i - 1], slow[i - 1]), (fast[i], slow[i]))
            }
        })
        .collect()
}
