use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//single-position state of one instrument's simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Long {
        entry_date: NaiveDate,
        entry_price: f64,
        shares: u64,
    },
}

impl PositionState {
    //describes the held position marked at the given close, if any
    pub fn mark_to_market(&self, last_date: NaiveDate, last_price: f64) -> Option<OpenPosition> {
        match *self {
            PositionState::Flat => None,
            PositionState::Long {
                entry_date,
                entry_price,
                shares,
            } => Some(OpenPosition {
                entry_date,
                entry_price,
                shares,
                last_date,
                last_price,
                unrealized_profit: (last_price - entry_price) * shares as f64,
            }),
        }
    }
}

//a position still open when the series ends, never counted as a closed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: u64,
    pub last_date: NaiveDate,
    pub last_price: f64,
    pub unrealized_profit: f64,
}
