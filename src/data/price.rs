use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//represents one daily ohlcv observation of an instrument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //creates a point where every price equals the close, handy for close-only series
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        PricePoint::new(date, close, close, close, close, 0)
    }
}
