use crate::portfolio::OpenPosition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//trade direction recorded in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    Buy,
    Sell,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => write!(f, "Buy"),
            TradeType::Sell => write!(f, "Sell"),
        }
    }
}

//one ledger row, an entry or the exit closing the preceding entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TradeRecord {
    Entry {
        date: NaiveDate,
        price: f64,
        shares: u64,
    },
    Exit {
        date: NaiveDate,
        price: f64,
        shares: u64,
        profit_per_share: f64,
        total_profit: f64,
    },
}

impl TradeRecord {
    pub fn trade_type(&self) -> TradeType {
        match self {
            TradeRecord::Entry { .. } => TradeType::Buy,
            TradeRecord::Exit { .. } => TradeType::Sell,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match *self {
            TradeRecord::Entry { date, .. } | TradeRecord::Exit { date, .. } => date,
        }
    }

    pub fn price(&self) -> f64 {
        match *self {
            TradeRecord::Entry { price, .. } | TradeRecord::Exit { price, .. } => price,
        }
    }

    pub fn shares(&self) -> u64 {
        match *self {
            TradeRecord::Entry { shares, .. } | TradeRecord::Exit { shares, .. } => shares,
        }
    }

    //realized profit, only exits carry one
    pub fn total_profit(&self) -> Option<f64> {
        match *self {
            TradeRecord::Entry { .. } => None,
            TradeRecord::Exit { total_profit, .. } => Some(total_profit),
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, TradeRecord::Exit { .. })
    }
}

//ordered trade records of one instrument plus any position left open at the end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub trades: Vec<TradeRecord>,
    pub open_position: Option<OpenPosition>,
}

impl Ledger {
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.trades.iter().filter(|t| !t.is_exit()).count()
    }

    pub fn exit_count(&self) -> usize {
        self.trades.iter().filter(|t| t.is_exit()).count()
    }

    //realized profits of the closed trades, in ledger order
    pub fn closed_profits(&self) -> Vec<f64> {
        self.trades.iter().filter_map(TradeRecord::total_profit).collect()
    }
}
