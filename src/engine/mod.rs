pub mod backtest;
pub mod ledger;
pub mod simulator;

pub use backtest::{BacktestEngine, BacktestError, BacktestResult, BatchReport, InstrumentOutcome};
pub use ledger::{Ledger, TradeRecord, TradeType};
pub use simulator::{simulate, SimulationError};
