//a Rust-based moving-average crossover backtester for daily equity price series

pub mod config;
pub mod data;
pub mod engine;
pub mod indicator;
pub mod metrics;
pub mod output;
pub mod portfolio;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BacktestConfiguration, ConfigError, CrossoverParams, IndicatorKind};
    pub use crate::data::{discover_instruments, load_price_csv, InstrumentSource, PricePoint};
    pub use crate::engine::{
        simulate, BacktestEngine, BacktestError, BacktestResult, BatchReport, InstrumentOutcome,
        Ledger, SimulationError, TradeRecord, TradeType,
    };
    pub use crate::indicator::{
        build_crossover_series, closes, compute_dema, compute_ema, compute_sma, derive_signals,
        IndicatorSeries, Signal,
    };
    pub use crate::metrics::{
        print_summary_table, sort_summaries, summarize, SummaryRecord, TradeStatistics,
    };
    pub use crate::output::{write_batch, write_summary, write_trade_log};
    pub use crate::portfolio::{OpenPosition, PositionState};
}
