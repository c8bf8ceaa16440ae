use crate::config::{BacktestConfiguration, ConfigError};
use crate::data::{load_price_csv, InstrumentSource, PricePoint};
use crate::engine::ledger::Ledger;
use crate::engine::simulator::{simulate, SimulationError};
use crate::indicator::{build_crossover_series, closes, derive_signals, Signal};
use crate::metrics::{sort_summaries, summarize, SummaryRecord, TradeStatistics};
use indexmap::IndexMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

//result of one instrument's backtest
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub name: String,
    pub signals: Vec<Signal>,
    pub ledger: Ledger,
    pub summary: SummaryRecord,
    pub stats: TradeStatistics,
}

//outcome of one instrument inside a batch
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentOutcome {
    Completed(BacktestResult),
    Failed { name: String, reason: String },
}

impl InstrumentOutcome {
    pub fn name(&self) -> &str {
        match self {
            InstrumentOutcome::Completed(result) => &result.name,
            InstrumentOutcome::Failed { name, .. } => name,
        }
    }
}

//aggregate of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    //completed instruments in discovery order
    pub results: IndexMap<String, BacktestResult>,

    //failed instruments with the reason they failed
    pub failures: IndexMap<String, String>,

    //summaries sorted by total profit, highest first
    pub summaries: Vec<SummaryRecord>,
}

impl BatchReport {
    //folds independent outcomes into the aggregate, keeping their order
    pub fn from_outcomes(outcomes: Vec<InstrumentOutcome>) -> Self {
        let mut results = IndexMap::new();
        let mut failures = IndexMap::new();

        for outcome in outcomes {
            match outcome {
                InstrumentOutcome::Completed(result) => {
                    results.insert(result.name.clone(), result);
                }
                InstrumentOutcome::Failed { name, reason } => {
                    failures.insert(name, reason);
                }
            }
        }

        let summaries = sort_summaries(results.values().map(|r| r.summary.clone()).collect());

        BatchReport {
            results,
            failures,
            summaries,
        }
    }
}

//main backtest engine
pub struct BacktestEngine {
    config: BacktestConfiguration,
}

impl BacktestEngine {
    //creates an engine after checking the configuration
    pub fn new(config: BacktestConfiguration) -> Result<Self, BacktestError> {
        config.validate()?;
        Ok(BacktestEngine { config })
    }

    pub fn config(&self) -> &BacktestConfiguration {
        &self.config
    }

    //runs the crossover strategy over one price series
    pub fn run_instrument(
        &self,
        name: &str,
        prices: &[PricePoint],
    ) -> Result<BacktestResult, BacktestError> {
        let closes = closes(prices);
        let (fast, slow) =
            build_crossover_series(&closes, self.config.indicator, &self.config.params);
        let signals = derive_signals(&fast, &slow);

        let ledger = simulate(&signals, prices, self.config.starting_capital)?;
        let summary = summarize(&ledger.trades, name);
        let stats = TradeStatistics::from_trades(&ledger.trades);

        debug!(
            "{}: {} points, {} closed trades, profit {:.2}",
            name,
            prices.len(),
            summary.total_closed_trades,
            summary.total_profit
        );

        Ok(BacktestResult {
            name: name.to_string(),
            signals,
            ledger,
            summary,
            stats,
        })
    }

    //loads and backtests one instrument file, turning any failure into an outcome
    pub fn run_source(&self, source: &InstrumentSource) -> InstrumentOutcome {
        let outcome = match load_price_csv(&source.path) {
            Ok(prices) => match self.run_instrument(&source.name, &prices) {
                Ok(result) => InstrumentOutcome::Completed(result),
                Err(err) => InstrumentOutcome::Failed {
                    name: source.name.clone(),
                    reason: err.to_string(),
                },
            },
            Err(err) => InstrumentOutcome::Failed {
                name: source.name.clone(),
                reason: format!("{:#}", err),
            },
        };

        if let InstrumentOutcome::Failed { name, reason } = &outcome {
            warn!("{}: backtest failed: {}", name, reason);
        }

        outcome
    }

    //backtests every instrument in parallel and folds the outcomes
    pub fn run_batch(&self, sources: &[InstrumentSource]) -> BatchReport {
        info!(
            "Backtesting {} instruments with {} crossover ({}/{})",
            sources.len(),
            self.config.indicator.label(),
            self.config.params.fast_window,
            self.config.params.slow_window
        );

        let outcomes: Vec<InstrumentOutcome> = sources
            .par_iter()
            .map(|source| self.run_source(source))
            .collect();

        let report = BatchReport::from_outcomes(outcomes);

        info!(
            "Completed {} instruments, {} failed",
            report.results.len(),
            report.failures.len()
        );

        report
    }
}
