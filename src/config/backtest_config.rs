use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid window: {name} must be greater than zero")]
    ZeroWindow { name: &'static str },
    #[error("Invalid windows: fast ({fast}) must be shorter than slow ({slow})")]
    WindowOrder { fast: usize, slow: usize },
    #[error("Invalid starting capital: {0}")]
    InvalidCapital(f64),
}

//indicator used to build the fast and slow series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    #[default]
    Sma,
    Dema,
}

impl IndicatorKind {
    //parse indicator kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sma" => Some(IndicatorKind::Sma),
            "dema" => Some(IndicatorKind::Dema),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Dema => "DEMA",
        }
    }
}

//crossover window parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossoverParams {
    pub fast_window: usize,
    pub slow_window: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        CrossoverParams {
            fast_window: 20,
            slow_window: 30,
        }
    }
}

//complete backtest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfiguration {
    //directory of per-instrument csv files
    pub data_dir: PathBuf,

    //directory receiving trade logs and the summary
    pub output_dir: PathBuf,

    //strategy
    pub indicator: IndicatorKind,
    pub params: CrossoverParams,

    //capital committed to every entry
    pub starting_capital: f64,

    //append an unrealized row to trade logs for positions still open at the end
    pub report_unrealized: bool,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_dir: PathBuf::from("./Data"),
            output_dir: PathBuf::from("./Results"),
            indicator: IndicatorKind::Sma,
            params: CrossoverParams::default(),
            starting_capital: 100000.0,
            report_unrealized: false,
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //checks windows and capital before any instrument is processed
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CrossoverParams {
            fast_window,
            slow_window,
        } = self.params;

        if fast_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "fast_window" });
        }
        if slow_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "slow_window" });
        }
        if fast_window >= slow_window {
            return Err(ConfigError::WindowOrder {
                fast: fast_window,
                slow: slow_window,
            });
        }
        if !self.starting_capital.is_finite() || self.starting_capital <= 0.0 {
            return Err(ConfigError::InvalidCapital(self.starting_capital));
        }

        Ok(())
    }
}
