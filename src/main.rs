use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossover::prelude::*;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossover")]
#[command(about = "A moving-average crossover backtester for daily price series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //backtest every csv file of a directory
    Run {
        //json configuration file, flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //directory of per-instrument csv files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        //directory receiving trade logs and the summary
        #[arg(long)]
        output_dir: Option<PathBuf>,

        //indicator type (sma, dema)
        #[arg(long)]
        indicator: Option<String>,

        //fast average window
        #[arg(long)]
        fast: Option<usize>,

        //slow average window
        #[arg(long)]
        slow: Option<usize>,

        //capital committed to each entry
        #[arg(long)]
        capital: Option<f64>,

        //append positions still open at the end to the trade logs
        #[arg(long)]
        report_unrealized: bool,

        //print detailed trade statistics per instrument
        #[arg(long)]
        details: bool,
    },

    //write the default configuration as json
    InitConfig {
        //destination file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data_dir,
            output_dir,
            indicator,
            fast,
            slow,
            capital,
            report_unrealized,
            details,
        } => {
            let mut configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => BacktestConfiguration::default(),
            };

            if let Some(dir) = data_dir {
                configuration.data_dir = dir;
            }
            if let Some(dir) = output_dir {
                configuration.output_dir = dir;
            }
            if let Some(name) = indicator {
                configuration.indicator = IndicatorKind::parse(&name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown indicator: {}", name))?;
            }
            if let Some(fast) = fast {
                configuration.params.fast_window = fast;
            }
            if let Some(slow) = slow {
                configuration.params.slow_window = slow;
            }
            if let Some(capital) = capital {
                configuration.starting_capital = capital;
            }
            if report_unrealized {
                configuration.report_unrealized = true;
            }

            run_backtest(configuration, details)?;
        }
        Commands::InitConfig { path } => {
            BacktestConfiguration::default()
                .to_json_file(&path)
                .context(format!("Failed to write configuration to {:?}", path))?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn run_backtest(configuration: BacktestConfiguration, details: bool) -> Result<()> {
    let engine = BacktestEngine::new(configuration).context("Invalid configuration")?;
    let config = engine.config();

    info!("Scanning {:?} for price files", config.data_dir);
    let sources = discover_instruments(&config.data_dir)?;

    if sources.is_empty() {
        anyhow::bail!("No CSV files found in {:?}", config.data_dir);
    }

    let report = engine.run_batch(&sources);

    write_batch(&config.output_dir, &report, config.report_unrealized)?;
    info!("Results written to {:?}", config.output_dir);

    println!("\nSummary Backtest Results (All Stocks):");
    print_summary_table(&report.summaries);

    if details {
        for (name, result) in &report.results {
            println!();
            result.stats.pretty_print_table(name);
        }
    }

    if !report.failures.is_empty() {
        println!("\nFailed instruments:");
        for (name, reason) in &report.failures {
            println!("  {}: {}", name, reason);
        }
    }

    Ok(())
}
