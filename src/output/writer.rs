use crate::engine::{BatchReport, Ledger, TradeRecord};
use crate::metrics::SummaryRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE_NAME: &str = "summary_backtest.csv";

//one trade log row, profit columns stay empty for entries
#[derive(Debug, Serialize)]
struct TradeRow {
    date: NaiveDate,
    #[serde(rename = "type")]
    trade_type: String,
    price: f64,
    shares: u64,
    profit_per_share: Option<f64>,
    total_profit: Option<f64>,
}

impl From<&TradeRecord> for TradeRow {
    fn from(record: &TradeRecord) -> Self {
        let (profit_per_share, total_profit) = match *record {
            TradeRecord::Entry { .. } => (None, None),
            TradeRecord::Exit {
                profit_per_share,
                total_profit,
                ..
            } => (Some(profit_per_share), Some(total_profit)),
        };

        TradeRow {
            date: record.date(),
            trade_type: record.trade_type().to_string(),
            price: record.price(),
            shares: record.shares(),
            profit_per_share,
            total_profit,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    stock: &'a str,
    total_trades: usize,
    total_profit: f64,
    win_rate_pct: f64,
}

pub fn trade_log_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}_trades.csv", name))
}

pub fn summary_path(output_dir: &Path) -> PathBuf {
    output_dir.join(SUMMARY_FILE_NAME)
}

//writes the trade log of one instrument
//an open position is appended as an unrealized row only when requested
pub fn write_trade_log(path: &Path, ledger: &Ledger, report_unrealized: bool) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(format!("Failed to create trade log: {:?}", path))?;

    //header written by hand so empty ledgers still get one
    writer.write_record([
        "date",
        "type",
        "price",
        "shares",
        "profit_per_share",
        "total_profit",
    ])?;

    for record in &ledger.trades {
        writer.serialize(TradeRow::from(record))?;
    }

    if report_unrealized {
        if let Some(open) = &ledger.open_position {
            writer.serialize(TradeRow {
                date: open.last_date,
                trade_type: "Unrealized".to_string(),
                price: open.last_price,
                shares: open.shares,
                profit_per_share: Some(open.last_price - open.entry_price),
                total_profit: Some(open.unrealized_profit),
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}

//writes the aggregate summary in the given order
pub fn write_summary(path: &Path, summaries: &[SummaryRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(format!("Failed to create summary: {:?}", path))?;

    writer.write_record(["stock", "total_trades", "total_profit", "win_rate_pct"])?;

    for summary in summaries {
        writer.serialize(SummaryRow {
            stock: &summary.name,
            total_trades: summary.total_closed_trades,
            total_profit: summary.total_profit,
            win_rate_pct: summary.win_rate_percent,
        })?;
    }

    writer.flush()?;
    Ok(())
}

//writes every trade log plus the summary into the output directory
pub fn write_batch(output_dir: &Path, report: &BatchReport, report_unrealized: bool) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .context(format!("Failed to create output directory: {:?}", output_dir))?;

    for (name, result) in &report.results {
        write_trade_log(
            &trade_log_path(output_dir, name),
            &result.ledger,
            report_unrealized,
        )?;
    }

    write_summary(&summary_path(output_dir), &report.summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::OpenPosition;
    use std::fs;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn ledger_with_open_position() -> Ledger {
        Ledger {
            trades: vec![
                TradeRecord::Entry {
                    date: day(1),
                    price: 10.0,
                    shares: 100,
                },
                TradeRecord::Exit {
                    date: day(2),
                    price: 12.5,
                    shares: 100,
                    profit_per_share: 2.5,
                    total_profit: 250.0,
                },
                TradeRecord::Entry {
                    date: day(3),
                    price: 11.0,
                    shares: 90,
                },
            ],
            open_position: Some(OpenPosition {
                entry_date: day(3),
                entry_price: 11.0,
                shares: 90,
                last_date: day(4),
                last_price: 12.0,
                unrealized_profit: 90.0,
            }),
        }
    }

    #[test]
    fn trade_log_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = trade_log_path(dir.path(), "ACME");
        write_trade_log(&path, &ledger_with_open_position(), false).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,type,price,shares,profit_per_share,total_profit",
                "2024-02-01,Buy,10.0,100,,",
                "2024-02-02,Sell,12.5,100,2.5,250.0",
                "2024-02-03,Buy,11.0,90,,",
            ]
        );
    }

    #[test]
    fn trade_log_reports_unrealized_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = trade_log_path(dir.path(), "ACME");
        write_trade_log(&path, &ledger_with_open_position(), true).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().last(),
            Some("2024-02-04,Unrealized,12.0,90,1.0,90.0")
        );
    }

    #[test]
    fn empty_trade_log_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = trade_log_path(dir.path(), "FLAT");
        write_trade_log(&path, &Ledger::default(), true).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.trim_end(),
            "date,type,price,shares,profit_per_share,total_profit"
        );
    }

    #[test]
    fn summary_keeps_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = summary_path(dir.path());
        let summaries = vec![
            SummaryRecord {
                name: "B".to_string(),
                total_closed_trades: 2,
                total_profit: 10.0,
                win_rate_percent: 75.0,
            },
            SummaryRecord {
                name: "A".to_string(),
                total_closed_trades: 0,
                total_profit: 0.0,
                win_rate_percent: 0.0,
            },
        ];
        write_summary(&path, &summaries).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "stock,total_trades,total_profit,win_rate_pct",
                "B,2,10.0,75.0",
                "A,0,0.0,0.0",
            ]
        );
    }
}
