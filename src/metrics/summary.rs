use crate::engine::ledger::TradeRecord;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//per-instrument result line of the aggregate summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    pub total_closed_trades: usize,
    pub total_profit: f64,
    pub win_rate_percent: f64,
}

//builds the summary of one instrument from its closed trades
//win rate is the share of winning profit in winning plus losing magnitude, 0 without closed trades
pub fn summarize(trades: &[TradeRecord], name: &str) -> SummaryRecord {
    let profits: Vec<f64> = trades.iter().filter_map(TradeRecord::total_profit).collect();

    let total_profit = sum_profits(profits.iter());
    let total_win = sum_profits(profits.iter().filter(|&&p| p > 0.0));
    let total_loss = sum_profits(profits.iter().filter(|&&p| p <= 0.0)).abs();

    let win_rate_percent = if profits.is_empty() || total_win + total_loss <= 0.0 {
        0.0
    } else {
        100.0 * total_win / (total_win + total_loss)
    };

    SummaryRecord {
        name: name.to_string(),
        total_closed_trades: profits.len(),
        total_profit,
        win_rate_percent,
    }
}

//folds from +0.0 so empty selections never report -0.0
fn sum_profits<'a>(profits: impl Iterator<Item = &'a f64>) -> f64 {
    profits.fold(0.0, |acc, p| acc + p)
}

//orders summaries by total profit, highest first; ties keep their input order
pub fn sort_summaries(mut summaries: Vec<SummaryRecord>) -> Vec<SummaryRecord> {
    summaries.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));
    summaries
}

//prints the aggregate summary as a table
pub fn print_summary_table(summaries: &[SummaryRecord]) {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("Stock"),
        Cell::new("Total Trades"),
        Cell::new("Total Profit"),
        Cell::new("Win Rate (%)"),
    ]));

    for summary in summaries {
        table.add_row(Row::new(vec![
            Cell::new(&summary.name),
            Cell::new(&format!("{}", summary.total_closed_trades)),
            Cell::new(&format!("{:.2}", summary.total_profit)),
            Cell::new(&format!("{:.2}", summary.win_rate_percent)),
        ]));
    }

    table.printstd();
}

//detailed statistics over the closed trades of one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub avg_profit: f64,
    pub profit_std_dev: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
}

impl TradeStatistics {
    //calculate statistics from a trade log, entries are skipped
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let profits: Vec<f64> = trades.iter().filter_map(TradeRecord::total_profit).collect();

        if profits.is_empty() {
            return TradeStatistics {
                num_trades: 0,
                num_winning_trades: 0,
                num_losing_trades: 0,
                avg_profit: 0.0,
                profit_std_dev: 0.0,
                largest_win: 0.0,
                largest_loss: 0.0,
                profit_factor: 0.0,
            };
        }

        let winning: Vec<f64> = profits.iter().filter(|&&p| p > 0.0).copied().collect();
        let losing: Vec<f64> = profits.iter().filter(|&&p| p <= 0.0).copied().collect();

        let total_wins = sum_profits(winning.iter());
        let total_losses = sum_profits(losing.iter()).abs();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        //sample deviation needs two points
        let profit_std_dev = if profits.len() > 1 {
            profits.iter().std_dev()
        } else {
            0.0
        };

        TradeStatistics {
            num_trades: profits.len(),
            num_winning_trades: winning.len(),
            num_losing_trades: losing.len(),
            avg_profit: profits.iter().mean(),
            profit_std_dev,
            largest_win: winning.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: losing.iter().fold(0.0f64, |a, &b| a.min(b)),
            profit_factor,
        }
    }

    //prints statistics in a formatted table
    pub fn pretty_print_table(&self, name: &str) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new(name), Cell::new("Value")]));

        let rows = [
            ("Closed Trades", format!("{}", self.num_trades)),
            ("Winning Trades", format!("{}", self.num_winning_trades)),
            ("Losing Trades", format!("{}", self.num_losing_trades)),
            ("Avg Profit", format!("{:.2}", self.avg_profit)),
            ("Profit Std Dev", format!("{:.2}", self.profit_std_dev)),
            ("Largest Win", format!("{:.2}", self.largest_win)),
            ("Largest Loss", format!("{:.2}", self.largest_loss)),
            ("Profit Factor", format!("{:.3}", self.profit_factor)),
        ];

        for (metric, value) in rows {
            table.add_row(Row::new(vec![Cell::new(metric), Cell::new(&value)]));
        }

        table.printstd();
    }
}
