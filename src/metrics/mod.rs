pub mod summary;

pub use summary::{print_summary_table, sort_summaries, summarize, SummaryRecord, TradeStatistics};
