pub mod writer;

pub use writer::{
    summary_path, trade_log_path, write_batch, write_summary, write_trade_log, SUMMARY_FILE_NAME,
};
