pub mod loader;
pub mod price;

pub use loader::{discover_instruments, load_price_csv, InstrumentSource};
pub use price::PricePoint;
