pub mod aggregator;
pub mod cache;
pub mod source;

pub use aggregator::PriceAggregator;
pub use cache::{PriceCache, PriceEntry, PriceStatus};
pub use source::{HttpPriceSource, PriceSource};
