//! Price feeds and normalization

pub mod adapter;
pub mod feed;

pub use adapter::current_price;
pub use feed::{FeedReading, PriceFeedAccount};
