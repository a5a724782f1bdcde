//! Discretized loss-probability lookup

pub mod table;

pub use table::{CdfBucket, CdfSlot, CdfTable};
