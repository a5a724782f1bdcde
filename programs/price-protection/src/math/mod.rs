//! Deterministic fixed-point math

pub mod u256;
pub mod wad;

pub use u256::U256;
pub use wad::{mul_div, pow10, round_half_up_div, scale_price, wad_div, wad_mul};
