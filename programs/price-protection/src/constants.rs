//! Global constants for the price protection module
//!
//! Central location for all module-wide constants

/// Wad scale: fixed-point fractions carry 18 decimals
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Decimal precision of a Wad value
pub const WAD_DECIMALS: u8 = 18;

/// Probability slots per CDF duration bucket
pub const CDF_SLOT_COUNT: usize = 30;

/// Duration buckets are whole hours
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Low-order bits of a policy id hold the per-module counter
pub const POLICY_COUNTER_BITS: u32 = 64;

/// Seed for the module state PDA
pub const MODULE_STATE_SEED: &[u8] = b"module_state";

/// Seed for the CDF table PDA
pub const CDF_TABLE_SEED: &[u8] = b"cdf_table";

/// Seed for the default capital pool PDA
pub const POOL_SEED: &[u8] = b"leverage_pool";

/// Seed for policy account PDAs
pub const POLICY_SEED: &[u8] = b"policy";

/// Basis point denominator for the pool premium buffer
pub const BPS_DENOMINATOR: u64 = 10_000;
