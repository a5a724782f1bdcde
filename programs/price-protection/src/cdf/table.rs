//! Loss-probability table
//!
//! A sparse table keyed by signed duration bucket. The key's sign encodes the
//! policy direction (positive buckets hold "price fell" policies, negative
//! ones "price rose"); its magnitude is the duration rounded half-up to whole
//! hours. Each bucket holds a fixed number of slots indexed by the relative
//! price jump, rounded half-up to multiples of the table's slot size.
//!
//! Unset buckets and slots read as all-zero: a zero probability means the
//! policy is not offered, not that it is free. Jumps past the last slot
//! saturate into it by design.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::program_error::ProgramError;

use crate::constants::{CDF_SLOT_COUNT, SECONDS_PER_HOUR, WAD};
use crate::error::ProtectionError;
use crate::math::{round_half_up_div, wad_div};

/// One probability slot. Ratios are carried for the capital pool; pricing
/// itself only reads `loss_probability`. A flat table leaves both ratios zero.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CdfSlot {
    /// Probability of the trigger being hit within the bucket's tenor, Wad
    pub loss_probability: u128,
    /// Junior tranche collateral ratio, Wad
    pub junior_collateral_ratio: u128,
    /// Total collateral ratio, Wad
    pub collateral_ratio: u128,
}

/// The slots stored for one signed duration bucket
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CdfBucket {
    pub key: i64,
    pub slots: [CdfSlot; CDF_SLOT_COUNT],
}

/// CDF table account
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CdfTable {
    /// Is initialized
    pub is_initialized: bool,
    /// Width of one jump slot as a Wad fraction of the current price
    pub slot_size: u128,
    /// Buckets, sorted by key
    pub buckets: Vec<CdfBucket>,
}

impl CdfTable {
    pub fn new(slot_size: u128) -> Result<Self, ProgramError> {
        if slot_size == 0 || slot_size > WAD {
            return Err(ProtectionError::InvalidInstruction.into());
        }
        Ok(Self {
            is_initialized: true,
            slot_size,
            buckets: Vec::new(),
        })
    }

    /// Write a bucket, replacing any previous contents. Bucket zero is
    /// reserved and never queryable.
    pub fn set_bucket(&mut self, key: i64, slots: [CdfSlot; CDF_SLOT_COUNT]) -> Result<(), ProgramError> {
        if key == 0 {
            return Err(ProtectionError::InvalidDurationBucket.into());
        }
        match self.buckets.binary_search_by_key(&key, |b| b.key) {
            Ok(pos) => self.buckets[pos].slots = slots,
            Err(pos) => self.buckets.insert(pos, CdfBucket { key, slots }),
        }
        Ok(())
    }

    fn bucket(&self, key: i64) -> Option<&[CdfSlot; CDF_SLOT_COUNT]> {
        self.buckets
            .binary_search_by_key(&key, |b| b.key)
            .ok()
            .map(|pos| &self.buckets[pos].slots)
    }

    /// The signed bucket key for a duration and direction
    pub fn duration_bucket(duration_seconds: i64, lower: bool) -> Result<i64, ProgramError> {
        let magnitude = round_half_up_div(duration_seconds.max(0) as u128, SECONDS_PER_HOUR as u128)?;
        let magnitude = i64::try_from(magnitude)
            .map_err(|_| ProgramError::from(ProtectionError::ArithmeticOverflow))?;
        Ok(if lower { magnitude } else { -magnitude })
    }

    /// Relative price jump as a Wad fraction of the current price, sign
    /// stripped. Both prices must share a precision (Wad here).
    pub fn jump_fraction(current_price: u128, trigger_price: u128, lower: bool) -> Result<u128, ProgramError> {
        let ratio = wad_div(trigger_price, current_price)?;
        if lower {
            // 1 - trigger/current
            WAD.checked_sub(ratio)
                .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
        } else {
            // trigger/current - 1
            ratio
                .checked_sub(WAD)
                .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
        }
    }

    /// Jump slot index, rounded half-up and saturating into the last slot
    pub fn slot_index(&self, jump: u128) -> Result<usize, ProgramError> {
        let index = round_half_up_div(jump, self.slot_size)?;
        Ok(index.min((CDF_SLOT_COUNT - 1) as u128) as usize)
    }

    /// The discretized loss slot for a price move over a duration.
    /// Prices are Wad; direction is inferred from their order.
    pub fn lookup(
        &self,
        current_price: u128,
        trigger_price: u128,
        duration_seconds: i64,
    ) -> Result<CdfSlot, ProgramError> {
        let lower = current_price > trigger_price;
        let key = Self::duration_bucket(duration_seconds, lower)?;
        let slots = match self.bucket(key) {
            Some(slots) => slots,
            // Unset bucket: no coverage offered at this tenor
            None => return Ok(CdfSlot::default()),
        };
        let jump = Self::jump_fraction(current_price, trigger_price, lower)?;
        Ok(slots[self.slot_index(jump)?])
    }
}
