//! Policy pricer
//!
//! Orchestrates the oracle read, the trigger sanity checks, the table lookup
//! and the pool's premium quote. A `(0, 0)` result is the canonical
//! "policy not supported" sentinel, not an error.

use solana_program::program_error::ProgramError;

use crate::cdf::CdfTable;
use crate::error::ProtectionError;
use crate::oracle::{self, FeedReading};
use crate::pool::CapitalPool;

/// A priced policy request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub premium: u64,
    /// Wad
    pub loss_probability: u128,
    /// Normalized price the quote was computed against, Wad
    pub current_price: u128,
}

/// Price a policy request against the current oracle state.
///
/// The already-triggered check is strict: a policy whose condition already
/// holds at inception is rejected even exactly at the boundary. Triggering
/// later uses the non-strict comparison; the asymmetry is intentional.
#[allow(clippy::too_many_arguments)]
pub fn price_policy(
    table: &CdfTable,
    pool: &dyn CapitalPool,
    asset: &FeedReading,
    reference: Option<&FeedReading>,
    oracle_tolerance: i64,
    min_duration: i64,
    trigger_price: u128,
    lower: bool,
    payout: u64,
    expiration: i64,
    now: i64,
) -> Result<Quote, ProgramError> {
    let current_price = oracle::current_price(asset, reference, oracle_tolerance, now)?;

    let not_yet_triggered = if lower {
        current_price > trigger_price
    } else {
        current_price < trigger_price
    };
    if !not_yet_triggered {
        return Err(ProtectionError::PriceAlreadyAtTrigger.into());
    }

    let duration = expiration.saturating_sub(now);
    if duration < min_duration {
        return Err(ProtectionError::ExpiresTooSoon.into());
    }

    let slot = table.lookup(current_price, trigger_price, duration)?;
    if slot.loss_probability == 0 {
        // Unsupported policy sentinel
        return Ok(Quote {
            premium: 0,
            loss_probability: 0,
            current_price,
        });
    }

    let premium = pool.quote_minimum_premium(payout, slot.loss_probability, expiration)?;
    Ok(Quote {
        premium,
        loss_probability: slot.loss_probability,
        current_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdf::CdfSlot;
    use crate::constants::{CDF_SLOT_COUNT, WAD};

    const NOW: i64 = 1_700_000_000;
    const TOLERANCE: i64 = 3_600;
    const MIN_DURATION: i64 = 3_600;

    struct FixedQuotePool(u64);

    impl CapitalPool for FixedQuotePool {
        fn quote_minimum_premium(&self, _: u64, _: u128, _: i64) -> Result<u64, ProgramError> {
            Ok(self.0)
        }
        fn reserve_capital(&mut self, _: &crate::pool::ReservationRequest) -> Result<(), ProgramError> {
            Ok(())
        }
        fn resolve(&mut self, _: u128, _: u64) -> Result<(), ProgramError> {
            Ok(())
        }
        fn release(&mut self, _: u128, _: u64) -> Result<(), ProgramError> {
            Ok(())
        }
    }

    fn feed(price_wad_tenths: i128) -> FeedReading {
        FeedReading {
            price: price_wad_tenths * (WAD as i128) / 10,
            decimals: 18,
            updated_at: NOW - 1,
        }
    }

    fn table() -> CdfTable {
        let mut table = CdfTable::new(WAD / 100).unwrap();
        let mut slots = [CdfSlot::default(); CDF_SLOT_COUNT];
        slots[21] = CdfSlot {
            loss_probability: WAD / 20,
            ..CdfSlot::default()
        };
        table.set_bucket(2, slots).unwrap();
        table
    }

    #[test]
    fn test_prices_supported_policy() {
        let quote = price_policy(
            &table(),
            &FixedQuotePool(77),
            &feed(14),
            None,
            TOLERANCE,
            MIN_DURATION,
            11 * WAD / 10,
            true,
            1_000,
            NOW + 7_200,
            NOW,
        )
        .unwrap();
        assert_eq!(quote.premium, 77);
        assert_eq!(quote.loss_probability, WAD / 20);
        assert_eq!(quote.current_price, 14 * WAD / 10);
    }

    #[test]
    fn test_pricing_boundary_is_strict() {
        // current == trigger fails even though triggering at the boundary
        // would later succeed
        let err = price_policy(
            &table(),
            &FixedQuotePool(77),
            &feed(14),
            None,
            TOLERANCE,
            MIN_DURATION,
            14 * WAD / 10,
            true,
            1_000,
            NOW + 7_200,
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::PriceAlreadyAtTrigger.into());
    }

    #[test]
    fn test_wrong_direction_is_already_triggered() {
        // lower=false but the price is already above the trigger
        let err = price_policy(
            &table(),
            &FixedQuotePool(77),
            &feed(14),
            None,
            TOLERANCE,
            MIN_DURATION,
            12 * WAD / 10,
            false,
            1_000,
            NOW + 7_200,
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::PriceAlreadyAtTrigger.into());
    }

    #[test]
    fn test_minimum_duration_enforced() {
        let err = price_policy(
            &table(),
            &FixedQuotePool(77),
            &feed(14),
            None,
            TOLERANCE,
            MIN_DURATION,
            11 * WAD / 10,
            true,
            1_000,
            NOW + MIN_DURATION - 1,
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::ExpiresTooSoon.into());
    }

    #[test]
    fn test_unset_slot_returns_zero_sentinel() {
        // 10h tenor has no bucket: sentinel, not an error
        let quote = price_policy(
            &table(),
            &FixedQuotePool(77),
            &feed(14),
            None,
            TOLERANCE,
            MIN_DURATION,
            11 * WAD / 10,
            true,
            1_000,
            NOW + 36_000,
            NOW,
        )
        .unwrap();
        assert_eq!(quote.premium, 0);
        assert_eq!(quote.loss_probability, 0);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let stale = FeedReading {
            updated_at: NOW - TOLERANCE,
            ..feed(14)
        };
        let err = price_policy(
            &table(),
            &FixedQuotePool(77),
            &stale,
            None,
            TOLERANCE,
            MIN_DURATION,
            11 * WAD / 10,
            true,
            1_000,
            NOW + 7_200,
            NOW,
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::StaleAssetPrice.into());
    }
}
