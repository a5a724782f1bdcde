//! Oracle price normalization
//!
//! Turns one or two feed readings into a single Wad price. Single-feed mode
//! just rescales the asset feed; dual-feed mode computes the cross rate of
//! asset over reference and converts one nominal asset unit through it.
//!
//! Both modes return Wad (18 decimals). The two feeds in dual mode are
//! assumed to be quoted against the same third currency; the adapter cannot
//! validate that, so keeping the pair consistent is the caller's job.

use solana_program::program_error::ProgramError;

use crate::constants::WAD_DECIMALS;
use crate::error::ProtectionError;
use crate::math::{pow10, scale_price, wad_div, wad_mul};
use crate::oracle::feed::FeedReading;

/// Which feed a validation failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedRole {
    Asset,
    Reference,
}

/// Freshness and positivity checks; returns the raw price as unsigned.
/// Staleness is inclusive: an update exactly `tolerance` seconds old fails.
fn validate(reading: &FeedReading, role: FeedRole, tolerance: i64, now: i64) -> Result<u128, ProgramError> {
    if reading.updated_at <= now.saturating_sub(tolerance) {
        return Err(match role {
            FeedRole::Asset => ProtectionError::StaleAssetPrice.into(),
            FeedRole::Reference => ProtectionError::StaleReferencePrice.into(),
        });
    }
    if reading.price <= 0 {
        return Err(match role {
            FeedRole::Asset => ProtectionError::InvalidAssetPrice.into(),
            FeedRole::Reference => ProtectionError::InvalidReferencePrice.into(),
        });
    }
    Ok(reading.price as u128)
}

/// The current normalized price, in Wad.
///
/// With a reference feed the result is the value of one asset unit in the
/// reference currency: `unit * (asset / reference)`.
pub fn current_price(
    asset: &FeedReading,
    reference: Option<&FeedReading>,
    tolerance: i64,
    now: i64,
) -> Result<u128, ProgramError> {
    let asset_price = validate(asset, FeedRole::Asset, tolerance, now)?;
    let asset_wad = scale_price(asset_price, asset.decimals, WAD_DECIMALS)?;

    let reference = match reference {
        Some(reference) => reference,
        None => return Ok(asset_wad),
    };

    let reference_price = validate(reference, FeedRole::Reference, tolerance, now)?;
    let reference_wad = scale_price(reference_price, reference.decimals, WAD_DECIMALS)?;

    let rate = wad_div(asset_wad, reference_wad)?;

    // One nominal unit of the asset, in raw feed units, pushed through the
    // cross rate. With Wad output this stays in Wad.
    let one_unit = pow10(asset.decimals)?;
    let one_unit_wad = scale_price(one_unit, asset.decimals, WAD_DECIMALS)?;
    wad_mul(one_unit_wad, rate)
}
