//! Price feed accounts
//!
//! A feed is a read-only collaborator from the module's point of view: it
//! yields (raw price, decimals, updated-at) or fails. For deployments without
//! an external oracle program, the module carries its own keeper-pushed feed
//! account; the adapter only ever sees `FeedReading` values and does not care
//! where they came from.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::error::ProtectionError;

/// One observation from a price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedReading {
    /// Raw price in the feed's own precision; may be non-positive on a
    /// broken feed, the adapter rejects those
    pub price: i128,
    /// Decimal precision of `price`
    pub decimals: u8,
    /// Unix timestamp of the last feed update
    pub updated_at: i64,
}

/// Program-owned price feed, updated by its keeper authority
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PriceFeedAccount {
    /// Is initialized
    pub is_initialized: bool,
    /// Keeper allowed to push prices
    pub authority: Pubkey,
    /// Decimal precision of pushed prices, fixed at initialization
    pub decimals: u8,
    /// Latest raw price
    pub price: i128,
    /// Timestamp of the latest push
    pub updated_at: i64,
}

impl PriceFeedAccount {
    pub fn new(authority: Pubkey, decimals: u8) -> Self {
        Self {
            is_initialized: true,
            authority,
            decimals,
            price: 0,
            updated_at: 0,
        }
    }

    /// Record a new observation
    pub fn push(&mut self, price: i128, now: i64) {
        self.price = price;
        self.updated_at = now;
    }

    /// The feed's latest observation
    pub fn latest(&self) -> Result<FeedReading, ProgramError> {
        if !self.is_initialized {
            return Err(ProtectionError::MissingFeed.into());
        }
        Ok(FeedReading {
            price: self.price,
            decimals: self.decimals,
            updated_at: self.updated_at,
        })
    }
}
