//! Event logging
//!
//! Policy lifecycle and administration notifications, logged through the
//! program log for off-chain consumers.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

/// Event type discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq)]
pub enum EventType {
    PolicyCreated = 1,
    PolicyTriggered = 2,
    PolicyExpired = 3,
    CdfBucketUpdated = 10,
    FeedPriceUpdated = 11,
    ModulePauseChanged = 12,
}

/// Base event trait
pub trait Event: BorshSerialize + std::fmt::Debug {
    fn event_type() -> EventType;

    fn emit(&self) {
        msg!("PRICE_PROTECTION_EVENT");
        msg!("TYPE:{:?}", Self::event_type());
        msg!("DATA:{:?}", self);
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PolicyCreated {
    pub beneficiary: Pubkey,
    pub policy_id: u128,
    pub trigger_price: u128,
    pub lower: bool,
    pub payout: u64,
    pub premium: u64,
}

impl Event for PolicyCreated {
    fn event_type() -> EventType {
        EventType::PolicyCreated
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PolicyTriggered {
    pub policy_id: u128,
    pub payout: u64,
    /// Normalized price at resolution, Wad
    pub price: u128,
}

impl Event for PolicyTriggered {
    fn event_type() -> EventType {
        EventType::PolicyTriggered
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PolicyExpired {
    pub policy_id: u128,
}

impl Event for PolicyExpired {
    fn event_type() -> EventType {
        EventType::PolicyExpired
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CdfBucketUpdated {
    pub bucket: i64,
}

impl Event for CdfBucketUpdated {
    fn event_type() -> EventType {
        EventType::CdfBucketUpdated
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct FeedPriceUpdated {
    pub feed: Pubkey,
    pub price: i128,
    pub updated_at: i64,
}

impl Event for FeedPriceUpdated {
    fn event_type() -> EventType {
        EventType::FeedPriceUpdated
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ModulePauseChanged {
    pub paused: bool,
}

impl Event for ModulePauseChanged {
    fn event_type() -> EventType {
        EventType::ModulePauseChanged
    }
}
