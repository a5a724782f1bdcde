//! Policy lifecycle engine
//!
//! Created -> { Triggered | Expired }, both terminal. Creation prices the
//! request, reserves capital, and only then consumes a policy id; any
//! failure leaves the counter untouched. Triggering re-reads the oracle and
//! uses the non-strict boundary comparison, deliberately weaker than the
//! strict check applied at pricing time.

use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::cdf::CdfTable;
use crate::constants::POLICY_COUNTER_BITS;
use crate::error::ProtectionError;
use crate::oracle::{self, FeedReading};
use crate::policy::state::{ModuleState, Policy, PolicyStatus};
use crate::pool::{CapitalPool, ReservationRequest};
use crate::pricing::{self, Quote};

/// Creation parameters as supplied by the caller
#[derive(Debug, Clone, Copy)]
pub struct PolicyRequest {
    pub trigger_price: u128,
    pub lower: bool,
    pub payout: u64,
    pub expiration: i64,
    pub payer: Pubkey,
    pub beneficiary: Pubkey,
}

/// Price and persist a new policy, reserving pool capital.
///
/// The id counter advances only after the reservation succeeds, so failed
/// attempts leave no gaps.
pub fn create_policy(
    state: &mut ModuleState,
    table: &CdfTable,
    pool: &mut dyn CapitalPool,
    asset: &FeedReading,
    reference: Option<&FeedReading>,
    request: &PolicyRequest,
    now: i64,
) -> Result<Policy, ProgramError> {
    state.assert_not_paused()?;

    let Quote {
        premium,
        loss_probability,
        ..
    } = pricing::price_policy(
        table,
        pool,
        asset,
        reference,
        state.oracle_tolerance,
        state.min_policy_duration,
        request.trigger_price,
        request.lower,
        request.payout,
        request.expiration,
        now,
    )?;

    if premium == 0 {
        return Err(ProtectionError::UnsupportedPolicy.into());
    }

    let (id, counter) = state.next_policy_id()?;
    pool.reserve_capital(&ReservationRequest {
        policy_id: id,
        payout: request.payout,
        premium,
        loss_probability,
        expiration: request.expiration,
        payer: request.payer,
        beneficiary: request.beneficiary,
    })?;
    state.commit_policy_id(counter);

    Ok(Policy {
        is_initialized: true,
        id,
        beneficiary: request.beneficiary,
        trigger_price: request.trigger_price,
        lower: request.lower,
        payout: request.payout,
        premium,
        loss_probability,
        created_at: now,
        expiration: request.expiration,
        status: PolicyStatus::Active,
    })
}

/// Resolve a policy for payout if its condition holds now.
///
/// Boundary-inclusive: the price landing exactly on the trigger counts.
pub fn trigger_policy(
    state: &ModuleState,
    policy: &mut Policy,
    pool: &mut dyn CapitalPool,
    asset: &FeedReading,
    reference: Option<&FeedReading>,
    now: i64,
) -> Result<u128, ProgramError> {
    if policy.status != PolicyStatus::Active {
        return Err(ProtectionError::PolicyNotActive.into());
    }
    assert_same_module(state, policy)?;
    if now.saturating_sub(policy.created_at) < state.min_policy_duration {
        return Err(ProtectionError::TooSoon.into());
    }

    let current_price = oracle::current_price(asset, reference, state.oracle_tolerance, now)?;
    let condition_met = (!policy.lower || current_price <= policy.trigger_price)
        && (policy.lower || current_price >= policy.trigger_price);
    if !condition_met {
        return Err(ProtectionError::ConditionNotMet.into());
    }

    pool.resolve(policy.id, policy.payout)?;
    policy.status = PolicyStatus::Triggered;
    Ok(current_price)
}

/// Release an expired policy's capital without payout. Driven by the pool
/// collaborator; the core only validates and flips the terminal state.
pub fn expire_policy(
    state: &ModuleState,
    policy: &mut Policy,
    pool: &mut dyn CapitalPool,
    now: i64,
) -> Result<(), ProgramError> {
    if policy.status != PolicyStatus::Active {
        return Err(ProtectionError::PolicyNotActive.into());
    }
    assert_same_module(state, policy)?;
    if now <= policy.expiration {
        return Err(ProtectionError::NotExpired.into());
    }
    pool.release(policy.id, policy.payout)?;
    policy.status = PolicyStatus::Expired;
    Ok(())
}

/// A policy can only be resolved through the module that minted its id
fn assert_same_module(state: &ModuleState, policy: &Policy) -> Result<(), ProgramError> {
    if policy.id >> POLICY_COUNTER_BITS != state.module_id as u128 {
        return Err(ProtectionError::PolicyModuleMismatch.into());
    }
    Ok(())
}
