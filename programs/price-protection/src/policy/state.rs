//! Module and policy account state

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::constants::POLICY_COUNTER_BITS;
use crate::error::ProtectionError;

/// Terminal-state machine of one policy: Active -> Triggered | Expired
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    Active,
    Triggered,
    Expired,
}

/// One price-protection policy. Economic terms are fixed at creation and
/// never mutated; only `status` moves, once.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct Policy {
    /// Is initialized
    pub is_initialized: bool,
    /// Globally unique id: module id in the high bits, counter in the low
    pub id: u128,
    /// Payout recipient
    pub beneficiary: Pubkey,
    /// Trigger threshold, Wad, same denomination as the oracle adapter output
    pub trigger_price: u128,
    /// true: pays when the price falls to or below the trigger;
    /// false: pays when it rises to or above
    pub lower: bool,
    /// Fixed payout on trigger
    pub payout: u64,
    /// Premium paid at creation
    pub premium: u64,
    /// Loss probability the policy was priced at, Wad
    pub loss_probability: u128,
    /// Creation timestamp
    pub created_at: i64,
    /// Expiration timestamp
    pub expiration: i64,
    /// Lifecycle state
    pub status: PolicyStatus,
}

impl Policy {
    /// The per-module counter in the low bits of the id
    pub fn counter(&self) -> u64 {
        self.id as u64
    }
}

/// Per-instance module state
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ModuleState {
    /// Is initialized
    pub is_initialized: bool,
    /// Deployment-fixed module identifier, the high bits of every policy id
    pub module_id: u64,
    /// Parameter admin: tolerance, minimum duration, pause
    pub authority: Pubkey,
    /// CDF table authority
    pub pricer_authority: Pubkey,
    /// Capital pool collaborator; the only key allowed to expire policies
    pub pool_authority: Pubkey,
    /// Asset price feed account
    pub asset_feed: Pubkey,
    /// Optional reference feed account; default pubkey means single-feed mode
    pub reference_feed: Pubkey,
    /// Counter of successfully created policies; the next policy takes
    /// `internal_id + 1`, and only a successful creation advances it
    pub internal_id: u64,
    /// Oracle staleness tolerance, seconds
    pub oracle_tolerance: i64,
    /// Minimum policy age before triggering, and minimum tenor at pricing
    pub min_policy_duration: i64,
    /// Operational pause switch: blocks setters and creation, not triggering
    pub paused: bool,
}

impl ModuleState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        module_id: u64,
        authority: Pubkey,
        pricer_authority: Pubkey,
        pool_authority: Pubkey,
        asset_feed: Pubkey,
        reference_feed: Pubkey,
        oracle_tolerance: i64,
        min_policy_duration: i64,
    ) -> Result<Self, ProgramError> {
        // Required collaborators must be wired; construction is all-or-nothing
        for key in [&authority, &pricer_authority, &pool_authority, &asset_feed] {
            if *key == Pubkey::default() {
                return Err(ProtectionError::MissingCollaborator.into());
            }
        }
        Ok(Self {
            is_initialized: true,
            module_id,
            authority,
            pricer_authority,
            pool_authority,
            asset_feed,
            reference_feed,
            internal_id: 0,
            oracle_tolerance,
            min_policy_duration,
            paused: false,
        })
    }

    pub fn has_reference_feed(&self) -> bool {
        self.reference_feed != Pubkey::default()
    }

    /// The id the next policy would take. Nothing is consumed until
    /// `commit_policy_id` runs.
    pub fn next_policy_id(&self) -> Result<(u128, u64), ProgramError> {
        let counter = self
            .internal_id
            .checked_add(1)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        let id = ((self.module_id as u128) << POLICY_COUNTER_BITS) | counter as u128;
        Ok((id, counter))
    }

    /// Advance the counter after a fully successful creation
    pub fn commit_policy_id(&mut self, counter: u64) {
        self.internal_id = counter;
    }

    pub fn assert_not_paused(&self) -> Result<(), ProgramError> {
        if self.paused {
            return Err(ProtectionError::ModulePaused.into());
        }
        Ok(())
    }

    pub fn assert_authority(&self, signer: &Pubkey) -> Result<(), ProgramError> {
        if *signer != self.authority {
            return Err(ProtectionError::Unauthorized.into());
        }
        Ok(())
    }

    pub fn assert_pricer_authority(&self, signer: &Pubkey) -> Result<(), ProgramError> {
        if *signer != self.pricer_authority {
            return Err(ProtectionError::Unauthorized.into());
        }
        Ok(())
    }

    pub fn assert_pool_authority(&self, signer: &Pubkey) -> Result<(), ProgramError> {
        if *signer != self.pool_authority {
            return Err(ProtectionError::Unauthorized.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ModuleState {
        ModuleState::new(
            7,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::default(),
            3_600,
            3_600,
        )
        .unwrap()
    }

    #[test]
    fn test_policy_id_packs_module_and_counter() {
        let state = state();
        let (id, counter) = state.next_policy_id().unwrap();
        assert_eq!(counter, 1);
        assert_eq!(id >> 64, 7);
        assert_eq!(id as u64, 1);
    }

    #[test]
    fn test_counter_only_advances_on_commit() {
        let mut state = state();
        let (_, counter) = state.next_policy_id().unwrap();
        // peeking twice yields the same counter
        assert_eq!(state.next_policy_id().unwrap().1, counter);
        state.commit_policy_id(counter);
        assert_eq!(state.next_policy_id().unwrap().1, counter + 1);
    }

    #[test]
    fn test_construction_requires_collaborators() {
        let err = ModuleState::new(
            1,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::default(), // missing asset feed
            Pubkey::default(),
            3_600,
            3_600,
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::MissingCollaborator.into());
    }

    #[test]
    fn test_role_checks_are_distinct() {
        let state = state();
        assert!(state.assert_authority(&state.authority).is_ok());
        assert_eq!(
            state.assert_authority(&state.pricer_authority),
            Err(ProtectionError::Unauthorized.into())
        );
        assert!(state.assert_pricer_authority(&state.pricer_authority).is_ok());
        assert_eq!(
            state.assert_pricer_authority(&state.authority),
            Err(ProtectionError::Unauthorized.into())
        );
    }
}
