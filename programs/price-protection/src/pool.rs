//! Capital pool boundary
//!
//! The pool is an external collaborator: it quotes the minimum premium for a
//! loss probability and tenor, reserves capital when a policy is created, and
//! pays out or releases when the policy resolves. The core only knows this
//! call contract. `LeveragePool` is the bundled flat-bookkeeping
//! implementation; tranche allocation and token movement live outside the
//! module.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::constants::{BPS_DENOMINATOR, WAD};
use crate::error::ProtectionError;

/// Everything the pool needs to reserve capital for one policy
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    /// Sequence id of the policy being backed
    pub policy_id: u128,
    /// Payout the pool must be able to cover
    pub payout: u64,
    /// Premium collected from the payer
    pub premium: u64,
    /// Loss probability the premium was quoted at, Wad
    pub loss_probability: u128,
    /// Policy expiration timestamp
    pub expiration: i64,
    /// Who pays the premium
    pub payer: Pubkey,
    /// Who receives the payout on trigger
    pub beneficiary: Pubkey,
}

/// Call contract of the capital/settlement collaborator
pub trait CapitalPool {
    /// Minimum premium for covering `payout` at `loss_probability` until
    /// `expiration`
    fn quote_minimum_premium(
        &self,
        payout: u64,
        loss_probability: u128,
        expiration: i64,
    ) -> Result<u64, ProgramError>;

    /// Lock capital for a new policy
    fn reserve_capital(&mut self, request: &ReservationRequest) -> Result<(), ProgramError>;

    /// Pay out a triggered policy from its reservation
    fn resolve(&mut self, policy_id: u128, payout: u64) -> Result<(), ProgramError>;

    /// Release an expired policy's reservation without payout
    fn release(&mut self, policy_id: u128, payout: u64) -> Result<(), ProgramError>;
}

/// Default pool account: flat liquidity and reservation bookkeeping
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct LeveragePool {
    /// Is initialized
    pub is_initialized: bool,
    /// Pool operator; also the key allowed to expire policies
    pub authority: Pubkey,
    /// Capital available to back policies
    pub liquidity: u64,
    /// Capital currently reserved against active policies
    pub reserved: u64,
    /// Premium markup over the actuarial floor, in basis points
    pub premium_buffer_bps: u16,
}

impl LeveragePool {
    pub fn new(authority: Pubkey, liquidity: u64, premium_buffer_bps: u16) -> Self {
        Self {
            is_initialized: true,
            authority,
            liquidity,
            reserved: 0,
            premium_buffer_bps,
        }
    }

    fn available(&self) -> u64 {
        self.liquidity.saturating_sub(self.reserved)
    }
}

impl CapitalPool for LeveragePool {
    fn quote_minimum_premium(
        &self,
        payout: u64,
        loss_probability: u128,
        _expiration: i64,
    ) -> Result<u64, ProgramError> {
        // Actuarial floor payout * p, rounded up in the pool's favor
        let scaled = (payout as u128)
            .checked_mul(loss_probability)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        let floor = scaled
            .checked_add(WAD - 1)
            .ok_or(ProtectionError::ArithmeticOverflow)?
            / WAD;
        let premium = floor
            .checked_mul(BPS_DENOMINATOR as u128 + self.premium_buffer_bps as u128)
            .ok_or(ProtectionError::ArithmeticOverflow)?
            / BPS_DENOMINATOR as u128;
        u64::try_from(premium).map_err(|_| ProtectionError::ArithmeticOverflow.into())
    }

    fn reserve_capital(&mut self, request: &ReservationRequest) -> Result<(), ProgramError> {
        if request.payout > self.available() {
            return Err(ProtectionError::InsufficientLiquidity.into());
        }
        self.reserved = self
            .reserved
            .checked_add(request.payout)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        // Premium is collected into the pool
        self.liquidity = self
            .liquidity
            .checked_add(request.premium)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        Ok(())
    }

    fn resolve(&mut self, _policy_id: u128, payout: u64) -> Result<(), ProgramError> {
        self.reserved = self
            .reserved
            .checked_sub(payout)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        self.liquidity = self
            .liquidity
            .checked_sub(payout)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        Ok(())
    }

    fn release(&mut self, _policy_id: u128, payout: u64) -> Result<(), ProgramError> {
        self.reserved = self
            .reserved
            .checked_sub(payout)
            .ok_or(ProtectionError::ArithmeticOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(payout: u64, premium: u64) -> ReservationRequest {
        ReservationRequest {
            policy_id: 1,
            payout,
            premium,
            loss_probability: WAD / 20,
            expiration: 2_000_000_000,
            payer: Pubkey::new_unique(),
            beneficiary: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_quote_rounds_up() {
        let pool = LeveragePool::new(Pubkey::new_unique(), 1_000_000, 0);
        // 1000 * 0.05 = 50
        assert_eq!(
            pool.quote_minimum_premium(1_000, WAD / 20, 0).unwrap(),
            50
        );
        // 1 * 0.05 rounds up to 1, never down to a free policy
        assert_eq!(pool.quote_minimum_premium(1, WAD / 20, 0).unwrap(), 1);
        // zero probability quotes zero
        assert_eq!(pool.quote_minimum_premium(1_000, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_quote_applies_buffer() {
        let pool = LeveragePool::new(Pubkey::new_unique(), 1_000_000, 1_000); // +10%
        assert_eq!(
            pool.quote_minimum_premium(1_000, WAD / 20, 0).unwrap(),
            55
        );
    }

    #[test]
    fn test_reserve_respects_liquidity() {
        let mut pool = LeveragePool::new(Pubkey::new_unique(), 1_000, 0);
        pool.reserve_capital(&request(800, 40)).unwrap();
        assert_eq!(pool.reserved, 800);
        assert_eq!(pool.liquidity, 1_040);
        // 800 reserved of 1040: only 240 left
        assert_eq!(
            pool.reserve_capital(&request(300, 15)),
            Err(ProtectionError::InsufficientLiquidity.into())
        );
        pool.reserve_capital(&request(240, 12)).unwrap();
    }

    #[test]
    fn test_resolve_and_release() {
        let mut pool = LeveragePool::new(Pubkey::new_unique(), 10_000, 0);
        pool.reserve_capital(&request(4_000, 200)).unwrap();
        pool.resolve(1, 4_000).unwrap();
        assert_eq!(pool.reserved, 0);
        assert_eq!(pool.liquidity, 6_200);

        pool.reserve_capital(&request(1_000, 50)).unwrap();
        pool.release(2, 1_000).unwrap();
        assert_eq!(pool.reserved, 0);
        assert_eq!(pool.liquidity, 6_250);
    }
}
