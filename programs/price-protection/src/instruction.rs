use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::cdf::CdfSlot;
use crate::constants::CDF_SLOT_COUNT;
use crate::error::ProtectionError;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum ProtectionInstruction {
    /// Initialize module state and an empty CDF table
    /// Accounts:
    /// 0. `[signer]` Parameter authority
    /// 1. `[writable]` Module state PDA
    /// 2. `[writable]` CDF table PDA
    /// 3. `[]` Pricer authority
    /// 4. `[]` Pool authority
    /// 5. `[]` Asset price feed
    /// 6. `[]` Reference price feed (omit for single-feed mode)
    InitializeModule {
        module_id: u64,
        oracle_tolerance: i64,
        min_policy_duration: i64,
        slot_size: u128,
    },

    /// Initialize a program-owned price feed
    /// Accounts:
    /// 0. `[signer]` Feed keeper authority
    /// 1. `[writable]` Feed account
    InitializeFeed { decimals: u8 },

    /// Push a new observation into a program-owned feed
    /// Accounts:
    /// 0. `[signer]` Feed keeper authority
    /// 1. `[writable]` Feed account
    PushFeedPrice { price: i128 },

    /// Initialize the default capital pool
    /// Accounts:
    /// 0. `[signer]` Pool authority
    /// 1. `[writable]` Pool account
    InitializePool {
        liquidity: u64,
        premium_buffer_bps: u16,
    },

    /// Write one signed duration bucket of the CDF table
    /// Accounts:
    /// 0. `[signer]` Pricer authority
    /// 1. `[]` Module state PDA
    /// 2. `[writable]` CDF table PDA
    SetCdfBucket {
        bucket: i64,
        slots: [CdfSlot; CDF_SLOT_COUNT],
    },

    /// Set the oracle staleness tolerance
    /// Accounts:
    /// 0. `[signer]` Parameter authority
    /// 1. `[writable]` Module state PDA
    SetOracleTolerance { seconds: i64 },

    /// Set the minimum policy duration
    /// Accounts:
    /// 0. `[signer]` Parameter authority
    /// 1. `[writable]` Module state PDA
    SetMinPolicyDuration { seconds: i64 },

    /// Pause or resume setters and policy creation
    /// Accounts:
    /// 0. `[signer]` Parameter authority
    /// 1. `[writable]` Module state PDA
    SetPaused { paused: bool },

    /// Price and create a policy, reserving pool capital
    /// Accounts:
    /// 0. `[signer]` Payer
    /// 1. `[]` Beneficiary
    /// 2. `[writable]` Module state PDA
    /// 3. `[]` CDF table PDA
    /// 4. `[writable]` Pool account
    /// 5. `[]` Asset price feed
    /// 6. `[writable]` Policy account PDA for the next counter
    /// 7. `[]` Reference price feed (only when configured)
    CreatePolicy {
        trigger_price: u128,
        lower: bool,
        payout: u64,
        expiration: i64,
    },

    /// Resolve a policy for payout; permissionless
    /// Accounts:
    /// 0. `[]` Module state PDA
    /// 1. `[writable]` Policy account
    /// 2. `[writable]` Pool account
    /// 3. `[]` Asset price feed
    /// 4. `[]` Reference price feed (only when configured)
    TriggerPolicy,

    /// Release an expired policy's capital; pool authority only
    /// Accounts:
    /// 0. `[signer]` Pool authority
    /// 1. `[]` Module state PDA
    /// 2. `[writable]` Policy account
    /// 3. `[writable]` Pool account
    ExpirePolicy,
}

impl ProtectionInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProtectionError::InvalidInstruction.into())
    }

    pub fn pack(&self) -> Vec<u8> {
        self.try_to_vec().unwrap()
    }
}

// Helper functions to create instructions

pub fn initialize_module(
    program_id: &Pubkey,
    authority: &Pubkey,
    module_state: &Pubkey,
    cdf_table: &Pubkey,
    pricer_authority: &Pubkey,
    pool_authority: &Pubkey,
    asset_feed: &Pubkey,
    reference_feed: Option<&Pubkey>,
    module_id: u64,
    oracle_tolerance: i64,
    min_policy_duration: i64,
    slot_size: u128,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new(*module_state, false),
        AccountMeta::new(*cdf_table, false),
        AccountMeta::new_readonly(*pricer_authority, false),
        AccountMeta::new_readonly(*pool_authority, false),
        AccountMeta::new_readonly(*asset_feed, false),
    ];
    if let Some(reference_feed) = reference_feed {
        accounts.push(AccountMeta::new_readonly(*reference_feed, false));
    }

    Instruction {
        program_id: *program_id,
        accounts,
        data: ProtectionInstruction::InitializeModule {
            module_id,
            oracle_tolerance,
            min_policy_duration,
            slot_size,
        }
        .pack(),
    }
}

pub fn set_cdf_bucket(
    program_id: &Pubkey,
    pricer_authority: &Pubkey,
    module_state: &Pubkey,
    cdf_table: &Pubkey,
    bucket: i64,
    slots: [CdfSlot; CDF_SLOT_COUNT],
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pricer_authority, true),
            AccountMeta::new_readonly(*module_state, false),
            AccountMeta::new(*cdf_table, false),
        ],
        data: ProtectionInstruction::SetCdfBucket { bucket, slots }.pack(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn create_policy(
    program_id: &Pubkey,
    payer: &Pubkey,
    beneficiary: &Pubkey,
    module_state: &Pubkey,
    cdf_table: &Pubkey,
    pool: &Pubkey,
    asset_feed: &Pubkey,
    policy: &Pubkey,
    reference_feed: Option<&Pubkey>,
    trigger_price: u128,
    lower: bool,
    payout: u64,
    expiration: i64,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*payer, true),
        AccountMeta::new_readonly(*beneficiary, false),
        AccountMeta::new(*module_state, false),
        AccountMeta::new_readonly(*cdf_table, false),
        AccountMeta::new(*pool, false),
        AccountMeta::new_readonly(*asset_feed, false),
        AccountMeta::new(*policy, false),
    ];
    if let Some(reference_feed) = reference_feed {
        accounts.push(AccountMeta::new_readonly(*reference_feed, false));
    }

    Instruction {
        program_id: *program_id,
        accounts,
        data: ProtectionInstruction::CreatePolicy {
            trigger_price,
            lower,
            payout,
            expiration,
        }
        .pack(),
    }
}

pub fn trigger_policy(
    program_id: &Pubkey,
    module_state: &Pubkey,
    policy: &Pubkey,
    pool: &Pubkey,
    asset_feed: &Pubkey,
    reference_feed: Option<&Pubkey>,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(*module_state, false),
        AccountMeta::new(*policy, false),
        AccountMeta::new(*pool, false),
        AccountMeta::new_readonly(*asset_feed, false),
    ];
    if let Some(reference_feed) = reference_feed {
        accounts.push(AccountMeta::new_readonly(*reference_feed, false));
    }

    Instruction {
        program_id: *program_id,
        accounts,
        data: ProtectionInstruction::TriggerPolicy.pack(),
    }
}

pub fn expire_policy(
    program_id: &Pubkey,
    pool_authority: &Pubkey,
    module_state: &Pubkey,
    policy: &Pubkey,
    pool: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*pool_authority, true),
            AccountMeta::new_readonly(*module_state, false),
            AccountMeta::new(*policy, false),
            AccountMeta::new(*pool, false),
        ],
        data: ProtectionInstruction::ExpirePolicy.pack(),
    }
}
