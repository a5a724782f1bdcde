//! Instruction dispatch and account plumbing
//!
//! All policy semantics live in the pure modules (`pricing`, `policy`,
//! `cdf`, `oracle`); this layer only unpacks instructions, validates
//! accounts and signers, and moves state in and out of account data.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::cdf::{CdfSlot, CdfTable};
use crate::constants::CDF_SLOT_COUNT;
use crate::error::ProtectionError;
use crate::events::{
    CdfBucketUpdated, Event, FeedPriceUpdated, ModulePauseChanged, PolicyCreated, PolicyExpired,
    PolicyTriggered,
};
use crate::instruction::ProtectionInstruction;
use crate::oracle::{FeedReading, PriceFeedAccount};
use crate::pda;
use crate::policy::{self, ModuleState, Policy, PolicyRequest};
use crate::pool::LeveragePool;

/// Deserialize a borsh value from the front of an account buffer.
/// Accounts are sized generously at allocation, so trailing zero bytes
/// are expected and ignored.
fn load<T: BorshDeserialize>(data: &[u8]) -> Result<T, ProgramError> {
    let mut slice: &[u8] = data;
    T::deserialize(&mut slice).map_err(|_| ProgramError::InvalidAccountData)
}

fn store<T: BorshSerialize>(value: &T, data: &mut [u8]) -> ProgramResult {
    let bytes = value
        .try_to_vec()
        .map_err(|_| ProgramError::InvalidAccountData)?;
    if bytes.len() > data.len() {
        return Err(ProgramError::AccountDataTooSmall);
    }
    data[..bytes.len()].copy_from_slice(&bytes);
    Ok(())
}

fn is_blank(data: &[u8]) -> bool {
    data.is_empty() || data[0] == 0
}

fn assert_signer(info: &AccountInfo) -> ProgramResult {
    if !info.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

fn assert_owned_by(info: &AccountInfo, program_id: &Pubkey) -> ProgramResult {
    if info.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

fn load_module_state(info: &AccountInfo) -> Result<ModuleState, ProgramError> {
    let state: ModuleState = load(&info.try_borrow_data()?)?;
    if !state.is_initialized {
        return Err(ProtectionError::NotInitialized.into());
    }
    Ok(state)
}

fn load_feed_reading(
    info: &AccountInfo,
    expected_key: &Pubkey,
) -> Result<FeedReading, ProgramError> {
    if info.key != expected_key {
        return Err(ProtectionError::MissingFeed.into());
    }
    let feed: PriceFeedAccount = load(&info.try_borrow_data()?)?;
    feed.latest()
}

/// Read the asset reading and, when the module is configured with a
/// reference feed, the reference reading from the trailing account.
fn load_readings<'a, 'b>(
    state: &ModuleState,
    asset_info: &AccountInfo<'a>,
    account_info_iter: &mut std::slice::Iter<'b, AccountInfo<'a>>,
) -> Result<(FeedReading, Option<FeedReading>), ProgramError> {
    let asset = load_feed_reading(asset_info, &state.asset_feed)?;
    let reference = if state.has_reference_feed() {
        let reference_info = next_account_info(account_info_iter)?;
        Some(load_feed_reading(reference_info, &state.reference_feed)?)
    } else {
        None
    };
    Ok((asset, reference))
}

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = ProtectionInstruction::unpack(instruction_data)?;

        match instruction {
            ProtectionInstruction::InitializeModule {
                module_id,
                oracle_tolerance,
                min_policy_duration,
                slot_size,
            } => {
                msg!("Instruction: InitializeModule");
                Self::process_initialize_module(
                    program_id,
                    accounts,
                    module_id,
                    oracle_tolerance,
                    min_policy_duration,
                    slot_size,
                )
            }
            ProtectionInstruction::InitializeFeed { decimals } => {
                msg!("Instruction: InitializeFeed");
                Self::process_initialize_feed(program_id, accounts, decimals)
            }
            ProtectionInstruction::PushFeedPrice { price } => {
                msg!("Instruction: PushFeedPrice");
                Self::process_push_feed_price(program_id, accounts, price)
            }
            ProtectionInstruction::InitializePool {
                liquidity,
                premium_buffer_bps,
            } => {
                msg!("Instruction: InitializePool");
                Self::process_initialize_pool(program_id, accounts, liquidity, premium_buffer_bps)
            }
            ProtectionInstruction::SetCdfBucket { bucket, slots } => {
                msg!("Instruction: SetCdfBucket");
                Self::process_set_cdf_bucket(program_id, accounts, bucket, slots)
            }
            ProtectionInstruction::SetOracleTolerance { seconds } => {
                msg!("Instruction: SetOracleTolerance");
                Self::process_set_oracle_tolerance(program_id, accounts, seconds)
            }
            ProtectionInstruction::SetMinPolicyDuration { seconds } => {
                msg!("Instruction: SetMinPolicyDuration");
                Self::process_set_min_policy_duration(program_id, accounts, seconds)
            }
            ProtectionInstruction::SetPaused { paused } => {
                msg!("Instruction: SetPaused");
                Self::process_set_paused(program_id, accounts, paused)
            }
            ProtectionInstruction::CreatePolicy {
                trigger_price,
                lower,
                payout,
                expiration,
            } => {
                msg!("Instruction: CreatePolicy");
                Self::process_create_policy(
                    program_id,
                    accounts,
                    trigger_price,
                    lower,
                    payout,
                    expiration,
                )
            }
            ProtectionInstruction::TriggerPolicy => {
                msg!("Instruction: TriggerPolicy");
                Self::process_trigger_policy(program_id, accounts)
            }
            ProtectionInstruction::ExpirePolicy => {
                msg!("Instruction: ExpirePolicy");
                Self::process_expire_policy(program_id, accounts)
            }
        }
    }

    fn process_initialize_module(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        module_id: u64,
        oracle_tolerance: i64,
        min_policy_duration: i64,
        slot_size: u128,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;
        let cdf_table_info = next_account_info(account_info_iter)?;
        let pricer_authority_info = next_account_info(account_info_iter)?;
        let pool_authority_info = next_account_info(account_info_iter)?;
        let asset_feed_info = next_account_info(account_info_iter)?;
        let reference_feed = account_info_iter
            .next()
            .map(|info| *info.key)
            .unwrap_or_default();

        assert_signer(authority_info)?;
        assert_owned_by(module_state_info, program_id)?;
        assert_owned_by(cdf_table_info, program_id)?;

        let (expected_state, _) = pda::derive_module_state(program_id, module_id);
        if *module_state_info.key != expected_state {
            return Err(ProgramError::InvalidSeeds);
        }
        let (expected_table, _) = pda::derive_cdf_table(program_id, module_id);
        if *cdf_table_info.key != expected_table {
            return Err(ProgramError::InvalidSeeds);
        }

        let mut state_data = module_state_info.try_borrow_mut_data()?;
        if !is_blank(&state_data) {
            return Err(ProtectionError::AlreadyInitialized.into());
        }
        let mut table_data = cdf_table_info.try_borrow_mut_data()?;
        if !is_blank(&table_data) {
            return Err(ProtectionError::AlreadyInitialized.into());
        }

        let state = ModuleState::new(
            module_id,
            *authority_info.key,
            *pricer_authority_info.key,
            *pool_authority_info.key,
            *asset_feed_info.key,
            reference_feed,
            oracle_tolerance,
            min_policy_duration,
        )?;
        let table = CdfTable::new(slot_size)?;

        store(&state, &mut state_data)?;
        store(&table, &mut table_data)?;

        msg!("Module {} initialized", module_id);
        Ok(())
    }

    fn process_initialize_feed(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        decimals: u8,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let feed_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info)?;
        assert_owned_by(feed_info, program_id)?;

        let mut feed_data = feed_info.try_borrow_mut_data()?;
        if !is_blank(&feed_data) {
            return Err(ProtectionError::AlreadyInitialized.into());
        }
        let feed = PriceFeedAccount::new(*authority_info.key, decimals);
        store(&feed, &mut feed_data)
    }

    fn process_push_feed_price(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        price: i128,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let feed_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info)?;
        assert_owned_by(feed_info, program_id)?;

        let mut feed_data = feed_info.try_borrow_mut_data()?;
        let mut feed: PriceFeedAccount = load(&feed_data)?;
        if !feed.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        if feed.authority != *authority_info.key {
            return Err(ProtectionError::Unauthorized.into());
        }

        let now = Clock::get()?.unix_timestamp;
        feed.push(price, now);
        store(&feed, &mut feed_data)?;

        FeedPriceUpdated {
            feed: *feed_info.key,
            price,
            updated_at: now,
        }
        .emit();
        Ok(())
    }

    fn process_initialize_pool(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        liquidity: u64,
        premium_buffer_bps: u16,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info)?;
        assert_owned_by(pool_info, program_id)?;

        let mut pool_data = pool_info.try_borrow_mut_data()?;
        if !is_blank(&pool_data) {
            return Err(ProtectionError::AlreadyInitialized.into());
        }
        let pool = LeveragePool::new(*authority_info.key, liquidity, premium_buffer_bps);
        store(&pool, &mut pool_data)
    }

    fn process_set_cdf_bucket(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        bucket: i64,
        slots: [CdfSlot; CDF_SLOT_COUNT],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let pricer_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;
        let cdf_table_info = next_account_info(account_info_iter)?;

        assert_signer(pricer_info)?;
        assert_owned_by(module_state_info, program_id)?;
        assert_owned_by(cdf_table_info, program_id)?;

        let state = load_module_state(module_state_info)?;
        state.assert_not_paused()?;
        state.assert_pricer_authority(pricer_info.key)?;

        let (expected_table, _) = pda::derive_cdf_table(program_id, state.module_id);
        if *cdf_table_info.key != expected_table {
            return Err(ProgramError::InvalidSeeds);
        }

        let mut table_data = cdf_table_info.try_borrow_mut_data()?;
        let mut table: CdfTable = load(&table_data)?;
        if !table.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        table.set_bucket(bucket, slots)?;
        store(&table, &mut table_data)?;

        CdfBucketUpdated { bucket }.emit();
        Ok(())
    }

    fn process_set_oracle_tolerance(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        seconds: i64,
    ) -> ProgramResult {
        Self::update_module_state(program_id, accounts, |state| {
            state.oracle_tolerance = seconds;
            Ok(())
        })
    }

    fn process_set_min_policy_duration(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        seconds: i64,
    ) -> ProgramResult {
        Self::update_module_state(program_id, accounts, |state| {
            state.min_policy_duration = seconds;
            Ok(())
        })
    }

    fn process_set_paused(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        paused: bool,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info)?;
        assert_owned_by(module_state_info, program_id)?;

        let mut state_data = module_state_info.try_borrow_mut_data()?;
        let mut state: ModuleState = load(&state_data)?;
        if !state.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        // Unpausing must work while paused; only the authority check gates it
        state.assert_authority(authority_info.key)?;
        state.paused = paused;
        store(&state, &mut state_data)?;

        ModulePauseChanged { paused }.emit();
        Ok(())
    }

    /// Shared plumbing for the parameter setters: authority-signed, blocked
    /// while paused.
    fn update_module_state(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        apply: impl FnOnce(&mut ModuleState) -> ProgramResult,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info)?;
        assert_owned_by(module_state_info, program_id)?;

        let mut state_data = module_state_info.try_borrow_mut_data()?;
        let mut state: ModuleState = load(&state_data)?;
        if !state.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        state.assert_not_paused()?;
        state.assert_authority(authority_info.key)?;
        apply(&mut state)?;
        store(&state, &mut state_data)
    }

    fn process_create_policy(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        trigger_price: u128,
        lower: bool,
        payout: u64,
        expiration: i64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let beneficiary_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;
        let cdf_table_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;
        let asset_feed_info = next_account_info(account_info_iter)?;
        let policy_info = next_account_info(account_info_iter)?;

        assert_signer(payer_info)?;
        assert_owned_by(module_state_info, program_id)?;
        assert_owned_by(cdf_table_info, program_id)?;
        assert_owned_by(pool_info, program_id)?;
        assert_owned_by(policy_info, program_id)?;

        let mut state_data = module_state_info.try_borrow_mut_data()?;
        let mut state: ModuleState = load(&state_data)?;
        if !state.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }

        let (expected_table, _) = pda::derive_cdf_table(program_id, state.module_id);
        if *cdf_table_info.key != expected_table {
            return Err(ProgramError::InvalidSeeds);
        }
        let table: CdfTable = load(&cdf_table_info.try_borrow_data()?)?;
        if !table.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }

        let mut pool_data = pool_info.try_borrow_mut_data()?;
        let mut pool: LeveragePool = load(&pool_data)?;
        if !pool.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        if pool.authority != state.pool_authority {
            return Err(ProtectionError::Unauthorized.into());
        }

        let (asset, reference) = load_readings(&state, asset_feed_info, account_info_iter)?;

        // The policy account must be the PDA for the next counter and blank
        let (_, next_counter) = state.next_policy_id()?;
        let (expected_policy, _) =
            pda::derive_policy(program_id, state.module_id, next_counter);
        if *policy_info.key != expected_policy {
            return Err(ProgramError::InvalidSeeds);
        }
        let mut policy_data = policy_info.try_borrow_mut_data()?;
        if !is_blank(&policy_data) {
            return Err(ProtectionError::AlreadyInitialized.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let policy = policy::create_policy(
            &mut state,
            &table,
            &mut pool,
            &asset,
            reference.as_ref(),
            &PolicyRequest {
                trigger_price,
                lower,
                payout,
                expiration,
                payer: *payer_info.key,
                beneficiary: *beneficiary_info.key,
            },
            now,
        )?;

        store(&policy, &mut policy_data)?;
        store(&pool, &mut pool_data)?;
        store(&state, &mut state_data)?;

        PolicyCreated {
            beneficiary: policy.beneficiary,
            policy_id: policy.id,
            trigger_price: policy.trigger_price,
            lower: policy.lower,
            payout: policy.payout,
            premium: policy.premium,
        }
        .emit();
        Ok(())
    }

    fn process_trigger_policy(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let module_state_info = next_account_info(account_info_iter)?;
        let policy_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;
        let asset_feed_info = next_account_info(account_info_iter)?;

        assert_owned_by(module_state_info, program_id)?;
        assert_owned_by(policy_info, program_id)?;
        assert_owned_by(pool_info, program_id)?;

        let state = load_module_state(module_state_info)?;

        let mut policy_data = policy_info.try_borrow_mut_data()?;
        let mut policy: Policy = load(&policy_data)?;
        if !policy.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }

        let mut pool_data = pool_info.try_borrow_mut_data()?;
        let mut pool: LeveragePool = load(&pool_data)?;
        if !pool.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        // The pool must be the module's own collaborator, as at creation
        if pool.authority != state.pool_authority {
            return Err(ProtectionError::Unauthorized.into());
        }

        let (asset, reference) = load_readings(&state, asset_feed_info, account_info_iter)?;

        let now = Clock::get()?.unix_timestamp;
        let price = policy::trigger_policy(
            &state,
            &mut policy,
            &mut pool,
            &asset,
            reference.as_ref(),
            now,
        )?;

        store(&policy, &mut policy_data)?;
        store(&pool, &mut pool_data)?;

        PolicyTriggered {
            policy_id: policy.id,
            payout: policy.payout,
            price,
        }
        .emit();
        Ok(())
    }

    fn process_expire_policy(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let pool_authority_info = next_account_info(account_info_iter)?;
        let module_state_info = next_account_info(account_info_iter)?;
        let policy_info = next_account_info(account_info_iter)?;
        let pool_info = next_account_info(account_info_iter)?;

        assert_signer(pool_authority_info)?;
        assert_owned_by(module_state_info, program_id)?;
        assert_owned_by(policy_info, program_id)?;
        assert_owned_by(pool_info, program_id)?;

        let state = load_module_state(module_state_info)?;
        state.assert_pool_authority(pool_authority_info.key)?;

        let mut policy_data = policy_info.try_borrow_mut_data()?;
        let mut policy: Policy = load(&policy_data)?;
        if !policy.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }

        let mut pool_data = pool_info.try_borrow_mut_data()?;
        let mut pool: LeveragePool = load(&pool_data)?;
        if !pool.is_initialized {
            return Err(ProtectionError::NotInitialized.into());
        }
        // The pool must be the module's own collaborator, as at creation
        if pool.authority != state.pool_authority {
            return Err(ProtectionError::Unauthorized.into());
        }

        let now = Clock::get()?.unix_timestamp;
        policy::expire_policy(&state, &mut policy, &mut pool, now)?;

        store(&policy, &mut policy_data)?;
        store(&pool, &mut pool_data)?;

        PolicyExpired { policy_id: policy.id }.emit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WAD;
    use crate::policy::PolicyStatus;
    use solana_program::clock::Epoch;

    fn module_state(pool_authority: Pubkey, asset_feed: Pubkey) -> ModuleState {
        ModuleState::new(
            9,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            pool_authority,
            asset_feed,
            Pubkey::default(),
            3_600,
            0,
        )
        .unwrap()
    }

    fn active_policy() -> Policy {
        Policy {
            is_initialized: true,
            id: (9u128 << 64) | 1,
            beneficiary: Pubkey::new_unique(),
            trigger_price: WAD,
            lower: true,
            payout: 100,
            premium: 5,
            loss_probability: WAD / 20,
            created_at: 0,
            expiration: i64::MAX,
            status: PolicyStatus::Active,
        }
    }

    #[test]
    fn test_trigger_rejects_pool_from_another_module() {
        let program_id = Pubkey::new_unique();
        let asset_feed_key = Pubkey::new_unique();
        let state = module_state(Pubkey::new_unique(), asset_feed_key);
        let policy = active_policy();
        // pool run by someone other than the module's pool authority
        let pool = LeveragePool::new(Pubkey::new_unique(), 1_000, 0);

        let state_key = Pubkey::new_unique();
        let mut state_lamports = 0u64;
        let mut state_data = state.try_to_vec().unwrap();
        let policy_key = Pubkey::new_unique();
        let mut policy_lamports = 0u64;
        let mut policy_data = policy.try_to_vec().unwrap();
        let pool_key = Pubkey::new_unique();
        let mut pool_lamports = 0u64;
        let mut pool_data = pool.try_to_vec().unwrap();
        let mut feed_lamports = 0u64;
        let mut feed_data: Vec<u8> = vec![];

        let accounts = vec![
            AccountInfo::new(
                &state_key,
                false,
                false,
                &mut state_lamports,
                &mut state_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &policy_key,
                false,
                true,
                &mut policy_lamports,
                &mut policy_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &pool_key,
                false,
                true,
                &mut pool_lamports,
                &mut pool_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &asset_feed_key,
                false,
                false,
                &mut feed_lamports,
                &mut feed_data,
                &program_id,
                false,
                Epoch::default(),
            ),
        ];

        let err = Processor::process(
            &program_id,
            &accounts,
            &ProtectionInstruction::TriggerPolicy.pack(),
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::Unauthorized.into());
        // the policy account was left untouched
        let after: Policy = load(&accounts[1].try_borrow_data().unwrap()).unwrap();
        assert_eq!(after.status, PolicyStatus::Active);
    }

    #[test]
    fn test_expire_rejects_pool_from_another_module() {
        let program_id = Pubkey::new_unique();
        let pool_authority_key = Pubkey::new_unique();
        let state = module_state(pool_authority_key, Pubkey::new_unique());
        let policy = active_policy();
        let pool = LeveragePool::new(Pubkey::new_unique(), 1_000, 0);

        let mut authority_lamports = 0u64;
        let mut authority_data: Vec<u8> = vec![];
        let state_key = Pubkey::new_unique();
        let mut state_lamports = 0u64;
        let mut state_data = state.try_to_vec().unwrap();
        let policy_key = Pubkey::new_unique();
        let mut policy_lamports = 0u64;
        let mut policy_data = policy.try_to_vec().unwrap();
        let pool_key = Pubkey::new_unique();
        let mut pool_lamports = 0u64;
        let mut pool_data = pool.try_to_vec().unwrap();

        let accounts = vec![
            AccountInfo::new(
                &pool_authority_key,
                true,
                false,
                &mut authority_lamports,
                &mut authority_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &state_key,
                false,
                false,
                &mut state_lamports,
                &mut state_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &policy_key,
                false,
                true,
                &mut policy_lamports,
                &mut policy_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &pool_key,
                false,
                true,
                &mut pool_lamports,
                &mut pool_data,
                &program_id,
                false,
                Epoch::default(),
            ),
        ];

        let err = Processor::process(
            &program_id,
            &accounts,
            &ProtectionInstruction::ExpirePolicy.pack(),
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::Unauthorized.into());
    }

    #[test]
    fn test_set_cdf_bucket_rejected_while_paused() {
        let program_id = Pubkey::new_unique();
        let mut state = module_state(Pubkey::new_unique(), Pubkey::new_unique());
        state.paused = true;
        let pricer_key = state.pricer_authority;

        let mut pricer_lamports = 0u64;
        let mut pricer_data: Vec<u8> = vec![];
        let state_key = Pubkey::new_unique();
        let mut state_lamports = 0u64;
        let mut state_data = state.try_to_vec().unwrap();
        let table_key = Pubkey::new_unique();
        let mut table_lamports = 0u64;
        let mut table_data = CdfTable::new(WAD / 100).unwrap().try_to_vec().unwrap();

        let accounts = vec![
            AccountInfo::new(
                &pricer_key,
                true,
                false,
                &mut pricer_lamports,
                &mut pricer_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &state_key,
                false,
                false,
                &mut state_lamports,
                &mut state_data,
                &program_id,
                false,
                Epoch::default(),
            ),
            AccountInfo::new(
                &table_key,
                false,
                true,
                &mut table_lamports,
                &mut table_data,
                &program_id,
                false,
                Epoch::default(),
            ),
        ];

        let err = Processor::process(
            &program_id,
            &accounts,
            &ProtectionInstruction::SetCdfBucket {
                bucket: 2,
                slots: [CdfSlot::default(); CDF_SLOT_COUNT],
            }
            .pack(),
        )
        .unwrap_err();
        assert_eq!(err, ProtectionError::ModulePaused.into());
    }
}
