//! Program Derived Address derivation

use solana_program::pubkey::Pubkey;

use crate::constants::{CDF_TABLE_SEED, MODULE_STATE_SEED, POLICY_SEED, POOL_SEED};

/// Module state PDA for a deployment-fixed module id
pub fn derive_module_state(program_id: &Pubkey, module_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[MODULE_STATE_SEED, &module_id.to_le_bytes()], program_id)
}

/// CDF table PDA for a module
pub fn derive_cdf_table(program_id: &Pubkey, module_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CDF_TABLE_SEED, &module_id.to_le_bytes()], program_id)
}

/// Default capital pool PDA for a module
pub fn derive_pool(program_id: &Pubkey, module_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, &module_id.to_le_bytes()], program_id)
}

/// Policy account PDA, one per (module, counter)
pub fn derive_policy(program_id: &Pubkey, module_id: u64, counter: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            POLICY_SEED,
            &module_id.to_le_bytes(),
            &counter.to_le_bytes(),
        ],
        program_id,
    )
}
