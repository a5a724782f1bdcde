use solana_program::{
    account_info::AccountInfo,
    entrypoint,
    entrypoint::ProgramResult,
    msg,
    program_error::PrintProgramError,
    pubkey::Pubkey,
};

pub mod cdf;
pub mod constants;
pub mod error;
pub mod events;
pub mod instruction;
pub mod math;
pub mod oracle;
pub mod pda;
pub mod policy;
pub mod pool;
pub mod pricing;
pub mod processor;

use crate::error::ProtectionError;
use crate::processor::Processor;

solana_program::declare_id!("11111111111111111111111111111111");

// Program entrypoint
entrypoint!(process);

pub fn process(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    msg!("Price Protection Program entrypoint");
    if let Err(error) = Processor::process(program_id, accounts, instruction_data) {
        error.print::<ProtectionError>();
        return Err(error);
    }
    Ok(())
}
