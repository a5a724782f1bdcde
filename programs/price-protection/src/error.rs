use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq)]
pub enum ProtectionError {
    #[error("Invalid instruction")]
    InvalidInstruction = 0,

    #[error("Already initialized")]
    AlreadyInitialized = 1,

    #[error("Not initialized")]
    NotInitialized = 2,

    #[error("Unauthorized")]
    Unauthorized = 3,

    #[error("Module is paused")]
    ModulePaused = 4,

    #[error("Required collaborator address is unset")]
    MissingCollaborator = 5,

    #[error("Price feed account missing or mismatched")]
    MissingFeed = 6,

    #[error("Asset price not available: stale")]
    StaleAssetPrice = 7,

    #[error("Asset price not available: non-positive")]
    InvalidAssetPrice = 8,

    #[error("Reference price not available: stale")]
    StaleReferencePrice = 9,

    #[error("Reference price not available: non-positive")]
    InvalidReferencePrice = 10,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 11,

    #[error("Division by zero")]
    DivisionByZero = 12,

    #[error("Price is already at or past the trigger")]
    PriceAlreadyAtTrigger = 13,

    #[error("Policy expires before the minimum duration")]
    ExpiresTooSoon = 14,

    #[error("Policy not supported: premium resolves to zero")]
    UnsupportedPolicy = 15,

    #[error("Trigger attempted before the minimum policy duration")]
    TooSoon = 16,

    #[error("Trigger condition not met")]
    ConditionNotMet = 17,

    #[error("Duration bucket zero is reserved")]
    InvalidDurationBucket = 18,

    #[error("Policy is not active")]
    PolicyNotActive = 19,

    #[error("Policy has not expired yet")]
    NotExpired = 20,

    #[error("Insufficient pool liquidity")]
    InsufficientLiquidity = 21,

    #[error("Policy does not belong to this module")]
    PolicyModuleMismatch = 22,
}

impl PrintProgramError for ProtectionError {
    fn print<E>(&self)
    where
        E: 'static
            + std::error::Error
            + DecodeError<E>
            + PrintProgramError
            + num_traits::FromPrimitive,
    {
        use solana_program::msg;
        msg!("ProtectionError: {}", self);
    }
}

impl From<ProtectionError> for ProgramError {
    fn from(e: ProtectionError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for ProtectionError {
    fn type_of() -> &'static str {
        "ProtectionError"
    }
}
