//! Wad fixed-point arithmetic
//!
//! All fractions in the module are unsigned integers scaled by 10^18.
//! Intermediates run through 256 bits; overflow and division by zero are
//! hard failures, never wrapped or clamped.

use solana_program::program_error::ProgramError;

use crate::constants::WAD;
use crate::error::ProtectionError;
use crate::math::u256::U256;

/// a * b / denominator with a 256-bit intermediate product
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, ProgramError> {
    if denominator == 0 {
        return Err(ProtectionError::DivisionByZero.into());
    }
    U256::full_mul(a, b)
        .div_u128(denominator)
        .and_then(U256::to_u128)
        .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
}

/// a * b / WAD, truncating
pub fn wad_mul(a: u128, b: u128) -> Result<u128, ProgramError> {
    mul_div(a, b, WAD)
}

/// a * WAD / b, truncating
pub fn wad_div(a: u128, b: u128) -> Result<u128, ProgramError> {
    if b == 0 {
        return Err(ProtectionError::DivisionByZero.into());
    }
    mul_div(a, WAD, b)
}

/// Round-half-up integer division: (x + y/2) / y.
/// Ties round up; only used in the non-negative domain.
pub fn round_half_up_div(x: u128, y: u128) -> Result<u128, ProgramError> {
    if y == 0 {
        return Err(ProtectionError::DivisionByZero.into());
    }
    x.checked_add(y / 2)
        .map(|n| n / y)
        .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
}

/// 10^exp, overflow-checked
pub fn pow10(exp: u8) -> Result<u128, ProgramError> {
    10u128
        .checked_pow(exp as u32)
        .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
}

/// Rescale a price between decimal precisions.
/// Down-scaling truncates; the information loss is intentional.
pub fn scale_price(price: u128, from_decimals: u8, to_decimals: u8) -> Result<u128, ProgramError> {
    if from_decimals < to_decimals {
        let factor = pow10(to_decimals - from_decimals)?;
        price
            .checked_mul(factor)
            .ok_or_else(|| ProtectionError::ArithmeticOverflow.into())
    } else {
        let factor = pow10(from_decimals - to_decimals)?;
        Ok(price / factor)
    }
}
