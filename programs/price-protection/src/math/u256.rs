//! 256-bit unsigned integer support for Wad arithmetic
//!
//! Wad multiplication and division need intermediates wider than u128;
//! this provides exactly the two operations the math layer uses:
//! full 128x128 -> 256 multiplication and 256 / 128 division.

/// 256-bit unsigned integer represented as two u128 limbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U256 {
    /// Low 128 bits
    pub lo: u128,
    /// High 128 bits
    pub hi: u128,
}

impl U256 {
    pub const ZERO: Self = Self { lo: 0, hi: 0 };

    pub const fn from_u128(val: u128) -> Self {
        Self { lo: val, hi: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Full 128x128 -> 256 bit multiplication, never loses high bits
    pub fn full_mul(a: u128, b: u128) -> Self {
        let a0 = a as u64 as u128;
        let a1 = a >> 64;
        let b0 = b as u64 as u128;
        let b1 = b >> 64;

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        // mid = p01 + p10 may itself carry out of 128 bits
        let (mid, mid_carry) = p01.overflowing_add(p10);
        let (lo, lo_carry) = p00.overflowing_add(mid << 64);
        let hi = p11 + (mid >> 64) + ((mid_carry as u128) << 64) + lo_carry as u128;

        Self { lo, hi }
    }

    /// Division by a u128, None if the divisor is zero
    pub fn div_u128(self, divisor: u128) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        if self.hi == 0 {
            return Some(Self::from_u128(self.lo / divisor));
        }

        // Binary long division; the remainder needs 129 bits transiently,
        // tracked via the carry out of the shift.
        let mut quotient = Self::ZERO;
        let mut rem: u128 = 0;
        for i in (0..256).rev() {
            let bit = self.bit(i);
            let carry = rem >> 127;
            rem = (rem << 1) | bit;
            if carry == 1 || rem >= divisor {
                rem = rem.wrapping_sub(divisor);
                quotient.set_bit(i);
            }
        }
        Some(quotient)
    }

    /// The value as u128, None if the high limb is occupied
    pub fn to_u128(self) -> Option<u128> {
        if self.hi == 0 {
            Some(self.lo)
        } else {
            None
        }
    }

    fn bit(&self, i: u32) -> u128 {
        if i >= 128 {
            (self.hi >> (i - 128)) & 1
        } else {
            (self.lo >> i) & 1
        }
    }

    fn set_bit(&mut self, i: u32) {
        if i >= 128 {
            self.hi |= 1 << (i - 128);
        } else {
            self.lo |= 1 << i;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mul_small() {
        let r = U256::full_mul(100, 200);
        assert_eq!(r.lo, 20_000);
        assert_eq!(r.hi, 0);
    }

    #[test]
    fn test_full_mul_overflowing_u128() {
        // (2^127) * 4 = 2^129
        let r = U256::full_mul(1u128 << 127, 4);
        assert_eq!(r.lo, 0);
        assert_eq!(r.hi, 2);
    }

    #[test]
    fn test_full_mul_max() {
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        let r = U256::full_mul(u128::MAX, u128::MAX);
        assert_eq!(r.lo, 1);
        assert_eq!(r.hi, u128::MAX - 1);
    }

    #[test]
    fn test_div_round_trips_mul() {
        let a = 123_456_789_012_345_678_901_234_567u128;
        let b = 987_654_321_098_765_432_109u128;
        let product = U256::full_mul(a, b);
        let q = product.div_u128(b).unwrap();
        assert_eq!(q.to_u128(), Some(a));
    }

    #[test]
    fn test_div_large_divisor() {
        // dividend = 2^200, divisor = 2^100 -> quotient 2^100
        let dividend = U256 { lo: 0, hi: 1 << 72 };
        let q = dividend.div_u128(1 << 100).unwrap();
        assert_eq!(q.to_u128(), Some(1 << 100));
    }

    #[test]
    fn test_div_by_zero_is_none() {
        assert!(U256::from_u128(1).div_u128(0).is_none());
    }
}
