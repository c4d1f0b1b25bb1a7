use super::{Limits, PowResult, Value};
use crate::number_theory;
use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A non-negative arbitrary-precision integer. Never stores a negative
/// value (I5) — the engine always swaps operands before a subtraction that
/// would otherwise go negative.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Integer(pub BigInt);

impl Integer {
    pub fn from_u64(n: u64) -> Self {
        Integer(BigInt::from(n))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for Integer {
    fn from_digit(n: u8) -> Self {
        Integer(BigInt::from(n))
    }

    fn from_concat(n: u8, digits: u32) -> Self {
        let repunit = (BigInt::from(10u32).pow(digits) - BigInt::one()) / BigInt::from(9u32);
        Integer(repunit * BigInt::from(n))
    }

    fn from_bigint(n: &BigInt) -> Option<Self> {
        if n.is_negative() { None } else { Some(Integer(n.clone())) }
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn to_bigint(&self) -> Option<BigInt> {
        Some(self.0.clone())
    }

    fn partial_cmp_shape(&self, other: &Self) -> Option<Ordering> {
        Some(self.0.cmp(&other.0))
    }

    fn log2_magnitude(&self) -> f64 {
        if self.0.is_zero() { 0.0 } else { self.0.bits() as f64 }
    }

    fn within_limits(&self, limits: &Limits) -> bool {
        self.0.bits() <= limits.max_digits as u64
    }

    fn add(&self, rhs: &Self) -> Option<Self> {
        Some(Integer(&self.0 + &rhs.0))
    }

    fn sub(&self, rhs: &Self) -> Option<Self> {
        let diff = &self.0 - &rhs.0;
        Some(Integer(diff.abs()))
    }

    fn mul(&self, rhs: &Self) -> Option<Self> {
        Some(Integer(&self.0 * &rhs.0))
    }

    fn div(&self, rhs: &Self) -> Option<Self> {
        if rhs.0.is_zero() {
            return None;
        }
        let (q, r) = self.0.div_mod_floor(&rhs.0);
        if r.is_zero() { Some(Integer(q)) } else { None }
    }

    fn checked_pow(&self, exponent: &Self, limits: &Limits) -> Option<PowResult<Self>> {
        if self.0.is_one() {
            return None;
        }
        let mut q = exponent.0.clone();
        if q.is_zero() {
            return None;
        }
        let base_bits = self.log2_magnitude();
        let mut wraps = 0u32;
        while base_bits * q.to_f64().unwrap_or(f64::MAX) > limits.max_digits as f64 {
            if q.is_odd() {
                return None;
            }
            q /= 2;
            wraps += 1;
        }
        let value = Integer(self.0.pow(q.to_u32()?));
        Some(PowResult::simple(value, wraps))
    }

    fn try_sqrt(&self, _limits: &Limits) -> Option<Self> {
        number_theory::try_sqrt(&self.0).map(Integer)
    }

    fn try_factorial(&self, limits: &Limits) -> Option<Self> {
        let n = self.0.to_u64()?;
        if n > limits.max_factorial {
            return None;
        }
        Some(Integer(number_theory::factorial(n)))
    }

    fn try_factorial_divide(&self, other: &Self) -> Option<Self> {
        let x = self.0.to_u64()?;
        let y = other.0.to_u64()?;
        if x < y {
            return None;
        }
        Some(Integer(number_theory::factorial_divide(x, y)))
    }

    fn reciprocal(&self) -> Option<Self> {
        if self.0.is_one() { Some(Integer(BigInt::one())) } else { None }
    }

    fn literal_pow(&self, exponent: &Self) -> Option<Self> {
        let q = exponent.0.to_u32()?;
        Some(Integer(self.0.pow(q)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_matches_repunit_formula() {
        let v = Integer::from_concat(7, 3);
        assert_eq!(v.0, BigInt::from(777));
    }

    #[test]
    fn subtraction_never_stores_negative() {
        let a = Integer::from_u64(3);
        let b = Integer::from_u64(9);
        let diff = a.sub(&b).unwrap();
        assert_eq!(diff.0, BigInt::from(6));
    }

    #[test]
    fn division_only_succeeds_when_exact() {
        let a = Integer::from_u64(10);
        let b = Integer::from_u64(4);
        assert!(a.div(&b).is_none());
        assert_eq!(a.div(&Integer::from_u64(5)).unwrap().0, BigInt::from(2));
    }
}
