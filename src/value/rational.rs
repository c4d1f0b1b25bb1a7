use super::{Limits, PowResult, Value};
use crate::number_theory;
use num_bigint::BigInt;
use num_integer::Integer as _;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

/// A reduced fraction `p/q`, `p, q > 0`. `num_rational::BigRational` keeps
/// itself reduced with a positive denominator on every construction, which
/// is exactly the canonical form I4 requires, so there is no separate
/// `reduce` step here.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational(pub BigRational);

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Value for Rational {
    fn from_digit(n: u8) -> Self {
        Rational(BigRational::from_integer(BigInt::from(n)))
    }

    fn from_concat(n: u8, digits: u32) -> Self {
        let repunit = (BigInt::from(10u32).pow(digits) - BigInt::one()) / BigInt::from(9u32);
        Rational(BigRational::from_integer(repunit * BigInt::from(n)))
    }

    fn from_bigint(n: &BigInt) -> Option<Self> {
        if n.is_negative() { None } else { Some(Rational(BigRational::from_integer(n.clone()))) }
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn to_bigint(&self) -> Option<BigInt> {
        if self.0.is_integer() { Some(self.0.numer().clone()) } else { None }
    }

    fn partial_cmp_shape(&self, other: &Self) -> Option<Ordering> {
        Some(self.0.cmp(&other.0))
    }

    fn log2_magnitude(&self) -> f64 {
        let n_bits = self.0.numer().bits().max(1) as f64;
        let d_bits = self.0.denom().bits().max(1) as f64;
        n_bits.max(d_bits)
    }

    fn within_limits(&self, limits: &Limits) -> bool {
        self.0.numer().bits() <= limits.max_digits as u64
            && self.0.denom().bits() <= limits.max_digits as u64
    }

    fn add(&self, rhs: &Self) -> Option<Self> {
        Some(Rational(&self.0 + &rhs.0))
    }

    fn sub(&self, rhs: &Self) -> Option<Self> {
        let diff = &self.0 - &rhs.0;
        Some(Rational(diff.abs()))
    }

    fn mul(&self, rhs: &Self) -> Option<Self> {
        Some(Rational(&self.0 * &rhs.0))
    }

    fn div(&self, rhs: &Self) -> Option<Self> {
        if rhs.0.is_zero() { None } else { Some(Rational(&self.0 / &rhs.0)) }
    }

    fn checked_pow(&self, exponent: &Self, limits: &Limits) -> Option<PowResult<Self>> {
        if !exponent.0.is_integer() {
            return None;
        }
        let mut q = exponent.0.numer().clone();
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
        let q32 = q.to_u32()?;
        let value = Rational(BigRational::new(
            self.0.numer().pow(q32),
            self.0.denom().pow(q32),
        ));
        Some(PowResult::simple(value, wraps))
    }

    fn try_sqrt(&self, _limits: &Limits) -> Option<Self> {
        let n = number_theory::try_sqrt(self.0.numer())?;
        let d = number_theory::try_sqrt(self.0.denom())?;
        Some(Rational(BigRational::new(n, d)))
    }

    fn try_factorial(&self, limits: &Limits) -> Option<Self> {
        if !self.0.is_integer() {
            return None;
        }
        let n = self.0.numer().to_u64()?;
        if n > limits.max_factorial {
            return None;
        }
        Some(Rational(BigRational::from_integer(number_theory::factorial(n))))
    }

    fn try_factorial_divide(&self, other: &Self) -> Option<Self> {
        if !self.0.is_integer() || !other.0.is_integer() {
            return None;
        }
        let x = self.0.numer().to_u64()?;
        let y = other.0.numer().to_u64()?;
        if x < y {
            return None;
        }
        Some(Rational(BigRational::from_integer(number_theory::factorial_divide(x, y))))
    }

    fn reciprocal(&self) -> Option<Self> {
        if self.0.is_zero() { None } else { Some(Rational(self.0.recip())) }
    }

    fn literal_pow(&self, exponent: &Self) -> Option<Self> {
        if !exponent.0.is_integer() {
            return None;
        }
        let q32 = exponent.0.numer().to_u32()?;
        Some(Rational(BigRational::new(self.0.numer().pow(q32), self.0.denom().pow(q32))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_reduced() {
        let v = Rational(BigRational::new(BigInt::from(4), BigInt::from(8)));
        assert_eq!(*v.0.denom(), BigInt::from(2));
    }

    #[test]
    fn sqrt_requires_both_perfect_squares() {
        let v = Rational(BigRational::new(BigInt::from(9), BigInt::from(4)));
        assert!(v.try_sqrt(&Limits::RATIONAL).is_some());
        let v2 = Rational(BigRational::new(BigInt::from(9), BigInt::from(5)));
        assert!(v2.try_sqrt(&Limits::RATIONAL).is_none());
    }
}
