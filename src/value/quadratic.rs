use super::{Limits, PowResult, Value};
use crate::number_theory::try_sqrt;
use num_bigint::BigInt;
use num_integer::Integer as _;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

pub const PRIMES: [u32; 4] = [2, 3, 5, 7];

/// Canonical `r * (2^e0 * 3^e1 * 5^e2 * 7^e3)^(1/2^k)`. `k == 0` always
/// implies `e == [0; 4]` (the quadratic part is absent); this is enforced
/// after every operation by [`Quadratic::canonicalise`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Quadratic {
    r: BigRational,
    e: [u32; 4],
    k: u32,
}

impl Quadratic {
    pub fn is_rational(&self) -> bool {
        self.k == 0
    }

    pub fn rational_part(&self) -> Option<BigRational> {
        if self.k == 0 { Some(self.r.clone()) } else { None }
    }

    fn zero() -> Self {
        Quadratic { r: BigRational::zero(), e: [0; 4], k: 0 }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.k == other.k && self.e == other.e
    }

    /// While every `e_i` shares a factor of two, halve them all and drop
    /// one level of nesting; if they all become zero, drop the quadratic
    /// part entirely. Also forces the canonical `k=0, e=[0;4]` whenever the
    /// rational part is zero (resolves the "Quadratic.is_zero" open
    /// question: zero never carries a radical).
    fn canonicalise(mut self) -> Self {
        if self.r.is_zero() {
            return Quadratic::zero();
        }
        while self.k > 0 && self.e.iter().all(|x| x % 2 == 0) {
            self.k -= 1;
            for x in &mut self.e {
                *x >>= 1;
            }
        }
        if self.e.iter().all(|&x| x == 0) {
            self.k = 0;
        }
        self
    }

    fn align(&self, other: &Self, target_k: u32) -> ([u32; 4], [u32; 4]) {
        let mut a = [0u32; 4];
        let mut b = [0u32; 4];
        for i in 0..4 {
            a[i] = self.e[i] << (target_k - self.k);
            b[i] = other.e[i] << (target_k - other.k);
        }
        (a, b)
    }
}

impl fmt::Display for Quadratic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_rational() {
            if self.r.is_integer() {
                write!(f, "{}", self.r.numer())
            } else {
                write!(f, "{}/{}", self.r.numer(), self.r.denom())
            }
        } else {
            let mut under_sqrt = BigInt::one();
            for (prime, &power) in PRIMES.iter().zip(&self.e) {
                under_sqrt *= BigInt::from(*prime).pow(power);
            }
            let radical = format!(
                "{}{under_sqrt}{}",
                "sqrt(".repeat(self.k as usize),
                ")".repeat(self.k as usize)
            );
            if self.r.is_integer() && self.r.numer().abs() == BigInt::one() {
                if self.r.numer().is_positive() {
                    write!(f, "{radical}")
                } else {
                    write!(f, "-{radical}")
                }
            } else if self.r.is_integer() {
                write!(f, "{}*{radical}", self.r.numer())
            } else {
                write!(f, "({}/{})*{radical}", self.r.numer(), self.r.denom())
            }
        }
    }
}

impl Value for Quadratic {
    fn from_digit(n: u8) -> Self {
        Quadratic { r: BigRational::from_integer(BigInt::from(n)), e: [0; 4], k: 0 }
    }

    fn from_concat(n: u8, digits: u32) -> Self {
        let repunit = (BigInt::from(10u32).pow(digits) - BigInt::one()) / BigInt::from(9u32);
        Quadratic { r: BigRational::from_integer(repunit * BigInt::from(n)), e: [0; 4], k: 0 }
    }

    fn from_bigint(n: &BigInt) -> Option<Self> {
        if n.is_negative() {
            None
        } else {
            Some(Quadratic { r: BigRational::from_integer(n.clone()), e: [0; 4], k: 0 })
        }
    }

    fn is_zero(&self) -> bool {
        self.r.is_zero()
    }

    fn to_bigint(&self) -> Option<BigInt> {
        if self.is_rational() && self.r.is_integer() { Some(self.r.numer().clone()) } else { None }
    }

    fn partial_cmp_shape(&self, other: &Self) -> Option<Ordering> {
        if self.same_shape(other) { Some(self.r.cmp(&other.r)) } else { None }
    }

    fn log2_magnitude(&self) -> f64 {
        let n_bits = self.r.numer().bits().max(1) as f64;
        let d_bits = self.r.denom().bits().max(1) as f64;
        let base = n_bits.max(d_bits);
        if self.k == 0 { base } else { base / (1u64 << self.k) as f64 }
    }

    fn within_limits(&self, limits: &Limits) -> bool {
        self.r.numer().bits() <= limits.max_digits as u64
            && self.r.denom().bits() <= limits.max_digits as u64
            && self.k <= limits.max_quadratic_power
    }

    fn add(&self, rhs: &Self) -> Option<Self> {
        if self.is_zero() {
            return Some(rhs.clone());
        }
        if rhs.is_zero() {
            return Some(self.clone());
        }
        if !self.same_shape(rhs) {
            return None;
        }
        Some(Quadratic { r: &self.r + &rhs.r, e: self.e, k: self.k }.canonicalise())
    }

    fn sub(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return Some(self.clone());
        }
        if self.is_zero() {
            return Some(Quadratic { r: -&rhs.r, e: rhs.e, k: rhs.k }.canonicalise());
        }
        if !self.same_shape(rhs) {
            return None;
        }
        Some(Quadratic { r: (&self.r - &rhs.r).abs(), e: self.e, k: self.k }.canonicalise())
    }

    fn mul(&self, rhs: &Self) -> Option<Self> {
        let mut r = &self.r * &rhs.r;
        if r.is_zero() {
            return Some(Quadratic::zero());
        }
        let k = self.k.max(rhs.k);
        let mut e = [0u32; 4];
        if k > 0 {
            let (a, b) = self.align(rhs, k);
            for i in 0..4 {
                e[i] = a[i] + b[i];
            }
            let modulus = 1u32 << k;
            for i in 0..4 {
                if e[i] >= modulus {
                    e[i] -= modulus;
                    r *= BigInt::from(PRIMES[i]);
                }
            }
        }
        Some(Quadratic { r, e, k }.canonicalise())
    }

    fn div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        let mut r = &self.r / &rhs.r;
        if r.is_zero() {
            return Some(Quadratic::zero());
        }
        let k = self.k.max(rhs.k);
        let mut e = [0u32; 4];
        if k > 0 {
            let (a, b) = self.align(rhs, k);
            let modulus = 1u32 << k;
            for i in 0..4 {
                if a[i] < b[i] {
                    r /= BigInt::from(PRIMES[i]);
                    e[i] = modulus + a[i] - b[i];
                } else {
                    e[i] = a[i] - b[i];
                }
            }
        }
        Some(Quadratic { r, e, k }.canonicalise())
    }

    fn checked_pow(&self, exponent: &Self, limits: &Limits) -> Option<PowResult<Self>> {
        if !exponent.is_rational() || !exponent.r.is_integer() {
            return None;
        }
        if self.is_zero() {
            return None;
        }
        let exp = exponent.r.numer().to_i64()?;
        if exp <= 0 {
            // Per I5 no algebra ever stores a negative value, so an
            // exponent operand reaching the search engine is always
            // positive; the `p^(-q)` witness is recorded separately by
            // the engine via `Value::reciprocal`, not by calling this with
            // a negative exponent.
            return None;
        }
        let mut q_max = exp.unsigned_abs();

        let base_bits = {
            let n = self.r.numer().bits().max(1) as f64;
            let d = self.r.denom().bits().max(1) as f64;
            n.max(d)
        };
        let budget = (limits.max_digits as u64) << self.k;
        let mut wraps = 0u32;
        while (base_bits * q_max as f64) > budget as f64 {
            if q_max % 2 == 1 {
                return None;
            }
            q_max /= 2;
            wraps += 1;
        }

        let mut q_min = q_max;
        while q_min % 2 == 0 && q_min > 1 {
            q_min /= 2;
        }

        let pow_rational = |r: &BigRational, p: u32| -> BigRational {
            BigRational::new(r.numer().pow(p), r.denom().pow(p))
        };

        let mut intermediates = Vec::new();
        let mut q = q_min;
        let mut value = self.pow_integer(q, &pow_rational);
        loop {
            let wraps_here = {
                let mut w = 0u32;
                let mut qq = q_max;
                while qq > q {
                    qq *= 2;
                    w += 1;
                }
                w
            };
            intermediates.push((q, value.clone(), wraps_here));
            if q >= q_max {
                break;
            }
            q *= 2;
            value = value.mul(&value).expect("squaring never escapes the algebra");
        }

        let final_value = intermediates.last().unwrap().1.clone();
        intermediates.pop();

        Some(PowResult { value: final_value, sqrt_wraps: wraps, intermediates })
    }

    fn try_sqrt(&self, limits: &Limits) -> Option<Self> {
        if self.is_zero() {
            return Some(self.clone());
        }
        if self.r.is_negative() {
            return None;
        }
        if self.k + 1 > limits.max_quadratic_power {
            return None;
        }
        let mut p = self.r.numer().clone();
        let mut q = self.r.denom().clone();
        let mut e = self.e;
        let new_k = self.k + 1;
        let mut numerator = BigInt::one();
        let mut denominator = BigInt::one();
        for (i, &prime_u32) in PRIMES.iter().enumerate() {
            let prime = BigInt::from(prime_u32);
            let prime_sq = &prime * &prime;
            while (&p % &prime_sq).is_zero() {
                numerator *= &prime;
                p /= &prime_sq;
            }
            if (&p % &prime).is_zero() {
                e[i] |= 1 << (new_k - 1);
                p /= &prime;
            }
            while (&q % &prime_sq).is_zero() {
                denominator *= &prime;
                q /= &prime_sq;
            }
            if (&q % &prime).is_zero() {
                denominator *= &prime;
                e[i] |= 1 << (new_k - 1);
                q /= &prime;
            }
        }
        numerator *= try_sqrt(&p)?;
        denominator *= try_sqrt(&q)?;
        let k = if e.iter().all(|&x| x == 0) { 0 } else { new_k };
        Some(Quadratic { r: BigRational::new(numerator, denominator), e, k }.canonicalise())
    }

    fn try_factorial(&self, limits: &Limits) -> Option<Self> {
        if !self.is_rational() || !self.r.is_integer() {
            return None;
        }
        let n = self.r.numer().to_u64()?;
        if n > limits.max_factorial {
            return None;
        }
        Some(Quadratic {
            r: BigRational::from_integer(crate::number_theory::factorial(n)),
            e: [0; 4],
            k: 0,
        })
    }

    fn try_factorial_divide(&self, other: &Self) -> Option<Self> {
        if !self.is_rational() || !other.is_rational() {
            return None;
        }
        if !self.r.is_integer() || !other.r.is_integer() {
            return None;
        }
        let x = self.r.numer().to_u64()?;
        let y = other.r.numer().to_u64()?;
        if x < y {
            return None;
        }
        Some(Quadratic {
            r: BigRational::from_integer(crate::number_theory::factorial_divide(x, y)),
            e: [0; 4],
            k: 0,
        })
    }

    fn reciprocal(&self) -> Option<Self> {
        self.invert()
    }

    fn literal_pow(&self, exponent: &Self) -> Option<Self> {
        if !exponent.is_rational() || !exponent.r.is_integer() {
            return None;
        }
        let power = exponent.r.numer().to_u32()?;
        let pow_rational = |r: &BigRational, p: u32| -> BigRational {
            BigRational::new(r.numer().pow(p), r.denom().pow(p))
        };
        Some(self.pow_integer(power, &pow_rational))
    }

    fn specials(n: u8, depth: usize) -> Vec<(Self, Rc<crate::expression::Expression<Self>>)> {
        crate::search::specials::quadratic_seeds(n, depth)
    }
}

impl Quadratic {
    fn pow_integer(&self, power: u32, pow_rational: &dyn Fn(&BigRational, u32) -> BigRational) -> Self {
        if power == 0 {
            return Quadratic { r: BigRational::one(), e: [0; 4], k: 0 };
        }
        let mut r = pow_rational(&self.r, power);
        let mut e = [0u32; 4];
        let mut k = self.k;
        let mut p = power;
        while k > 0 && p % 2 == 0 {
            k -= 1;
            p /= 2;
        }
        if k > 0 {
            let modulus = 1u32 << k;
            for i in 0..4 {
                let total = self.e[i] * p;
                let q = total / modulus;
                let rem = total % modulus;
                r *= BigRational::from_integer(BigInt::from(PRIMES[i]).pow(q));
                e[i] = rem;
            }
        }
        Quadratic { r, e, k }.canonicalise()
    }

    /// Multiplicative inverse, backing [`Value::reciprocal`].
    fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let mut r = self.r.recip();
        let mut e = [0u32; 4];
        if self.k > 0 {
            let modulus = 1u32 << self.k;
            for i in 0..4 {
                if self.e[i] > 0 {
                    r /= BigInt::from(PRIMES[i]);
                    e[i] = modulus - self.e[i];
                }
            }
        }
        Some(Quadratic { r, e, k: self.k }.canonicalise())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rational(n: i64, d: i64) -> Quadratic {
        Quadratic { r: BigRational::new(BigInt::from(n), BigInt::from(d)), e: [0; 4], k: 0 }
    }

    #[test]
    fn sqrt_of_two_has_k_one() {
        let two = rational(2, 1);
        let root = two.try_sqrt(&Limits::QUADRATIC).unwrap();
        assert_eq!(root.k, 1);
        assert_eq!(root.e, [1, 0, 0, 0]);
    }

    #[test]
    fn squaring_sqrt_two_recovers_two() {
        let two = rational(2, 1);
        let root = two.try_sqrt(&Limits::QUADRATIC).unwrap();
        let squared = root.mul(&root).unwrap();
        assert!(squared.is_rational());
        assert_eq!(squared.r, BigRational::from_integer(BigInt::from(2)));
    }

    #[test]
    fn add_requires_same_shape() {
        let sqrt2 = rational(2, 1).try_sqrt(&Limits::QUADRATIC).unwrap();
        let sqrt3 = rational(3, 1).try_sqrt(&Limits::QUADRATIC).unwrap();
        assert!(sqrt2.add(&sqrt3).is_none());
        assert!(sqrt2.add(&sqrt2).is_some());
    }

    #[test]
    fn zero_has_no_quadratic_part() {
        let z = Quadratic::zero();
        assert!(z.is_zero());
        assert_eq!(z.k, 0);
    }
}
