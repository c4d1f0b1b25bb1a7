//! Integer utilities shared by every value algebra: perfect-square testing,
//! integer square roots and factorials, all on arbitrary-precision integers.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::sync::LazyLock;

/// Bit `i` is set iff `i` is a quadratic residue modulo the table's modulus.
/// Ported from the residue bitstrings used to pre-filter non-squares before
/// paying for a full Newton's-method `isqrt`.
struct ResidueMask {
    modulus: u32,
    residues: &'static str,
}

const MASK_11: ResidueMask = ResidueMask { modulus: 11, residues: "11011100010" };
const MASK_63: ResidueMask = ResidueMask {
    modulus: 63,
    residues: "110010010100000010100010010010000000110000010010010000000010000",
};
const MASK_64: ResidueMask = ResidueMask {
    modulus: 64,
    residues: "1100100001000000110000000100000001001000010000000100000001000000",
};
const MASK_65: ResidueMask = ResidueMask {
    modulus: 65,
    residues: "11001000011000101000000001100110000110011000000001010001100001001",
};

fn residue_is_square(mask: &ResidueMask, residue: u32) -> bool {
    mask.residues.as_bytes()[residue as usize] == b'1'
}

static MAX_SAFE_INTEGER: LazyLock<BigInt> = LazyLock::new(|| BigInt::from(1u64) << 53);

/// Exact integer square root if `n` is a perfect square, `None` otherwise.
///
/// Small values go through an `f64` approximation; larger ones are
/// pre-filtered against four residue masks before falling back to a
/// Newton's-method `isqrt`, which is verified by squaring the result.
pub fn try_sqrt(n: &BigInt) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    if n <= &MAX_SAFE_INTEGER {
        let n_f64 = n
            .to_string()
            .parse::<f64>()
            .expect("small BigInt parses as f64");
        let root = n_f64.sqrt().round() as i64;
        let root = BigInt::from(root);
        return if &root * &root == *n { Some(root) } else { None };
    }

    let residue = |m: u32| -> u32 {
        let m_big = BigInt::from(m);
        (n % &m_big).to_u32_or_panic()
    };
    if !residue_is_square(&MASK_64, residue(64))
        || !residue_is_square(&MASK_11, residue(11))
        || !residue_is_square(&MASK_63, residue(63))
        || !residue_is_square(&MASK_65, residue(65))
    {
        return None;
    }

    let bit_length = n.bits();
    if bit_length % 2 == 1 && (n & (n - BigInt::one())).is_zero() {
        return Some(BigInt::one() << (bit_length / 2));
    }

    let mut x = n.clone();
    let mut y = BigInt::one() << ((bit_length + 1) / 2);
    while x > y {
        x = y.clone();
        y = (&y + n / &y) >> 1;
    }
    if &x * &x == *n { Some(x) } else { None }
}

trait ToU32OrPanic {
    fn to_u32_or_panic(&self) -> u32;
}

impl ToU32OrPanic for BigInt {
    fn to_u32_or_panic(&self) -> u32 {
        use num_traits::ToPrimitive;
        self.to_u32().expect("residue fits in u32")
    }
}

/// `n!` for small non-negative `n`.
pub fn factorial(n: u64) -> BigInt {
    let mut result = BigInt::one();
    let mut i = BigInt::from(2u64);
    let n = BigInt::from(n);
    while i <= n {
        result *= &i;
        i += 1;
    }
    result
}

/// `m! / n!` for `m >= n`, computed as the single product `(n+1)·(n+2)·…·m`
/// rather than two factorials, so the heuristic in the search engine that
/// treats `x!/y!` as one edge never materialises the (much larger)
/// intermediate factorials.
pub fn factorial_divide(m: u64, n: u64) -> BigInt {
    let mut result = BigInt::one();
    let mut i = BigInt::from(n + 1);
    let m = BigInt::from(m);
    while i <= m {
        result *= &i;
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_perfect_squares() {
        for i in 0..200i64 {
            let n = BigInt::from(i * i);
            assert_eq!(try_sqrt(&n), Some(BigInt::from(i)));
        }
    }

    #[test]
    fn small_non_squares() {
        assert_eq!(try_sqrt(&BigInt::from(2)), None);
        assert_eq!(try_sqrt(&BigInt::from(15)), None);
        assert_eq!(try_sqrt(&BigInt::from(-4)), None);
    }

    #[test]
    fn large_perfect_square_beyond_f64_precision() {
        let root = BigInt::from(1u64) << 40;
        let n = &root * &root;
        assert_eq!(try_sqrt(&n), Some(root));
    }

    #[test]
    fn large_non_square_beyond_f64_precision() {
        let root = BigInt::from(1u64) << 40;
        let n = &root * &root + BigInt::one();
        assert_eq!(try_sqrt(&n), None);
    }

    #[test]
    fn factorial_values() {
        assert_eq!(factorial(0), BigInt::one());
        assert_eq!(factorial(5), BigInt::from(120));
    }

    #[test]
    fn factorial_divide_matches_ratio_of_factorials() {
        assert_eq!(factorial_divide(7, 4), factorial(7) / factorial(4));
    }
}
