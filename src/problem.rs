//! The problem DSL (§6): `target ("#" digit)?`, where both `target` and
//! `digit` may be a single value, a range, or a bracketed comma list.
//! Ported from the simpler `number_re`/`tchisla_re` pair in the Python
//! original's `main.py`, generalised to the full grammar (ranges, lists,
//! rational targets) spec'd here.

use crate::errors::{TchislaError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;

#[derive(Debug, Clone)]
pub struct Problem {
    pub targets: Vec<BigRational>,
    pub digits: Vec<u8>,
}

/// Parses one `target("#"digit)?` string. The digit part, if omitted,
/// resolves to all nine digits (§6: "If the digit part is omitted, all
/// nine digits are solved").
pub fn parse(input: &str) -> Result<Problem> {
    let input = input.trim();
    let (target_part, digit_part) = match input.split_once('#') {
        Some((t, d)) => (t, Some(d)),
        None => (input, None),
    };
    let targets = parse_target_list(target_part)?;
    let digits = match digit_part {
        Some(d) => parse_digit_list(d)?,
        None => (1..=9).collect(),
    };
    Ok(Problem { targets, digits })
}

fn parse_target_list(s: &str) -> Result<Vec<BigRational>> {
    let inner = strip_brackets(s);
    let mut targets = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((lo, hi)) = item.split_once('-') {
            let lo = parse_number(lo)?;
            let hi = parse_number(hi)?;
            let (lo, hi) = (lo.to_integer(), hi.to_integer());
            let mut x = lo;
            while x <= hi {
                targets.push(BigRational::from_integer(x.clone()));
                x += 1;
            }
        } else {
            targets.push(parse_number(item)?);
        }
    }
    if targets.is_empty() {
        return Err(TchislaError::InvalidInput(s.to_string()));
    }
    Ok(targets)
}

fn parse_digit_list(s: &str) -> Result<Vec<u8>> {
    let inner = strip_brackets(s);
    let mut digits = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if let Some((lo, hi)) = item.split_once('-') {
            let lo = parse_digit(lo)?;
            let hi = parse_digit(hi)?;
            for d in lo..=hi {
                digits.push(d);
            }
        } else {
            digits.push(parse_digit(item)?);
        }
    }
    if digits.is_empty() {
        return Err(TchislaError::InvalidInput(s.to_string()));
    }
    Ok(digits)
}

fn strip_brackets(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('[').and_then(|s| s.strip_suffix(']')).unwrap_or(s)
}

fn parse_digit(s: &str) -> Result<u8> {
    s.trim()
        .parse::<u8>()
        .ok()
        .filter(|d| (1..=9).contains(d))
        .ok_or_else(|| TchislaError::InvalidInput(s.to_string()))
}

fn parse_number(s: &str) -> Result<BigRational> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: BigInt = num.trim().parse().map_err(|_| TchislaError::InvalidInput(s.to_string()))?;
        let den: BigInt = den.trim().parse().map_err(|_| TchislaError::InvalidInput(s.to_string()))?;
        if den == BigInt::from(0) {
            return Err(TchislaError::InvalidInput(s.to_string()));
        }
        Ok(BigRational::new(num, den))
    } else {
        let num: BigInt = s.parse().map_err(|_| TchislaError::InvalidInput(s.to_string()))?;
        Ok(BigRational::from_integer(num))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_target_defaults_to_all_digits() {
        let p = parse("2017").unwrap();
        assert_eq!(p.targets, vec![BigRational::from_integer(BigInt::from(2017))]);
        assert_eq!(p.digits, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn single_digit_suffix() {
        let p = parse("100#9").unwrap();
        assert_eq!(p.digits, vec![9]);
    }

    #[test]
    fn bracketed_target_list_with_ranges() {
        let p = parse("[3-5,10]#2").unwrap();
        assert_eq!(
            p.targets,
            vec![3, 4, 5, 10].into_iter().map(|n| BigRational::from_integer(BigInt::from(n))).collect::<Vec<_>>()
        );
    }

    #[test]
    fn bracketed_digit_list() {
        let p = parse("7#[2-4,9]").unwrap();
        assert_eq!(p.digits, vec![2, 3, 4, 9]);
    }

    #[test]
    fn rational_target() {
        let p = parse("1/7#3").unwrap();
        assert_eq!(p.targets, vec![BigRational::new(BigInt::from(1), BigInt::from(7))]);
    }

    #[test]
    fn invalid_token_reports_error() {
        assert!(parse("abc").is_err());
        assert!(parse("5#10").is_err());
    }
}
