//! End-to-end scenarios: `problem -> minimum digit count, one acceptable
//! witness`, run at small depths so they terminate quickly.

use num_bigint::BigInt;
use num_rational::BigRational;
use tchisla::search::SearchEngine;
use tchisla::value::{Integer, Limits, Quadratic, Rational, Value};

fn int(n: i64) -> Integer {
    Integer::from_bigint(&BigInt::from(n)).unwrap()
}

#[test]
fn one_digit_one_is_itself() {
    let mut engine = SearchEngine::<Integer>::new(1, Limits::INTEGER);
    let (depth, expr) = engine.solve(&int(1), Some(1)).expect("1 must be reachable with n=1");
    assert_eq!(depth, 1);
    assert_eq!(expr.to_string(), "1");
}

#[test]
fn ten_from_ones_takes_two_digits() {
    let mut engine = SearchEngine::<Integer>::new(1, Limits::INTEGER);
    let (depth, _) = engine.solve(&int(10), Some(2)).expect("10 must be reachable with two 1s");
    assert_eq!(depth, 2);
}

#[test]
fn hundred_from_nines_within_three_digits() {
    let mut engine = SearchEngine::<Integer>::new(9, Limits::INTEGER);
    let (depth, _) = engine.solve(&int(100), Some(3)).expect("100 must be reachable with three 9s");
    assert!(depth <= 3);
}

#[test]
fn one_seventh_is_rational_not_integral() {
    let target = BigRational::new(BigInt::from(1), BigInt::from(7));
    assert!(!target.is_integer(), "1/7 has no integral representation");

    let mut rational = SearchEngine::<Rational>::new(3, Limits::RATIONAL);
    let target_value = Rational(target);
    let solved = rational.solve(&target_value, Some(6));
    assert!(solved.is_some(), "1/7 with n=3 must be reachable by the rational algebra");
}

#[test]
fn sqrt_two_reachable_with_four_twos() {
    let mut engine = SearchEngine::<Quadratic>::new(4, Limits::QUADRATIC);
    let two = Quadratic::from_bigint(&BigInt::from(2)).unwrap();
    let sqrt_two = two.try_sqrt(&Limits::QUADRATIC).unwrap();
    let (depth, _) = engine.solve(&sqrt_two, Some(4)).expect("sqrt(2) must be reachable with n=4");
    assert!(depth <= 4);
}
