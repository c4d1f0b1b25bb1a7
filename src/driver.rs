//! Ties the three `SearchEngine` instances together (§4.5): runs the
//! configured solver chain against one problem, carrying `max_depth`
//! forward from one algebra's success to bound the next, and cross-
//! pollinating a finished algebra's solutions into the next so the more
//! general algebras don't have to rediscover every plain integer.

use crate::cli::Solver;
use crate::expression::{self, Expression};
use crate::search::SearchEngine;
use crate::value::{Integer, Limits, Quadratic, Rational, Value};
use num_rational::BigRational;
use std::collections::HashSet;
use std::rc::Rc;

pub struct Solution {
    pub solver: Solver,
    pub depth: usize,
    pub report: String,
}

/// Runs `chain` against `(n, target)`, returning the best (shallowest)
/// solution found, if any. Each solver is only tried up to `max_depth`
/// (narrowed by any earlier solver's success) and only if `target` can be
/// represented in its algebra.
pub fn solve(n: u8, target: &BigRational, chain: &[Solver], max_depth: Option<usize>, verbose: bool) -> Option<Solution> {
    let mut max_depth = max_depth;
    let mut best: Option<Solution> = None;

    let mut integer_engine = SearchEngine::<Integer>::new(n, Limits::INTEGER);
    let mut rational_engine = SearchEngine::<Rational>::new(n, Limits::RATIONAL);
    let mut quadratic_engine = SearchEngine::<Quadratic>::new(n, Limits::QUADRATIC);

    for solver in chain {
        let solved = match solver {
            Solver::Integral => {
                let Some(target_int) = target.is_integer().then(|| target.numer().clone()) else {
                    continue;
                };
                let Some(target_value) = Integer::from_bigint(&target_int) else { continue };
                let result = integer_engine.solve(&target_value, max_depth).map(|(depth, expr)| {
                    (depth, render(&integer_engine, &target_value, &expr, Limits::INTEGER, verbose))
                });
                cross_pollinate(&integer_engine, &mut rational_engine, |v| Rational::from_bigint(&v.0));
                cross_pollinate(&integer_engine, &mut quadratic_engine, |v| Quadratic::from_bigint(&v.0));
                result
            }
            Solver::Rational => {
                let target_value = Rational(target.clone());
                let result = rational_engine.solve(&target_value, max_depth).map(|(depth, expr)| {
                    (depth, render(&rational_engine, &target_value, &expr, Limits::RATIONAL, verbose))
                });
                cross_pollinate(&rational_engine, &mut quadratic_engine, |v| {
                    v.to_bigint().as_ref().and_then(Quadratic::from_bigint)
                });
                result
            }
            Solver::Quadratic => {
                let Some(target_int) = target.is_integer().then(|| target.numer().clone()) else {
                    continue;
                };
                let Some(target_value) = Quadratic::from_bigint(&target_int) else { continue };
                quadratic_engine.solve(&target_value, max_depth).map(|(depth, expr)| {
                    (depth, render(&quadratic_engine, &target_value, &expr, Limits::QUADRATIC, verbose))
                })
            }
        };

        if let Some((depth, report)) = solved {
            max_depth = Some(depth.saturating_sub(1));
            best = Some(Solution { solver: *solver, depth, report });
        }
    }

    best
}

/// Re-inserts every value `from` has discovered into `into`, via `convert`,
/// so `into`'s search starts from a head start instead of rediscovering
/// plain integers already found by a narrower algebra.
fn cross_pollinate<T: Value, U: Value>(from: &SearchEngine<T>, into: &mut SearchEngine<U>, convert: impl Fn(&T) -> Option<U>) {
    let mut pending: Vec<(U, usize, Rc<Expression<U>>)> = Vec::new();
    for (value, (depth, expr)) in from.iter_solutions() {
        let Some(converted_value) = convert(value) else { continue };
        let Some(converted_expr) = expression::map_values(expr, &convert) else { continue };
        pending.push((converted_value, *depth, converted_expr));
    }
    for (value, depth, expr) in pending {
        into.cross_insert(value, depth, expr);
    }
}

/// Renders the §6 output format: one `d: value = expression` line per
/// distinct intermediate value (reverse-topological order, leaves first),
/// bare concatenation leaves suppressed unless they are the target itself,
/// followed by the fully-expanded top-level expression and a bell
/// character in verbose mode.
fn render<T: Value>(engine: &SearchEngine<T>, target: &T, witness: &Rc<Expression<T>>, limits: Limits, verbose: bool) -> String {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    walk(engine, witness, &limits, &mut seen, &mut lines, true);

    let mut out = String::new();
    for (depth, value, expr) in lines {
        out.push_str(&format!("{depth}: {value} = {expr}\n"));
    }
    if verbose {
        out.push_str(&format!("{target} = {witness}\n"));
        out.push('\u{7}');
    }
    out
}

fn walk<T: Value>(
    engine: &SearchEngine<T>,
    expr: &Rc<Expression<T>>,
    limits: &Limits,
    seen: &mut HashSet<T>,
    lines: &mut Vec<(usize, String, String)>,
    is_root: bool,
) -> Option<T> {
    match expr.as_ref() {
        Expression::Number(_) | Expression::Concat(_) => {}
        Expression::Negate(x) | Expression::Sqrt(x, _) | Expression::Factorial(x) => {
            walk(engine, x, limits, seen, lines, false);
        }
        Expression::Add(x, y)
        | Expression::Subtract(x, y)
        | Expression::Multiply(x, y)
        | Expression::Divide(x, y)
        | Expression::Power(x, y) => {
            walk(engine, x, limits, seen, lines, false);
            walk(engine, y, limits, seen, lines, false);
        }
    }

    let value = expression::evaluate(expr, limits)?;
    let bare_concat = matches!(expr.as_ref(), Expression::Concat(_)) && !is_root;
    if bare_concat || seen.contains(&value) {
        return Some(value);
    }
    seen.insert(value.clone());
    let depth = engine.get_solution(&value).map(|(d, _)| *d).unwrap_or(0);
    lines.push((depth, format!("{value}"), format!("{expr}")));
    Some(value)
}
