//! The generic iterative-deepening search engine (§4.4), parameterised over
//! a single [`Value`] algebra. One [`SearchEngine<T>`] owns the solution
//! table and per-depth buckets for one digit; the driver in [`crate::driver`]
//! runs three of them (integer, rational, quadratic) in sequence, cross-
//! pollinating newly discovered values between them after each depth.

pub mod specials;

use crate::expression::Expression;
use crate::value::{Limits, Value};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub type Witness<T> = (usize, Rc<Expression<T>>);

pub struct SearchEngine<T: Value> {
    n: u8,
    limits: Limits,
    solutions: FxHashMap<T, Witness<T>>,
    /// `buckets[d]` is `B[d]`: values first produced at depth `d`. Grows
    /// past `depth_searched` when the factorial-divide heuristic writes a
    /// bonus value at `d+1` ahead of time (§9 "Factorial-divide bonus
    /// values").
    buckets: Vec<Vec<T>>,
    depth_searched: usize,
    /// Values inserted since the last [`SearchEngine::drain_new_values`]
    /// call, used by the driver to cross-pollinate other algebras.
    new_values: Vec<T>,
}

impl<T: Value> SearchEngine<T> {
    pub fn new(n: u8, limits: Limits) -> Self {
        SearchEngine {
            n,
            limits,
            solutions: FxHashMap::default(),
            buckets: vec![Vec::new()],
            depth_searched: 0,
            new_values: Vec::new(),
        }
    }

    pub fn depth_searched(&self) -> usize {
        self.depth_searched
    }

    pub fn get_solution(&self, v: &T) -> Option<&Witness<T>> {
        self.solutions.get(v)
    }

    /// Every value discovered so far, with its recorded depth and witness —
    /// used by the driver to cross-pollinate a finished algebra's solutions
    /// into the next, more general one in the chain.
    pub fn iter_solutions(&self) -> impl Iterator<Item = (&T, &Witness<T>)> {
        self.solutions.iter()
    }

    pub fn drain_new_values(&mut self) -> Vec<T> {
        std::mem::take(&mut self.new_values)
    }

    /// Registers a value discovered by a different algebra's engine at
    /// `depth`, if this algebra can represent it and hasn't seen it yet.
    /// Never searches further on its account — `try_sqrt`/`try_factorial`
    /// recursion still applies, matching ordinary insertion.
    pub fn cross_insert(&mut self, value: T, depth: usize, expr: Rc<Expression<T>>) {
        self.insert(value, depth, expr);
    }

    fn ensure_bucket(&mut self, depth: usize) {
        if self.buckets.len() <= depth {
            self.buckets.resize_with(depth + 1, Vec::new);
        }
    }

    /// `check`/`insert` from §4.4: range filter, dedupe, record, then
    /// recursively try `sqrt` and (if integral and small enough) `!` at the
    /// same depth. Returns `true` iff the inserted value (or one reached by
    /// the sqrt/factorial recursion) is a genuinely new entry.
    fn insert(&mut self, value: T, depth: usize, expr: Rc<Expression<T>>) -> bool {
        if !value.within_limits(&self.limits) {
            return false;
        }
        if self.solutions.contains_key(&value) {
            return false;
        }
        self.ensure_bucket(depth);
        self.solutions.insert(value.clone(), (depth, expr.clone()));
        self.buckets[depth].push(value.clone());
        self.new_values.push(value.clone());

        if let Some(root) = value.try_sqrt(&self.limits) {
            self.insert(root, depth, Expression::from_sqrt(expr.clone(), 1));
        }
        if let Some(fact) = value.try_factorial(&self.limits) {
            self.insert(fact, depth, Expression::from_factorial(expr));
        }
        true
    }

    /// Runs `search(d)`, returning `true` iff `target` was inserted.
    pub fn search(&mut self, digits: usize, target: &T) -> bool {
        self.ensure_bucket(digits);

        for (value, expr) in T::specials(self.n, digits) {
            self.insert(value.clone(), digits, expr);
            if &value == target {
                return true;
            }
        }

        if digits <= self.limits.max_concat {
            let value = T::from_concat(self.n, digits as u32);
            let expr = Expression::from_concat(value.clone());
            self.insert(value.clone(), digits, expr);
            if &value == target {
                return true;
            }
        }

        // Binary combinations, d1 <= d2, d1 + d2 = digits. d1 < d2 uses the
        // Cartesian product; d1 == d2 uses combinations with replacement.
        for d1 in 1..=(digits / 2) {
            let d2 = digits - d1;
            if d1 == d2 {
                let bucket = self.buckets[d1].clone();
                for i in 0..bucket.len() {
                    for j in i..bucket.len() {
                        if self.apply_binary(&bucket[i], d1, &bucket[j], d2, digits, target) {
                            return true;
                        }
                    }
                }
            } else {
                let bucket1 = self.buckets[d1].clone();
                let bucket2 = self.buckets[d2].clone();
                for p in &bucket1 {
                    for q in &bucket2 {
                        if self.apply_binary(p, d1, q, d2, digits, target) {
                            return true;
                        }
                    }
                }
            }
        }

        // Factorial-quotient heuristic: a second pass over the same pairs.
        for d1 in 1..=(digits / 2) {
            let d2 = digits - d1;
            if d1 == d2 {
                let bucket = self.buckets[d1].clone();
                for i in 0..bucket.len() {
                    for j in i..bucket.len() {
                        if self.apply_factorial_divide(&bucket[i], d1, &bucket[j], d2, digits, target) {
                            return true;
                        }
                    }
                }
            } else {
                let bucket1 = self.buckets[d1].clone();
                let bucket2 = self.buckets[d2].clone();
                for p in &bucket1 {
                    for q in &bucket2 {
                        if self.apply_factorial_divide(p, d1, q, d2, digits, target) {
                            return true;
                        }
                    }
                }
            }
        }

        self.depth_searched = digits;
        false
    }

    fn expr_of(&self, v: &T) -> Rc<Expression<T>> {
        self.solutions.get(v).unwrap().1.clone()
    }

    fn apply_binary(&mut self, p: &T, _d1: usize, q: &T, _d2: usize, digits: usize, target: &T) -> bool {
        let pe = self.expr_of(p);
        let qe = self.expr_of(q);

        if let Some(sum) = p.add(q) {
            if self.insert(sum.clone(), digits, Expression::from_add(pe.clone(), qe.clone())) && &sum == target {
                return true;
            }
        }

        match p.partial_cmp_shape(q) {
            Some(std::cmp::Ordering::Less) => {
                if let Some(diff) = q.sub(p) {
                    if self.insert(diff.clone(), digits, Expression::from_subtract(qe.clone(), pe.clone())) && &diff == target {
                        return true;
                    }
                }
            }
            Some(_) => {
                if let Some(diff) = p.sub(q) {
                    if self.insert(diff.clone(), digits, Expression::from_subtract(pe.clone(), qe.clone())) && &diff == target {
                        return true;
                    }
                }
            }
            None => {}
        }

        if let Some(prod) = p.mul(q) {
            if self.insert(prod.clone(), digits, Expression::from_multiply(pe.clone(), qe.clone())) && &prod == target {
                return true;
            }
        }

        if !q.is_zero() {
            if let Some(quot) = p.div(q) {
                if self.insert(quot.clone(), digits, Expression::from_divide(pe.clone(), qe.clone())) && &quot == target {
                    return true;
                }
            }
        }
        if !p.is_zero() {
            if let Some(quot) = q.div(p) {
                if self.insert(quot.clone(), digits, Expression::from_divide(qe.clone(), pe.clone())) && &quot == target {
                    return true;
                }
            }
        }

        if self.apply_power(p, &pe, q, &qe, digits, target) {
            return true;
        }
        if self.apply_power(q, &qe, p, &pe, digits, target) {
            return true;
        }

        false
    }

    fn apply_power(&mut self, base: &T, base_expr: &Rc<Expression<T>>, exponent: &T, exponent_expr: &Rc<Expression<T>>, digits: usize, target: &T) -> bool {
        let Some(result) = base.checked_pow(exponent, &self.limits) else { return false };

        for (_, intermediate_value, wraps) in &result.intermediates {
            if self.insert_power_and_reciprocal(intermediate_value.clone(), base_expr, exponent_expr, *wraps, digits, target) {
                return true;
            }
        }

        self.insert_power_and_reciprocal(result.value, base_expr, exponent_expr, result.sqrt_wraps, digits, target)
    }

    /// Inserts `value = base^exponent` (wrapped in `wraps` layers of
    /// `sqrt`, matching the pruning `checked_pow` applied to reach it), and
    /// — per §4.4's exponent specialisation ("also records `p^(−q)`";
    /// Quadratic: "inserting both the value and … its reciprocal at every
    /// step") — its multiplicative inverse under the companion witness
    /// `base^(-exponent)`, built with `Expression::from_negate` around the
    /// same exponent subtree.
    fn insert_power_and_reciprocal(&mut self, value: T, base_expr: &Rc<Expression<T>>, exponent_expr: &Rc<Expression<T>>, wraps: u32, digits: usize, target: &T) -> bool {
        let witness = Expression::from_sqrt(Expression::from_power(base_expr.clone(), exponent_expr.clone()), wraps);
        if self.insert(value.clone(), digits, witness) && &value == target {
            return true;
        }
        if let Some(reciprocal) = value.reciprocal() {
            let negated_exponent = Expression::from_negate(exponent_expr.clone());
            let reciprocal_witness = Expression::from_sqrt(Expression::from_power(base_expr.clone(), negated_exponent), wraps);
            if self.insert(reciprocal.clone(), digits, reciprocal_witness) && &reciprocal == target {
                return true;
            }
        }
        false
    }

    fn apply_factorial_divide(&mut self, p: &T, d1: usize, q: &T, d2: usize, digits: usize, target: &T) -> bool {
        let (x, y, x_expr, y_expr, x_depth, y_depth) = match p.partial_cmp_shape(q) {
            Some(std::cmp::Ordering::Less) => (q, p, self.expr_of(q), self.expr_of(p), d2, d1),
            Some(_) => (p, q, self.expr_of(p), self.expr_of(q), d1, d2),
            None => return false,
        };
        if x == y {
            return false;
        }
        let (Some(x_int), Some(y_int)) = (x.to_bigint(), y.to_bigint()) else { return false };
        let max_factorial = BigInt::from(self.limits.max_factorial);
        if x_int <= max_factorial || y_int <= BigInt::from(2) || &x_int - &y_int == BigInt::one() {
            return false;
        }
        let x_bits = x.log2_magnitude();
        let y_bits = y.log2_magnitude();
        let gap = (&x_int - &y_int).to_f64().unwrap_or(f64::MAX);
        if (x_bits + y_bits) * gap > 2.0 * self.limits.max_digits as f64 {
            return false;
        }
        let Some(quotient) = x.try_factorial_divide(y) else { return false };
        let witness = Expression::from_divide(
            Expression::from_factorial(x_expr.clone()),
            Expression::from_factorial(y_expr.clone()),
        );
        if self.insert(quotient.clone(), digits, witness.clone()) && &quotient == target {
            return true;
        }

        // Bonus values at depth+1 when one operand was a single-digit leaf
        // (§4.4 step 3 / §9 "Factorial-divide bonus values"): derived from
        // the same x!/y! witness without any further search.
        if x_depth == 1 || y_depth == 1 {
            let bonus_depth = digits + 1;
            let x_fact = Expression::from_factorial(x_expr);
            let y_fact = Expression::from_factorial(y_expr);
            let one = T::from_digit(1);

            if let Some(minus_one) = quotient.sub(&one) {
                let w = Expression::from_divide(
                    Expression::from_subtract(x_fact.clone(), y_fact.clone()),
                    y_fact.clone(),
                );
                if self.insert(minus_one.clone(), bonus_depth, w) && &minus_one == target {
                    return true;
                }
            }
            if let Some(plus_one) = quotient.add(&one) {
                let w = Expression::from_divide(
                    Expression::from_add(x_fact.clone(), y_fact.clone()),
                    y_fact.clone(),
                );
                if self.insert(plus_one.clone(), bonus_depth, w) && &plus_one == target {
                    return true;
                }
            }
            if y_depth == 1 {
                if let Some(half) = quotient.div(&one.add(&one).expect("1+1 always representable")) {
                    let two_y_fact = Expression::from_add(y_fact.clone(), y_fact.clone());
                    let w = Expression::from_divide(x_fact.clone(), two_y_fact);
                    if self.insert(half.clone(), bonus_depth, w) && &half == target {
                        return true;
                    }
                }
            }
            if x_depth == 1 {
                if let Some(doubled) = quotient.add(&quotient) {
                    let doubled_x_fact = Expression::from_add(x_fact.clone(), x_fact.clone());
                    let w = Expression::from_divide(doubled_x_fact, y_fact);
                    if self.insert(doubled.clone(), bonus_depth, w) && &doubled == target {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl<T: Value> SearchEngine<T> {
    /// Iterative deepening driver: repeatedly calls `search` for increasing
    /// depths until `target` is found or `max_depth` is exceeded.
    pub fn solve(&mut self, target: &T, max_depth: Option<usize>) -> Option<Witness<T>> {
        if let Some(solution) = self.solutions.get(target) {
            return Some(solution.clone());
        }
        let max_depth = max_depth.unwrap_or(usize::MAX);
        let mut d = self.depth_searched + 1;
        while d <= max_depth {
            if self.search(d, target) {
                return self.solutions.get(target).cloned();
            }
            d += 1;
        }
        None
    }
}
