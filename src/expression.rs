//! The expression tree: operator nodes over leaves holding a value of some
//! [`crate::value::Value`] algebra, with precedence-aware printing.

use crate::value::{Limits, Value};
use std::fmt;
use std::rc::Rc;

pub enum Expression<T: Value> {
    Number(T),
    /// A concatenation leaf, e.g. `777` for `n=7, d=3`. Printed identically
    /// to `Number` but tracked separately so the printer can skip bare
    /// concat nodes that aren't the final witness (§6 output rule).
    Concat(T),
    Negate(Rc<Expression<T>>),
    Add(Rc<Expression<T>>, Rc<Expression<T>>),
    Subtract(Rc<Expression<T>>, Rc<Expression<T>>),
    Multiply(Rc<Expression<T>>, Rc<Expression<T>>),
    Divide(Rc<Expression<T>>, Rc<Expression<T>>),
    Power(Rc<Expression<T>>, Rc<Expression<T>>),
    Sqrt(Rc<Expression<T>>, u32),
    Factorial(Rc<Expression<T>>),
}

impl<T: Value> Expression<T> {
    #[inline]
    pub fn get_number(&self) -> Option<&T> {
        match self {
            Expression::Number(x) | Expression::Concat(x) => Some(x),
            _ => None,
        }
    }

    #[inline]
    pub fn get_subtract(&self) -> Option<(&Rc<Expression<T>>, &Rc<Expression<T>>)> {
        match self {
            Expression::Subtract(x, y) => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn get_add(&self) -> Option<(&Rc<Expression<T>>, &Rc<Expression<T>>)> {
        match self {
            Expression::Add(x, y) => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn get_multiply(&self) -> Option<(&Rc<Expression<T>>, &Rc<Expression<T>>)> {
        match self {
            Expression::Multiply(x, y) => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn get_divide(&self) -> Option<(&Rc<Expression<T>>, &Rc<Expression<T>>)> {
        match self {
            Expression::Divide(x, y) => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn get_power(&self) -> Option<(&Rc<Expression<T>>, &Rc<Expression<T>>)> {
        match self {
            Expression::Power(x, y) => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn get_sqrt(&self) -> Option<(&Rc<Expression<T>>, &u32)> {
        match self {
            Expression::Sqrt(x, order) => Some((x, order)),
            _ => None,
        }
    }

    /// Precedence as defined in §4.3: number/concat=7, sqrt=6, factorial=5,
    /// power=4, multiply/divide=3, negate=2, add/subtract=1.
    #[inline]
    fn precedence(&self) -> i32 {
        match self {
            Expression::Number(_) | Expression::Concat(_) => 7,
            Expression::Sqrt(_, _) => 6,
            Expression::Factorial(_) => 5,
            Expression::Power(_, _) => 4,
            Expression::Multiply(_, _) | Expression::Divide(_, _) => 3,
            Expression::Negate(_) => 2,
            Expression::Add(_, _) | Expression::Subtract(_, _) => 1,
        }
    }
}

fn fmt_binary<T: Value>(
    f: &mut fmt::Formatter,
    x: &Rc<Expression<T>>,
    y: &Rc<Expression<T>>,
    operator: &str,
    precedence: i32,
    abelian: bool,
    rtl: bool,
) -> fmt::Result {
    let lhs = if x.precedence() < precedence || (x.precedence() == precedence && rtl && !abelian) {
        format!("({x})")
    } else {
        format!("{x}")
    };
    let rhs = if y.precedence() < precedence || (y.precedence() == precedence && !rtl && !abelian) {
        format!("({y})")
    } else {
        format!("{y}")
    };
    write!(f, "{lhs}{operator}{rhs}")
}

impl<T: Value> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Number(x) | Expression::Concat(x) => write!(f, "{x}"),
            Expression::Negate(x) => match x.get_add().or(x.get_subtract()) {
                Some(_) => write!(f, "-({x})"),
                None => write!(f, "-{x}"),
            },
            Expression::Add(x, y) => fmt_binary(f, x, y, "+", self.precedence(), true, false),
            Expression::Subtract(x, y) => fmt_binary(f, x, y, "-", self.precedence(), false, false),
            Expression::Multiply(x, y) => fmt_binary(f, x, y, "*", self.precedence(), true, false),
            Expression::Divide(x, y) => fmt_binary(f, x, y, "/", self.precedence(), false, false),
            Expression::Power(x, y) => fmt_binary(f, x, y, "^", self.precedence(), false, true),
            Expression::Sqrt(x, order) => {
                write!(f, "{}{}{}", "s".repeat((*order as usize).saturating_sub(1)), "sqrt(", x)?;
                write!(f, "{}", ")".repeat(*order as usize))
            }
            Expression::Factorial(x) => match x.get_number() {
                Some(_) => write!(f, "{x}!"),
                None => write!(f, "({x})!"),
            },
        }
    }
}

impl<T: Value> Expression<T> {
    pub fn from_number(x: T) -> Rc<Expression<T>> {
        Rc::new(Expression::Number(x))
    }

    pub fn from_concat(x: T) -> Rc<Expression<T>> {
        Rc::new(Expression::Concat(x))
    }

    pub fn from_negate(x: Rc<Expression<T>>) -> Rc<Expression<T>> {
        if let Some((y, z)) = x.get_subtract() {
            Rc::new(Expression::Subtract(z.clone(), y.clone()))
        } else {
            Rc::new(Expression::Negate(x))
        }
    }

    pub fn from_add(x: Rc<Expression<T>>, y: Rc<Expression<T>>) -> Rc<Expression<T>> {
        let x0 = x.get_subtract();
        let y0 = y.get_subtract();
        if let (Some((x1, x2)), Some((y1, y2))) = (x0, y0) {
            Rc::new(Expression::Subtract(
                Rc::new(Expression::Add(x1.clone(), y1.clone())),
                Rc::new(Expression::Add(x2.clone(), y2.clone())),
            ))
        } else if let Some((x1, x2)) = x0 {
            Rc::new(Expression::Subtract(Rc::new(Expression::Add(x1.clone(), y)), x2.clone()))
        } else if let Some((y1, y2)) = y0 {
            Rc::new(Expression::Subtract(Rc::new(Expression::Add(x, y1.clone())), y2.clone()))
        } else if let Some((y1, y2)) = y.get_add() {
            Rc::new(Expression::Add(Expression::from_add(x, y1.clone()), y2.clone()))
        } else {
            Rc::new(Expression::Add(x, y))
        }
    }

    pub fn from_subtract(x: Rc<Expression<T>>, y: Rc<Expression<T>>) -> Rc<Expression<T>> {
        if let Some((y1, y2)) = y.get_subtract() {
            Expression::from_add(x, Rc::new(Expression::Subtract(y2.clone(), y1.clone())))
        } else if let Some((x1, x2)) = x.get_subtract() {
            Rc::new(Expression::Subtract(x1.clone(), Rc::new(Expression::Add(x2.clone(), y))))
        } else {
            Rc::new(Expression::Subtract(x, y))
        }
    }

    pub fn from_multiply(x: Rc<Expression<T>>, y: Rc<Expression<T>>) -> Rc<Expression<T>> {
        if let (Some((x_base, x_order)), Some((y_base, y_order))) = (x.get_sqrt(), y.get_sqrt()) {
            let min_order = u32::min(*x_order, *y_order);
            return Expression::from_sqrt(
                Expression::from_multiply(
                    Expression::from_sqrt(x_base.clone(), x_order - min_order),
                    Expression::from_sqrt(y_base.clone(), y_order - min_order),
                ),
                min_order,
            );
        }
        let x0 = x.get_divide();
        let y0 = y.get_divide();
        if let (Some((x1, x2)), Some((y1, y2))) = (x0, y0) {
            Rc::new(Expression::Divide(
                Rc::new(Expression::Multiply(x1.clone(), y1.clone())),
                Rc::new(Expression::Multiply(x2.clone(), y2.clone())),
            ))
        } else if let Some((x1, x2)) = x0 {
            Rc::new(Expression::Divide(Rc::new(Expression::Multiply(x1.clone(), y)), x2.clone()))
        } else if let Some((y1, y2)) = y0 {
            Rc::new(Expression::Divide(Rc::new(Expression::Multiply(x, y1.clone())), y2.clone()))
        } else if let Some((y1, y2)) = y.get_multiply() {
            Rc::new(Expression::Multiply(Expression::from_multiply(x, y1.clone()), y2.clone()))
        } else {
            Rc::new(Expression::Multiply(x, y))
        }
    }

    pub fn from_divide(x: Rc<Expression<T>>, y: Rc<Expression<T>>) -> Rc<Expression<T>> {
        if let Some((y1, y2)) = y.get_divide() {
            Expression::from_multiply(x, Rc::new(Expression::Divide(y2.clone(), y1.clone())))
        } else if let Some((x1, x2)) = x.get_divide() {
            Rc::new(Expression::Divide(x1.clone(), Rc::new(Expression::Multiply(x2.clone(), y))))
        } else {
            Rc::new(Expression::Divide(x, y))
        }
    }

    pub fn from_power(x: Rc<Expression<T>>, y: Rc<Expression<T>>) -> Rc<Expression<T>> {
        if let Some((x1, x2)) = x.get_power() {
            Rc::new(Expression::Power(x1.clone(), Expression::from_multiply(x2.clone(), y)))
        } else if let Some((x0, order)) = x.get_sqrt() {
            Rc::new(Expression::Sqrt(Expression::from_power(x0.clone(), y), *order))
        } else {
            Rc::new(Expression::Power(x, y))
        }
    }

    pub fn from_sqrt(x: Rc<Expression<T>>, order: u32) -> Rc<Expression<T>> {
        if order == 0 {
            x
        } else if let Some((y, z)) = x.get_sqrt() {
            Rc::new(Expression::Sqrt(y.clone(), z + order))
        } else if let Some((y, z)) = x.get_divide() {
            Rc::new(Expression::Divide(
                Rc::new(Expression::Sqrt(y.clone(), order)),
                Rc::new(Expression::Sqrt(z.clone(), order)),
            ))
        } else {
            Rc::new(Expression::Sqrt(x, order))
        }
    }

    pub fn from_factorial(x: Rc<Expression<T>>) -> Rc<Expression<T>> {
        Rc::new(Expression::Factorial(x))
    }

    /// LaTeX rendering for the verbose/record-comparison output (§6).
    pub fn to_latex_string(&self) -> String {
        fn wrap<T: Value>(x: &Rc<Expression<T>>, min_precedence: i32) -> String {
            if x.precedence() < min_precedence {
                format!("\\left({}\\right)", x.to_latex_string())
            } else {
                x.to_latex_string()
            }
        }
        match self {
            Expression::Number(x) | Expression::Concat(x) => format!("{x}"),
            Expression::Negate(x) => format!("-{}", wrap(x, self.precedence())),
            Expression::Add(x, y) => format!("{}+{}", wrap(x, self.precedence()), wrap(y, self.precedence())),
            Expression::Subtract(x, y) => format!("{}-{}", wrap(x, self.precedence()), wrap(y, self.precedence() + 1)),
            Expression::Multiply(x, y) => {
                format!("{}\\times {}", wrap(x, self.precedence()), wrap(y, self.precedence()))
            }
            Expression::Divide(x, y) => format!("\\frac{{{}}}{{{}}}", x.to_latex_string(), y.to_latex_string()),
            Expression::Power(x, y) => format!("{}^{{{}}}", wrap(x, self.precedence() + 1), y.to_latex_string()),
            Expression::Sqrt(x, order) => {
                let mut s = x.to_latex_string();
                for _ in 0..*order {
                    s = format!("\\sqrt{{{s}}}");
                }
                s
            }
            Expression::Factorial(x) => format!("{}!", wrap(x, self.precedence() + 1)),
        }
    }
}

/// Re-evaluates a built expression tree against the algebra's own
/// arithmetic, used by the output printer to recover the value of every
/// intermediate subexpression without threading a parallel value tree.
pub fn evaluate<T: Value>(expr: &Expression<T>, limits: &Limits) -> Option<T> {
    match expr {
        Expression::Number(x) | Expression::Concat(x) => Some(x.clone()),
        Expression::Negate(x) => T::from_digit(0).sub(&evaluate(x, limits)?),
        Expression::Add(x, y) => evaluate(x, limits)?.add(&evaluate(y, limits)?),
        Expression::Subtract(x, y) => evaluate(x, limits)?.sub(&evaluate(y, limits)?),
        Expression::Multiply(x, y) => evaluate(x, limits)?.mul(&evaluate(y, limits)?),
        Expression::Divide(x, y) => evaluate(x, limits)?.div(&evaluate(y, limits)?),
        Expression::Power(x, y) => {
            // A `Power` node's exponent child is always the *original*
            // (unreduced) operand the engine found, with any `MAX_DIGITS`
            // pruning represented by the enclosing `Sqrt` wrapper instead —
            // so this must raise to the exact exponent (`literal_pow`), not
            // re-run the pruning `checked_pow`, or a witness whose exponent
            // search-time halving fired would re-reduce twice and evaluate
            // to the wrong value. A negated exponent (the `p^(-q)`
            // reciprocal witness) has no direct algebra representation
            // (I5: no algebra stores a negative value), so it is handled
            // here by raising to the positive exponent and inverting.
            let base = evaluate(x, limits)?;
            if let Expression::Negate(inner) = y.as_ref() {
                base.literal_pow(&evaluate(inner, limits)?)?.reciprocal()
            } else {
                base.literal_pow(&evaluate(y, limits)?)
            }
        }
        Expression::Sqrt(x, order) => {
            let mut v = evaluate(x, limits)?;
            for _ in 0..*order {
                v = v.try_sqrt(limits)?;
            }
            Some(v)
        }
        Expression::Factorial(x) => evaluate(x, limits)?.try_factorial(limits),
    }
}

/// Rebuilds an expression tree in a different algebra by mapping every leaf
/// through `f`, used to cross-pollinate a witness found by one solver into
/// a more general one (e.g. an integer witness re-typed as a rational).
/// Returns `None` if any leaf fails to convert.
pub fn map_values<T: Value, U: Value>(expr: &Expression<T>, f: &impl Fn(&T) -> Option<U>) -> Option<Rc<Expression<U>>> {
    Some(match expr {
        Expression::Number(x) => Rc::new(Expression::Number(f(x)?)),
        Expression::Concat(x) => Rc::new(Expression::Concat(f(x)?)),
        Expression::Negate(x) => Rc::new(Expression::Negate(map_values(x, f)?)),
        Expression::Add(x, y) => Rc::new(Expression::Add(map_values(x, f)?, map_values(y, f)?)),
        Expression::Subtract(x, y) => Rc::new(Expression::Subtract(map_values(x, f)?, map_values(y, f)?)),
        Expression::Multiply(x, y) => Rc::new(Expression::Multiply(map_values(x, f)?, map_values(y, f)?)),
        Expression::Divide(x, y) => Rc::new(Expression::Divide(map_values(x, f)?, map_values(y, f)?)),
        Expression::Power(x, y) => Rc::new(Expression::Power(map_values(x, f)?, map_values(y, f)?)),
        Expression::Sqrt(x, order) => Rc::new(Expression::Sqrt(map_values(x, f)?, *order)),
        Expression::Factorial(x) => Rc::new(Expression::Factorial(map_values(x, f)?)),
    })
}
