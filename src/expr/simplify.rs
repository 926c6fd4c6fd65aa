//! Local algebraic simplification
//!
//! One bottom-up pass: children are simplified first, then a fixed table of
//! rewrites is tried once on the node itself. The pass is not iterated to a
//! fixed point, so the result is not guaranteed to be canonical or minimal.
//!
//! | Operator | Rewrites |
//! |----------|----------|
//! | `-a`     | `--a → a`, `-0 → 0` |
//! | `a + b`  | `0 + b → b`, `a + 0 → a`, `a + (-b) → a - b` |
//! | `a - b`  | `a - 0 → a`, `0 - b → -b`, `a - a → 0`, `a - (-b) → a + b` |
//! | `a * b`  | `0 * b → 0`, `a * 0 → 0`, `1 * b → b`, `a * 1 → a`, `(-a)(-b) → ab` |
//! | `a / b`  | `a / 0 → error`, `0 / b → 0`, `a / 1 → a` |
//! | `a ^ b`  | `a^1 → a`, `a^0 → 1`, `0^b → 0 (b ≠ 0)`, `1^b → 1` |
//! | `exp`    | `e^(ln a) → a`, `e^(b·ln a) → a^b` |
//! | `ln`     | `ln(e^a) → a` |
//!
//! Operators whose operands are all numbers are folded to a number, as long
//! as the folded value is finite.

use super::{CompositeFunction, CustomFunction, DefaultFunction, Expr, MathFunction};
use crate::error::{EvalError, EvalResult};
use std::sync::Arc;

/// Largest natural exponent unrolled by [`Expr::expand_integer_powers`]
pub const MAX_UNROLLED_POWER: u32 = 16;

impl Expr {
    /// Single-pass local simplification.
    ///
    /// Fails only on a literal division by zero.
    pub fn simplify(&self) -> EvalResult<Expr> {
        match self {
            Expr::Number(_) | Expr::Variable(_) => Ok(self.clone()),

            Expr::Vector(elements) => Ok(Expr::Vector(
                elements
                    .iter()
                    .map(Expr::simplify)
                    .collect::<EvalResult<Vec<Expr>>>()?,
            )),

            Expr::Interval { min, max } => Ok(Expr::interval(min.simplify()?, max.simplify()?)),

            Expr::UnaryMinus { operand } => Ok(simplify_negation(operand.simplify()?)),

            Expr::Plus { a, b } => Ok(simplify_plus(a.simplify()?, b.simplify()?)),
            Expr::Minus { a, b } => Ok(simplify_minus(a.simplify()?, b.simplify()?)),
            Expr::Times { a, b } => Ok(simplify_times(a.simplify()?, b.simplify()?)),
            Expr::Divide { a, b } => simplify_divide(a.simplify()?, b.simplify()?),
            Expr::Power { base, exponent } => {
                Ok(simplify_power(base.simplify()?, exponent.simplify()?))
            }

            Expr::Apply { function, args } => {
                let args = args
                    .iter()
                    .map(Expr::simplify)
                    .collect::<EvalResult<Vec<Expr>>>()?;
                Ok(simplify_application(function, args))
            }
        }
    }

    /// Rewrite `a^n` for natural literal `n ≤ MAX_UNROLLED_POWER` into
    /// repeated products, so the tree can be evaluated under INTERVAL.
    pub fn expand_integer_powers(&self) -> Expr {
        match self {
            Expr::Number(_) | Expr::Variable(_) => self.clone(),
            Expr::Vector(elements) => {
                Expr::Vector(elements.iter().map(Expr::expand_integer_powers).collect())
            }
            Expr::Interval { min, max } => {
                Expr::interval(min.expand_integer_powers(), max.expand_integer_powers())
            }
            Expr::UnaryMinus { operand } => -operand.expand_integer_powers(),
            Expr::Plus { a, b } => a.expand_integer_powers() + b.expand_integer_powers(),
            Expr::Minus { a, b } => a.expand_integer_powers() - b.expand_integer_powers(),
            Expr::Times { a, b } => a.expand_integer_powers() * b.expand_integer_powers(),
            Expr::Divide { a, b } => a.expand_integer_powers() / b.expand_integer_powers(),
            Expr::Power { base, exponent } => {
                let base = base.expand_integer_powers();
                match natural_exponent(exponent) {
                    Some(0) => Expr::Number(1.0),
                    Some(n) => {
                        let shared = Arc::new(base);
                        let mut product = Expr::clone(&shared);
                        for _ in 1..n {
                            product = Expr::Times {
                                a: Arc::new(product),
                                b: Arc::clone(&shared),
                            };
                        }
                        product
                    }
                    None => base.pow(exponent.expand_integer_powers()),
                }
            }
            Expr::Apply { function, args } => Expr::Apply {
                function: Arc::new(expand_function(function)),
                args: args.iter().map(Expr::expand_integer_powers).collect(),
            },
        }
    }
}

/// Expand powers inside user function bodies as well
fn expand_function(function: &MathFunction) -> MathFunction {
    match function {
        MathFunction::Custom(f) => MathFunction::Custom(CustomFunction {
            name: f.name.clone(),
            params: f.params.clone(),
            body: f.body.expand_integer_powers(),
        }),
        MathFunction::Composite(c) => MathFunction::Composite(CompositeFunction {
            inner: Arc::new(expand_function(&c.inner)),
            outer: Arc::new(expand_function(&c.outer)),
        }),
        MathFunction::Default(_) => function.clone(),
    }
}

fn natural_exponent(exponent: &Expr) -> Option<u32> {
    let n = exponent.as_number()?;
    if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(MAX_UNROLLED_POWER) {
        Some(n as u32)
    } else {
        None
    }
}

fn simplify_negation(operand: Expr) -> Expr {
    match operand {
        Expr::UnaryMinus { operand } => Expr::clone(&operand),
        Expr::Number(n) if n == 0.0 => Expr::Number(0.0),
        other => -other,
    }
}

fn simplify_plus(a: Expr, b: Expr) -> Expr {
    match (&a, &b) {
        (Expr::Number(x), Expr::Number(y)) => Expr::Number(x + y),
        _ if a.is_number(0.0) => b,
        _ if b.is_number(0.0) => a,
        (_, Expr::UnaryMinus { operand }) => a.clone() - Expr::clone(operand),
        _ => a + b,
    }
}

fn simplify_minus(a: Expr, b: Expr) -> Expr {
    match (&a, &b) {
        (Expr::Number(x), Expr::Number(y)) => Expr::Number(x - y),
        _ if b.is_number(0.0) => a,
        _ if a.is_number(0.0) => simplify_negation(b),
        _ if a == b => Expr::Number(0.0),
        (_, Expr::UnaryMinus { operand }) => a.clone() + Expr::clone(operand),
        _ => a - b,
    }
}

fn simplify_times(a: Expr, b: Expr) -> Expr {
    match (&a, &b) {
        (Expr::Number(x), Expr::Number(y)) => Expr::Number(x * y),
        _ if a.is_number(0.0) || b.is_number(0.0) => Expr::Number(0.0),
        _ if a.is_number(1.0) => b,
        _ if b.is_number(1.0) => a,
        (Expr::UnaryMinus { operand: x }, Expr::UnaryMinus { operand: y }) => {
            Expr::clone(x) * Expr::clone(y)
        }
        _ => a * b,
    }
}

fn simplify_divide(a: Expr, b: Expr) -> EvalResult<Expr> {
    if b.is_number(0.0) {
        return Err(EvalError::DivisionByZero);
    }
    Ok(match (&a, &b) {
        (Expr::Number(x), Expr::Number(y)) => Expr::Number(x / y),
        _ if a.is_number(0.0) => Expr::Number(0.0),
        _ if b.is_number(1.0) => a,
        _ => a / b,
    })
}

fn simplify_power(base: Expr, exponent: Expr) -> Expr {
    match (&base, &exponent) {
        (Expr::Number(x), Expr::Number(y)) if x.powf(*y).is_finite() => Expr::Number(x.powf(*y)),
        _ if exponent.is_number(1.0) => base,
        _ if exponent.is_number(0.0) => Expr::Number(1.0),
        (_, Expr::Number(y)) if base.is_number(0.0) && *y != 0.0 => Expr::Number(0.0),
        _ if base.is_number(1.0) => Expr::Number(1.0),
        _ => base.pow(exponent),
    }
}

fn simplify_application(function: &Arc<MathFunction>, args: Vec<Expr>) -> Expr {
    let MathFunction::Default(f) = function.as_ref() else {
        return Expr::Apply {
            function: Arc::clone(function),
            args,
        };
    };
    let rebuild = |args: Vec<Expr>| Expr::Apply {
        function: Arc::clone(function),
        args,
    };
    let [arg] = args.as_slice() else {
        return rebuild(args);
    };
    // an invalid base or degree is left in place for evaluation to reject
    if let (Some(n), Ok(())) = (arg.as_number(), f.validate()) {
        let folded = f.apply_real(n);
        if folded.is_finite() {
            return Expr::Number(folded);
        }
    }

    match f {
        DefaultFunction::Exp => {
            if let Some(a) = ln_argument(arg) {
                return a.clone();
            }
            // e^(b·ln a) → a^b
            if let Expr::Times { a: lhs, b: rhs } = arg {
                if let Some(a) = ln_argument(rhs) {
                    return a.clone().pow(Expr::clone(lhs));
                }
                if let Some(a) = ln_argument(lhs) {
                    return a.clone().pow(Expr::clone(rhs));
                }
            }
            rebuild(args)
        }
        DefaultFunction::Ln => {
            if let Some(a) = default_argument(arg, DefaultFunction::Exp) {
                return a.clone();
            }
            rebuild(args)
        }
        _ => rebuild(args),
    }
}

fn ln_argument(e: &Expr) -> Option<&Expr> {
    default_argument(e, DefaultFunction::Ln)
}

fn default_argument(e: &Expr, which: DefaultFunction) -> Option<&Expr> {
    match e {
        Expr::Apply { function, args } if **function == MathFunction::Default(which) => {
            match args.as_slice() {
                [arg] => Some(arg),
                _ => None,
            }
        }
        _ => None,
    }
}
