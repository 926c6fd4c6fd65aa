//! Exact symbolic differentiation
//!
//! Produces an unsimplified derivative tree; run [`Expr::simplify`] on the
//! result to collapse the zeros and ones the rules introduce.
//!
//! - Sum, product and quotient rules for the arithmetic operators
//! - Power rule for constant exponents, `a^b = e^(b·ln a)` otherwise
//! - Chain rule through every function application

use super::{CustomFunction, Expr, MathFunction};
use crate::error::{EvalError, EvalResult};
use std::sync::Arc;

impl Expr {
    /// Derivative with respect to `var`.
    ///
    /// Sub-trees that do not mention `var` differentiate straight to
    /// `Number(0)`.
    pub fn derive(&self, var: &str) -> EvalResult<Expr> {
        if !self.depends_on(var) {
            return Ok(Expr::Number(0.0));
        }

        let derived = match self {
            Expr::Number(_) => Expr::Number(0.0),

            Expr::Variable(name) => Expr::Number(if name == var { 1.0 } else { 0.0 }),

            Expr::Vector(elements) => Expr::Vector(
                elements
                    .iter()
                    .map(|e| e.derive(var))
                    .collect::<EvalResult<Vec<Expr>>>()?,
            ),

            Expr::Interval { min, max } => Expr::interval(min.derive(var)?, max.derive(var)?),

            Expr::UnaryMinus { operand } => -operand.derive(var)?,

            Expr::Plus { a, b } => a.derive(var)? + b.derive(var)?,

            Expr::Minus { a, b } => a.derive(var)? - b.derive(var)?,

            // (ab)' = a'b + ab'
            Expr::Times { a, b } => {
                let da = a.derive(var)?;
                let db = b.derive(var)?;
                da * share(b) + share(a) * db
            }

            // (a/b)' = (a'b - ab') / b²
            Expr::Divide { a, b } => {
                let da = a.derive(var)?;
                let db = b.derive(var)?;
                (da * share(b) - share(a) * db) / share(b).pow(Expr::Number(2.0))
            }

            Expr::Power { base, exponent } => {
                if exponent.depends_on(var) {
                    // a^b = e^(b·ln a)  =>  (a^b)' = e^(b·ln a) · (b'·ln a + b·a'/a)
                    let rewritten = Expr::exp(share(exponent) * Expr::ln(share(base)));
                    let inner = exponent.derive(var)? * Expr::ln(share(base))
                        + share(exponent) * (base.derive(var)? / share(base));
                    rewritten * inner
                } else {
                    // (a^c)' = c · a^(c-1) · a'
                    share(exponent)
                        * share(base).pow(share(exponent) - Expr::Number(1.0))
                        * base.derive(var)?
                }
            }

            Expr::Apply { function, args } => derive_application(function, args, var)?,
        };
        Ok(derived)
    }
}

#[inline]
fn share(e: &Arc<Expr>) -> Expr {
    Expr::clone(e)
}

/// Chain rule for `f(args)`
fn derive_application(function: &MathFunction, args: &[Expr], var: &str) -> EvalResult<Expr> {
    match function {
        MathFunction::Default(f) => {
            f.validate()?;
            let [u] = args else {
                return Err(EvalError::DimensionMismatch {
                    left: args.len(),
                    right: 1,
                });
            };
            Ok(f.derivative_at(u) * u.derive(var)?)
        }

        MathFunction::Composite(_) => function.expand(args)?.derive(var),

        MathFunction::Custom(f) => {
            let mut terms = Vec::new();

            // Σ ∂f/∂p_i(args) · args_i'
            for (param, arg) in f.params.iter().zip(args) {
                if !arg.depends_on(var) {
                    continue;
                }
                let partial = with_body(f, f.body.derive(param)?, args);
                terms.push(partial * arg.derive(var)?);
            }

            // Free occurrences of `var` inside the body, parameters held fixed
            if !f.params.iter().any(|p| p == var) && f.body.depends_on(var) {
                terms.push(with_body(f, f.body.derive(var)?, args));
            }

            Ok(terms
                .into_iter()
                .reduce(|acc, t| acc + t)
                .unwrap_or(Expr::Number(0.0)))
        }
    }
}

/// `f` with its body replaced, applied to the same arguments
fn with_body(f: &CustomFunction, body: Expr, args: &[Expr]) -> Expr {
    Expr::Apply {
        function: Arc::new(MathFunction::Custom(CustomFunction {
            name: f.name.clone(),
            params: f.params.clone(),
            body,
        })),
        args: args.to_vec(),
    }
}
