//! Constructor methods for Expr

use super::{DefaultFunction, Expr, MathFunction};
use crate::error::{EvalError, EvalResult};
use std::sync::Arc;

impl Expr {
    /// Real constant. Unlike the `From`/`TryFrom` coercions this accepts any
    /// value, negative ones included.
    #[must_use]
    #[inline]
    pub fn number(value: f64) -> Self {
        Expr::Number(value)
    }

    /// Coerce a bare numeric literal.
    ///
    /// Negative literals are rejected: write them as `-Expr::literal(x)?`.
    pub fn literal(value: f64) -> EvalResult<Self> {
        if value.is_nan() || value < 0.0 {
            return Err(EvalError::invalid(format!(
                "numeric literal {} must be non-negative; use unary minus",
                value
            )));
        }
        Ok(Expr::Number(value))
    }

    /// Named variable
    #[must_use]
    #[inline]
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    /// Vector literal
    #[must_use]
    #[inline]
    pub fn vector(elements: Vec<Expr>) -> Self {
        Expr::Vector(elements)
    }

    /// Interval literal [min, max]
    #[must_use]
    #[inline]
    pub fn interval(min: impl Into<Expr>, max: impl Into<Expr>) -> Self {
        Expr::Interval {
            min: Arc::new(min.into()),
            max: Arc::new(max.into()),
        }
    }

    /// Interval literal with numeric bounds
    #[must_use]
    #[inline]
    pub fn interval_of(min: f64, max: f64) -> Self {
        Expr::interval(Expr::Number(min), Expr::Number(max))
    }

    /// Raise to a power
    #[must_use]
    #[inline]
    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Expr::Power {
            base: Arc::new(self),
            exponent: Arc::new(exponent.into()),
        }
    }

    /// `e^arg`
    #[must_use]
    #[inline]
    pub fn exp(arg: impl Into<Expr>) -> Self {
        Expr::apply_default(DefaultFunction::Exp, arg.into())
    }

    /// Natural logarithm
    #[must_use]
    #[inline]
    pub fn ln(arg: impl Into<Expr>) -> Self {
        Expr::apply_default(DefaultFunction::Ln, arg.into())
    }

    /// Logarithm to a fixed base
    #[must_use]
    #[inline]
    pub fn log(base: f64, arg: impl Into<Expr>) -> Self {
        Expr::apply_default(DefaultFunction::Log(base), arg.into())
    }

    /// Square root
    #[must_use]
    #[inline]
    pub fn sqrt(arg: impl Into<Expr>) -> Self {
        Expr::apply_default(DefaultFunction::Sqrt, arg.into())
    }

    /// `degree`-th root
    #[must_use]
    #[inline]
    pub fn root(degree: f64, arg: impl Into<Expr>) -> Self {
        Expr::apply_default(DefaultFunction::Root(degree), arg.into())
    }

    #[inline]
    pub(crate) fn apply_default(function: DefaultFunction, arg: Expr) -> Self {
        Expr::Apply {
            function: Arc::new(MathFunction::Default(function)),
            args: vec![arg],
        }
    }
}
