//! Operator overloads and literal coercions for Expr
//!
//! Bare names coerce to variables and unsigned integers to numbers, so trees
//! read like formulas: `Expr::var("x") * 2u32 + "y"`. There is no coercion
//! from a negative literal; use unary minus.

use super::Expr;
use crate::error::EvalError;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::Variable(name.to_string())
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::Variable(name)
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Expr::Number(f64::from(value))
    }
}

impl TryFrom<f64> for Expr {
    type Error = EvalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Expr::literal(value)
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;
    #[inline]
    fn add(self, rhs: R) -> Expr {
        Expr::Plus {
            a: Arc::new(self),
            b: Arc::new(rhs.into()),
        }
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;
    #[inline]
    fn sub(self, rhs: R) -> Expr {
        Expr::Minus {
            a: Arc::new(self),
            b: Arc::new(rhs.into()),
        }
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;
    #[inline]
    fn mul(self, rhs: R) -> Expr {
        Expr::Times {
            a: Arc::new(self),
            b: Arc::new(rhs.into()),
        }
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;
    #[inline]
    fn div(self, rhs: R) -> Expr {
        Expr::Divide {
            a: Arc::new(self),
            b: Arc::new(rhs.into()),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;
    #[inline]
    fn neg(self) -> Expr {
        Expr::UnaryMinus {
            operand: Arc::new(self),
        }
    }
}
