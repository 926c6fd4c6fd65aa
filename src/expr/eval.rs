//! Expression evaluation under REAL, VECTOR and INTERVAL semantics
//!
//! The evaluation mode decides which literals are legal and which operator
//! semantics apply. Combinations that are not supported fail with
//! [`EvalError::Unimplemented`] instead of producing a silently wrong value.

use super::{Expr, MathFunction};
use crate::context::ContextModel;
use crate::error::{EvalError, EvalResult};
use crate::interval::Interval;
use glam::{DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationType {
    /// Plain real arithmetic
    Real,
    /// Fixed-arity vectors, elements evaluated as reals
    Vector,
    /// Conservative interval enclosures
    Interval,
}

impl fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvaluationType::Real => "REAL",
            EvaluationType::Vector => "VECTOR",
            EvaluationType::Interval => "INTERVAL",
        };
        f.write_str(name)
    }
}

/// Fixed-arity vector value (1 to 4 components)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vector {
    /// One component
    Scalar(f64),
    /// Two components
    Vec2(DVec2),
    /// Three components
    Vec3(DVec3),
    /// Four components
    Vec4(DVec4),
}

impl Vector {
    /// Build from components; arity must be 1..=4
    pub fn from_slice(components: &[f64]) -> EvalResult<Self> {
        match *components {
            [x] => Ok(Vector::Scalar(x)),
            [x, y] => Ok(Vector::Vec2(DVec2::new(x, y))),
            [x, y, z] => Ok(Vector::Vec3(DVec3::new(x, y, z))),
            [x, y, z, w] => Ok(Vector::Vec4(DVec4::new(x, y, z, w))),
            _ => Err(EvalError::unimplemented(
                format!("vector of arity {}", components.len()),
                EvaluationType::Vector,
            )),
        }
    }

    /// Number of components
    pub fn arity(&self) -> usize {
        match self {
            Vector::Scalar(_) => 1,
            Vector::Vec2(_) => 2,
            Vector::Vec3(_) => 3,
            Vector::Vec4(_) => 4,
        }
    }

    /// Components as a plain list
    pub fn components(&self) -> Vec<f64> {
        match self {
            Vector::Scalar(x) => vec![*x],
            Vector::Vec2(v) => v.to_array().to_vec(),
            Vector::Vec3(v) => v.to_array().to_vec(),
            Vector::Vec4(v) => v.to_array().to_vec(),
        }
    }

    /// The 3D value, if this is a 3-vector
    pub fn as_dvec3(&self) -> Option<DVec3> {
        match self {
            Vector::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Vector::Scalar(x) => Vector::Scalar(f(x)),
            Vector::Vec2(v) => Vector::Vec2(DVec2::new(f(v.x), f(v.y))),
            Vector::Vec3(v) => Vector::Vec3(DVec3::new(f(v.x), f(v.y), f(v.z))),
            Vector::Vec4(v) => Vector::Vec4(DVec4::new(f(v.x), f(v.y), f(v.z), f(v.w))),
        }
    }

    fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> EvalResult<Self> {
        if self.arity() != other.arity() {
            return Err(EvalError::DimensionMismatch {
                left: self.arity(),
                right: other.arity(),
            });
        }
        let zipped: Vec<f64> = self
            .components()
            .into_iter()
            .zip(other.components())
            .map(|(a, b)| f(a, b))
            .collect();
        Vector::from_slice(&zipped)
    }

    fn scalar(&self) -> Option<f64> {
        match self {
            Vector::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    /// Component-wise product, or scaling when one side has arity 1
    fn times(self, other: Self) -> EvalResult<Self> {
        match (self.scalar(), other.scalar()) {
            (Some(s), None) => Ok(other.map(|c| s * c)),
            (None, Some(s)) => Ok(self.map(|c| c * s)),
            _ => self.zip(other, |a, b| a * b),
        }
    }

    fn divide(self, other: Self) -> EvalResult<Self> {
        if other.components().iter().any(|c| *c == 0.0) {
            return Err(EvalError::DivisionByZero);
        }
        match other.scalar() {
            Some(s) if self.arity() != 1 => Ok(self.map(|c| c / s)),
            _ => self.zip(other, |a, b| a / b),
        }
    }
}

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// REAL result
    Real(f64),
    /// VECTOR result
    Vector(Vector),
    /// INTERVAL result
    Interval(Interval),
}

impl Value {
    /// Short name of the value's kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Real(_) => "real",
            Value::Vector(_) => "vector",
            Value::Interval(_) => "interval",
        }
    }

    /// Unwrap a real value
    pub fn as_real(&self) -> EvalResult<f64> {
        match self {
            Value::Real(x) => Ok(*x),
            other => Err(EvalError::TypeMismatch {
                expected: "real",
                found: other.kind(),
            }),
        }
    }

    /// Unwrap a vector value
    pub fn as_vector(&self) -> EvalResult<Vector> {
        match self {
            Value::Vector(v) => Ok(*v),
            other => Err(EvalError::TypeMismatch {
                expected: "vector",
                found: other.kind(),
            }),
        }
    }

    /// Unwrap an interval value
    pub fn as_interval(&self) -> EvalResult<Interval> {
        match self {
            Value::Interval(i) => Ok(*i),
            other => Err(EvalError::TypeMismatch {
                expected: "interval",
                found: other.kind(),
            }),
        }
    }

    /// Literal expression that evaluates back to this value in its own mode
    pub fn to_expr(&self) -> Expr {
        match self {
            Value::Real(x) => Expr::Number(*x),
            Value::Vector(v) => Expr::Vector(v.components().into_iter().map(Expr::Number).collect()),
            Value::Interval(i) => Expr::interval_of(i.min, i.max),
        }
    }
}

#[derive(Clone, Copy)]
enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
}

impl BinaryOp {
    fn real(self, a: f64, b: f64) -> EvalResult<f64> {
        match self {
            BinaryOp::Plus => Ok(a + b),
            BinaryOp::Minus => Ok(a - b),
            BinaryOp::Times => Ok(a * b),
            BinaryOp::Divide => {
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }
        }
    }

    fn interval(self, a: Interval, b: Interval) -> EvalResult<Interval> {
        match self {
            BinaryOp::Plus => Ok(a + b),
            BinaryOp::Minus => Ok(a - b),
            BinaryOp::Times => Ok(a * b),
            BinaryOp::Divide => a.checked_div(b),
        }
    }

    fn vector(self, a: Vector, b: Vector) -> EvalResult<Vector> {
        match self {
            BinaryOp::Plus => a.zip(b, |x, y| x + y),
            BinaryOp::Minus => a.zip(b, |x, y| x - y),
            BinaryOp::Times => a.times(b),
            BinaryOp::Divide => a.divide(b),
        }
    }

    fn apply(self, a: Value, b: Value) -> EvalResult<Value> {
        match (a, b) {
            (Value::Real(x), Value::Real(y)) => self.real(x, y).map(Value::Real),
            (Value::Interval(x), Value::Interval(y)) => self.interval(x, y).map(Value::Interval),
            (Value::Vector(x), Value::Vector(y)) => self.vector(x, y).map(Value::Vector),
            (a, b) => Err(EvalError::TypeMismatch {
                expected: a.kind(),
                found: b.kind(),
            }),
        }
    }
}

impl Expr {
    /// Evaluate the tree under `mode`, resolving variables through `ctx`.
    ///
    /// The context is borrowed mutably only for scoped rebinding during
    /// function calls; it is left unchanged when this returns.
    pub fn evaluate(&self, mode: EvaluationType, ctx: &mut ContextModel) -> EvalResult<Value> {
        match self {
            Expr::Number(v) => match mode {
                EvaluationType::Real => Ok(Value::Real(*v)),
                EvaluationType::Interval => Ok(Value::Interval(Interval::point(*v))),
                EvaluationType::Vector => Err(EvalError::unimplemented("number literal", mode)),
            },

            Expr::Variable(name) => ctx.resolve(name, |bound, ctx| bound.evaluate(mode, ctx)),

            Expr::Vector(elements) => {
                if mode != EvaluationType::Vector {
                    return Err(EvalError::unimplemented("vector literal", mode));
                }
                let components = elements
                    .iter()
                    .map(|e| e.evaluate_real(ctx))
                    .collect::<EvalResult<Vec<f64>>>()?;
                Vector::from_slice(&components).map(Value::Vector)
            }

            Expr::Interval { min, max } => {
                if mode != EvaluationType::Interval {
                    return Err(EvalError::unimplemented("interval literal", mode));
                }
                let lo = min.evaluate_real(ctx)?;
                let hi = max.evaluate_real(ctx)?;
                Interval::try_new(lo, hi).map(Value::Interval)
            }

            Expr::UnaryMinus { operand } => match operand.evaluate(mode, ctx)? {
                Value::Real(x) => Ok(Value::Real(-x)),
                Value::Interval(i) => Ok(Value::Interval(-i)),
                Value::Vector(v) => Ok(Value::Vector(v.map(|c| -c))),
            },

            Expr::Plus { a, b } => Self::binary(BinaryOp::Plus, a, b, mode, ctx),
            Expr::Minus { a, b } => Self::binary(BinaryOp::Minus, a, b, mode, ctx),
            Expr::Times { a, b } => Self::binary(BinaryOp::Times, a, b, mode, ctx),
            Expr::Divide { a, b } => Self::binary(BinaryOp::Divide, a, b, mode, ctx),

            Expr::Power { base, exponent } => {
                if mode != EvaluationType::Real {
                    return Err(EvalError::unimplemented("power", mode));
                }
                let b = base.evaluate_real(ctx)?;
                let e = exponent.evaluate_real(ctx)?;
                Ok(Value::Real(b.powf(e)))
            }

            Expr::Apply { function, args } => match function.as_ref() {
                MathFunction::Default(f) => {
                    f.validate()?;
                    if mode != EvaluationType::Real {
                        return Err(EvalError::unimplemented(f.name(), mode));
                    }
                    let [arg] = args.as_slice() else {
                        return Err(EvalError::DimensionMismatch {
                            left: args.len(),
                            right: 1,
                        });
                    };
                    let x = arg.evaluate_real(ctx)?;
                    Ok(Value::Real(f.apply_real(x)))
                }
                MathFunction::Custom(f) => {
                    if args.len() != f.params.len() {
                        return Err(EvalError::DimensionMismatch {
                            left: args.len(),
                            right: f.params.len(),
                        });
                    }
                    // Arguments are evaluated in the caller's scope before the
                    // parameters are bound, so a parameter never captures an
                    // argument that mentions the same name.
                    let bindings = f
                        .params
                        .iter()
                        .zip(args)
                        .map(|(p, arg)| Ok((p.clone(), arg.evaluate(mode, ctx)?.to_expr())))
                        .collect::<EvalResult<Vec<(String, Expr)>>>()?;
                    ctx.with_bindings(bindings, |ctx| f.body.evaluate(mode, ctx))
                }
                MathFunction::Composite(_) => function.expand(args)?.evaluate(mode, ctx),
            },
        }
    }

    fn binary(
        op: BinaryOp,
        a: &Expr,
        b: &Expr,
        mode: EvaluationType,
        ctx: &mut ContextModel,
    ) -> EvalResult<Value> {
        let lhs = a.evaluate(mode, ctx)?;
        let rhs = b.evaluate(mode, ctx)?;
        op.apply(lhs, rhs)
    }

    /// Evaluate under REAL and unwrap
    pub fn evaluate_real(&self, ctx: &mut ContextModel) -> EvalResult<f64> {
        self.evaluate(EvaluationType::Real, ctx)?.as_real()
    }

    /// Evaluate under INTERVAL and unwrap
    pub fn evaluate_interval(&self, ctx: &mut ContextModel) -> EvalResult<Interval> {
        self.evaluate(EvaluationType::Interval, ctx)?.as_interval()
    }

    /// Evaluate under VECTOR and unwrap
    pub fn evaluate_vector(&self, ctx: &mut ContextModel) -> EvalResult<Vector> {
        self.evaluate(EvaluationType::Vector, ctx)?.as_vector()
    }
}
