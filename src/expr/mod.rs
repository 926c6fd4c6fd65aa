//! Symbolic expression trees
//!
//! [`Expr`] is an immutable, structurally recursive value. Children are held
//! in `Arc` so sub-trees are shared rather than copied; `derive`, `simplify`
//! and `evaluate` always build new trees and never touch the receiver.
//!
//! - **Evaluation**: [`Expr::evaluate`] under one of three [`EvaluationType`]s
//! - **Differentiation**: [`Expr::derive`] (exact, symbolic)
//! - **Simplification**: [`Expr::simplify`] (single local pass)
//! - **Functions**: [`MathFunction`] applications via [`Expr::Apply`]

mod constructors;
mod derive;
mod display;
mod eval;
mod function;
mod operators;
mod simplify;

pub use eval::{EvaluationType, Value, Vector};
pub use function::{CompositeFunction, CustomFunction, DefaultFunction, MathFunction};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Expression tree node
///
/// Each variant is one of:
/// - a literal (number, vector, interval)
/// - a variable resolved through the evaluation context
/// - an arithmetic operator over child expressions
/// - an application of a [`MathFunction`] to argument expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Real constant
    Number(f64),

    /// Named variable, looked up in the context at evaluation time
    Variable(String),

    /// Fixed-arity vector literal (1 to 4 elements)
    Vector(Vec<Expr>),

    /// Interval literal whose bounds are themselves expressions
    Interval {
        /// Lower bound expression
        min: Arc<Expr>,
        /// Upper bound expression
        max: Arc<Expr>,
    },

    /// Negation
    UnaryMinus {
        /// Negated operand
        operand: Arc<Expr>,
    },

    /// Sum `a + b`
    Plus {
        /// Left operand
        a: Arc<Expr>,
        /// Right operand
        b: Arc<Expr>,
    },

    /// Difference `a - b`
    Minus {
        /// Left operand
        a: Arc<Expr>,
        /// Right operand
        b: Arc<Expr>,
    },

    /// Product `a * b`
    Times {
        /// Left operand
        a: Arc<Expr>,
        /// Right operand
        b: Arc<Expr>,
    },

    /// Quotient `a / b`
    Divide {
        /// Numerator
        a: Arc<Expr>,
        /// Denominator
        b: Arc<Expr>,
    },

    /// Exponentiation `base ^ exponent`
    Power {
        /// Base
        base: Arc<Expr>,
        /// Exponent
        exponent: Arc<Expr>,
    },

    /// Function application. The arguments are the anonymous bound
    /// sub-expressions the function is evaluated on.
    Apply {
        /// Applied function
        function: Arc<MathFunction>,
        /// Positional arguments, one per function parameter
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Whether this node is the literal `v`
    #[inline]
    pub fn is_number(&self, v: f64) -> bool {
        matches!(self, Expr::Number(n) if *n == v)
    }

    /// The literal value, if this node is a number
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True when the tree references no variable at all
    pub fn is_constant(&self) -> bool {
        self.variables().is_empty()
    }

    /// True when `var` occurs free somewhere in the tree
    pub fn depends_on(&self, var: &str) -> bool {
        self.variables().contains(var)
    }

    /// All free variable names in the tree
    pub fn variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    pub(crate) fn collect_variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => {
                out.insert(name.clone());
            }
            Expr::Vector(elements) => {
                for e in elements {
                    e.collect_variables(out);
                }
            }
            Expr::Interval { min, max } => {
                min.collect_variables(out);
                max.collect_variables(out);
            }
            Expr::UnaryMinus { operand } => operand.collect_variables(out),
            Expr::Plus { a, b }
            | Expr::Minus { a, b }
            | Expr::Times { a, b }
            | Expr::Divide { a, b } => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
            Expr::Power { base, exponent } => {
                base.collect_variables(out);
                exponent.collect_variables(out);
            }
            Expr::Apply { function, args } => {
                function.collect_free_variables(out);
                for arg in args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    /// Count nodes in the tree
    pub fn node_count(&self) -> u32 {
        match self {
            Expr::Number(_) | Expr::Variable(_) => 1,
            Expr::Vector(elements) => 1 + elements.iter().map(Expr::node_count).sum::<u32>(),
            Expr::Interval { min, max } => 1 + min.node_count() + max.node_count(),
            Expr::UnaryMinus { operand } => 1 + operand.node_count(),
            Expr::Plus { a, b }
            | Expr::Minus { a, b }
            | Expr::Times { a, b }
            | Expr::Divide { a, b } => 1 + a.node_count() + b.node_count(),
            Expr::Power { base, exponent } => 1 + base.node_count() + exponent.node_count(),
            Expr::Apply { args, .. } => 1 + args.iter().map(Expr::node_count).sum::<u32>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_and_dependency() {
        let e = Expr::var("x") * 2u32 + Expr::var("y");
        assert!(!e.is_constant());
        assert!(e.depends_on("x"));
        assert!(e.depends_on("y"));
        assert!(!e.depends_on("z"));
        assert!(Expr::number(3.0).is_constant());
        assert!((Expr::number(3.0) + 4u32).is_constant());
    }

    #[test]
    fn test_free_variables_through_functions() {
        let f = MathFunction::custom("f", &["u"], Expr::var("u") * Expr::var("k")).unwrap();
        let e = f.apply(vec![Expr::var("x")]).unwrap();
        let vars = e.variables();
        assert!(vars.contains("x"));
        assert!(vars.contains("k"));
        assert!(!vars.contains("u"));
    }

    #[test]
    fn test_node_count() {
        let e = (Expr::var("x") + 1u32) * Expr::var("y");
        assert_eq!(e.node_count(), 5);
    }
}
