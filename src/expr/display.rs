//! Infix rendering with minimal parentheses

use super::Expr;
use std::fmt;

/// Binding strength, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Sum,
    Product,
    Prefix,
    Power,
    Atom,
}

impl Expr {
    fn precedence(&self) -> Precedence {
        match self {
            Expr::Plus { .. } | Expr::Minus { .. } => Precedence::Sum,
            Expr::Times { .. } | Expr::Divide { .. } => Precedence::Product,
            Expr::UnaryMinus { .. } => Precedence::Prefix,
            Expr::Number(n) if *n < 0.0 => Precedence::Prefix,
            Expr::Power { .. } => Precedence::Power,
            _ => Precedence::Atom,
        }
    }

    /// Write `self`, parenthesized if it binds looser than `min`
    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, min: Precedence) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            self.fmt_bare(f)?;
            write!(f, ")")
        } else {
            self.fmt_bare(f)
        }
    }

    fn fmt_bare(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Vector(elements) => {
                write!(f, "(")?;
                write_list(f, elements)?;
                write!(f, ")")
            }
            Expr::Interval { min, max } => write!(f, "[{}, {}]", min, max),
            Expr::UnaryMinus { operand } => {
                write!(f, "-")?;
                operand.fmt_at(f, Precedence::Power)
            }
            // Left-associative: the right operand needs parens at equal precedence
            Expr::Plus { a, b } => {
                a.fmt_at(f, Precedence::Sum)?;
                write!(f, " + ")?;
                b.fmt_at(f, Precedence::Product)
            }
            Expr::Minus { a, b } => {
                a.fmt_at(f, Precedence::Sum)?;
                write!(f, " - ")?;
                b.fmt_at(f, Precedence::Product)
            }
            Expr::Times { a, b } => {
                a.fmt_at(f, Precedence::Product)?;
                write!(f, " * ")?;
                b.fmt_at(f, Precedence::Prefix)
            }
            Expr::Divide { a, b } => {
                a.fmt_at(f, Precedence::Product)?;
                write!(f, " / ")?;
                b.fmt_at(f, Precedence::Power)
            }
            // Right-associative
            Expr::Power { base, exponent } => {
                base.fmt_at(f, Precedence::Atom)?;
                write!(f, "^")?;
                exponent.fmt_at(f, Precedence::Power)
            }
            Expr::Apply { function, args } => {
                write!(f, "{}(", function.name())?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_bare(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_precedence_parentheses() {
        let e = (x() + 1u32) * "y";
        assert_eq!(e.to_string(), "(x + 1) * y");
        let e = x() + Expr::var("y") * 2u32;
        assert_eq!(e.to_string(), "x + y * 2");
        let e = x() - (Expr::var("y") - 1u32);
        assert_eq!(e.to_string(), "x - (y - 1)");
        let e = x() / (Expr::var("y") * 2u32);
        assert_eq!(e.to_string(), "x / (y * 2)");
    }

    #[test]
    fn test_power_and_negation() {
        assert_eq!(x().pow(2u32).to_string(), "x^2");
        assert_eq!((x() + 1u32).pow(2u32).to_string(), "(x + 1)^2");
        assert_eq!((-x()).pow(2u32).to_string(), "(-x)^2");
        assert_eq!((-x().pow(2u32)).to_string(), "-x^2");
        assert_eq!((x() * Expr::number(-3.0)).to_string(), "x * -3");
        assert_eq!(Expr::number(-3.0).pow(2u32).to_string(), "(-3)^2");
    }

    #[test]
    fn test_applications_and_literals() {
        assert_eq!(Expr::sqrt(x() + 1u32).to_string(), "sqrt(x + 1)");
        assert_eq!(Expr::interval_of(0.0, 2.5).to_string(), "[0, 2.5]");
        let v = Expr::vector(vec![x(), Expr::number(1.0)]);
        assert_eq!(v.to_string(), "(x, 1)");
    }
}
