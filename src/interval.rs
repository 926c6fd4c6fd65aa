//! Interval arithmetic for enclosing function ranges
//!
//! Every operator returns an interval that contains `x ∘ y` for all `x` in the
//! left operand and `y` in the right one. Results may be wider than the true
//! range (the dependency problem), never narrower.
//!
//! - If the enclosure of `f` over a domain excludes zero, `f` has no root there
//! - Otherwise a root may exist and the domain has to be split further

use crate::error::{EvalError, EvalResult};
use crate::expr::Value;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A closed interval [min, max]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Interval {
    /// Create a new interval
    #[inline(always)]
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "min ({}) > max ({})", min, max);
        Self { min, max }
    }

    /// Create an interval, rejecting inverted or NaN bounds
    pub fn try_new(min: f64, max: f64) -> EvalResult<Self> {
        if min <= max {
            Ok(Self { min, max })
        } else {
            Err(EvalError::invalid(format!(
                "interval bounds out of order: [{}, {}]",
                min, max
            )))
        }
    }

    /// Create a point interval [v, v]
    #[inline(always)]
    pub fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Zero interval
    pub const ZERO: Self = Self { min: 0.0, max: 0.0 };

    /// Width of the interval
    #[inline(always)]
    pub fn length(self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the interval
    #[inline(always)]
    pub fn midpoint(self) -> f64 {
        self.min + 0.5 * (self.max - self.min)
    }

    /// Split at the midpoint into (lower, upper) halves
    #[inline]
    pub fn bisect(self) -> (Self, Self) {
        let mid = self.midpoint();
        (Self::new(self.min, mid), Self::new(mid, self.max))
    }

    /// Whether zero lies in [min, max]
    #[inline(always)]
    pub fn contains_zero(self) -> bool {
        self.min <= 0.0 && self.max >= 0.0
    }

    /// Membership test for a single value
    #[inline(always)]
    pub fn contains(self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Whether `other` lies entirely inside this interval
    #[inline(always)]
    pub fn includes(self, other: Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    /// Greatest lower bound under the pointwise order
    #[inline(always)]
    pub fn glb(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Least upper bound under the pointwise order
    #[inline(always)]
    pub fn lub(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Reciprocal [1/max, 1/min]; fails when zero is enclosed
    #[inline]
    pub fn recip(self) -> EvalResult<Self> {
        if self.contains_zero() {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Self {
            min: 1.0 / self.max,
            max: 1.0 / self.min,
        })
    }

    /// Division; the divisor must not contain zero
    #[inline]
    pub fn checked_div(self, rhs: Self) -> EvalResult<Self> {
        Ok(self * rhs.recip()?)
    }

    /// Pointwise `<`: both bounds strictly below those of `other`
    #[inline(always)]
    pub fn pointwise_lt(self, other: Self) -> bool {
        self.min < other.min && self.max < other.max
    }

    /// Pointwise `<=` on both bounds
    #[inline(always)]
    pub fn pointwise_le(self, other: Self) -> bool {
        self.min <= other.min && self.max <= other.max
    }

    /// Pointwise `>`: both bounds strictly above those of `other`
    #[inline(always)]
    pub fn pointwise_gt(self, other: Self) -> bool {
        self.min > other.min && self.max > other.max
    }

    /// Pointwise `>=` on both bounds
    #[inline(always)]
    pub fn pointwise_ge(self, other: Self) -> bool {
        self.min >= other.min && self.max >= other.max
    }

    /// Position of this interval in the pointwise partial order.
    ///
    /// `Less` means [`Interval::pointwise_le`] holds and the intervals
    /// differ, `Greater` likewise for [`Interval::pointwise_ge`]. Intervals
    /// where one bound is below and the other above are incomparable.
    pub fn pointwise_cmp(self, other: Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.pointwise_le(other) {
            Some(Ordering::Less)
        } else if self.pointwise_ge(other) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    /// Compare against a dynamically typed value.
    ///
    /// Only another interval is comparable; anything else is a
    /// [`EvalError::TypeMismatch`].
    pub fn compare_to(self, other: &Value) -> EvalResult<Option<Ordering>> {
        match other {
            Value::Interval(rhs) => Ok(self.pointwise_cmp(*rhs)),
            other => Err(EvalError::TypeMismatch {
                expected: "interval",
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl Add for Interval {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

impl Sub for Interval {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            min: self.min - rhs.max,
            max: self.max - rhs.min,
        }
    }
}

impl Mul for Interval {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        let a = self.min * rhs.min;
        let b = self.min * rhs.max;
        let c = self.max * rhs.min;
        let d = self.max * rhs.max;
        Self {
            min: a.min(b).min(c).min(d),
            max: a.max(b).max(c).max(d),
        }
    }
}

impl Neg for Interval {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            min: -self.max,
            max: -self.min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_interval(rng: &mut StdRng) -> Interval {
        let a: f64 = rng.gen_range(-10.0..10.0);
        let b: f64 = rng.gen_range(-10.0..10.0);
        Interval::new(a.min(b), a.max(b))
    }

    fn sample(rng: &mut StdRng, i: Interval) -> f64 {
        if i.length() == 0.0 {
            i.min
        } else {
            rng.gen_range(i.min..=i.max)
        }
    }

    #[test]
    fn test_interval_ops() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(-1.0, 3.0);
        assert_eq!(a + b, Interval::new(0.0, 5.0));
        assert_eq!(a - b, Interval::new(-2.0, 3.0));
        assert_eq!(a * b, Interval::new(-2.0, 6.0));
        assert_eq!(-a, Interval::new(-2.0, -1.0));
    }

    #[test]
    fn test_soundness_sampled() {
        let mut rng = StdRng::seed_from_u64(0x1d_2024);
        for _ in 0..500 {
            let a = random_interval(&mut rng);
            let b = random_interval(&mut rng);
            let sum = a + b;
            let diff = a - b;
            let prod = a * b;
            for _ in 0..20 {
                let x = sample(&mut rng, a);
                let y = sample(&mut rng, b);
                assert!(sum.contains(x + y), "{x} + {y} not in {sum}");
                assert!(diff.contains(x - y), "{x} - {y} not in {diff}");
                assert!(prod.contains(x * y), "{x} * {y} not in {prod}");
            }
        }
    }

    #[test]
    fn test_division_guard() {
        let a = Interval::new(1.0, 2.0);
        let straddling = [
            Interval::new(-1.0, 1.0),
            Interval::new(0.0, 1.0),
            Interval::new(-3.0, 0.0),
            Interval::ZERO,
        ];
        for d in straddling {
            assert_eq!(a.checked_div(d), Err(EvalError::DivisionByZero));
        }

        let q = a.checked_div(Interval::new(2.0, 4.0)).unwrap();
        assert_eq!(q, Interval::new(0.25, 1.0));
        let q = a.checked_div(Interval::new(-4.0, -2.0)).unwrap();
        assert_eq!(q, Interval::new(-1.0, -0.25));
    }

    #[test]
    fn test_division_soundness_sampled() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..300 {
            let a = random_interval(&mut rng);
            let lo: f64 = rng.gen_range(0.1..5.0);
            let b = if rng.gen_bool(0.5) {
                Interval::new(lo, lo + rng.gen_range(0.0..5.0))
            } else {
                Interval::new(-lo - rng.gen_range(0.0..5.0), -lo)
            };
            let q = a.checked_div(b).unwrap();
            for _ in 0..20 {
                let x = sample(&mut rng, a);
                let y = sample(&mut rng, b);
                let r = x / y;
                assert!(
                    r >= q.min - 1e-12 && r <= q.max + 1e-12,
                    "{x} / {y} not in {q}"
                );
            }
        }
    }

    #[test]
    fn test_contains_zero() {
        assert!(Interval::new(-1.0, 1.0).contains_zero());
        assert!(Interval::new(0.0, 1.0).contains_zero());
        assert!(Interval::new(-1.0, 0.0).contains_zero());
        assert!(!Interval::new(0.5, 1.0).contains_zero());
        assert!(!Interval::new(-1.0, -0.5).contains_zero());
    }

    #[test]
    fn test_pointwise_ordering() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);
        let wide = Interval::new(-1.0, 5.0);

        assert!(a.pointwise_lt(b) && a.pointwise_le(b));
        assert!(b.pointwise_gt(a) && b.pointwise_ge(a));
        assert!(a.pointwise_le(a) && a.pointwise_ge(a));
        assert!(!a.pointwise_lt(a));
        assert_eq!(a.pointwise_cmp(wide), None);
        assert!(!a.pointwise_le(wide) && !a.pointwise_ge(wide));
    }

    #[test]
    fn test_shared_bound_is_ordered_but_not_strictly() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(0.0, 2.0);

        assert!(a.pointwise_le(b));
        assert!(b.pointwise_ge(a));
        assert!(!a.pointwise_lt(b));
        assert!(!b.pointwise_gt(a));
        assert_eq!(a.pointwise_cmp(b), Some(Ordering::Less));
        assert_eq!(b.pointwise_cmp(a), Some(Ordering::Greater));
        assert_eq!(a.compare_to(&Value::Interval(b)), Ok(Some(Ordering::Less)));
    }

    #[test]
    fn test_compare_to_rejects_non_interval() {
        let a = Interval::new(0.0, 1.0);
        assert_eq!(
            a.compare_to(&Value::Interval(Interval::new(2.0, 3.0))),
            Ok(Some(Ordering::Less))
        );
        assert!(matches!(
            a.compare_to(&Value::Real(0.5)),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_lattice_and_inclusion() {
        let a = Interval::new(0.0, 4.0);
        let b = Interval::new(1.0, 2.0);
        assert_eq!(a.glb(b), Interval::new(0.0, 2.0));
        assert_eq!(a.lub(b), Interval::new(1.0, 4.0));
        assert!(a.includes(b));
        assert!(!b.includes(a));
        assert!(a.contains(4.0));
        assert!(!a.contains(4.5));
        assert_eq!(a.length(), 4.0);
    }

    #[test]
    fn test_bisect_and_try_new() {
        let (lo, hi) = Interval::new(0.0, 1.0).bisect();
        assert_eq!(lo, Interval::new(0.0, 0.5));
        assert_eq!(hi, Interval::new(0.5, 1.0));
        assert!(Interval::try_new(1.0, 0.0).is_err());
        assert!(Interval::try_new(f64::NAN, 0.0).is_err());
    }
}
