//! Branch-and-prune interval bisection
//!
//! Finds the smallest parameter `t` in `[0, max_distance]` where an
//! expression `G(t)` vanishes. Each step binds `t` to the current interval,
//! evaluates `G` under INTERVAL semantics and discards the interval when the
//! enclosure excludes zero. Surviving intervals are halved until they are
//! shorter than the root tolerance; a leaf is itself checked once more, so
//! the reported root lies within one leaf width of a zero of the enclosure.
//!
//! Pruning is exact with respect to the enclosure: an interval whose
//! enclosure excludes zero is never split. Roots closer together than the
//! tolerance, or tangential roots the enclosure cannot resolve, may be
//! reported at the nearest surviving leaf rather than at the true root.

use super::config::TraceConfig;
use crate::context::ContextModel;
use crate::error::EvalResult;
use crate::expr::Expr;
use crate::interval::Interval;
use tracing::{instrument, trace};

/// Counters collected during one root search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BisectionStats {
    /// Interval evaluations of `G`
    pub evaluations: u32,
    /// Intervals discarded because their enclosure excluded zero
    pub pruned: u32,
    /// Intervals that reached the tolerance
    pub leaves: u32,
    /// Deepest recursion level reached (the root interval is depth 0)
    pub max_depth: u32,
}

/// Interval-bisection root finder
#[derive(Debug, Clone, Copy)]
pub struct RootFinder {
    max_distance: f64,
    root_tolerance: f64,
    epsilon: f64,
}

impl RootFinder {
    /// Root finder for a validated configuration
    pub fn new(config: &TraceConfig) -> EvalResult<Self> {
        config.validate()?;
        Ok(RootFinder {
            max_distance: config.max_distance,
            root_tolerance: config.root_tolerance,
            epsilon: config.epsilon,
        })
    }

    /// Distance reported when no root exists; larger than any real root
    #[inline]
    pub fn no_root(&self) -> f64 {
        self.max_distance + 1.0
    }

    /// Nearest root of `g` in parameter `var`, or [`RootFinder::no_root`].
    ///
    /// The root is the lower bound of the first surviving leaf.
    pub fn find_root(
        &self,
        g: &Expr,
        var: &str,
        ctx: &mut ContextModel,
    ) -> EvalResult<(f64, BisectionStats)> {
        let (leaf, stats) = self.find_leaf(g, var, ctx)?;
        let t = leaf.map_or(self.no_root(), |leaf| leaf.min);
        Ok((t, stats))
    }

    /// Nearest leaf interval that may contain a root of `g`.
    ///
    /// Leaves starting within `epsilon` of the origin are skipped so a ray
    /// leaving a surface does not immediately hit it again.
    pub fn find_leaf(
        &self,
        g: &Expr,
        var: &str,
        ctx: &mut ContextModel,
    ) -> EvalResult<(Option<Interval>, BisectionStats)> {
        self.find_leaf_within(g, var, self.max_distance, ctx)
    }

    /// [`RootFinder::find_leaf`] restricted to `[0, far]`.
    ///
    /// `far` is clamped to `max_distance`. Callers that already hold a hit
    /// at distance `far` use this to skip roots that cannot be nearer.
    #[instrument(skip(self, g, ctx))]
    pub fn find_leaf_within(
        &self,
        g: &Expr,
        var: &str,
        far: f64,
        ctx: &mut ContextModel,
    ) -> EvalResult<(Option<Interval>, BisectionStats)> {
        let mut stats = BisectionStats::default();
        let far = far.min(self.max_distance);
        if !(far > self.epsilon) {
            return Ok((None, stats));
        }
        let leaf = self.search(g, var, Interval::new(0.0, far), 0, ctx, &mut stats)?;
        trace!(
            evaluations = stats.evaluations,
            pruned = stats.pruned,
            leaves = stats.leaves,
            max_depth = stats.max_depth,
            found = leaf.is_some(),
            "bisection finished"
        );
        Ok((leaf, stats))
    }

    fn search(
        &self,
        g: &Expr,
        var: &str,
        interval: Interval,
        depth: u32,
        ctx: &mut ContextModel,
        stats: &mut BisectionStats,
    ) -> EvalResult<Option<Interval>> {
        stats.max_depth = stats.max_depth.max(depth);

        stats.evaluations += 1;
        let bound = Expr::interval_of(interval.min, interval.max);
        let enclosure = ctx.with_binding(var, bound, |ctx| g.evaluate_interval(ctx))?;
        if !enclosure.contains_zero() {
            stats.pruned += 1;
            return Ok(None);
        }

        if interval.length() < self.root_tolerance {
            stats.leaves += 1;
            return Ok((interval.min > self.epsilon).then_some(interval));
        }

        // Every root in the lower half is nearer than any root in the upper
        // half, so the upper half is only searched when the lower one is empty.
        let (lower, upper) = interval.bisect();
        if let Some(leaf) = self.search(g, var, lower, depth + 1, ctx, stats)? {
            return Ok(Some(leaf));
        }
        self.search(g, var, upper, depth + 1, ctx, stats)
    }
}
