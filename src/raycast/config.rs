//! Tracing configuration

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};

/// Self-intersection guard used when no config is supplied
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Numeric knobs of ray/surface intersection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Far plane: roots are searched in `[0, max_distance]`
    pub max_distance: f64,
    /// Bisection stops once an interval is shorter than this
    pub root_tolerance: f64,
    /// Hits closer than this are ignored (surface acne)
    pub epsilon: f64,
    /// Newton steps applied after bisection; 0 disables refinement
    pub newton_steps: u32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        TraceConfig {
            max_distance: 100.0,
            root_tolerance: 1e-3,
            epsilon: DEFAULT_EPSILON,
            newton_steps: 0,
        }
    }
}

impl TraceConfig {
    /// High quality configuration
    pub fn high_quality() -> Self {
        TraceConfig {
            max_distance: 100.0,
            root_tolerance: 1e-5,
            epsilon: DEFAULT_EPSILON,
            newton_steps: 4,
        }
    }

    /// Fast configuration for preview
    pub fn fast() -> Self {
        TraceConfig {
            max_distance: 50.0,
            root_tolerance: 1e-2,
            epsilon: DEFAULT_EPSILON,
            newton_steps: 0,
        }
    }

    /// Check that every knob is a positive real and the tolerance is well
    /// below the far plane.
    pub fn validate(&self) -> EvalResult<()> {
        let knobs = [
            ("max_distance", self.max_distance),
            ("root_tolerance", self.root_tolerance),
            ("epsilon", self.epsilon),
        ];
        for (name, value) in knobs {
            if !(value.is_finite() && value > 0.0) {
                return Err(EvalError::invalid(format!(
                    "{} must be a positive real, got {}",
                    name, value
                )));
            }
        }
        if self.root_tolerance >= self.max_distance {
            return Err(EvalError::invalid(format!(
                "root_tolerance {} must be smaller than max_distance {}",
                self.root_tolerance, self.max_distance
            )));
        }
        Ok(())
    }

    /// Distance the root finder reports when there is no root
    #[inline]
    pub fn no_root(&self) -> f64 {
        self.max_distance + 1.0
    }
}
