//! Root finding along rays
//!
//! Implicit surfaces are intersected by reducing `f(x, y, z)` along the ray
//! to a function of the ray parameter and searching it with interval
//! bisection.

mod bisect;
mod config;

pub use bisect::{BisectionStats, RootFinder};
pub use config::{TraceConfig, DEFAULT_EPSILON};

/// Name of the ray parameter bound during root finding
pub const RAY_PARAMETER: &str = "t";
