//! Ray-intersectable primitives
//!
//! Every primitive follows one contract: `intersect(ray, best)` reports the
//! nearest hit in front of the ray origin, or [`Intersection::NO_HIT`], and
//! `shader(hit)` builds the per-hit shader for an intersection it produced.
//!
//! - **Closed form**: [`Sphere`], [`InfinitePlane`], [`CoordinateSystem`]
//! - **Implicit**: [`ImplicitFunction`], any scalar field `f(x, y, z) = 0`
//! - **Aggregate**: [`Scene`], closest hit over its children

mod axes;
mod implicit;
mod plane;
mod scene;
mod sphere;

pub use axes::{AxisRod, CoordinateSystem};
pub use implicit::ImplicitFunction;
pub use plane::InfinitePlane;
pub use scene::{Scene, TraceHit};
pub use sphere::{Sphere, SphereMethod};

use crate::error::{EvalError, EvalResult};
use crate::id::PrimitiveId;
use crate::shader::Shader;
use crate::types::{Intersection, Ray};
use glam::DVec3;
use std::fmt;

/// Uniform intersection contract shared by all scene members
pub trait Primitive: fmt::Debug + Send + Sync {
    /// Id issued at construction
    fn id(&self) -> PrimitiveId;

    /// Nearest intersection in front of the ray origin.
    ///
    /// `best` is the closest distance found so far by the caller; a
    /// primitive may use it to stop early but must not report a different
    /// hit because of it.
    fn intersect(&self, ray: &Ray, best: f64) -> EvalResult<Intersection<'_>>;

    /// Shader for a hit this primitive produced
    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader>;
}

/// Hit point of an intersection that is supposed to be a hit
pub(crate) fn hit_point(hit: &Intersection<'_>) -> EvalResult<DVec3> {
    hit.point
        .ok_or_else(|| EvalError::invalid("shader requested for an intersection that missed"))
}
