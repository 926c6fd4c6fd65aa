//! # implicit-trace
//!
//! Ray tracing of implicit surfaces `f(x, y, z) = 0` next to closed-form
//! primitives.
//!
//! Surfaces are given as symbolic expression trees. Intersections are found
//! by interval bisection along the ray, which discards every sub-interval
//! whose interval enclosure of `f` excludes zero, so thin features are not
//! stepped over. Normals come from the exact symbolic gradient of `f`.
//!
//! ## Features
//!
//! - **Expressions**: evaluate under REAL, VECTOR or INTERVAL semantics,
//!   differentiate, simplify
//! - **Functions**: user-defined, composed and built-in (exp, ln, log, sqrt, root)
//! - **Primitives**: Sphere, InfinitePlane, CoordinateSystem, ImplicitFunction
//! - **Scenes**: closest-hit traversal, nested scenes
//! - **Shading**: ambient and Phong templates instantiated per hit
//! - **File I/O**: JSON for expressions, shaders and configurations
//!
//! ## Example
//!
//! ```rust
//! use implicit_trace::prelude::*;
//!
//! let ids = IdAllocator::new();
//!
//! // unit sphere as an implicit surface
//! let f = Expr::var("x").pow(2u32) + Expr::var("y").pow(2u32) + Expr::var("z").pow(2u32) - 1u32;
//! let surface = ImplicitFunction::new(&ids, f).unwrap();
//! let scene = Scene::new(&ids).with(surface);
//!
//! let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::new(-1.0, 0.0, 0.0));
//! let hit = scene.trace(&ray).unwrap().unwrap();
//! assert!((hit.distance - 4.0).abs() < 1e-3);
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod expr;
pub mod id;
pub mod interval;
pub mod io;
pub mod primitives;
pub mod raycast;
pub mod shader;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::context::ContextModel;
    pub use crate::error::{EvalError, EvalResult};
    pub use crate::expr::{DefaultFunction, EvaluationType, Expr, MathFunction, Value, Vector};
    pub use crate::id::{IdAllocator, PrimitiveId};
    pub use crate::interval::Interval;
    pub use crate::io::{load, save};
    pub use crate::primitives::{
        CoordinateSystem, ImplicitFunction, InfinitePlane, Primitive, Scene, Sphere, SphereMethod,
        TraceHit,
    };
    pub use crate::raycast::{BisectionStats, RootFinder, TraceConfig};
    pub use crate::shader::{Light, Shader, ShaderTemplate};
    pub use crate::types::{Intersection, Ray};
    pub use glam::DVec3;
}

// Re-exports for convenience
pub use error::{EvalError, EvalResult};
pub use expr::Expr;
pub use primitives::Scene;
