//! Sphere primitive
//!
//! Two closed-form intersection routines that agree on every ray: the
//! quadratic formula, and the geometric form from Real-Time Rendering that
//! rejects rays pointing away from the sphere before taking a square root.

use super::{hit_point, Primitive};
use crate::error::{EvalError, EvalResult};
use crate::id::{IdAllocator, PrimitiveId};
use crate::raycast::DEFAULT_EPSILON;
use crate::shader::{Shader, ShaderTemplate};
use crate::types::{Intersection, Ray};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed-form intersection routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SphereMethod {
    /// Roots of `|o + t·d - c|² = r²`
    #[default]
    Quadratic,
    /// Projection of the center onto the ray with early rejection
    Algebraic,
}

/// Sphere with a center and a positive radius
#[derive(Debug, Clone)]
pub struct Sphere {
    id: PrimitiveId,
    center: DVec3,
    radius: f64,
    method: SphereMethod,
    shader: ShaderTemplate,
}

impl Sphere {
    /// Create a sphere; the radius must be a positive real
    pub fn new(ids: &IdAllocator, center: DVec3, radius: f64) -> EvalResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(EvalError::invalid(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        let id = ids.next_id();
        debug!(%id, ?center, radius, "sphere created");
        Ok(Sphere {
            id,
            center,
            radius,
            method: SphereMethod::default(),
            shader: ShaderTemplate::default(),
        })
    }

    /// Use another intersection routine
    #[must_use]
    pub fn with_method(mut self, method: SphereMethod) -> Self {
        self.method = method;
        self
    }

    /// Use another shader template
    #[must_use]
    pub fn with_shader(mut self, shader: ShaderTemplate) -> Self {
        self.shader = shader;
        self
    }

    /// Sphere center
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Sphere radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Outward unit normal at a surface point
    #[inline]
    pub fn normal_at(&self, point: DVec3) -> DVec3 {
        (point - self.center) / self.radius
    }

    /// Smallest root beyond the self-intersection guard
    fn distance_quadratic(&self, ray: &Ray) -> Option<f64> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let det = b * b - 4.0 * a * c;
        if det < 0.0 {
            return None;
        }
        let sq = det.sqrt();
        let near = (-b - sq) / (2.0 * a);
        let far = (-b + sq) / (2.0 * a);
        [near, far].into_iter().find(|&t| t > DEFAULT_EPSILON)
    }

    fn distance_algebraic(&self, ray: &Ray) -> Option<f64> {
        let l = self.center - ray.origin;
        let s = l.dot(ray.direction);
        let l2 = l.length_squared();
        let r2 = self.radius * self.radius;
        let outside = l2 > r2;
        if s < 0.0 && outside {
            return None;
        }
        let m2 = l2 - s * s;
        if m2 > r2 {
            return None;
        }
        let q = (r2 - m2).sqrt();
        let t = if outside { s - q } else { s + q };
        (t > DEFAULT_EPSILON).then_some(t)
    }
}

impl Primitive for Sphere {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, _best: f64) -> EvalResult<Intersection<'_>> {
        let t = match self.method {
            SphereMethod::Quadratic => self.distance_quadratic(ray),
            SphereMethod::Algebraic => self.distance_algebraic(ray),
        };
        Ok(match t {
            Some(t) => Intersection::hit(ray, t, self),
            None => Intersection::miss(),
        })
    }

    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader> {
        let point = hit_point(hit)?;
        Ok(self.shader.instantiate(point, self.normal_at(point)))
    }
}
