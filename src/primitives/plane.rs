//! Infinite plane primitive

use super::{hit_point, Primitive};
use crate::error::{EvalError, EvalResult};
use crate::id::{IdAllocator, PrimitiveId};
use crate::raycast::DEFAULT_EPSILON;
use crate::shader::{Shader, ShaderTemplate};
use crate::types::{Intersection, Ray};
use glam::DVec3;
use tracing::debug;

/// Plane through `point` with unit `normal`
#[derive(Debug, Clone)]
pub struct InfinitePlane {
    id: PrimitiveId,
    point: DVec3,
    normal: DVec3,
    shader: ShaderTemplate,
}

impl InfinitePlane {
    /// Create a plane; the normal must be non-zero and is normalized
    pub fn new(ids: &IdAllocator, point: DVec3, normal: DVec3) -> EvalResult<Self> {
        let normal = normal.try_normalize().ok_or_else(|| {
            EvalError::invalid(format!("plane normal {} cannot be normalized", normal))
        })?;
        let id = ids.next_id();
        debug!(%id, ?point, ?normal, "plane created");
        Ok(InfinitePlane {
            id,
            point,
            normal,
            shader: ShaderTemplate::default(),
        })
    }

    /// Use another shader template
    #[must_use]
    pub fn with_shader(mut self, shader: ShaderTemplate) -> Self {
        self.shader = shader;
        self
    }

    /// Unit normal
    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

impl Primitive for InfinitePlane {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, _best: f64) -> EvalResult<Intersection<'_>> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < f64::EPSILON {
            return Ok(Intersection::miss());
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        Ok(if t > DEFAULT_EPSILON {
            Intersection::hit(ray, t, self)
        } else {
            Intersection::miss()
        })
    }

    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader> {
        Ok(self.shader.instantiate(hit_point(hit)?, self.normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> InfinitePlane {
        InfinitePlane::new(&IdAllocator::new(), DVec3::new(0.0, -1.0, 0.0), DVec3::new(0.0, 3.0, 0.0))
            .unwrap()
    }

    #[test]
    fn test_hit_from_above() {
        let plane = floor();
        assert_eq!(plane.normal(), DVec3::Y);
        let ray = Ray::new(DVec3::new(0.0, 4.0, 0.0), DVec3::new(0.0, -1.0, 0.0));
        let hit = plane.intersect(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-12);
        assert_eq!(hit.point, Some(DVec3::new(0.0, -1.0, 0.0)));
        assert_eq!(plane.shader(&hit).unwrap().normal, DVec3::Y);
    }

    #[test]
    fn test_parallel_and_receding_rays_miss() {
        let plane = floor();
        let parallel = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(!plane.intersect(&parallel, f64::INFINITY).unwrap().is_hit());
        let receding = Ray::new(DVec3::ZERO, DVec3::Y);
        assert!(!plane.intersect(&receding, f64::INFINITY).unwrap().is_hit());
    }

    #[test]
    fn test_zero_normal_rejected() {
        assert!(InfinitePlane::new(&IdAllocator::new(), DVec3::ZERO, DVec3::ZERO).is_err());
    }
}
