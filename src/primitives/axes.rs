//! Cartesian coordinate axes
//!
//! Three thin rods from the origin along +x (red), +y (green) and +z (blue),
//! each an axis-aligned box intersected with the slab test.

use super::{hit_point, Primitive, Scene};
use crate::error::{EvalError, EvalResult};
use crate::id::{IdAllocator, PrimitiveId};
use crate::raycast::DEFAULT_EPSILON;
use crate::shader::{Shader, ShaderTemplate};
use crate::types::{Intersection, Ray};
use glam::DVec3;
use tracing::debug;

/// Axis-aligned box `[min, max]` standing in for one axis
#[derive(Debug, Clone)]
pub struct AxisRod {
    id: PrimitiveId,
    min: DVec3,
    max: DVec3,
    shader: ShaderTemplate,
}

impl AxisRod {
    /// Rod along `axis` (0 = x, 1 = y, 2 = z) from the origin to `length`
    pub fn new(ids: &IdAllocator, axis: usize, length: f64, thickness: f64) -> EvalResult<Self> {
        if axis > 2 {
            return Err(EvalError::invalid(format!("axis index {} out of range", axis)));
        }
        if !(length > 0.0 && thickness > 0.0) {
            return Err(EvalError::invalid(format!(
                "rod length {} and thickness {} must be positive",
                length, thickness
            )));
        }
        let mut min = DVec3::splat(-thickness);
        let mut max = DVec3::splat(thickness);
        min[axis] = 0.0;
        max[axis] = length;

        let mut color = DVec3::ZERO;
        color[axis] = 1.0;

        Ok(AxisRod {
            id: ids.next_id(),
            min,
            max,
            shader: ShaderTemplate::ambient(color),
        })
    }

    /// Entry and exit distances of the ray through the box
    fn slab(&self, ray: &Ray) -> Option<(f64, f64)> {
        let inv = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;
        let near = t1.min(t2).max_element();
        let far = t1.max(t2).min_element();
        (near <= far).then_some((near, far))
    }

    /// Outward normal of the face nearest to `point`
    fn normal_at(&self, point: DVec3) -> DVec3 {
        let to_min = (point - self.min).abs();
        let to_max = (self.max - point).abs();
        let mut best = (f64::INFINITY, DVec3::ZERO);
        for axis in 0..3 {
            let mut n = DVec3::ZERO;
            if to_min[axis] < best.0 {
                n[axis] = -1.0;
                best = (to_min[axis], n);
            }
            if to_max[axis] < best.0 {
                n[axis] = 1.0;
                best = (to_max[axis], n);
            }
        }
        best.1
    }
}

impl Primitive for AxisRod {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, _best: f64) -> EvalResult<Intersection<'_>> {
        let t = self
            .slab(ray)
            .and_then(|(near, far)| [near, far].into_iter().find(|&t| t > DEFAULT_EPSILON));
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

/// The three coordinate axes, traversed as a nested scene
#[derive(Debug)]
pub struct CoordinateSystem {
    id: PrimitiveId,
    rods: Scene,
}

impl CoordinateSystem {
    /// Axes of the given length and half-thickness
    pub fn new(ids: &IdAllocator, length: f64, thickness: f64) -> EvalResult<Self> {
        let id = ids.next_id();
        let mut rods = Scene::new(ids);
        for axis in 0..3 {
            rods.add(AxisRod::new(ids, axis, length, thickness)?);
        }
        debug!(%id, length, thickness, "coordinate system created");
        Ok(CoordinateSystem { id, rods })
    }

    /// The rods, x first
    pub fn rods(&self) -> &Scene {
        &self.rods
    }
}

impl Primitive for CoordinateSystem {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, best: f64) -> EvalResult<Intersection<'_>> {
        self.rods.intersect(ray, best)
    }

    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader> {
        self.rods.shader(hit)
    }
}
