//! Scene: closest hit over a list of primitives
//!
//! Traversal is a linear scan. A candidate replaces the current best only
//! when `epsilon < candidate < best`, so ties keep the primitive added first.
//! Scenes are primitives themselves and can be nested.

use super::{hit_point, Primitive};
use crate::error::{EvalError, EvalResult};
use crate::id::{IdAllocator, PrimitiveId};
use crate::raycast::DEFAULT_EPSILON;
use crate::shader::{Shader, ShaderTemplate};
use crate::types::{Intersection, Ray};
use glam::DVec3;
use tracing::{debug, trace};

/// Owned summary of a traced hit
#[derive(Debug, Clone, PartialEq)]
pub struct TraceHit {
    /// Distance along the ray
    pub distance: f64,
    /// Hit point
    pub point: DVec3,
    /// Id of the primitive that was hit
    pub primitive: PrimitiveId,
    /// Shader instantiated for this hit
    pub shader: Shader,
}

/// Ordered collection of primitives
#[derive(Debug)]
pub struct Scene {
    id: PrimitiveId,
    primitives: Vec<Box<dyn Primitive>>,
    epsilon: f64,
    shader: ShaderTemplate,
}

impl Scene {
    /// Empty scene
    pub fn new(ids: &IdAllocator) -> Self {
        let id = ids.next_id();
        debug!(%id, "scene created");
        Scene {
            id,
            primitives: Vec::new(),
            epsilon: DEFAULT_EPSILON,
            shader: ShaderTemplate::default(),
        }
    }

    /// Use another self-intersection guard
    pub fn with_epsilon(mut self, epsilon: f64) -> EvalResult<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(EvalError::invalid(format!(
                "scene epsilon must be positive, got {}",
                epsilon
            )));
        }
        self.epsilon = epsilon;
        Ok(self)
    }

    /// Append a primitive and return its id
    pub fn add(&mut self, primitive: impl Primitive + 'static) -> PrimitiveId {
        let id = primitive.id();
        debug!(scene = %self.id, primitive = %id, "primitive added");
        self.primitives.push(Box::new(primitive));
        id
    }

    /// Builder form of [`Scene::add`]
    #[must_use]
    pub fn with(mut self, primitive: impl Primitive + 'static) -> Self {
        self.add(primitive);
        self
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the scene has no children
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Direct children in insertion order
    pub fn primitives(&self) -> impl Iterator<Item = &dyn Primitive> {
        self.primitives.iter().map(|p| p.as_ref())
    }

    /// Closest hit along `ray` together with its shader, if any
    pub fn trace(&self, ray: &Ray) -> EvalResult<Option<TraceHit>> {
        let hit = self.intersect(ray, f64::INFINITY)?;
        let (Some(primitive), Some(point)) = (hit.primitive, hit.point) else {
            trace!(scene = %self.id, "ray missed");
            return Ok(None);
        };
        let shader = primitive.shader(&hit)?;
        trace!(scene = %self.id, primitive = %primitive.id(), distance = hit.distance, "ray hit");
        Ok(Some(TraceHit {
            distance: hit.distance,
            point,
            primitive: primitive.id(),
            shader,
        }))
    }
}

impl Primitive for Scene {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, best: f64) -> EvalResult<Intersection<'_>> {
        // TODO: a bounding volume hierarchy would replace this linear scan
        let mut closest = Intersection::none_closer(best);
        for primitive in &self.primitives {
            let candidate = primitive.intersect(ray, closest.distance)?;
            if candidate.distance > self.epsilon && candidate.distance < closest.distance {
                closest = candidate;
            }
        }
        Ok(closest)
    }

    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader> {
        match hit.primitive {
            Some(primitive) if primitive.id() != self.id => primitive.shader(hit),
            _ => Ok(self.shader.instantiate(hit_point(hit)?, DVec3::ZERO)),
        }
    }
}
