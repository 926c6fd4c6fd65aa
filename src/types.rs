//! Rays and ray/primitive intersection records

use crate::primitives::Primitive;
use glam::DVec3;

/// Ray definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: DVec3,
    /// Ray direction (normalized)
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point along ray at distance t
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Result of intersecting a ray with a primitive.
///
/// A primitive that is not hit reports [`Intersection::NO_HIT`] as its
/// distance. A scene that finds nothing reports the best distance it was
/// given, with no primitive attached. Both are ordinary values, not errors.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Distance along the ray
    pub distance: f64,
    /// Hit point, absent on a miss
    pub point: Option<DVec3>,
    /// The primitive that was hit
    pub primitive: Option<&'a dyn Primitive>,
}

impl<'a> Intersection<'a> {
    /// Distance reported by a primitive the ray does not hit
    pub const NO_HIT: f64 = -1.0;

    /// A primitive-level miss
    pub fn miss() -> Self {
        Intersection {
            distance: Self::NO_HIT,
            point: None,
            primitive: None,
        }
    }

    /// The "nothing closer than `best`" result of a traversal
    pub fn none_closer(best: f64) -> Self {
        Intersection {
            distance: best,
            point: None,
            primitive: None,
        }
    }

    /// A hit at distance `t` along `ray`
    pub fn hit(ray: &Ray, t: f64, primitive: &'a dyn Primitive) -> Self {
        Intersection {
            distance: t,
            point: Some(ray.at(t)),
            primitive: Some(primitive),
        }
    }

    /// Whether a primitive was actually hit
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.primitive.is_some() && self.distance >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(3.0, 0.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);
        let p = ray.at(5.0);
        assert!((p - DVec3::new(3.0, 0.0, 4.0)).length() < 1e-12);
    }

    #[test]
    fn test_miss_sentinels() {
        let miss = Intersection::miss();
        assert!(!miss.is_hit());
        assert!(miss.distance < 0.0);

        let none = Intersection::none_closer(42.0);
        assert!(!none.is_hit());
        assert_eq!(none.distance, 42.0);
        assert!(none.point.is_none());
    }
}
