//! Surface appearance
//!
//! Every primitive owns a [`ShaderTemplate`]. On each hit the template is
//! instantiated with the hit position and surface normal; the template itself
//! is never modified, so one template serves every intersection with its
//! primitive.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Per-primitive appearance, independent of any particular hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShaderTemplate {
    /// Constant color, unaffected by lights
    Ambient {
        /// Ambient color
        color: DVec3,
    },
    /// Ambient plus Lambert diffuse plus Blinn-Phong specular
    Phong {
        /// Ambient color
        ambient: DVec3,
        /// Diffuse coefficient per channel
        diffuse: DVec3,
        /// Specular coefficient per channel
        specular: DVec3,
        /// Specular exponent
        exponent: f64,
    },
}

impl Default for ShaderTemplate {
    fn default() -> Self {
        ShaderTemplate::Ambient {
            color: DVec3::splat(0.8),
        }
    }
}

impl ShaderTemplate {
    /// Flat ambient shader
    #[inline]
    pub fn ambient(color: DVec3) -> Self {
        ShaderTemplate::Ambient { color }
    }

    /// Phong shader with a dim ambient term
    pub fn phong(diffuse: DVec3, specular: DVec3, exponent: f64) -> Self {
        ShaderTemplate::Phong {
            ambient: diffuse * 0.1,
            diffuse,
            specular,
            exponent,
        }
    }

    /// Per-hit shader at `position` with surface `normal`
    ///
    /// The normal is normalized; a zero normal stays zero.
    pub fn instantiate(&self, position: DVec3, normal: DVec3) -> Shader {
        Shader {
            template: self.clone(),
            position,
            normal: normal.normalize_or_zero(),
        }
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light position
    pub position: DVec3,
    /// Emitted color
    pub color: DVec3,
}

impl Light {
    /// White light at `position`
    pub fn white(position: DVec3) -> Self {
        Light {
            position,
            color: DVec3::ONE,
        }
    }
}

/// Shader bound to one intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    template: ShaderTemplate,
    /// Hit position
    pub position: DVec3,
    /// Unit surface normal at the hit
    pub normal: DVec3,
}

impl Shader {
    /// The template this shader was instantiated from
    pub fn template(&self) -> &ShaderTemplate {
        &self.template
    }

    /// Light-independent contribution
    pub fn ambient(&self) -> DVec3 {
        match &self.template {
            ShaderTemplate::Ambient { color } => *color,
            ShaderTemplate::Phong { ambient, .. } => *ambient,
        }
    }

    /// Fraction of light arriving from `to_light` that leaves towards
    /// `to_viewer`, per channel. Both directions point away from the surface.
    pub fn reflectance(&self, to_viewer: DVec3, to_light: DVec3) -> DVec3 {
        match &self.template {
            ShaderTemplate::Ambient { .. } => DVec3::ZERO,
            ShaderTemplate::Phong {
                diffuse,
                specular,
                exponent,
                ..
            } => {
                let v = to_viewer.normalize_or_zero();
                let l = to_light.normalize_or_zero();
                let half = (v + l).normalize_or_zero();
                let lambert = self.normal.dot(l).max(0.0);
                let highlight = self.normal.dot(half).max(0.0).powf(*exponent);
                *diffuse * lambert + *specular * highlight
            }
        }
    }

    /// Color seen from `to_viewer` under `lights`
    pub fn shade(&self, to_viewer: DVec3, lights: &[Light]) -> DVec3 {
        lights.iter().fold(self.ambient(), |color, light| {
            let to_light = light.position - self.position;
            color + light.color * self.reflectance(to_viewer, to_light)
        })
    }
}
