//! Implicit surface `f(x, y, z) = 0`
//!
//! # Intersection
//!
//! `x`, `y` and `z` are bound to the ray's affine coordinates
//! `o + t·d`, turning `f` into `G(t)`. Interval bisection over
//! `[0, max_distance]` then finds the nearest root of `G`, stopping short
//! of any hit the scene already holds. Natural powers
//! in `f` are unrolled into products beforehand so `G` can be evaluated
//! under interval semantics.
//!
//! # Normals
//!
//! The partial derivatives of `f` with respect to `x`, `y` and `z` are taken
//! once at construction, simplified, and evaluated at each hit point.

use super::{hit_point, Primitive};
use crate::context::ContextModel;
use crate::error::{EvalError, EvalResult};
use crate::expr::{Expr, MathFunction};
use crate::id::{IdAllocator, PrimitiveId};
use crate::interval::Interval;
use crate::raycast::{BisectionStats, RootFinder, TraceConfig, RAY_PARAMETER};
use crate::shader::{Shader, ShaderTemplate};
use crate::types::{Intersection, Ray};
use glam::DVec3;
use tracing::{debug, trace};

/// Spatial variables of the field, in axis order
pub const AXES: [&str; 3] = ["x", "y", "z"];

/// Zero set of a scalar field
#[derive(Debug, Clone)]
pub struct ImplicitFunction {
    id: PrimitiveId,
    field: Expr,
    interval_form: Expr,
    gradient: [Expr; 3],
    config: TraceConfig,
    finder: RootFinder,
    shader: ShaderTemplate,
}

impl ImplicitFunction {
    /// Surface `field = 0` traced with the default configuration
    pub fn new(ids: &IdAllocator, field: Expr) -> EvalResult<Self> {
        Self::with_config(ids, field, TraceConfig::default())
    }

    /// Surface `field = 0` traced with `config`.
    ///
    /// The field may only mention `x`, `y` and `z`.
    pub fn with_config(ids: &IdAllocator, field: Expr, config: TraceConfig) -> EvalResult<Self> {
        let finder = RootFinder::new(&config)?;

        let stray: Vec<String> = field
            .variables()
            .into_iter()
            .filter(|v| !AXES.contains(&v.as_str()))
            .collect();
        if !stray.is_empty() {
            return Err(EvalError::invalid(format!(
                "implicit field may only use x, y and z, found {}",
                stray.join(", ")
            )));
        }

        let gradient = [
            field.derive(AXES[0])?.simplify()?,
            field.derive(AXES[1])?.simplify()?,
            field.derive(AXES[2])?.simplify()?,
        ];
        let interval_form = field.expand_integer_powers();

        let id = ids.next_id();
        debug!(
            %id,
            %field,
            nodes = interval_form.node_count(),
            "implicit surface created"
        );
        Ok(ImplicitFunction {
            id,
            field,
            interval_form,
            gradient,
            config,
            finder,
            shader: ShaderTemplate::default(),
        })
    }

    /// Surface of a three-parameter scalar function, applied to `(x, y, z)`
    pub fn from_function(
        ids: &IdAllocator,
        function: &MathFunction,
        config: TraceConfig,
    ) -> EvalResult<Self> {
        if function.output_dimension() != 1 {
            return Err(EvalError::DimensionMismatch {
                left: function.output_dimension(),
                right: 1,
            });
        }
        let field = function.apply(AXES.iter().map(|&a| Expr::var(a)).collect())?;
        Self::with_config(ids, field, config)
    }

    /// Use another shader template
    #[must_use]
    pub fn with_shader(mut self, shader: ShaderTemplate) -> Self {
        self.shader = shader;
        self
    }

    /// The field `f`
    pub fn field(&self) -> &Expr {
        &self.field
    }

    /// Simplified `∂f/∂x`, `∂f/∂y`, `∂f/∂z`
    pub fn gradient(&self) -> &[Expr; 3] {
        &self.gradient
    }

    /// Tracing configuration
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// `f` at a point
    pub fn value_at(&self, p: DVec3) -> EvalResult<f64> {
        self.field.evaluate_real(&mut point_context(p))
    }

    /// `∇f` at a point
    pub fn gradient_at(&self, p: DVec3) -> EvalResult<DVec3> {
        let mut ctx = point_context(p);
        Ok(DVec3::new(
            self.gradient[0].evaluate_real(&mut ctx)?,
            self.gradient[1].evaluate_real(&mut ctx)?,
            self.gradient[2].evaluate_real(&mut ctx)?,
        ))
    }

    /// Unit normal at a surface point; zero where the gradient vanishes
    pub fn normal_at(&self, p: DVec3) -> EvalResult<DVec3> {
        Ok(self.gradient_at(p)?.normalize_or_zero())
    }

    /// Context in which `f` reads as `G(t)` along `ray`
    pub fn along_ray(ray: &Ray) -> ContextModel {
        let mut ctx = ContextModel::new();
        for (axis, name) in AXES.iter().enumerate() {
            ctx.bind(
                *name,
                Expr::number(ray.origin[axis])
                    + Expr::var(RAY_PARAMETER) * Expr::number(ray.direction[axis]),
            );
        }
        ctx
    }

    /// Nearest root of `G` along `ray`, or `max_distance + 1` when there
    /// is none
    pub fn find_root(&self, ray: &Ray) -> EvalResult<(f64, BisectionStats)> {
        let mut ctx = Self::along_ray(ray);
        self.finder
            .find_root(&self.interval_form, RAY_PARAMETER, &mut ctx)
    }

    /// Newton iterations on `G(t)` that stay inside the bisection leaf
    fn refine(&self, ray: &Ray, leaf: Interval) -> EvalResult<f64> {
        let mut t = leaf.min;
        for step in 0..self.config.newton_steps {
            let p = ray.at(t);
            let g = self.value_at(p)?;
            let slope = self.gradient_at(p)?.dot(ray.direction);
            let next = t - g / slope;
            if !next.is_finite() || !leaf.contains(next) {
                trace!(step, t, next, "newton step left the leaf");
                break;
            }
            t = next;
        }
        Ok(t)
    }
}

/// Context binding `x`, `y`, `z` to the coordinates of `p`
fn point_context(p: DVec3) -> ContextModel {
    let mut ctx = ContextModel::new();
    for (axis, name) in AXES.iter().enumerate() {
        ctx.bind(*name, Expr::number(p[axis]));
    }
    ctx
}

impl Primitive for ImplicitFunction {
    fn id(&self) -> PrimitiveId {
        self.id
    }

    fn intersect(&self, ray: &Ray, best: f64) -> EvalResult<Intersection<'_>> {
        let mut ctx = Self::along_ray(ray);
        let (leaf, _) =
            self.finder
                .find_leaf_within(&self.interval_form, RAY_PARAMETER, best, &mut ctx)?;
        let Some(leaf) = leaf else {
            return Ok(Intersection::miss());
        };
        let t = if self.config.newton_steps > 0 {
            self.refine(ray, leaf)?
        } else {
            leaf.min
        };
        Ok(Intersection::hit(ray, t, self))
    }

    fn shader(&self, hit: &Intersection<'_>) -> EvalResult<Shader> {
        let point = hit_point(hit)?;
        Ok(self.shader.instantiate(point, self.normal_at(point)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere_field() -> Expr {
        Expr::var("x").pow(2u32) + Expr::var("y").pow(2u32) + Expr::var("z").pow(2u32) - 1u32
    }

    fn unit_sphere() -> ImplicitFunction {
        ImplicitFunction::new(&IdAllocator::new(), unit_sphere_field()).unwrap()
    }

    #[test]
    fn test_gradient_is_simplified() {
        let s = unit_sphere();
        assert_eq!(s.gradient()[0], Expr::number(2.0) * "x");
        assert_eq!(s.gradient()[1], Expr::number(2.0) * "y");
    }

    #[test]
    fn test_hit_and_outward_normal() {
        let s = unit_sphere();
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), -DVec3::X);
        let hit = s.intersect(&ray, f64::INFINITY).unwrap();
        assert!(hit.is_hit());
        assert!((hit.distance - 4.0).abs() < s.config().root_tolerance);
        let shader = s.shader(&hit).unwrap();
        assert!((shader.normal - DVec3::X).length() < 1e-2);
    }

    #[test]
    fn test_miss_reports_sentinel_without_recursion() {
        let s = unit_sphere();
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::X);
        let (t, stats) = s.find_root(&ray).unwrap();
        assert_eq!(t, s.config().no_root());
        assert_eq!(stats.evaluations, 1);
        assert_eq!(stats.max_depth, 0);
        assert!(!s.intersect(&ray, f64::INFINITY).unwrap().is_hit());
    }

    #[test]
    fn test_closer_hit_limits_search() {
        let s = unit_sphere();
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), -DVec3::X);
        // the surface is at 4; something already hit at 3 wins
        assert!(!s.intersect(&ray, 3.0).unwrap().is_hit());
        let hit = s.intersect(&ray, 4.5).unwrap();
        assert!(hit.is_hit());
        assert!((hit.distance - 4.0).abs() < s.config().root_tolerance);
    }

    #[test]
    fn test_newton_refinement_tightens_root() {
        let config = TraceConfig {
            root_tolerance: 0.05,
            newton_steps: 6,
            ..Default::default()
        };
        let refined = ImplicitFunction::with_config(&IdAllocator::new(), unit_sphere_field(), config).unwrap();
        let ray = Ray::new(DVec3::new(0.0, 0.0, -3.0), DVec3::Z);
        let hit = refined.intersect(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_foreign_variables() {
        let field = Expr::var("x") + Expr::var("w");
        assert!(matches!(
            ImplicitFunction::new(&IdAllocator::new(), field),
            Err(EvalError::InvalidConstruction(_))
        ));
    }

    #[test]
    fn test_from_function() {
        let f = MathFunction::custom(
            "plane",
            &["a", "b", "c"],
            Expr::var("a") + Expr::var("b") + Expr::var("c") - 1u32,
        )
        .unwrap();
        let surface = ImplicitFunction::from_function(&IdAllocator::new(), &f, TraceConfig::default()).unwrap();
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let hit = surface.intersect(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-3);
        let n = surface.normal_at(DVec3::X).unwrap();
        assert!((n - DVec3::ONE.normalize()).length() < 1e-12);
    }
}
