//! Common test helpers for implicit-trace integration tests

#![allow(dead_code)]

use implicit_trace::prelude::*;

// ============================================================================
// Standard test fields
// ============================================================================

/// `x² + y² + z² - r²`
pub fn sphere_field(r: f64) -> Expr {
    Expr::var("x").pow(2u32) + Expr::var("y").pow(2u32) + Expr::var("z").pow(2u32)
        - Expr::number(r * r)
}

/// Sphere field centered at `c`
pub fn sphere_field_at(c: DVec3, r: f64) -> Expr {
    let axis = |name: &str, offset: f64| (Expr::var(name) - Expr::number(offset)).pow(2u32);
    axis("x", c.x) + axis("y", c.y) + axis("z", c.z) - Expr::number(r * r)
}

/// Torus in the xy-plane: `(x² + y² + z² + R² - r²)² - 4R²(x² + y²)`
pub fn torus_field(major: f64, minor: f64) -> Expr {
    let x2 = Expr::var("x").pow(2u32);
    let y2 = Expr::var("y").pow(2u32);
    let z2 = Expr::var("z").pow(2u32);
    let k = major * major - minor * minor;
    (x2.clone() + y2.clone() + z2 + Expr::number(k)).pow(2u32)
        - Expr::number(4.0 * major * major) * (x2 + y2)
}

/// Fresh context with real bindings
pub fn ctx_with(bindings: &[(&str, f64)]) -> ContextModel {
    let mut ctx = ContextModel::new();
    for (name, value) in bindings {
        ctx.bind(*name, Expr::number(*value));
    }
    ctx
}

// ============================================================================
// Assertion helpers
// ============================================================================

/// Assert two f64 values are close within tolerance
pub fn assert_close(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).abs(),
        tol
    );
}

/// Assert two vectors are close within tolerance
pub fn assert_vec_close(a: DVec3, b: DVec3, tol: f64, msg: &str) {
    assert!(
        (a - b).length() < tol,
        "{}: {:?} vs {:?} (diff={}, tol={})",
        msg,
        a,
        b,
        (a - b).length(),
        tol
    );
}
