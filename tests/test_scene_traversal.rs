//! Scene traversal tests
//!
//! Closest-hit selection across mixed closed-form and implicit primitives,
//! nested scenes, coordinate axes and per-hit shading.

mod common;

use common::*;
use implicit_trace::io::{from_json_string, to_json_string};
use implicit_trace::prelude::*;

#[test]
fn test_sphere_straight_ahead() {
    let ids = IdAllocator::new();
    let scene = Scene::new(&ids).with(Sphere::new(&ids, DVec3::new(10.0, 0.0, 0.0), 1.0).unwrap());
    let hit = scene.trace(&Ray::new(DVec3::ZERO, DVec3::X)).unwrap().unwrap();
    assert_close(hit.distance, 9.0, 1e-4, "distance");
    assert_vec_close(hit.point, DVec3::new(9.0, 0.0, 0.0), 1e-4, "point");
    assert_vec_close(hit.shader.normal, DVec3::new(-1.0, 0.0, 0.0), 1e-9, "normal");
}

#[test]
fn test_implicit_in_front_of_closed_form() {
    let ids = IdAllocator::new();
    let implicit = ImplicitFunction::new(&ids, sphere_field_at(DVec3::new(4.0, 0.0, 0.0), 1.0)).unwrap();
    let implicit_id = implicit.id();
    let scene = Scene::new(&ids)
        .with(Sphere::new(&ids, DVec3::new(10.0, 0.0, 0.0), 1.0).unwrap())
        .with(implicit);

    let hit = scene.trace(&Ray::new(DVec3::ZERO, DVec3::X)).unwrap().unwrap();
    assert_eq!(hit.primitive, implicit_id);
    assert_close(hit.distance, 3.0, 1e-3, "implicit distance");
    assert_vec_close(hit.shader.normal, -DVec3::X, 1e-2, "implicit normal");
}

#[test]
fn test_insertion_order_does_not_change_result() {
    let ids = IdAllocator::new();
    let build = |flip: bool| {
        let near = Sphere::new(&ids, DVec3::new(0.0, 0.0, 5.0), 1.0).unwrap();
        let far = InfinitePlane::new(&ids, DVec3::new(0.0, 0.0, 20.0), -DVec3::Z).unwrap();
        let near_id = near.id();
        let scene = if flip {
            Scene::new(&ids).with(far).with(near)
        } else {
            Scene::new(&ids).with(near).with(far)
        };
        (scene, near_id)
    };

    let ray = Ray::new(DVec3::ZERO, DVec3::Z);
    for flip in [false, true] {
        let (scene, near_id) = build(flip);
        let hit = scene.trace(&ray).unwrap().unwrap();
        assert_eq!(hit.primitive, near_id);
        assert_close(hit.distance, 4.0, 1e-9, "near sphere");
    }
}

#[test]
fn test_empty_scene_misses() {
    let ids = IdAllocator::new();
    let scene = Scene::new(&ids);
    assert!(scene.is_empty());
    assert!(scene.trace(&Ray::new(DVec3::ZERO, DVec3::X)).unwrap().is_none());
}

#[test]
fn test_ray_behind_everything_misses() {
    let ids = IdAllocator::new();
    let scene = Scene::new(&ids)
        .with(Sphere::new(&ids, DVec3::new(10.0, 0.0, 0.0), 1.0).unwrap())
        .with(ImplicitFunction::new(&ids, sphere_field_at(DVec3::new(5.0, 0.0, 0.0), 1.0)).unwrap());
    assert!(scene.trace(&Ray::new(DVec3::ZERO, -DVec3::X)).unwrap().is_none());
}

#[test]
fn test_coordinate_axes_colors() {
    let ids = IdAllocator::new();
    let axes = CoordinateSystem::new(&ids, 5.0, 0.05).unwrap();
    let y_rod = axes.rods().primitives().nth(1).unwrap().id();
    let scene = Scene::new(&ids).with(axes);

    // looking down at the y rod from the +z side
    let ray = Ray::new(DVec3::new(0.0, 2.0, 10.0), -DVec3::Z);
    let hit = scene.trace(&ray).unwrap().unwrap();
    assert_eq!(hit.primitive, y_rod);
    assert_close(hit.distance, 9.95, 1e-9, "rod top face");
    assert_vec_close(hit.shader.normal, DVec3::Z, 1e-9, "rod normal");
    assert_eq!(hit.shader.ambient(), DVec3::Y);
}

#[test]
fn test_phong_shading_faces_light() {
    let ids = IdAllocator::new();
    let sphere = Sphere::new(&ids, DVec3::ZERO, 1.0)
        .unwrap()
        .with_shader(ShaderTemplate::phong(DVec3::splat(0.7), DVec3::splat(0.3), 20.0));
    let scene = Scene::new(&ids).with(sphere);

    let eye = DVec3::new(0.0, 0.0, 5.0);
    let hit = scene.trace(&Ray::new(eye, -DVec3::Z)).unwrap().unwrap();
    let to_viewer = eye - hit.point;

    let lit = hit.shader.shade(to_viewer, &[Light::white(DVec3::new(0.0, 0.0, 10.0))]);
    let unlit = hit.shader.shade(to_viewer, &[Light::white(DVec3::new(0.0, 0.0, -10.0))]);
    assert_vec_close(unlit, hit.shader.ambient(), 1e-9, "light behind the surface");
    // head-on: full diffuse plus full specular on top of ambient
    assert_vec_close(lit, DVec3::splat(0.07 + 0.7 + 0.3), 1e-9, "light behind the eye");
}

#[test]
fn test_shader_template_round_trips_through_json() {
    let template = ShaderTemplate::phong(DVec3::new(0.9, 0.2, 0.1), DVec3::ONE, 32.0);
    let json = to_json_string(&template).unwrap();
    let back: ShaderTemplate = from_json_string(&json).unwrap();
    assert_eq!(back, template);
}

#[test]
fn test_loaded_field_traces_like_built_one() {
    let ids = IdAllocator::new();
    let dir = std::env::temp_dir().join(format!("implicit-trace-scene-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("torus.json");

    let field = torus_field(2.0, 0.5);
    save(&field, &path).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, field);

    let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
    let built = Scene::new(&ids).with(ImplicitFunction::new(&ids, field).unwrap());
    let reloaded = Scene::new(&ids).with(ImplicitFunction::new(&ids, loaded).unwrap());
    let a = built.trace(&ray).unwrap().unwrap();
    let b = reloaded.trace(&ray).unwrap().unwrap();
    assert_eq!(a.distance, b.distance);
    assert_close(a.distance, 7.5, 5e-3, "outer torus wall");

    std::fs::remove_dir_all(&dir).ok();
}
