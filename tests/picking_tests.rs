// Host-side tests for pointer picking against the scene.

use galaxy_core::picking::NavTarget;
use galaxy_core::{Camera, HitTester, MeshData, ObjectId, Ray, Scene, SceneNode, Transform};
use glam::{Vec2, Vec3};
use std::rc::Rc;

fn galaxy(id: u32, position: Vec3, scale: Vec3) -> SceneNode {
    SceneNode {
        id: ObjectId(id),
        name: format!("galaxy-{id}"),
        mesh: Rc::new(MeshData::octahedron(Vec3::ZERO, 0.5, [1.0; 4])),
        transform: Transform {
            position,
            scale,
            ..Transform::default()
        },
        spin: 0.0,
    }
}

fn link(url: &str) -> NavTarget {
    NavTarget {
        url: url.to_string(),
    }
}

#[test]
fn empty_registry_never_hits() {
    let camera = Camera::default();
    let mut scene = Scene::new();
    scene.insert(galaxy(0, Vec3::new(-0.8, 0.0, 0.0), Vec3::ONE));
    let hits = HitTester::new();
    for x in [-1.0, -0.5, 0.0, 0.3, 1.0] {
        for y in [-1.0, 0.0, 0.7] {
            assert!(hits.pick(Vec2::new(x, y), &camera, &scene).is_none());
        }
    }
}

#[test]
fn nearest_of_two_overlapping_galaxies_wins() {
    let camera = Camera::default();
    let ndc = Vec2::new(0.01, 0.02);
    let ray = Ray::from_camera(&camera, ndc);

    let mut scene = Scene::new();
    scene.insert(galaxy(0, ray.at(6.0), Vec3::ONE));
    scene.insert(galaxy(1, ray.at(3.0), Vec3::ONE));

    // registration order must not matter
    for order in [[0, 1], [1, 0]] {
        let mut hits = HitTester::new();
        for id in order {
            hits.register(ObjectId(id), link("https://example.com/"));
        }
        let hit = hits.pick(ndc, &camera, &scene).unwrap();
        assert_eq!(hit.object, ObjectId(1));
        assert!(hit.distance > 2.4 && hit.distance < 3.0, "{}", hit.distance);
    }
}

#[test]
fn far_galaxy_is_hit_when_alone_registered() {
    let camera = Camera::default();
    let ndc = Vec2::new(0.01, 0.02);
    let ray = Ray::from_camera(&camera, ndc);
    let mut scene = Scene::new();
    scene.insert(galaxy(0, ray.at(6.0), Vec3::ONE));
    scene.insert(galaxy(1, ray.at(3.0), Vec3::ONE));

    let mut hits = HitTester::new();
    hits.register(ObjectId(0), link("https://github.com/"));
    let hit = hits.pick(ndc, &camera, &scene).unwrap();
    assert_eq!(hit.object, ObjectId(0));
    assert!(hit.distance > 5.4 && hit.distance < 6.0);
    assert_eq!(hits.link(hit.object).unwrap().url, "https://github.com/");
}

#[test]
fn mirrored_scale_is_still_pickable() {
    let camera = Camera::default();
    let ndc = Vec2::new(-0.02, 0.01);
    let ray = Ray::from_camera(&camera, ndc);
    let mut scene = Scene::new();
    scene.insert(galaxy(2, ray.at(4.0), Vec3::new(-0.7, -0.7, 0.7)));

    let mut hits = HitTester::new();
    hits.register(ObjectId(2), link("https://www.facebook.com/"));
    let hit = hits.pick(ndc, &camera, &scene).unwrap();
    assert_eq!(hit.object, ObjectId(2));
    assert!((hit.point - ray.at(hit.distance)).length() < 1e-5);
}

#[test]
fn pointer_off_to_the_side_misses() {
    let camera = Camera::default();
    let ray = Ray::from_camera(&camera, Vec2::ZERO);
    let mut scene = Scene::new();
    scene.insert(galaxy(0, ray.at(3.0), Vec3::ONE));
    let mut hits = HitTester::new();
    hits.register(ObjectId(0), link("https://www.linkedin.com/"));
    assert!(hits.pick(Vec2::new(0.9, -0.9), &camera, &scene).is_none());
}

#[test]
fn registered_but_absent_objects_are_skipped() {
    let camera = Camera::default();
    let mut hits = HitTester::new();
    hits.register(ObjectId(7), link("https://www.instagram.com/"));
    assert!(hits.pick(Vec2::ZERO, &camera, &Scene::new()).is_none());
}
