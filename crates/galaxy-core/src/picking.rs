//! Pointer ray casting against the registered interactive objects.

use crate::camera::Camera;
use crate::constants::RAY_EPSILON;
use crate::scene::{Aabb, MeshData, ObjectId, Scene};
use fnv::FnvHashMap;
use glam::{Mat4, Vec2, Vec3, Vec4};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// World-space ray from the camera through a point in normalized device
    /// coordinates.
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Self {
        let inv = camera.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let origin = camera.position;
        Self {
            origin,
            direction: (p1 - origin).normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray expressed in another space. The direction is not
    /// renormalized so `t` keeps its meaning across the transform.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

/// Slab test. Returns the entry distance, or the exit distance when the
/// origin is inside the box.
pub fn ray_aabb(ray: &Ray, bounds: &Aabb) -> Option<f32> {
    let inv = ray.direction.recip();
    let t1 = (bounds.min - ray.origin) * inv;
    let t2 = (bounds.max - ray.origin) * inv;
    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();
    if tmax.is_nan() || tmax < tmin.max(0.0) {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Möller–Trumbore, double sided.
pub fn ray_triangle(ray: &Ray, tri: &[Vec3; 3]) -> Option<f32> {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det.abs() <= RAY_EPSILON * e1.length() * e2.length() * ray.direction.length() {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t >= 0.0).then_some(t)
}

/// Nearest hit of a world ray against a mesh placed by `model`.
pub fn ray_mesh(ray: &Ray, mesh: &MeshData, model: &Mat4) -> Option<f32> {
    if model.determinant().abs() < f32::EPSILON {
        return None;
    }
    let local = ray.transformed(&model.inverse());
    ray_aabb(&local, &mesh.bounds)?;
    mesh.triangles()
        .filter_map(|tri| ray_triangle(&local, &tri))
        .min_by(|a, b| a.total_cmp(b))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavTarget {
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// Registry of clickable objects plus their navigation metadata.
#[derive(Clone, Debug, Default)]
pub struct HitTester {
    registry: SmallVec<[ObjectId; 4]>,
    links: FnvHashMap<ObjectId, NavTarget>,
}

impl HitTester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and its link in one step; registering again only
    /// replaces the link.
    pub fn register(&mut self, id: ObjectId, target: NavTarget) {
        if !self.registry.contains(&id) {
            self.registry.push(id);
        }
        self.links.insert(id, target);
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn is_registered(&self, id: ObjectId) -> bool {
        self.registry.contains(&id)
    }

    pub fn link(&self, id: ObjectId) -> Option<&NavTarget> {
        self.links.get(&id)
    }

    /// Nearest registered object under the pointer, if any.
    pub fn pick(&self, ndc: Vec2, camera: &Camera, scene: &Scene) -> Option<Hit> {
        if self.registry.is_empty() {
            return None;
        }
        self.pick_ray(&Ray::from_camera(camera, ndc), scene)
    }

    pub fn pick_ray(&self, ray: &Ray, scene: &Scene) -> Option<Hit> {
        let mut best: Option<(ObjectId, f32)> = None;
        for &id in &self.registry {
            let Some(node) = scene.get(id) else {
                continue;
            };
            if let Some(t) = ray_mesh(ray, &node.mesh, &node.transform.matrix()) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((id, t)),
                }
            }
        }
        best.map(|(object, distance)| Hit {
            object,
            distance,
            point: ray.at(distance),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn aabb_hit_and_miss() {
        let b = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        assert!((ray_aabb(&ray_z(), &b).unwrap() - 9.0).abs() < 1e-5);
        let miss = Ray {
            origin: Vec3::new(3.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_aabb(&miss, &b).is_none());
    }

    #[test]
    fn aabb_behind_origin_is_ignored() {
        let b = Aabb {
            min: Vec3::new(-1.0, -1.0, 11.0),
            max: Vec3::new(1.0, 1.0, 12.0),
        };
        assert!(ray_aabb(&ray_z(), &b).is_none());
    }

    #[test]
    fn triangle_hit_is_double_sided() {
        let tri = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let flipped = [tri[0], tri[2], tri[1]];
        assert!((ray_triangle(&ray_z(), &tri).unwrap() - 10.0).abs() < 1e-5);
        assert!((ray_triangle(&ray_z(), &flipped).unwrap() - 10.0).abs() < 1e-5);
    }

    // Off-axis so the ray crosses a face interior rather than the apex.
    fn ray_off_axis() -> Ray {
        Ray {
            origin: Vec3::new(0.1, 0.05, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn mesh_distance_is_in_world_units_under_scale() {
        let mesh = MeshData::octahedron(Vec3::ZERO, 1.0, [1.0; 4]);
        let model = Mat4::from_scale(Vec3::splat(2.0));
        let t = ray_mesh(&ray_off_axis(), &mesh, &model).unwrap();
        assert!((t - 8.15).abs() < 1e-4);
    }

    #[test]
    fn mesh_under_negative_scale_still_hits() {
        let mesh = MeshData::octahedron(Vec3::ZERO, 1.0, [1.0; 4]);
        let model = Mat4::from_scale(Vec3::new(-0.7, -0.7, 0.7));
        let t = ray_mesh(&ray_off_axis(), &mesh, &model).unwrap();
        assert!((t - 9.45).abs() < 1e-4);
    }

    #[test]
    fn camera_ray_through_center_looks_forward() {
        let cam = Camera {
            position: Vec3::ZERO,
            ..Camera::default()
        };
        let ray = Ray::from_camera(&cam, Vec2::ZERO);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }
}
