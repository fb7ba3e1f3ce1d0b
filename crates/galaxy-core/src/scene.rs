//! Scene arena: loaded meshes and their placement.

use crate::manifest::AssetSpec;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::rc::Rc;

/// Handle to an object in the scene arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangle geometry in an asset's local space.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl MeshData {
    /// Builds a mesh from parallel attribute arrays. Returns `None` when there
    /// is no complete triangle or an index points past the vertex list.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        colors: Vec<[f32; 4]>,
        indices: Vec<u32>,
    ) -> Option<Self> {
        if indices.len() < 3 || positions.len() != normals.len() || positions.len() != colors.len() {
            return None;
        }
        if indices.iter().any(|&i| i as usize >= positions.len()) {
            return None;
        }
        let bounds = Aabb::from_points(positions.iter().map(|p| Vec3::from_array(*p)))?;
        Some(Self {
            positions,
            normals,
            colors,
            indices,
            bounds,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                Vec3::from_array(self.positions[t[0] as usize]),
                Vec3::from_array(self.positions[t[1] as usize]),
                Vec3::from_array(self.positions[t[2] as usize]),
            ]
        })
    }

    /// Appends another mesh, rebasing its indices.
    pub fn merge(&mut self, other: &MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.colors.extend_from_slice(&other.colors);
        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.bounds = Aabb {
            min: self.bounds.min.min(other.bounds.min),
            max: self.bounds.max.max(other.bounds.max),
        };
    }

    /// Flat-shaded octahedron, used for stars and test fixtures.
    pub fn octahedron(center: Vec3, radius: f32, color: [f32; 4]) -> Self {
        let axes = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        let faces = [
            (0, 2, 4),
            (2, 1, 4),
            (1, 3, 4),
            (3, 0, 4),
            (2, 0, 5),
            (1, 2, 5),
            (3, 1, 5),
            (0, 3, 5),
        ];
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        for (a, b, c) in faces {
            let n = (axes[a] + axes[b] + axes[c]).normalize();
            for i in [a, b, c] {
                positions.push((center + axes[i] * radius).to_array());
                normals.push(n.to_array());
            }
        }
        let colors = vec![color; positions.len()];
        let indices = (0..positions.len() as u32).collect();
        let r = Vec3::splat(radius.abs());
        Self {
            positions,
            normals,
            colors,
            indices,
            bounds: Aabb {
                min: center - r,
                max: center + r,
            },
        }
    }
}

/// Scale, then rotate, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vec3,
    pub rotation: Quat,
    pub position: Vec3,
}

impl Transform {
    pub fn from_spec(spec: &AssetSpec) -> Self {
        let [rx, ry, rz] = spec.rotation;
        Self {
            scale: Vec3::from_array(spec.scale),
            rotation: Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            position: Vec3::from_array(spec.position),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate about the object's own Y axis.
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            position: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: ObjectId,
    pub name: String,
    pub mesh: Rc<MeshData>,
    pub transform: Transform,
    /// Per-frame local yaw increment.
    pub spin: f32,
}

/// Arena of loaded objects. Only meshes whose load has completed live here.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, replacing any node with the same id.
    pub fn insert(&mut self, node: SceneNode) {
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(slot) => *slot = node,
            None => self.nodes.push(node),
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Advance every spinning node by its per-frame increment.
    pub fn advance_spins(&mut self) {
        for node in &mut self.nodes {
            if node.spin != 0.0 {
                node.transform.rotate_local_y(node.spin);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octahedron_is_closed_and_bounded() {
        let m = MeshData::octahedron(Vec3::new(1.0, 2.0, 3.0), 0.5, [1.0; 4]);
        assert_eq!(m.triangle_count(), 8);
        assert_eq!(m.bounds.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.bounds.max - m.bounds.min, Vec3::splat(1.0));
    }

    #[test]
    fn mesh_rejects_out_of_range_indices() {
        let p = vec![[0.0; 3]; 3];
        let n = vec![[0.0, 0.0, 1.0]; 3];
        let c = vec![[1.0; 4]; 3];
        assert!(MeshData::new(p.clone(), n.clone(), c.clone(), vec![0, 1, 2]).is_some());
        assert!(MeshData::new(p, n, c, vec![0, 1, 3]).is_none());
    }

    #[test]
    fn merge_rebases_indices() {
        let mut a = MeshData::octahedron(Vec3::ZERO, 1.0, [1.0; 4]);
        let b = MeshData::octahedron(Vec3::new(5.0, 0.0, 0.0), 1.0, [1.0; 4]);
        a.merge(&b);
        assert_eq!(a.triangle_count(), 16);
        assert_eq!(*a.indices.last().unwrap(), 47);
        assert_eq!(a.bounds.max.x, 6.0);
    }

    #[test]
    fn spin_accumulates_about_local_y() {
        let mut t = Transform::default();
        for _ in 0..10 {
            t.rotate_local_y(0.1);
        }
        let expected = Quat::from_rotation_y(1.0);
        assert!(t.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn insert_replaces_same_id() {
        let mesh = Rc::new(MeshData::octahedron(Vec3::ZERO, 1.0, [1.0; 4]));
        let mut scene = Scene::new();
        for name in ["first", "second"] {
            scene.insert(SceneNode {
                id: ObjectId(7),
                name: name.to_string(),
                mesh: mesh.clone(),
                transform: Transform::default(),
                spin: 0.0,
            });
        }
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(ObjectId(7)).unwrap().name, "second");
    }
}
