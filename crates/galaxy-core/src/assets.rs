//! Decoding of fetched bytes into scene meshes and background pixels.
//!
//! Fetching itself is platform specific and lives in the front-end; this
//! module only sees byte slices.

use crate::error::LoadError;
use crate::scene::MeshData;
use fnv::FnvHashMap;
use glam::{Mat3, Mat4, Vec3};

/// A parsed glTF document, `.gltf` or `.glb`, whose geometry can be flattened
/// into a single [`MeshData`] once its external buffers are available.
pub struct GltfAsset {
    gltf: gltf::Gltf,
}

impl GltfAsset {
    pub fn parse(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(Self {
            gltf: gltf::Gltf::from_slice(bytes)?,
        })
    }

    /// Relative URIs of buffers stored next to the document.
    pub fn external_buffers(&self) -> Vec<String> {
        self.gltf
            .buffers()
            .filter_map(|b| match b.source() {
                gltf::buffer::Source::Uri(uri) if !uri.starts_with("data:") => {
                    Some(uri.to_string())
                }
                _ => None,
            })
            .collect()
    }

    /// Flattens every triangle primitive of the default scene into the
    /// asset's root space.
    pub fn to_mesh(&self, external: &FnvHashMap<String, Vec<u8>>) -> Result<MeshData, LoadError> {
        let mut buffers: Vec<&[u8]> = Vec::new();
        for buffer in self.gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => self
                    .gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| LoadError::MissingBuffer("binary chunk".to_string()))?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                    return Err(LoadError::DataUriBuffer)
                }
                gltf::buffer::Source::Uri(uri) => external
                    .get(uri)
                    .map(Vec::as_slice)
                    .ok_or_else(|| LoadError::MissingBuffer(uri.to_string()))?,
            };
            buffers.push(data);
        }

        let scene = self
            .gltf
            .default_scene()
            .or_else(|| self.gltf.scenes().next())
            .ok_or(LoadError::NoGeometry)?;

        let mut out: Option<MeshData> = None;
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &buffers, &mut out);
        }
        out.ok_or(LoadError::NoGeometry)
    }
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[&[u8]],
    out: &mut Option<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            if let Some(part) = read_primitive(&primitive, &world, buffers) {
                match out {
                    Some(acc) => acc.merge(&part),
                    None => *out = Some(part),
                }
            }
        }
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn read_primitive(
    primitive: &gltf::Primitive,
    world: &Mat4,
    buffers: &[&[u8]],
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).copied());
    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from_array(p)).to_array())
        .collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ix) => ix.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let normal_matrix = Mat3::from_mat4(*world).inverse().transpose();
    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(ns) => ns
            .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero().to_array())
            .collect(),
        None => smooth_normals(&positions, &indices),
    };

    let base = primitive.material().pbr_metallic_roughness().base_color_factor();
    let colors: Vec<[f32; 4]> = match reader.read_colors(0) {
        Some(cs) => cs
            .into_rgba_f32()
            .map(|c| [c[0] * base[0], c[1] * base[1], c[2] * base[2], c[3] * base[3]])
            .collect(),
        None => vec![base; positions.len()],
    };
    if normals.len() != positions.len() || colors.len() != positions.len() {
        log::warn!("[assets] skipping primitive with mismatched attribute counts");
        return None;
    }
    MeshData::new(positions, normals, colors, indices)
}

/// Area-weighted vertex normals for primitives that ship without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= acc.len() || b >= acc.len() || c >= acc.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from_array(positions[a]),
            Vec3::from_array(positions[b]),
            Vec3::from_array(positions[c]),
        );
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Resolve a buffer URI against the path of the document that names it.
pub fn resolve_relative(document_path: &str, uri: &str) -> String {
    if uri.contains("://") || uri.starts_with('/') {
        return uri.to_string();
    }
    match document_path.rfind('/') {
        Some(i) => format!("{}/{}", &document_path[..i], uri),
        None => uri.to_string(),
    }
}

/// RGBA8 pixels of the background image.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn decode(bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }
}
