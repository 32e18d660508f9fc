//! Product model loading: fetch the GLB over HTTP, decode it, and flatten
//! the node hierarchy into renderer-ready mesh data plus the traversable
//! [`ObjectModel`] the controller works with.

use glam::{Mat4, Vec3};
use showroom_core::{Aabb, Material, MeshInfo, Node, ObjectModel, ViewerError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// CPU-side geometry for one mesh primitive, with its node transform baked
/// into the vertices so the renderer only needs the controller's model
/// matrix.
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

pub struct LoadedModel {
    pub object: ObjectModel,
    pub meshes: Vec<MeshData>,
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
    let window = web::window().ok_or_else(|| ViewerError::AssetLoad("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| ViewerError::AssetLoad(format!("fetch failed: {e:?}")))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|_| ViewerError::AssetLoad("fetch returned a non-Response".into()))?;
    if !resp.ok() {
        return Err(ViewerError::AssetLoad(format!(
            "HTTP {} for {url}",
            resp.status()
        )));
    }
    let buf_promise = resp
        .array_buffer()
        .map_err(|e| ViewerError::AssetLoad(format!("{e:?}")))?;
    let buf = JsFuture::from(buf_promise)
        .await
        .map_err(|e| ViewerError::AssetLoad(format!("{e:?}")))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

pub fn decode_glb(bytes: &[u8]) -> Result<LoadedModel, ViewerError> {
    let gltf = gltf::Gltf::from_slice(bytes)
        .map_err(|e| ViewerError::AssetLoad(format!("GLB decode: {e}")))?;
    let blob = gltf.blob.as_deref();

    let mut nodes = Vec::new();
    let mut meshes = Vec::new();
    let mut aabb: Option<Aabb> = None;

    let scene = gltf
        .document
        .default_scene()
        .or_else(|| gltf.document.scenes().next())
        .ok_or_else(|| ViewerError::AssetLoad("GLB has no scene".into()))?;
    for node in scene.nodes() {
        visit_node(&node, Mat4::IDENTITY, blob, &mut nodes, &mut meshes, &mut aabb)?;
    }

    let aabb = aabb.ok_or_else(|| ViewerError::AssetLoad("GLB has no geometry".into()))?;
    if meshes.is_empty() {
        return Err(ViewerError::AssetLoad("GLB has no meshes".into()));
    }
    log::info!(
        "decoded model: {} nodes, {} meshes, extent {:?}",
        nodes.len(),
        meshes.len(),
        aabb.size()
    );
    Ok(LoadedModel {
        object: ObjectModel::new(nodes, aabb),
        meshes,
    })
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    blob: Option<&[u8]>,
    nodes: &mut Vec<Node>,
    meshes: &mut Vec<MeshData>,
    aabb: &mut Option<Aabb>,
) -> Result<(), ViewerError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    let name = node.name().unwrap_or("unnamed").to_string();

    match node.mesh() {
        None => nodes.push(Node { name, mesh: None }),
        Some(mesh) => {
            for primitive in mesh.primitives() {
                let data = read_primitive(&primitive, blob, world)?;
                if data.positions.is_empty() {
                    continue;
                }
                let Some(bounds) = Aabb::from_points(data.positions.iter().map(|p| Vec3::from(*p)))
                else {
                    continue;
                };
                *aabb = Some(match aabb {
                    Some(existing) => existing.union(&bounds),
                    None => bounds,
                });
                let pbr = primitive.material().pbr_metallic_roughness();
                let base = pbr.base_color_factor();
                nodes.push(Node {
                    name: name.clone(),
                    mesh: Some(MeshInfo {
                        gpu_index: meshes.len(),
                        material: Material {
                            color: [base[0], base[1], base[2]],
                            metalness: pbr.metallic_factor(),
                            roughness: pbr.roughness_factor(),
                        },
                    }),
                });
                meshes.push(data);
            }
        }
    }

    for child in node.children() {
        visit_node(&child, world, blob, nodes, meshes, aabb)?;
    }
    Ok(())
}

fn read_primitive(
    primitive: &gltf::Primitive,
    blob: Option<&[u8]>,
    world: Mat4,
) -> Result<MeshData, ViewerError> {
    let reader = primitive.reader(|buffer| match buffer.source() {
        gltf::buffer::Source::Bin => blob,
        // External .bin references are not supported for the single-file GLB asset
        gltf::buffer::Source::Uri(_) => None,
    });

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| ViewerError::AssetLoad("primitive has no positions".into()))?
        .map(|p| world.transform_point3(Vec3::from(p)).to_array())
        .collect();

    let normal_matrix = glam::Mat3::from_mat4(world).inverse().transpose();
    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(iter) => iter
            .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero().to_array())
            .collect(),
        None => flat_normals(&positions),
    };

    let indices: Vec<u32> = match reader.read_indices() {
        Some(idx) => idx.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    Ok(MeshData {
        positions,
        normals,
        indices,
    })
}

/// Per-vertex normals from unindexed triangle soup when the file carries
/// none.
fn flat_normals(positions: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    for (i, tri) in positions.chunks_exact(3).enumerate() {
        let a = Vec3::from(tri[0]);
        let b = Vec3::from(tri[1]);
        let c = Vec3::from(tri[2]);
        let n = (b - a).cross(c - a).normalize_or_zero().to_array();
        normals[i * 3] = n;
        normals[i * 3 + 1] = n;
        normals[i * 3 + 2] = n;
    }
    normals
}
