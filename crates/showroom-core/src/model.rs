//! Loaded-object handle shared between the asset loader, the controller and
//! the renderer.
//!
//! These types intentionally avoid referencing platform-specific APIs: the
//! web frontend builds an [`ObjectModel`] from a decoded GLB and the core
//! controller traverses it for material overrides and theme changes without
//! knowing anything about GPU buffers.

use glam::Vec3;

/// Axis-aligned bounding box in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Grow the box from an iterator of points. Returns `None` for an empty
    /// iterator (a model with no vertices has no meaningful bounds).
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn max_dim(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }
}

/// Physically-based material parameters carried per mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

/// A renderable sub-part: an index into the renderer's GPU mesh list plus
/// its material state.
#[derive(Clone, Debug)]
pub struct MeshInfo {
    pub gpu_index: usize,
    pub material: Material,
}

/// One node of the loaded object's (flattened) hierarchy. Non-mesh nodes
/// (groups, empties, lights baked into the file) carry `mesh: None`.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub mesh: Option<MeshInfo>,
}

/// The loaded object: traversable nodes plus its model-space bounds.
#[derive(Clone, Debug)]
pub struct ObjectModel {
    pub nodes: Vec<Node>,
    pub aabb: Aabb,
}

impl ObjectModel {
    pub fn new(nodes: Vec<Node>, aabb: Aabb) -> Self {
        Self { nodes, aabb }
    }

    /// Visit every mesh sub-part, skipping non-mesh nodes.
    pub fn for_each_mesh_mut(&mut self, mut f: impl FnMut(&mut MeshInfo)) {
        for node in &mut self.nodes {
            if let Some(mesh) = node.mesh.as_mut() {
                f(mesh);
            }
        }
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshInfo> {
        self.nodes.iter().filter_map(|n| n.mesh.as_ref())
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes().count()
    }
}
