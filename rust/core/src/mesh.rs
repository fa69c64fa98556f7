// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh attached to global-mesh anchors.

use serde::{Deserialize, Serialize};

use crate::primitives::{Bounds3, Vec3};

/// Triangle mesh in anchor-local space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriangleMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    #[inline]
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) {
        self.positions.extend_from_slice(&[x, y, z]);
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the vertex at `index`, if present.
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        let chunk = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Vec3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64))
    }

    /// Iterates over vertex positions in f64.
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0] as f64, c[1] as f64, c[2] as f64))
    }

    /// Reverses the winding of every triangle (i0, i1, i2) → (i0, i2, i1).
    pub fn flip_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    /// Number of indices that point past the vertex array.
    pub fn dangling_index_count(&self) -> usize {
        let count = self.vertex_count() as u32;
        self.indices.iter().filter(|&&i| i >= count).count()
    }

    /// Local-space bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds3> {
        Bounds3::from_points(self.vertices())
    }
}
