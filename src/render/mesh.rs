use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex: position, atlas UV, light scalar.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub light: f32,
}

/// Index order of the two triangles of a quad.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quad given its corners in winding order.
    pub fn add_quad(&mut self, corners: [Vec3; 4], uvs: [[f32; 2]; 4], light: f32) {
        let base = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            self.vertices.push(Vertex {
                position: corner.to_array(),
                uv,
                light,
            });
        }
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex buffer as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Geometry of one chunk: cube faces and cross-shaped foliage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMeshes {
    pub opaque: MeshData,
    pub translucent: MeshData,
}

impl ChunkMeshes {
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_indices_offset_by_base() {
        let mut mesh = MeshData::new();
        let corners = [Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y];
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        mesh.add_quad(corners, uvs, 1.0);
        mesh.add_quad(corners, uvs, 0.5);

        assert_eq!(mesh.quad_count(), 2);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 6, 7, 4]);
        assert_eq!(mesh.vertex_bytes().len(), 8 * std::mem::size_of::<Vertex>());
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
