//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh geometry on the GPU side. Positions
//! and texture coordinates live in separate tightly packed buffers, bound to fixed shader slots.

use std::sync::Arc;

use crate::abs::{Gpu, VertexAttribute};

/// Shader input slot of the vertex position (3 floats).
pub const POSITION_LOCATION: u32 = 0;
/// Shader input slot of the texture coordinate (2 floats).
pub const UV_LOCATION: u32 = 1;

/// Represents indexed triangle geometry stored on the GPU side.
pub struct Mesh<G: Gpu = glow::Context> {
    gpu: Arc<G>,
    vao: G::VertexArrayId,
    index_buffer: G::BufferId,
    position_buffer: G::BufferId,
    uv_buffer: Option<G::BufferId>,
    index_count: usize,
}

impl<G: Gpu> Mesh<G> {
    /// Uploads the given arrays verbatim and builds the vertex array describing them.
    ///
    /// `positions` holds 3 floats per vertex and `uvs`, if present, 2 floats per vertex. On
    /// failure every object created so far is released again.
    pub fn new(
        gpu: &Arc<G>,
        positions: &[f32],
        uvs: Option<&[f32]>,
        indices: &[u32],
    ) -> Result<Self, String> {
        let mut created = Vec::with_capacity(3);
        let result = Self::upload(gpu, positions, uvs, indices, &mut created);
        if result.is_err() {
            for buffer in created {
                gpu.release_buffer(buffer);
            }
        }
        result
    }

    fn upload(
        gpu: &Arc<G>,
        positions: &[f32],
        uvs: Option<&[f32]>,
        indices: &[u32],
        created: &mut Vec<G::BufferId>,
    ) -> Result<Self, String> {
        let index_buffer = gpu.upload_buffer(bytemuck::cast_slice(indices))?;
        created.push(index_buffer);

        let position_buffer = gpu.upload_buffer(bytemuck::cast_slice(positions))?;
        created.push(position_buffer);

        let uv_buffer = match uvs {
            Some(uvs) => {
                let buffer = gpu.upload_buffer(bytemuck::cast_slice(uvs))?;
                created.push(buffer);
                Some(buffer)
            }
            None => None,
        };

        let mut attributes = vec![VertexAttribute {
            location: POSITION_LOCATION,
            components: 3,
            buffer: position_buffer,
        }];
        if let Some(buffer) = uv_buffer {
            attributes.push(VertexAttribute {
                location: UV_LOCATION,
                components: 2,
                buffer,
            });
        }
        let vao = gpu.upload_vertex_array(&attributes, index_buffer)?;

        Ok(Self {
            gpu: Arc::clone(gpu),
            vao,
            index_buffer,
            position_buffer,
            uv_buffer,
            index_count: indices.len(),
        })
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        self.gpu.draw_indexed_triangles(self.vao, self.index_count);
    }

    /// Returns the amount of indices used in the mesh.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Returns the amount of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }

    pub fn has_uvs(&self) -> bool {
        self.uv_buffer.is_some()
    }
}

impl<G: Gpu> Drop for Mesh<G> {
    fn drop(&mut self) {
        self.gpu.release_buffer(self.index_buffer);
        self.gpu.release_buffer(self.position_buffer);
        if let Some(uv_buffer) = self.uv_buffer {
            self.gpu.release_buffer(uv_buffer);
        }
        self.gpu.release_vertex_array(self.vao);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::gpu::recording::{Call, Kind, RecordingGpu};

    const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    const TRIANGLE_UVS: [f32; 6] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_layout_with_uvs() {
        let gpu = Arc::new(RecordingGpu::default());
        let mesh = Mesh::new(&gpu, &TRIANGLE, Some(&TRIANGLE_UVS), &[0, 1, 2]).unwrap();
        assert!(mesh.has_uvs());
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);

        // Buffers 1..=3 are index, position and uv; the VAO is 4.
        assert!(gpu.calls().contains(&Call::VertexArray {
            id: 4,
            attributes: vec![
                VertexAttribute {
                    location: POSITION_LOCATION,
                    components: 3,
                    buffer: 2,
                },
                VertexAttribute {
                    location: UV_LOCATION,
                    components: 2,
                    buffer: 3,
                },
            ],
            index_buffer: 1,
        }));

        mesh.draw();
        assert_eq!(gpu.calls().last(), Some(&Call::Draw(4, 3)));
    }

    #[test]
    fn test_no_uv_buffer_without_uvs() {
        let gpu = Arc::new(RecordingGpu::default());
        let mesh = Mesh::new(&gpu, &TRIANGLE, None, &[0, 1, 2]).unwrap();
        assert!(!mesh.has_uvs());
        assert_eq!(gpu.count(Kind::Buffer), 2);
        assert_eq!(gpu.count(Kind::VertexArray), 1);

        drop(mesh);
        assert_eq!(gpu.created(), gpu.released());
    }

    #[test]
    fn test_failed_upload_releases_buffers() {
        let gpu = Arc::new(RecordingGpu::default());
        gpu.fail_vertex_arrays.set(true);

        assert!(Mesh::new(&gpu, &TRIANGLE, Some(&TRIANGLE_UVS), &[0, 1, 2]).is_err());
        assert_eq!(gpu.count(Kind::Buffer), 3);
        assert_eq!(gpu.created(), gpu.released());
    }
}
