//! CPU-side geometry for the photo discs and the floor.

use std::f32::consts::TAU;

/// Vertex layout shared by every mesh in the scene.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in object-local coordinates.
    pub position: [f32; 3],
    /// Surface normal (unit length).
    pub normal: [f32; 3],
    /// Texture coordinates, origin at the image's top-left.
    pub uv: [f32; 2],
}

impl MeshVertex {
    /// Vertex buffer layout matching `VertexInput` in the shader.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Buffer layout for pipeline creation.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Triangle-list mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    /// Vertex data.
    pub vertices: Vec<MeshVertex>,
    /// Indices into `vertices`, three per triangle.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Flat disc in the local XY plane facing +Z, built as a fan around the centre.
///
/// The image is mapped onto the disc's bounding square, so the photo is cropped
/// to a circle.
pub fn circle_mesh(radius: f32, segments: u32) -> MeshBuffers {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(segments as usize + 2);
    let mut indices = Vec::with_capacity(segments as usize * 3);

    vertices.push(MeshVertex {
        position: [0.0, 0.0, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [0.5, 0.5],
    });

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        vertices.push(MeshVertex {
            position: [cos * radius, sin * radius, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [(cos + 1.0) * 0.5, (1.0 - sin) * 0.5],
        });
    }

    for i in 1..=segments {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    MeshBuffers { vertices, indices }
}

/// Square floor of edge `size` in the local XZ plane facing +Y.
pub fn ground_mesh(size: f32) -> MeshBuffers {
    let h = size * 0.5;
    let corner = |x: f32, z: f32, u: f32, v: f32| MeshVertex {
        position: [x, 0.0, z],
        normal: [0.0, 1.0, 0.0],
        uv: [u, v],
    };

    MeshBuffers {
        vertices: vec![
            corner(-h, -h, 0.0, 0.0),
            corner(-h, h, 0.0, 1.0),
            corner(h, h, 1.0, 1.0),
            corner(h, -h, 1.0, 0.0),
        ],
        // Counter-clockwise seen from above.
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
