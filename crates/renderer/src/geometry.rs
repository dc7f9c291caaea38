use bytemuck::{Pod, Zeroable};

/// Vertex format shared with the pipeline's vertex buffer layout.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Axis-aligned plane centered on the origin, optionally subdivided into a
/// regular grid. UVs run left-to-right and top-to-bottom so they line up
/// with normalized pointer coordinates without a flip.
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl PlaneGeometry {
    pub fn new(width: f32, height: f32, width_segments: u16, height_segments: u16) -> Self {
        let cols = width_segments.max(1);
        let rows = height_segments.max(1);

        let mut vertices = Vec::with_capacity((cols as usize + 1) * (rows as usize + 1));
        for row in 0..=rows {
            let v = row as f32 / rows as f32;
            let y = height / 2.0 - v * height;
            for col in 0..=cols {
                let u = col as f32 / cols as f32;
                let x = u * width - width / 2.0;
                vertices.push(Vertex {
                    position: [x, y, 0.0],
                    uv: [u, v],
                });
            }
        }

        let stride = cols as u16 + 1;
        let mut indices = Vec::with_capacity(cols as usize * rows as usize * 6);
        for row in 0..rows {
            for col in 0..cols {
                let a = row * stride + col;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    /// The unit quad the distortion plane is built from.
    pub fn unit_quad() -> Self {
        Self::new(1.0, 1.0, 1, 1)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_quad_is_two_triangles() {
        let quad = PlaneGeometry::unit_quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
        assert_eq!(quad.index_count(), 6);
    }

    #[test]
    fn unit_quad_spans_centered_extent() {
        let quad = PlaneGeometry::unit_quad();
        let xs: Vec<f32> = quad.vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = quad.vertices.iter().map(|v| v.position[1]).collect();
        assert!(xs.contains(&-0.5) && xs.contains(&0.5));
        assert!(ys.contains(&-0.5) && ys.contains(&0.5));
        assert!(quad.vertices.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn uvs_run_top_down() {
        let quad = PlaneGeometry::unit_quad();
        // First vertex is the top-left corner.
        assert_eq!(quad.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(quad.vertices[0].position[1], 0.5);
        // Last vertex is the bottom-right corner.
        assert_eq!(quad.vertices[3].uv, [1.0, 1.0]);
        assert_eq!(quad.vertices[3].position[1], -0.5);
    }

    #[test]
    fn subdivision_produces_grid_counts() {
        let plane = PlaneGeometry::new(1.0, 1.0, 4, 3);
        assert_eq!(plane.vertices.len(), 5 * 4);
        assert_eq!(plane.indices.len(), 4 * 3 * 6);
        // All indices reference valid vertices.
        let max = *plane.indices.iter().max().unwrap() as usize;
        assert!(max < plane.vertices.len());
    }
}
