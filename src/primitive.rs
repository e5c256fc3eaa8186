use wgpu::util::DeviceExt;
use super::{
    INV_SQRT_3,
    render::GpuContext,
};

/// Describes a single vertex of a tile relative to the tile center
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// The position in the plane
    pub position: [f32; 2],
}

impl Vertex {
    /// Gets the memory description of a tile vertex
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ]
        }
    }
}

/// The shape drawn for every tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveType {
    /// A pointy-top hexagon of width 1, neighbouring tiles share edges
    Hexagon,
    /// A unit square
    Rectangle,
}

/// The vertices of a pointy-top hexagon of width 1
static HEXAGON_VERTICES: [Vertex; 6] = [
    Vertex { position: [ 0.5,  0.5 * INV_SQRT_3 as f32] },
    Vertex { position: [ 0.0,        INV_SQRT_3 as f32] },
    Vertex { position: [-0.5,  0.5 * INV_SQRT_3 as f32] },
    Vertex { position: [-0.5, -0.5 * INV_SQRT_3 as f32] },
    Vertex { position: [ 0.0,       -INV_SQRT_3 as f32] },
    Vertex { position: [ 0.5, -0.5 * INV_SQRT_3 as f32] },
];

/// The triangles filling a hexagon
static HEXAGON_INDICES: [u16; 12] = [
    0, 1, 2,
    2, 3, 0,
    3, 5, 0,
    3, 4, 5,
];

/// The vertices of a unit square
static RECTANGLE_VERTICES: [Vertex; 4] = [
    Vertex { position: [ 0.5,  0.5] },
    Vertex { position: [-0.5,  0.5] },
    Vertex { position: [-0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5] },
];

/// The triangles filling a square
static RECTANGLE_INDICES: [u16; 6] = [
    0, 1, 2,
    2, 3, 0,
];

impl PrimitiveType {
    /// Retrieves the vertices of the primitive, counter clockwise
    pub fn vertices(&self) -> &'static [Vertex] {
        match self {
            Self::Hexagon => &HEXAGON_VERTICES,
            Self::Rectangle => &RECTANGLE_VERTICES,
        }
    }

    /// Retrieves indices for the triangles filling the primitive
    pub fn indices(&self) -> &'static [u16] {
        match self {
            Self::Hexagon => &HEXAGON_INDICES,
            Self::Rectangle => &RECTANGLE_INDICES,
        }
    }
}

/// Holds GPU buffers for the vertex data to draw a single tile
pub struct BufferVertices {
    /// The buffer holding all vertices of the tile
    vertices: wgpu::Buffer,
    /// The indices describing the triangles of the fill
    indices: wgpu::Buffer,
    /// The number of indices
    count: u32,
}

impl BufferVertices {
    /// Uploads the primitive
    ///
    /// # Parameters
    ///
    /// primitive: The shape to upload
    ///
    /// context: The gpu to create the resources on
    pub fn new(primitive: PrimitiveType, context: &GpuContext) -> Self {
        let vertices = context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Tile Vertex Buffer"),
            contents: bytemuck::cast_slice(primitive.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = context.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Tile Index Buffer"),
            contents: bytemuck::cast_slice(primitive.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertices,
            indices,
            count: primitive.indices().len() as u32,
        }
    }

    /// Sets the tile vertex information for the given render pass and returns the number of indices
    ///
    /// # Parameters
    ///
    /// render_pass: The render pass to set the vertex info for
    pub fn set<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) -> u32 {
        render_pass.set_vertex_buffer(0, self.vertices.slice(..));
        render_pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);

        self.count
    }
}
