use glam::{Vec2, Vec3, Vec4};
use std::fmt::{Debug, Formatter};

/// Geometry that is generated on the CPU (e.g. the ground plane), as opposed to primitives that
/// are read from a model file on upload.
#[derive(Clone)]
pub struct Mesh {
    pub vertex_buffers: VertexBuffers,
    pub index_buffer: Vec<u32>,
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ vertex_buffers: {:?}, ", self.vertex_buffers)?;
        write!(f, "index_buffer: [{}] }}", self.index_buffer.len())
    }
}

#[derive(Clone, Default)]
pub struct VertexBuffers {
    pub position_buffer: Vec<Vec3>,
    pub normals_buffer: Vec<Vec3>,
    pub texcoord_buffer_0: Vec<Vec2>,
    pub vertex_color_0: Vec<[u8; 4]>,
}

impl Debug for VertexBuffers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ position_buffer: [{}], ", self.position_buffer.len())?;
        write!(f, "normals_buffer: [{}], ", self.normals_buffer.len())?;
        write!(f, "texcoord_buffer_0: [{}], ", self.texcoord_buffer_0.len())?;
        write!(f, "vertex_color_0: [{}] }}", self.vertex_color_0.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl TryFrom<u32> for PrimitiveTopology {
    type Error = u32;

    fn try_from(mode: u32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(PrimitiveTopology::Points),
            1 => Ok(PrimitiveTopology::Lines),
            2 => Ok(PrimitiveTopology::LineLoop),
            3 => Ok(PrimitiveTopology::LineStrip),
            4 => Ok(PrimitiveTopology::Triangles),
            5 => Ok(PrimitiveTopology::TriangleStrip),
            6 => Ok(PrimitiveTopology::TriangleFan),
            other => Err(other),
        }
    }
}

/// One drawable part of a model file. The vertex data stays in the file's buffers, this only
/// describes where to find it and how to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveDescriptor {
    pub asset_path: String,
    pub mesh_index: usize,
    pub primitive_index: usize,
    pub attributes: Vec<String>,
    pub vertex_count: usize,
    /// 0 for primitives without an index buffer, those are not drawn.
    pub index_count: usize,
    pub topology: PrimitiveTopology,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    /// Already resolved relative to the asset root.
    pub base_color_texture: Option<String>,
    pub base_color_factor: Vec4,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color_texture: None,
            base_color_factor: Vec4::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: Option<String>,
    /// seconds
    pub duration: f32,
    pub channel_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skeleton {
    pub joint_count: usize,
}
