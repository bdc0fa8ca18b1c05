//! The seam between the world and whatever talks to the GPU. The world only ever uploads,
//! releases and draws; shader programs, uniform wiring and state restoration are the backend's
//! business. All methods take `&self`, backends use interior mutability, just like a renderer
//! that hands out resource handles.

use glam::{Mat4, Vec3};

use crate::rendering::common::types::{Mesh, PrimitiveDescriptor};

pub mod headless;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuMeshId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GpuTextureId(pub u64);

#[derive(Debug, Clone, Copy)]
pub enum MeshSource<'a> {
    /// CPU side geometry, e.g. the ground plane
    Geometry(&'a Mesh),
    /// A primitive of a model file, the backend reads the buffers on its own.
    Primitive(&'a PrimitiveDescriptor),
}

/// Everything that is constant for all draw calls of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub view_projection: Mat4,
    pub light_position: Vec3,
    pub light_intensity: Vec3,
    pub view_position: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub mesh: GpuMeshId,
    pub texture: Option<GpuTextureId>,
    pub model_matrix: Mat4,
    /// Seconds into the clip, only set for skinned, animated models.
    pub animation_time: Option<f32>,
    pub frame: &'a FrameParams,
}

impl DrawCall<'_> {
    #[inline]
    pub fn model_view_projection(&self) -> Mat4 {
        self.frame.view_projection * self.model_matrix
    }
}

pub trait RenderBackend {
    fn upload_mesh(&self, label: &str, source: MeshSource<'_>) -> Result<GpuMeshId, anyhow::Error>;

    fn release_mesh(&self, mesh: GpuMeshId);

    /// `bytes` are the raw, still encoded, image file contents.
    fn upload_texture(&self, path: &str, bytes: &[u8]) -> Result<GpuTextureId, anyhow::Error>;

    /// A 1x1 texture, used whenever a material does not carry a (loadable) texture.
    fn create_solid_texture(&self, label: &str, rgba: [u8; 4]) -> GpuTextureId;

    fn release_texture(&self, texture: GpuTextureId);

    fn draw(&self, call: &DrawCall<'_>);
}
