use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use anyhow::bail;
use glam::Mat4;
use log::{error, trace};

use crate::rendering::backend::{DrawCall, GpuMeshId, GpuTextureId, MeshSource, RenderBackend};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackendStats {
    pub meshes_uploaded: usize,
    pub meshes_released: usize,
    pub textures_uploaded: usize,
    pub textures_released: usize,
    pub draw_calls: usize,
    /// Releases of ids that were never handed out or already released.
    pub invalid_releases: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedDraw {
    pub mesh: GpuMeshId,
    pub texture: Option<GpuTextureId>,
    pub model_matrix: Mat4,
    pub model_view_projection: Mat4,
    pub animation_time: Option<f32>,
}

/// A backend without a GPU: it hands out ids, keeps track of which of them are alive and records
/// draw calls. Used for the flythrough mode and as the backend in tests.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: Cell<u64>,
    live_meshes: RefCell<HashSet<GpuMeshId>>,
    live_textures: RefCell<HashSet<GpuTextureId>>,
    stats: Cell<BackendStats>,
    draws: RefCell<Vec<RecordedDraw>>,
    failing_labels: Vec<String>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh uploads whose label contains `pattern` fail, to simulate a GPU running out of memory.
    pub fn with_failing_mesh_label(mut self, pattern: impl Into<String>) -> Self {
        self.failing_labels.push(pattern.into());
        self
    }

    pub fn stats(&self) -> BackendStats {
        self.stats.get()
    }

    pub fn live_mesh_count(&self) -> usize {
        self.live_meshes.borrow().len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.borrow().len()
    }

    pub fn is_mesh_live(&self, mesh: GpuMeshId) -> bool {
        self.live_meshes.borrow().contains(&mesh)
    }

    pub fn is_texture_live(&self, texture: GpuTextureId) -> bool {
        self.live_textures.borrow().contains(&texture)
    }

    /// Returns all draws recorded since the last call.
    pub fn take_draws(&self) -> Vec<RecordedDraw> {
        std::mem::take(&mut *self.draws.borrow_mut())
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn update_stats(&self, f: impl FnOnce(&mut BackendStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn new_texture(&self) -> GpuTextureId {
        let texture = GpuTextureId(self.allocate_id());
        self.live_textures.borrow_mut().insert(texture);
        self.update_stats(|stats| stats.textures_uploaded += 1);
        texture
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&self, label: &str, source: MeshSource<'_>) -> Result<GpuMeshId, anyhow::Error> {
        if self.failing_labels.iter().any(|pattern| label.contains(pattern.as_str())) {
            bail!("Out of device memory while uploading {}", label);
        }

        let vertex_count = match source {
            MeshSource::Geometry(mesh) => mesh.vertex_buffers.position_buffer.len(),
            MeshSource::Primitive(primitive) => primitive.vertex_count,
        };

        let mesh = GpuMeshId(self.allocate_id());
        trace!("Uploaded mesh {} as {:?} ({} vertices)", label, mesh, vertex_count);
        self.live_meshes.borrow_mut().insert(mesh);
        self.update_stats(|stats| stats.meshes_uploaded += 1);
        Ok(mesh)
    }

    fn release_mesh(&self, mesh: GpuMeshId) {
        if self.live_meshes.borrow_mut().remove(&mesh) {
            self.update_stats(|stats| stats.meshes_released += 1);
        } else {
            error!("Releasing unknown mesh {:?}", mesh);
            self.update_stats(|stats| stats.invalid_releases += 1);
        }
    }

    fn upload_texture(&self, path: &str, bytes: &[u8]) -> Result<GpuTextureId, anyhow::Error> {
        if bytes.is_empty() {
            bail!("Texture {} is empty", path);
        }

        let texture = self.new_texture();
        trace!("Uploaded texture {} as {:?}", path, texture);
        Ok(texture)
    }

    fn create_solid_texture(&self, label: &str, rgba: [u8; 4]) -> GpuTextureId {
        let texture = self.new_texture();
        trace!("Created solid texture {} {:?} as {:?}", label, rgba, texture);
        texture
    }

    fn release_texture(&self, texture: GpuTextureId) {
        if self.live_textures.borrow_mut().remove(&texture) {
            self.update_stats(|stats| stats.textures_released += 1);
        } else {
            error!("Releasing unknown texture {:?}", texture);
            self.update_stats(|stats| stats.invalid_releases += 1);
        }
    }

    fn draw(&self, call: &DrawCall<'_>) {
        if !self.is_mesh_live(call.mesh) {
            error!("Drawing released mesh {:?}", call.mesh);
        }

        self.update_stats(|stats| stats.draw_calls += 1);
        self.draws.borrow_mut().push(RecordedDraw {
            mesh: call.mesh,
            texture: call.texture,
            model_matrix: call.model_matrix,
            model_view_projection: call.model_view_projection(),
            animation_time: call.animation_time,
        });
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::HeadlessBackend;
    use crate::rendering::backend::{DrawCall, FrameParams, MeshSource, RenderBackend};
    use crate::rendering::common::types::{Mesh, VertexBuffers};

    fn empty_mesh() -> Mesh {
        Mesh {
            vertex_buffers: VertexBuffers::default(),
            index_buffer: vec![],
        }
    }

    #[test]
    fn double_release_is_counted() -> Result<(), anyhow::Error> {
        let backend = HeadlessBackend::new();
        let mesh = backend.upload_mesh("quad", MeshSource::Geometry(&empty_mesh()))?;
        assert!(backend.is_mesh_live(mesh));

        backend.release_mesh(mesh);
        backend.release_mesh(mesh);

        let stats = backend.stats();
        assert_eq!(stats.meshes_uploaded, 1);
        assert_eq!(stats.meshes_released, 1);
        assert_eq!(stats.invalid_releases, 1);
        assert_eq!(backend.live_mesh_count(), 0);
        Ok(())
    }

    #[test]
    fn failing_labels_and_empty_textures() {
        let backend = HeadlessBackend::new().with_failing_mesh_label("broken");
        assert!(backend.upload_mesh("models/broken.gltf#0/0", MeshSource::Geometry(&empty_mesh())).is_err());
        assert!(backend.upload_texture("bark.png", &[]).is_err());
        assert_eq!(backend.stats().meshes_uploaded, 0);
        assert_eq!(backend.stats().textures_uploaded, 0);
    }

    #[test]
    fn draws_carry_the_combined_transform() -> Result<(), anyhow::Error> {
        let backend = HeadlessBackend::new();
        let mesh = backend.upload_mesh("quad", MeshSource::Geometry(&empty_mesh()))?;
        let frame = FrameParams {
            view_projection: Mat4::from_scale(Vec3::splat(2.0)),
            light_position: Vec3::Y,
            light_intensity: Vec3::ONE,
            view_position: Vec3::ZERO,
        };

        backend.draw(&DrawCall {
            mesh,
            texture: None,
            model_matrix: Mat4::from_translation(Vec3::new(1.0, 0.0, -3.0)),
            animation_time: None,
            frame: &frame,
        });

        let draws = backend.take_draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(
            draws[0].model_view_projection.transform_point3(Vec3::ZERO),
            Vec3::new(2.0, 0.0, -6.0)
        );
        assert_eq!(backend.stats().draw_calls, 1);
        Ok(())
    }
}
