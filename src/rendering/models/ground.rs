use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use log::trace;

use crate::rendering::backend::{DrawCall, FrameParams, GpuMeshId, GpuTextureId, MeshSource, RenderBackend};
use crate::rendering::common::types::{Mesh, VertexBuffers};

struct GroundResources {
    backend: Rc<dyn RenderBackend>,
    mesh: GpuMeshId,
    /// Not owned, textures belong to the texture provider.
    texture: Option<GpuTextureId>,
}

/// A flat, textured quad centered on the local origin.
pub struct GroundPlane {
    half_extent: f32,
    resources: Option<GroundResources>,
}

impl GroundPlane {
    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent,
            resources: None,
        }
    }

    pub fn create_mesh(half_extent: f32) -> Mesh {
        let h = half_extent;
        Mesh {
            vertex_buffers: VertexBuffers {
                position_buffer: vec![
                    Vec3::new(-h, 0.0, -h),
                    Vec3::new(-h, 0.0, h),
                    Vec3::new(h, 0.0, h),
                    Vec3::new(h, 0.0, -h),
                ],
                normals_buffer: vec![Vec3::Y; 4],
                // the texture repeats twice per cell
                texcoord_buffer_0: vec![
                    Vec2::new(0.0, 0.0),
                    Vec2::new(0.0, 2.0),
                    Vec2::new(2.0, 2.0),
                    Vec2::new(2.0, 0.0),
                ],
                vertex_color_0: vec![[0xFF; 4]; 4],
            },
            index_buffer: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// Uploads the quad. Calling this again replaces the previous upload.
    pub fn initialize(
        &mut self,
        backend: &Rc<dyn RenderBackend>,
        texture: Option<GpuTextureId>,
    ) -> Result<(), anyhow::Error> {
        let mesh = GroundPlane::create_mesh(self.half_extent);
        let mesh = backend.upload_mesh("ground", MeshSource::Geometry(&mesh))?;
        trace!("Ground plane uploaded as {:?}", mesh);

        // dropping the previous resources releases their mesh
        self.resources = Some(GroundResources {
            backend: backend.clone(),
            mesh,
            texture,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.resources.is_some()
    }

    pub fn texture(&self) -> Option<GpuTextureId> {
        self.resources.as_ref().and_then(|resources| resources.texture)
    }

    pub fn render(&self, model_matrix: Mat4, frame: &FrameParams) {
        let Some(resources) = &self.resources else {
            return;
        };

        resources.backend.draw(&DrawCall {
            mesh: resources.mesh,
            texture: resources.texture,
            model_matrix,
            animation_time: None,
            frame,
        });
    }
}

impl Drop for GroundResources {
    fn drop(&mut self) {
        self.backend.release_mesh(self.mesh);
    }
}
