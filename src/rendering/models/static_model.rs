use std::rc::Rc;

use glam::Mat4;

use crate::rendering::asset_cache::model_cache::{ModelCache, ModelHandle};
use crate::rendering::backend::{DrawCall, FrameParams, RenderBackend};

/// A model without animation, e.g. trees and rocks. The GPU data is shared through the cache.
pub struct StaticModel {
    handle: ModelHandle,
    backend: Rc<dyn RenderBackend>,
}

impl StaticModel {
    pub fn load(cache: &ModelCache, path: &str) -> Option<Self> {
        let handle = cache.acquire(path)?;
        Some(Self {
            handle,
            backend: cache.backend().clone(),
        })
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn render(&self, model_matrix: Mat4, frame: &FrameParams) {
        // unindexed primitives are not drawn
        for primitive in self.handle.model().primitives.iter().filter(|p| p.index_count > 0) {
            self.backend.draw(&DrawCall {
                mesh: primitive.mesh,
                texture: Some(primitive.texture),
                model_matrix,
                animation_time: None,
                frame,
            });
        }
    }
}
