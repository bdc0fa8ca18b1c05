use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{trace, warn};

use crate::io::common::loader::RawAssetLoader;
use crate::rendering::backend::{GpuTextureId, RenderBackend};

/// Deduplicates texture uploads by path. Textures live as long as the provider, there is no
/// reference counting: the set of textures used by the world is small and bounded.
pub struct TextureProvider {
    raw_loader: Rc<dyn RawAssetLoader>,
    backend: Rc<dyn RenderBackend>,
    textures: RefCell<HashMap<String, GpuTextureId>>,
}

impl TextureProvider {
    pub fn new(raw_loader: Rc<dyn RawAssetLoader>, backend: Rc<dyn RenderBackend>) -> Self {
        Self {
            raw_loader,
            backend,
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// Failures are not remembered, a later call for the same path tries again.
    pub fn get_texture(&self, path: &str) -> Option<GpuTextureId> {
        if let Some(texture) = self.textures.borrow().get(path) {
            return Some(*texture);
        }

        let bytes = self.raw_loader.load_raw_owned(path)?;
        match self.backend.upload_texture(path, &bytes) {
            Ok(texture) => {
                trace!("Texture {} is now {:?}", path, texture);
                self.textures.borrow_mut().insert(path.to_string(), texture);
                Some(texture)
            }
            Err(err) => {
                warn!("Uploading texture {} failed: {}", path, err);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.textures.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.borrow().is_empty()
    }

    /// Releases every texture, the provider can be used again afterwards.
    pub fn cleanup(&self) {
        for (_, texture) in self.textures.borrow_mut().drain() {
            self.backend.release_texture(texture);
        }
    }
}

impl Drop for TextureProvider {
    fn drop(&mut self) {
        self.cleanup();
    }
}
