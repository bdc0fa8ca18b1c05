use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::{error, info, trace, warn};

use crate::io::common::loader::{AssetLoader, RawAssetLoader};
use crate::rendering::asset_cache::texture_provider::TextureProvider;
use crate::rendering::backend::{GpuMeshId, GpuTextureId, MeshSource, RenderBackend};
use crate::rendering::common::types::{AnimationClip, Skeleton};
use crate::rendering::loader::AssetLoadError;
use crate::rendering::loader::model_loader::LoadedModel;

pub const STATIC_FALLBACK_COLOR: [u8; 4] = [50, 205, 50, 255];
pub const ANIMATED_FALLBACK_COLOR: [u8; 4] = [128, 128, 128, 255];

pub type ModelAssetLoader = dyn AssetLoader<Result<LoadedModel, AssetLoadError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuPrimitive {
    pub mesh: GpuMeshId,
    pub texture: GpuTextureId,
    pub index_count: usize,
}

/// The GPU resident representation of one model file.
#[derive(Debug)]
pub struct GpuModel {
    pub path: String,
    pub primitives: Vec<GpuPrimitive>,
    pub animation: Option<AnimationClip>,
    pub skeleton: Option<Skeleton>,
    /// Owned by this model, as opposed to the textures of the provider.
    fallback_texture: Option<GpuTextureId>,
}

impl GpuModel {
    pub fn is_animated(&self) -> bool {
        self.animation.is_some() || self.skeleton.is_some()
    }
}

struct CacheEntry {
    model: Rc<GpuModel>,
    reference_count: usize,
}

struct CacheState {
    entries: RefCell<HashMap<String, CacheEntry>>,
    loader: Box<ModelAssetLoader>,
    backend: Rc<dyn RenderBackend>,
    textures: TextureProvider,
    evictions: Cell<usize>,
}

/// A reference counted cache of GPU models, keyed by asset path. There is at most one live GPU
/// representation per path. Models are only reachable through [`ModelHandle`]s, the entry is
/// removed and its resources are freed when the last handle is dropped.
///
/// Cloning the cache is cheap and yields another view onto the same entries.
#[derive(Clone)]
pub struct ModelCache {
    state: Rc<CacheState>,
}

impl ModelCache {
    pub fn new(
        loader: Box<ModelAssetLoader>,
        backend: Rc<dyn RenderBackend>,
        texture_loader: Rc<dyn RawAssetLoader>,
    ) -> Self {
        let textures = TextureProvider::new(texture_loader, backend.clone());
        Self {
            state: Rc::new(CacheState {
                entries: RefCell::new(HashMap::new()),
                loader,
                backend,
                textures,
                evictions: Cell::new(0),
            }),
        }
    }

    /// Returns `None` if the model could not be loaded or uploaded, callers are expected to simply
    /// not render it. Failures are not cached, a later call tries to load the model again.
    pub fn acquire(&self, path: &str) -> Option<ModelHandle> {
        let cached = self.state.entries.borrow_mut().get_mut(path).map(|entry| {
            entry.reference_count += 1;
            entry.model.clone()
        });

        if let Some(model) = cached {
            trace!("Cache hit for {}", path);
            return Some(self.handle(path, model));
        }

        let loaded = match self.state.loader.load(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!("Could not load model: {}", err);
                return None;
            }
        };

        let model = Rc::new(self.state.upload(path, &loaded)?);
        info!(
            "Loaded model {} into the cache ({} primitives)",
            path,
            model.primitives.len()
        );

        self.state.entries.borrow_mut().insert(
            path.to_string(),
            CacheEntry {
                model: model.clone(),
                reference_count: 1,
            },
        );
        Some(self.handle(path, model))
    }

    fn handle(&self, path: &str, model: Rc<GpuModel>) -> ModelHandle {
        ModelHandle {
            path: path.to_string(),
            model,
            cache: self.state.clone(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.entries.borrow().contains_key(path)
    }

    /// 0 for paths that are not cached.
    pub fn reference_count(&self, path: &str) -> usize {
        self.state
            .entries
            .borrow()
            .get(path)
            .map(|entry| entry.reference_count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.state.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.borrow().is_empty()
    }

    /// How many entries have been removed (and their resources freed) so far.
    pub fn evictions(&self) -> usize {
        self.state.evictions.get()
    }

    pub fn backend(&self) -> &Rc<dyn RenderBackend> {
        &self.state.backend
    }

    pub fn textures(&self) -> &TextureProvider {
        &self.state.textures
    }
}

impl CacheState {
    fn upload(&self, path: &str, loaded: &LoadedModel) -> Option<GpuModel> {
        let fallback_color = if loaded.animation.is_some() || loaded.skeleton.is_some() {
            ANIMATED_FALLBACK_COLOR
        } else {
            STATIC_FALLBACK_COLOR
        };

        let mut fallback_texture = None;
        let mut primitives: Vec<GpuPrimitive> = Vec::with_capacity(loaded.primitives.len());

        for descriptor in &loaded.primitives {
            let label = format!(
                "{}#{}/{}",
                path, descriptor.mesh_index, descriptor.primitive_index
            );

            let mesh = match self.backend.upload_mesh(&label, MeshSource::Primitive(descriptor)) {
                Ok(mesh) => mesh,
                Err(err) => {
                    warn!("Uploading {} failed: {}", label, err);
                    for primitive in &primitives {
                        self.backend.release_mesh(primitive.mesh);
                    }
                    if let Some(texture) = fallback_texture {
                        self.backend.release_texture(texture);
                    }
                    return None;
                }
            };

            let material = loaded.material_for(descriptor);
            let texture = material
                .base_color_texture
                .as_deref()
                .and_then(|texture_path| self.textures.get_texture(texture_path))
                .unwrap_or_else(|| {
                    *fallback_texture.get_or_insert_with(|| {
                        trace!("{} uses the fallback texture", label);
                        self.backend
                            .create_solid_texture(&format!("{} fallback", path), fallback_color)
                    })
                });

            primitives.push(GpuPrimitive {
                mesh,
                texture,
                index_count: descriptor.index_count,
            });
        }

        Some(GpuModel {
            path: path.to_string(),
            primitives,
            animation: loaded.animation.clone(),
            skeleton: loaded.skeleton,
            fallback_texture,
        })
    }

    fn retain(&self, path: &str) {
        match self.entries.borrow_mut().get_mut(path) {
            Some(entry) => entry.reference_count += 1,
            None => error!("Cloning a handle of {}, which is not cached anymore", path),
        }
    }

    fn release(&self, path: &str) {
        let evicted = {
            let mut entries = self.entries.borrow_mut();
            let remaining = match entries.get_mut(path) {
                Some(entry) => {
                    entry.reference_count -= 1;
                    entry.reference_count
                }
                None => {
                    error!("Releasing {}, which is not cached", path);
                    return;
                }
            };

            if remaining == 0 { entries.remove(path) } else { None }
        };

        // free outside of the borrow, the backend must not observe a half removed entry
        if let Some(entry) = evicted {
            self.free(&entry.model);
            self.evictions.set(self.evictions.get() + 1);
            info!("Removed model {} from the cache", path);
        }
    }

    fn free(&self, model: &GpuModel) {
        for primitive in &model.primitives {
            self.backend.release_mesh(primitive.mesh);
        }

        if let Some(texture) = model.fallback_texture {
            self.backend.release_texture(texture);
        }
    }
}

/// An owned reference into the [`ModelCache`]. Creating one (through [`ModelCache::acquire`] or
/// cloning) increments the reference count of the entry, dropping it decrements it.
pub struct ModelHandle {
    path: String,
    model: Rc<GpuModel>,
    cache: Rc<CacheState>,
}

impl ModelHandle {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn model(&self) -> &GpuModel {
        &self.model
    }
}

impl Clone for ModelHandle {
    fn clone(&self) -> Self {
        self.cache.retain(&self.path);
        Self {
            path: self.path.clone(),
            model: self.model.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        self.cache.release(&self.path);
    }
}

impl Debug for ModelHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelHandle({}, {} primitives)", self.path, self.model.primitives.len())
    }
}
