#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use itertools::iproduct;
use wonderland::io::common::loader::{AssetLoader, RawAssetLoader};
use wonderland::rendering::asset_cache::model_cache::ModelCache;
use wonderland::rendering::backend::headless::HeadlessBackend;
use wonderland::rendering::common::types::{AnimationClip, PrimitiveDescriptor, PrimitiveTopology, Skeleton};
use wonderland::rendering::loader::AssetLoadError;
use wonderland::rendering::loader::model_loader::LoadedModel;
use wonderland::world::decoration::{Decoration, decoration_for_cell};
use wonderland::world::{CellCoord, WorldAssets};

pub const ACTOR_CLIP_DURATION: f32 = 2.0;

/// Serves models from memory and counts how often every path was requested.
pub struct CountingModelLoader {
    models: HashMap<String, LoadedModel>,
    loads: Rc<RefCell<HashMap<String, usize>>>,
}

impl AssetLoader<Result<LoadedModel, AssetLoadError>> for CountingModelLoader {
    fn load(&self, path: &str) -> Result<LoadedModel, AssetLoadError> {
        *self.loads.borrow_mut().entry(path.to_string()).or_default() += 1;
        self.models
            .get(path)
            .cloned()
            .ok_or_else(|| AssetLoadError::NotFound { path: path.to_string() })
    }
}

/// Every path is a tiny file.
pub struct MemoryFiles;

impl RawAssetLoader for MemoryFiles {
    fn load_raw_owned(&self, _path: &str) -> Option<Vec<u8>> {
        Some(vec![0xFF, 0xD8, 0xFF])
    }

    fn exists(&self, _path: &str) -> bool {
        true
    }
}

fn primitives(path: &str, count: usize) -> Vec<PrimitiveDescriptor> {
    (0..count)
        .map(|primitive_index| PrimitiveDescriptor {
            asset_path: path.to_string(),
            mesh_index: 0,
            primitive_index,
            attributes: vec!["POSITION".to_string(), "TEXCOORD_0".to_string()],
            vertex_count: 24,
            index_count: 36,
            topology: PrimitiveTopology::Triangles,
            material: None,
        })
        .collect()
}

fn models(assets: &WorldAssets) -> HashMap<String, LoadedModel> {
    let tree = LoadedModel {
        primitives: primitives(&assets.tree_model, 2),
        materials: vec![],
        animation: None,
        skeleton: None,
    };
    let prop = LoadedModel {
        primitives: primitives(&assets.prop_model, 1),
        ..tree.clone()
    };
    let actor = LoadedModel {
        primitives: primitives(&assets.actor_model, 1),
        materials: vec![],
        animation: Some(AnimationClip {
            name: Some("walk".to_string()),
            duration: ACTOR_CLIP_DURATION,
            channel_count: 3,
        }),
        skeleton: Some(Skeleton { joint_count: 12 }),
    };

    HashMap::from([
        (assets.tree_model.clone(), tree),
        (assets.prop_model.clone(), prop),
        (assets.actor_model.clone(), actor),
    ])
}

pub struct Fixture {
    pub backend: Rc<HeadlessBackend>,
    pub cache: ModelCache,
    pub loads: Rc<RefCell<HashMap<String, usize>>>,
    pub assets: WorldAssets,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_assets(WorldAssets::default())
    }

    /// Only the default asset paths can be loaded, custom paths in `assets` fail.
    pub fn with_assets(assets: WorldAssets) -> Self {
        Self::with_backend(assets, HeadlessBackend::new())
    }

    pub fn with_backend(assets: WorldAssets, backend: HeadlessBackend) -> Self {
        let backend = Rc::new(backend);
        let loads = Rc::new(RefCell::new(HashMap::new()));
        let loader = CountingModelLoader {
            models: models(&WorldAssets::default()),
            loads: loads.clone(),
        };

        let cache = ModelCache::new(Box::new(loader), backend.clone(), Rc::new(MemoryFiles));
        Self {
            backend,
            cache,
            loads,
            assets,
        }
    }

    pub fn loads_of(&self, path: &str) -> usize {
        self.loads.borrow().get(path).copied().unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.borrow().values().sum()
    }
}

/// Cells around the origin whose decoration matches, nearest first.
pub fn find_cells(predicate: impl Fn(&Decoration) -> bool) -> Vec<CellCoord> {
    let mut cells: Vec<CellCoord> = iproduct!(-40..=40, -40..=40)
        .map(|(x, z)| CellCoord::new(x, z))
        .filter(|cell| predicate(&decoration_for_cell(*cell)))
        .collect();
    cells.sort_by_key(|cell| cell.chebyshev_distance(CellCoord::new(0, 0)));
    cells
}

pub fn is_trees(decoration: &Decoration) -> bool {
    matches!(decoration, Decoration::Trees(_))
}

pub fn is_actor(decoration: &Decoration) -> bool {
    matches!(decoration, Decoration::AnimatedActor(_))
}
