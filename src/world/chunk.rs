use glam::{Mat4, Vec3};
use log::{debug, error, warn};

use crate::rendering::asset_cache::model_cache::ModelCache;
use crate::rendering::backend::FrameParams;
use crate::rendering::models::animated_model::AnimatedModel;
use crate::rendering::models::ground::GroundPlane;
use crate::rendering::models::static_model::StaticModel;
use crate::world::coordinate_systems::{cell_center, cell_origin, planar_distance};
use crate::world::decoration::{CellRandom, Decoration, decorate};
use crate::world::{CELL_SIZE, CellCoord, VISIBILITY_CUTOFF, WorldAssets};

/// One cell of the world: a ground plane and whatever the cell's seed decorates it with.
/// All model references are released when the chunk is dropped.
pub struct Chunk {
    cell: CellCoord,
    instance_id: u64,
    seed: i64,
    ground: GroundPlane,
    decoration: Decoration,
    /// Trees or the static prop, one model drawn at every placement.
    static_model: Option<StaticModel>,
    actor: Option<AnimatedModel>,
    initialized: bool,
}

impl Chunk {
    pub fn new(cell: CellCoord, instance_id: u64) -> Self {
        Self {
            cell,
            instance_id,
            seed: cell.seed(),
            ground: GroundPlane::new(CELL_SIZE / 2.0),
            decoration: Decoration::Empty,
            static_model: None,
            actor: None,
            initialized: false,
        }
    }

    /// Generates the content and acquires the models it needs. Only the first call does anything.
    /// Assets that fail to load are skipped, the chunk then renders without them.
    pub fn initialize(&mut self, cache: &ModelCache, assets: &WorldAssets) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let texture = assets
            .ground_texture_for(self.cell)
            .and_then(|path| cache.textures().get_texture(path));
        if texture.is_none() {
            warn!("Chunk {}: No ground texture, rendering untextured", self.cell);
        }

        if let Err(err) = self.ground.initialize(cache.backend(), texture) {
            error!("Chunk {}: Uploading the ground failed: {}", self.cell, err);
        }

        self.decoration = decorate(&mut CellRandom::from_seed(self.seed));

        match &self.decoration {
            Decoration::Empty => {}
            Decoration::Trees(_) => self.static_model = StaticModel::load(cache, &assets.tree_model),
            Decoration::StaticProp(_) => self.static_model = StaticModel::load(cache, &assets.prop_model),
            Decoration::AnimatedActor(_) => self.actor = AnimatedModel::load(cache, &assets.actor_model),
        }

        if !self.decoration.is_empty() && self.static_model.is_none() && self.actor.is_none() {
            warn!("Chunk {}: Decoration is missing its model, rendering ground only", self.cell);
        }

        debug!(
            "Chunk {} (#{}, seed {}): {:?}",
            self.cell, self.instance_id, self.seed, self.decoration
        );
    }

    pub fn update(&mut self, dt: f32, time: f32) {
        if let Some(actor) = &mut self.actor {
            actor.update(dt, time);
        }
    }

    pub fn render(&self, frame: &FrameParams) {
        let origin = Mat4::from_translation(cell_origin(self.cell));
        self.ground.render(origin, frame);

        for placement in self.decoration.placements() {
            let model_matrix = origin * placement.model_matrix();
            if let Some(model) = &self.static_model {
                model.render(model_matrix, frame);
            }
            if let Some(actor) = &self.actor {
                actor.render(model_matrix, frame);
            }
        }
    }

    /// Coarse distance check against the cell's center, in the xz plane.
    pub fn is_visible(&self, camera_position: Vec3) -> bool {
        planar_distance(camera_position, cell_center(self.cell)) < VISIBILITY_CUTOFF
    }

    pub fn has_time_varying_content(&self) -> bool {
        self.actor.is_some()
    }

    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn ground(&self) -> &GroundPlane {
        &self.ground
    }

    pub fn static_model(&self) -> Option<&StaticModel> {
        self.static_model.as_ref()
    }

    pub fn actor(&self) -> Option<&AnimatedModel> {
        self.actor.as_ref()
    }

    pub fn actor_mut(&mut self) -> Option<&mut AnimatedModel> {
        self.actor.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
