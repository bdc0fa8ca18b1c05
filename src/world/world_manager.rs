use std::collections::HashMap;
use std::time::Instant;

use glam::{Mat4, Vec3};
use itertools::Itertools;
use log::{debug, info};

use crate::rendering::asset_cache::model_cache::ModelCache;
use crate::rendering::backend::FrameParams;
use crate::world::chunk::Chunk;
use crate::world::coordinate_systems::{cells_in_radius, world_to_cell};
use crate::world::{CHUNK_RADIUS, CellCoord, WorldAssets};

/// Keeps the set of active chunks in lockstep with the camera: exactly the cells within
/// `chunk_radius` (Chebyshev distance) of the camera's cell are alive. The set is only recomputed
/// when the camera enters another cell, and then only the difference is created or dropped.
///
/// Camera positions have to be finite, they are not validated.
pub struct WorldManager {
    active_chunks: HashMap<CellCoord, Chunk>,
    center_cell: CellCoord,
    initialized: bool,
    chunk_radius: u32,
    distance_culling: bool,
    assets: WorldAssets,
    model_cache: ModelCache,
    next_instance_id: u64,
    last_camera_position: Vec3,
    rebuild_count: usize,
}

impl WorldManager {
    pub fn new(model_cache: ModelCache, assets: WorldAssets) -> Self {
        Self {
            active_chunks: HashMap::new(),
            center_cell: CellCoord::default(),
            initialized: false,
            chunk_radius: CHUNK_RADIUS,
            distance_culling: false,
            assets,
            model_cache,
            next_instance_id: 0,
            last_camera_position: Vec3::ZERO,
            rebuild_count: 0,
        }
    }

    /// May be called on a manager that is already streaming, the next update rebuilds the grid.
    pub fn with_chunk_radius(mut self, chunk_radius: u32) -> Self {
        if chunk_radius != self.chunk_radius {
            self.chunk_radius = chunk_radius;
            self.initialized = false;
        }
        self
    }

    /// Skip rendering chunks that are farther away than the visibility cutoff. This never evicts.
    pub fn with_distance_culling(mut self, distance_culling: bool) -> Self {
        self.distance_culling = distance_culling;
        self
    }

    pub fn update(&mut self, camera_position: Vec3, dt: f32, time: f32) {
        self.last_camera_position = camera_position;

        let new_center = world_to_cell(camera_position);
        if !self.initialized || new_center != self.center_cell {
            self.rebuild(new_center);
            self.center_cell = new_center;
            self.initialized = true;
        }

        for chunk in self
            .active_chunks
            .values_mut()
            .filter(|chunk| chunk.has_time_varying_content())
        {
            chunk.update(dt, time);
        }
    }

    fn rebuild(&mut self, center: CellCoord) {
        let now = Instant::now();
        let side = 2 * self.chunk_radius as usize + 1;

        let mut previous = std::mem::take(&mut self.active_chunks);
        let mut active_chunks = HashMap::with_capacity(side * side);
        let mut created = 0;

        for cell in cells_in_radius(center, self.chunk_radius) {
            let chunk = match previous.remove(&cell) {
                Some(chunk) => chunk,
                None => {
                    created += 1;
                    let mut chunk = Chunk::new(cell, self.allocate_instance_id());
                    chunk.initialize(&self.model_cache, &self.assets);
                    chunk
                }
            };
            active_chunks.insert(cell, chunk);
        }

        let reused = active_chunks.len() - created;
        let evicted = previous.len();

        // the new chunks hold their models already, assets shared with evicted chunks stay cached
        self.active_chunks = active_chunks;
        drop(previous);
        self.rebuild_count += 1;

        info!(
            "Grid around {}: {} created, {} reused, {} evicted, took {}ms",
            center,
            created,
            reused,
            evicted,
            now.elapsed().as_millis()
        );
        debug!("{} models cached", self.model_cache.len());
    }

    fn allocate_instance_id(&mut self) -> u64 {
        self.next_instance_id += 1;
        self.next_instance_id
    }

    /// Returns how many chunks have been rendered.
    pub fn render(
        &self,
        view_projection: Mat4,
        light_position: Vec3,
        light_intensity: Vec3,
        view_position: Vec3,
    ) -> usize {
        let frame = FrameParams {
            view_projection,
            light_position,
            light_intensity,
            view_position,
        };

        let mut rendered = 0;
        for chunk in self.active_chunks.values() {
            if self.distance_culling && !chunk.is_visible(self.last_camera_position) {
                continue;
            }
            chunk.render(&frame);
            rendered += 1;
        }
        rendered
    }

    /// `None` before the first update.
    pub fn center_cell(&self) -> Option<CellCoord> {
        self.initialized.then_some(self.center_cell)
    }

    /// Sorted, for stable output.
    pub fn active_cells(&self) -> Vec<CellCoord> {
        self.active_chunks.keys().copied().sorted().collect_vec()
    }

    pub fn chunk(&self, cell: CellCoord) -> Option<&Chunk> {
        self.active_chunks.get(&cell)
    }

    pub fn chunk_mut(&mut self, cell: CellCoord) -> Option<&mut Chunk> {
        self.active_chunks.get_mut(&cell)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active_chunks.values()
    }

    pub fn len(&self) -> usize {
        self.active_chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_chunks.is_empty()
    }

    pub fn chunk_radius(&self) -> u32 {
        self.chunk_radius
    }

    pub fn assets(&self) -> &WorldAssets {
        &self.assets
    }

    pub fn model_cache(&self) -> &ModelCache {
        &self.model_cache
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }
}
