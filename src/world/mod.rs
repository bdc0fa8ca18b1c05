use std::fmt::{Display, Formatter};

/// Mapping between world space and the cell grid.
pub mod coordinate_systems;
pub mod chunk;
/// Deterministic per cell content: which decoration a cell carries and where it is placed.
pub mod decoration;
pub mod world_manager;

/// Edge length of a cell, in world units.
pub const CELL_SIZE: f32 = 300.0;
/// Cells within this Chebyshev distance of the camera's cell are active.
pub const CHUNK_RADIUS: u32 = 3;
/// xz distance from the camera to a cell's center beyond which the cell is not rendered,
/// if distance culling is enabled.
pub const VISIBILITY_CUTOFF: f32 = 3000.0;
/// `seed = x * SEED_STRIDE + z`
pub const SEED_STRIDE: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn seed(&self) -> i64 {
        self.x as i64 * SEED_STRIDE + self.z as i64
    }

    pub fn chebyshev_distance(&self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    pub fn offset(&self, dx: i32, dz: i32) -> CellCoord {
        CellCoord::new(self.x + dx, self.z + dz)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, z): (i32, i32)) -> Self {
        CellCoord::new(x, z)
    }
}

impl Display for CellCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Paths of the assets the world is decorated with, relative to the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldAssets {
    pub tree_model: String,
    pub actor_model: String,
    pub prop_model: String,
    /// One of them is picked per cell, based on its seed.
    pub ground_textures: Vec<String>,
}

impl Default for WorldAssets {
    fn default() -> Self {
        Self {
            tree_model: "models/tree.gltf".to_string(),
            actor_model: "models/bot.gltf".to_string(),
            prop_model: "models/snowman.gltf".to_string(),
            ground_textures: vec![
                "textures/snowy_ground01.jpg".to_string(),
                "textures/snowy_ground02.jpg".to_string(),
            ],
        }
    }
}

impl WorldAssets {
    pub fn ground_texture_for(&self, cell: CellCoord) -> Option<&str> {
        if self.ground_textures.is_empty() {
            return None;
        }

        let index = cell.seed().rem_euclid(self.ground_textures.len() as i64) as usize;
        self.ground_textures.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, WorldAssets};

    #[test]
    fn seeds_and_distances() {
        assert_eq!(CellCoord::new(3, -7).seed(), 2993);
        assert_eq!(CellCoord::new(-2, 5).seed(), -1995);
        assert_eq!(CellCoord::new(0, 0).chebyshev_distance(CellCoord::new(-3, 2)), 3);
        assert_eq!(CellCoord::from((1, 2)).offset(-1, 1), CellCoord::new(0, 3));
        assert_eq!(CellCoord::new(-1, 4).to_string(), "(-1, 4)");
    }

    #[test]
    fn ground_texture_is_stable_per_cell() {
        let assets = WorldAssets::default();
        let first = assets.ground_texture_for(CellCoord::new(0, 1));
        assert_eq!(first, Some("textures/snowy_ground02.jpg"));
        assert_eq!(assets.ground_texture_for(CellCoord::new(0, -1)), first);
        assert_eq!(
            assets.ground_texture_for(CellCoord::new(0, 0)),
            Some("textures/snowy_ground01.jpg")
        );

        let bare = WorldAssets {
            ground_textures: vec![],
            ..WorldAssets::default()
        };
        assert_eq!(bare.ground_texture_for(CellCoord::new(0, 0)), None);
    }
}
