use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::world::{CELL_SIZE, CellCoord};

pub const MAX_TREES: u32 = 5;
pub const ANIMATED_ACTOR_CHANCE: f32 = 0.08;
pub const STATIC_PROP_CHANCE: f32 = 0.12;
pub const ACTOR_SCALE: f32 = 12.0;
pub const PROP_SCALE: f32 = 1.0;

const TREE_SPACING: f32 = CELL_SIZE / 4.0;
const TREE_SCALE_MIN: f32 = 0.8;
const TREE_SCALE_MAX: f32 = 1.4;

/// Candidate tree positions: a 3x3 lattice around the cell origin.
pub const TREE_PALETTE: [Vec3; 9] = [
    Vec3::new(-TREE_SPACING, 0.0, -TREE_SPACING),
    Vec3::new(0.0, 0.0, -TREE_SPACING),
    Vec3::new(TREE_SPACING, 0.0, -TREE_SPACING),
    Vec3::new(-TREE_SPACING, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(TREE_SPACING, 0.0, 0.0),
    Vec3::new(-TREE_SPACING, 0.0, TREE_SPACING),
    Vec3::new(0.0, 0.0, TREE_SPACING),
    Vec3::new(TREE_SPACING, 0.0, TREE_SPACING),
];

/// The random source the generator draws from. Separated from the generator so that the
/// decision logic can be driven by scripted values.
pub trait DecorationRandom {
    /// Uniform in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform in `[0, bound)`, 0 for a bound of 0.
    fn next_below(&mut self, bound: u32) -> u32;

    fn next_in_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }
}

/// The per cell random stream. ChaCha is portable and its output is stable across releases, so a
/// cell looks the same on every machine and every run.
pub struct CellRandom {
    inner: ChaCha8Rng,
}

impl CellRandom {
    pub fn from_seed(seed: i64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }
}

impl DecorationRandom for CellRandom {
    fn next_unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.inner.random_range(0..bound)
    }
}

/// Placement of a decoration, relative to the cell origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub translation: Vec3,
    /// about +Y
    pub rotation_degrees: f32,
    pub scale: f32,
}

impl Transformation {
    /// translate * rotate * scale
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_y(self.rotation_degrees.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Empty,
    Trees(Vec<Transformation>),
    AnimatedActor(Transformation),
    StaticProp(Transformation),
}

impl Decoration {
    pub fn is_empty(&self) -> bool {
        matches!(self, Decoration::Empty)
    }

    pub fn placements(&self) -> &[Transformation] {
        match self {
            Decoration::Empty => &[],
            Decoration::Trees(trees) => trees,
            Decoration::AnimatedActor(placement) | Decoration::StaticProp(placement) => {
                std::slice::from_ref(placement)
            }
        }
    }
}

/// Decides the content of a cell. The tree count and the special roll are always drawn, the
/// categories are checked in order and the first match wins.
pub fn decorate<R: DecorationRandom + ?Sized>(rng: &mut R) -> Decoration {
    let tree_count = rng.next_below(MAX_TREES + 1) as usize;
    let special_roll = rng.next_unit();

    if special_roll < ANIMATED_ACTOR_CHANCE {
        Decoration::AnimatedActor(special_placement(rng, ACTOR_SCALE))
    } else if special_roll < ANIMATED_ACTOR_CHANCE + STATIC_PROP_CHANCE {
        Decoration::StaticProp(special_placement(rng, PROP_SCALE))
    } else if tree_count > 0 {
        let mut palette = TREE_PALETTE;
        shuffle(rng, &mut palette);

        let trees = palette
            .iter()
            .take(tree_count)
            .map(|&translation| {
                let rotation_degrees = rng.next_in_range(0.0, 360.0);
                let scale = rng.next_in_range(TREE_SCALE_MIN, TREE_SCALE_MAX);
                Transformation {
                    translation,
                    rotation_degrees,
                    scale,
                }
            })
            .collect();
        Decoration::Trees(trees)
    } else {
        Decoration::Empty
    }
}

pub fn decoration_for_cell(cell: CellCoord) -> Decoration {
    decorate(&mut CellRandom::from_seed(cell.seed()))
}

fn special_placement<R: DecorationRandom + ?Sized>(rng: &mut R, scale: f32) -> Transformation {
    Transformation {
        translation: Vec3::ZERO,
        rotation_degrees: rng.next_in_range(0.0, 360.0),
        scale,
    }
}

/// Fisher-Yates, back to front.
pub fn shuffle<T, R: DecorationRandom + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.next_below(i as u32 + 1) as usize;
        items.swap(i, j);
    }
}
