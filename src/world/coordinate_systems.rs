use glam::{Vec2, Vec3};
use itertools::iproduct;

use crate::world::{CELL_SIZE, CellCoord};

/// World space is RH, Up: +Y. Cells tile the xz plane, cell (0, 0) is centered on the origin.
/// Positions are assigned to the nearest cell, halfway points round away from zero.
#[inline]
pub fn world_to_cell(position: Vec3) -> CellCoord {
    CellCoord::new(
        (position.x / CELL_SIZE).round() as i32,
        (position.z / CELL_SIZE).round() as i32,
    )
}

#[inline]
pub fn cell_origin(cell: CellCoord) -> Vec3 {
    Vec3::new(cell.x as f32 * CELL_SIZE, 0.0, cell.z as f32 * CELL_SIZE)
}

/// Since positions round to the nearest cell, the origin of a cell is also its center.
#[inline]
pub fn cell_center(cell: CellCoord) -> Vec3 {
    cell_origin(cell)
}

/// Distance in the xz plane, height is ignored.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}

/// All cells of the square with edge `2 * radius + 1` around `center`, row by row.
pub fn cells_in_radius(center: CellCoord, radius: u32) -> impl Iterator<Item = CellCoord> {
    let radius = radius as i32;
    iproduct!(-radius..=radius, -radius..=radius).map(move |(dx, dz)| center.offset(dx, dz))
}
