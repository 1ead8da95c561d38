use bevy::prelude::*;

pub const CELL_SIZE: f32 = 40.;

/// Maps world positions onto the integer grid. Cell `(0, 0)` spans
/// `origin .. origin + cell_size` on both axes.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_size: f32,
    pub origin: Vec2,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            origin: Vec2::new(-CELL_SIZE * 4.5, -CELL_SIZE * 6.),
        }
    }
}

impl GridLayout {
    pub fn world_to_cell(&self, world: Vec2) -> IVec2 {
        ((world - self.origin) / self.cell_size).floor().as_ivec2()
    }

    /// Centre of `cell` in world space.
    pub fn cell_to_world(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + Vec2::splat(0.5)).mul_add(Vec2::splat(self.cell_size), self.origin)
    }
}
