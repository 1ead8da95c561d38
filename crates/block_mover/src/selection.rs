use std::collections::VecDeque;

use bevy::prelude::*;
use bevy::utils::HashSet;
use thiserror::Error;

use crate::grid::{Marker, Surface};

const DIRECTIONS: [IVec2; 4] = [IVec2::Y, IVec2::NEG_Y, IVec2::NEG_X, IVec2::X];

/// How the extent of a picked-up block is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Walk the four axes and require the resulting rectangle to be fully occupied
    /// and to hold every cell connected to the origin.
    #[default]
    Strict,
    /// Walk the four axes and take the rectangle as is, holes included.
    BoundingBox,
    /// Take every cell 4-connected to the origin, whatever its shape.
    FloodFill,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No block at {0}")]
    NotOrigin(IVec2),

    #[error(
        "Block at {origin} is not rectangular, {missing} cell(s) of its bounds are empty \
         and {outside} connected cell(s) lie outside them"
    )]
    NotRectangular {
        origin: IVec2,
        missing: usize,
        outside: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCell {
    pub pos: IVec2,
    pub marker: Marker,
}

/// The cells picked up by one gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    cells: Vec<BlockCell>,
}

impl Block {
    pub fn cells(&self) -> &[BlockCell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [BlockCell] {
        &mut self.cells
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.cells.iter().map(|cell| cell.pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Inclusive cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: IVec2,
    pub max: IVec2,
}

impl Bounds {
    /// Row-major from the bottom row up.
    pub fn cells(self) -> impl Iterator<Item = IVec2> {
        (self.min.y..=self.max.y)
            .flat_map(move |y| (self.min.x..=self.max.x).map(move |x| IVec2::new(x, y)))
    }

    pub const fn size(self) -> IVec2 {
        IVec2::new(self.max.x - self.min.x + 1, self.max.y - self.min.y + 1)
    }
}

/// Last non-empty cell reached when stepping from `start` along `dir`.
fn walk_bound(surface: &Surface, start: IVec2, dir: IVec2) -> IVec2 {
    let mut pos = start;
    while !surface.get(pos + dir).is_empty() {
        pos += dir;
    }
    pos
}

pub fn find_bounds(surface: &Surface, origin: IVec2) -> Bounds {
    let [up, down, left, right] = DIRECTIONS.map(|dir| walk_bound(surface, origin, dir));
    Bounds {
        min: IVec2::new(left.x, down.y),
        max: IVec2::new(right.x, up.y),
    }
}

fn collect(surface: &Surface, positions: impl Iterator<Item = IVec2>) -> Block {
    Block {
        cells: positions
            .map(|pos| BlockCell {
                pos,
                marker: surface.get(pos),
            })
            .collect(),
    }
}

fn flood_fill(surface: &Surface, origin: IVec2) -> Vec<IVec2> {
    let mut seen = HashSet::default();
    let mut queue = VecDeque::from([origin]);
    let mut found = Vec::new();
    seen.insert(origin);

    while let Some(pos) = queue.pop_front() {
        found.push(pos);
        for dir in DIRECTIONS {
            let next = pos + dir;
            if !surface.get(next).is_empty() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    found.sort_by_key(|pos| (pos.y, pos.x));
    found
}

/// Computes the block containing `origin` on `surface`. Does not modify the surface.
pub fn select_block(
    surface: &Surface,
    origin: IVec2,
    policy: SelectionPolicy,
) -> Result<Block, SelectionError> {
    if surface.get(origin).is_empty() {
        return Err(SelectionError::NotOrigin(origin));
    }

    match policy {
        SelectionPolicy::FloodFill => Ok(collect(surface, flood_fill(surface, origin).into_iter())),
        SelectionPolicy::BoundingBox => Ok(collect(surface, find_bounds(surface, origin).cells())),
        SelectionPolicy::Strict => {
            let bounds = find_bounds(surface, origin);
            let block = collect(surface, bounds.cells());
            let missing = block
                .cells()
                .iter()
                .filter(|cell| cell.marker.is_empty())
                .count();
            // A full rectangle is connected, so any extra reachable cell hangs off its edge.
            let size = bounds.size();
            let occupied = (size.x * size.y).unsigned_abs() as usize - missing;
            let outside = flood_fill(surface, origin).len().saturating_sub(occupied);
            if missing > 0 || outside > 0 {
                return Err(SelectionError::NotRectangular {
                    origin,
                    missing,
                    outside,
                });
            }
            Ok(block)
        }
    }
}
