use bevy::prelude::*;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::grid::{Board, Layer, Marker, Tint};
use crate::selection::SelectionPolicy;

/// Three blocks, each with a matching zone to move it into.
pub const DEFAULT_LAYOUT: &str = "\
.........
..oooo...
..oooo...
.........
.........
.oo...ooo
.oo...ooo
.........
.........
.##...###
.##...###
.........
####.....
####.....
";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("Unknown tile {ch:?} at line {line}, column {column}")]
    UnknownTile { ch: char, line: usize, column: usize },

    #[error("Level has no blocks")]
    NoBlocks,
}

#[derive(Resource, Debug, Clone)]
pub struct LevelConfig {
    pub layout: String,
    pub policy: SelectionPolicy,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_owned(),
            policy: SelectionPolicy::default(),
        }
    }
}

/// Initial contents of the placeholder and static surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Level {
    pub zones: Vec<IVec2>,
    pub blocks: Vec<IVec2>,
}

impl Level {
    /// Parses an ASCII map. The last line is `y = 0`, the first column `x = 0`.
    ///
    /// `.` or space is empty, `#` a block cell, `o` a placeholder zone and `@`
    /// a block cell already sitting in a zone.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let lines: Vec<&str> = text.lines().collect();
        let height = lines.len() as i32;
        let mut level = Self::default();

        for (line_index, line) in lines.iter().enumerate() {
            let y = height - 1 - line_index as i32;
            for (column, ch) in line.chars().enumerate() {
                let pos = IVec2::new(column as i32, y);
                match ch {
                    '.' | ' ' => {}
                    '#' => level.blocks.push(pos),
                    'o' => level.zones.push(pos),
                    '@' => {
                        level.blocks.push(pos);
                        level.zones.push(pos);
                    }
                    _ => {
                        return Err(LevelError::UnknownTile {
                            ch,
                            line: line_index + 1,
                            column: column + 1,
                        });
                    }
                }
            }
        }

        if level.blocks.is_empty() {
            return Err(LevelError::NoBlocks);
        }
        Ok(level)
    }

    /// Replaces the board contents with this level.
    pub fn apply(&self, board: &mut Board) {
        for layer in Layer::iter() {
            board.surface_mut(layer).clear_all();
        }

        for pos in &self.zones {
            board.placeholder.set(*pos, Marker::Placeholder);
        }
        for pos in &self.blocks {
            board.fixed.set(*pos, Marker::Occupied(Tint::Valid));
        }
    }
}
