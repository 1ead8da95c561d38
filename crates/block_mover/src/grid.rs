use bevy::prelude::*;
use bevy::utils::HashMap;
use strum::{EnumIter, IntoStaticStr};

/// Colour intent of an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Tint {
    /// Green: committed, or hovering over a legal spot.
    Valid,
    /// Red: hovering over an occupied or non-placeholder spot.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    Empty,
    Placeholder,
    Occupied(Tint),
}

impl Marker {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied(_))
    }
}

/// Sparse integer-addressed cell storage. Missing entries read as `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    cells: HashMap<IVec2, Marker>,
}

impl Surface {
    pub fn get(&self, pos: IVec2) -> Marker {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    pub fn set(&mut self, pos: IVec2, marker: Marker) {
        if marker.is_empty() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, marker);
        }
    }

    pub fn clear(&mut self, pos: IVec2) {
        self.cells.remove(&pos);
    }

    pub fn clear_all(&mut self) {
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Marker)> + '_ {
        self.cells.iter().map(|(pos, marker)| (*pos, *marker))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Layer {
    Placeholder,
    Static,
    Preview,
}

impl Layer {
    /// Sprite depth, later layers draw on top.
    pub const fn z(self) -> f32 {
        match self {
            Self::Placeholder => 0.,
            Self::Static => 1.,
            Self::Preview => 2.,
        }
    }
}

/// The three surfaces a drag gesture reads and writes.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub placeholder: Surface,
    pub fixed: Surface,
    pub preview: Surface,
}

impl Board {
    pub const fn surface(&self, layer: Layer) -> &Surface {
        match layer {
            Layer::Placeholder => &self.placeholder,
            Layer::Static => &self.fixed,
            Layer::Preview => &self.preview,
        }
    }

    pub fn surface_mut(&mut self, layer: Layer) -> &mut Surface {
        match layer {
            Layer::Placeholder => &mut self.placeholder,
            Layer::Static => &mut self.fixed,
            Layer::Preview => &mut self.preview,
        }
    }

    /// A pointer-down may only start a gesture on a committed green cell.
    pub fn is_block_origin(&self, pos: IVec2) -> bool {
        self.fixed.get(pos) == Marker::Occupied(Tint::Valid)
    }
}
