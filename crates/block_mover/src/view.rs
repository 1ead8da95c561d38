use bevy::prelude::*;
use strum::IntoEnumIterator;

use crate::grid::{Board, Layer, Marker, Tint};
use crate::layout::GridLayout;

const CELL_GAP: f32 = 2.;

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, sync_cells);
    }
}

#[derive(Component)]
struct CellSprite;

fn marker_color(layer: Layer, marker: Marker) -> Option<Color> {
    let alpha = if layer == Layer::Preview { 0.8 } else { 1. };
    match marker {
        Marker::Empty => None,
        Marker::Placeholder => Some(Color::srgb(0.3, 0.3, 0.3)),
        Marker::Occupied(Tint::Valid) => Some(Color::srgba(0.2, 0.8, 0.3, alpha)),
        Marker::Occupied(Tint::Invalid) => Some(Color::srgba(0.9, 0.2, 0.2, alpha)),
    }
}

fn marker_name(marker: Marker) -> &'static str {
    match marker {
        Marker::Empty => "empty",
        Marker::Placeholder => "placeholder",
        Marker::Occupied(tint) => tint.into(),
    }
}

/// Respawns one sprite per non-empty cell whenever the board changes.
fn sync_cells(
    mut commands: Commands,
    board: Res<Board>,
    layout: Res<GridLayout>,
    sprites: Query<Entity, With<CellSprite>>,
) {
    if !board.is_changed() {
        return;
    }

    for entity in &sprites {
        commands.entity(entity).despawn();
    }

    let size = Vec2::splat(layout.cell_size - CELL_GAP);
    for layer in Layer::iter() {
        for (pos, marker) in board.surface(layer).iter() {
            let Some(color) = marker_color(layer, marker) else {
                continue;
            };
            let world = layout.cell_to_world(pos);
            commands.spawn((
                Sprite::from_color(color, size),
                Transform::from_xyz(world.x, world.y, layer.z()),
                Name::new(format!("{} {};{}", marker_name(marker), pos.x, pos.y)),
                CellSprite,
            ));
        }
    }
}
