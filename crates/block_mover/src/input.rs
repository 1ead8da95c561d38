use bevy::prelude::*;
use bits_helpers::input::{
    held_world_position, just_pressed_world_position, pointer_just_released,
};

use crate::PointerEvent;

/// Turns mouse and touch state into [`PointerEvent`]s.
pub fn read_pointer(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut pointer_events: EventWriter<PointerEvent>,
) {
    if let Some(world_position) =
        just_pressed_world_position(&buttons, &touch_input, &windows, &camera)
    {
        pointer_events.send(PointerEvent::Down(world_position));
    } else if let Some(world_position) =
        held_world_position(&buttons, &touch_input, &windows, &camera)
    {
        pointer_events.send(PointerEvent::Move(world_position));
    }

    // Release carries no position, the cursor may already have left the window.
    if pointer_just_released(&buttons, &touch_input) {
        pointer_events.send(PointerEvent::Up);
    }
}
