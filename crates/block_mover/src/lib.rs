use bevy::prelude::*;
use drag::{DragController, DragOutcome};
use grid::Board;
use layout::GridLayout;
use level::{Level, LevelConfig};

pub mod drag;
pub mod grid;
pub mod input;
pub mod layout;
pub mod level;
pub mod selection;
mod view;

/// Pointer input in world space, fed to the drag controller in order.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
}

/// Board, drag controller and pointer plumbing. Needs no window, so it
/// also runs under `MinimalPlugins`.
pub struct BlockMoverPlugin;

impl Plugin for BlockMoverPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Board>()
            .init_resource::<DragController>()
            .init_resource::<GridLayout>()
            .init_resource::<LevelConfig>()
            .add_event::<PointerEvent>()
            .add_event::<DragOutcome>()
            .add_systems(Startup, load_level)
            .add_systems(Update, apply_pointer_events);
    }
}

pub fn run() {
    bits_helpers::get_default_app(env!("CARGO_PKG_NAME"))
        .add_plugins(BlockMoverPlugin)
        .add_plugins(view::ViewPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, input::read_pointer.before(apply_pointer_events))
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn load_level(
    config: Res<LevelConfig>,
    mut board: ResMut<Board>,
    mut controller: ResMut<DragController>,
) {
    *controller = DragController::new(config.policy);

    match Level::parse(&config.layout) {
        Ok(level) => {
            level.apply(&mut board);
            info!(
                "Loaded level with {} block cell(s) and {} zone cell(s)",
                level.blocks.len(),
                level.zones.len()
            );
        }
        Err(err) => error!("Could not load level: {err}"),
    }
}

fn apply_pointer_events(
    mut pointer_events: EventReader<PointerEvent>,
    mut outcomes: EventWriter<DragOutcome>,
    mut board: ResMut<Board>,
    mut controller: ResMut<DragController>,
    layout: Res<GridLayout>,
) {
    for event in pointer_events.read() {
        // Only flag the board as changed when a gesture actually touched it.
        let surfaces = board.bypass_change_detection();
        let outcome = match *event {
            PointerEvent::Down(world) => {
                controller.pointer_down(surfaces, layout.world_to_cell(world))
            }
            PointerEvent::Move(world) => {
                controller.pointer_move(surfaces, layout.world_to_cell(world))
            }
            PointerEvent::Up => controller.pointer_up(surfaces),
        };

        if outcome != DragOutcome::Ignored {
            board.set_changed();
            outcomes.send(outcome);
        }
    }
}
