use bevy::prelude::*;

use crate::grid::{Board, Marker, Tint};
use crate::selection::{select_block, Block, SelectionPolicy};

/// Moves whose squared cell displacement falls below this are jitter.
pub const JITTER_THRESHOLD: f32 = 0.1;

/// What a pointer event did to the board.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Filtered input, nothing changed.
    Ignored,
    /// A block was lifted off the static surface.
    Picked { origin: IVec2, cells: usize },
    /// The preview was redrawn at a new displacement.
    Moved { delta: IVec2, valid: bool },
    /// The block was committed at its dragged position.
    Placed { offset: IVec2 },
    /// The block snapped back to where it was picked up.
    Reverted { origin: IVec2 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    origin: IVec2,
    last: IVec2,
    block: Block,
    tainted: bool,
}

impl Gesture {
    pub const fn last(&self) -> IVec2 {
        self.last
    }

    pub const fn block(&self) -> &Block {
        &self.block
    }

    /// Whether any member was invalid on the latest redraw.
    pub const fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Clears the preview, shifts every member by `delta` and redraws it
    /// tinted by the legality of its new cell.
    fn render(&mut self, board: &mut Board, delta: IVec2) {
        for pos in self.block.positions() {
            board.preview.clear(pos);
        }

        self.tainted = false;
        for cell in self.block.cells_mut() {
            let next = cell.pos + delta;
            cell.pos = next;

            let tint = if board.fixed.get(next).is_occupied() {
                Tint::Invalid
            } else if board.placeholder.get(next) == Marker::Placeholder {
                Tint::Valid
            } else {
                Tint::Invalid
            };
            if tint == Tint::Invalid {
                self.tainted = true;
            }

            cell.marker = Marker::Occupied(tint);
            board.preview.set(next, cell.marker);
        }
    }

    /// Writes every member into the static surface shifted by `delta`, tagged green.
    fn commit(&mut self, board: &mut Board, delta: IVec2) {
        for cell in self.block.cells_mut() {
            cell.pos += delta;
            cell.marker = Marker::Occupied(Tint::Valid);
            board.fixed.set(cell.pos, cell.marker);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// Pointer gesture state machine over a [`Board`].
#[derive(Resource, Debug, Clone, Default)]
pub struct DragController {
    state: GestureState,
    policy: SelectionPolicy,
}

impl DragController {
    pub const fn new(policy: SelectionPolicy) -> Self {
        Self {
            state: GestureState::Idle,
            policy,
        }
    }

    pub const fn state(&self) -> &GestureState {
        &self.state
    }

    pub const fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(gesture) => Some(gesture),
        }
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    pub const fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn pointer_down(&mut self, board: &mut Board, cell: IVec2) -> DragOutcome {
        if self.is_dragging() {
            debug!("Pointer down at {cell} while a block is already held");
            return DragOutcome::Ignored;
        }
        if !board.is_block_origin(cell) {
            debug!("No block to pick up at {cell}");
            return DragOutcome::Ignored;
        }

        let block = match select_block(&board.fixed, cell, self.policy) {
            Ok(block) => block,
            Err(err) => {
                warn!("Refusing to pick up block: {err}");
                return DragOutcome::Ignored;
            }
        };

        for pos in block.positions() {
            board.fixed.clear(pos);
        }

        let cells = block.len();
        let mut gesture = Gesture {
            origin: cell,
            last: cell,
            block,
            tainted: false,
        };
        gesture.render(board, IVec2::ZERO);
        self.state = GestureState::Dragging(gesture);

        debug!("Picked up {cells} cell(s) at {cell}");
        DragOutcome::Picked {
            origin: cell,
            cells,
        }
    }

    pub fn pointer_move(&mut self, board: &mut Board, cell: IVec2) -> DragOutcome {
        let GestureState::Dragging(gesture) = &mut self.state else {
            return DragOutcome::Ignored;
        };

        let delta = cell - gesture.last;
        if (delta.length_squared() as f32) < JITTER_THRESHOLD {
            return DragOutcome::Ignored;
        }

        gesture.last = cell;
        gesture.render(board, delta);
        DragOutcome::Moved {
            delta,
            valid: !gesture.tainted,
        }
    }

    pub fn pointer_up(&mut self, board: &mut Board) -> DragOutcome {
        let GestureState::Dragging(mut gesture) = std::mem::take(&mut self.state) else {
            return DragOutcome::Ignored;
        };

        for pos in gesture.block.positions() {
            board.preview.clear(pos);
        }

        if gesture.tainted {
            let revert = gesture.origin - gesture.last;
            gesture.commit(board, revert);
            info!("Block returned to {}", gesture.origin);
            DragOutcome::Reverted {
                origin: gesture.origin,
            }
        } else {
            gesture.commit(board, IVec2::ZERO);
            let offset = gesture.last - gesture.origin;
            info!("Block placed with offset {offset}");
            DragOutcome::Placed { offset }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Bounds;

    const GREEN: Marker = Marker::Occupied(Tint::Valid);
    const RED: Marker = Marker::Occupied(Tint::Invalid);

    /// 2x2 block at the origin and a 2x2 placeholder zone at x = 5.
    fn board() -> Board {
        let mut board = Board::default();
        let block = Bounds {
            min: IVec2::ZERO,
            max: IVec2::ONE,
        };
        for pos in block.cells() {
            board.fixed.set(pos, GREEN);
            board.placeholder.set(pos + IVec2::new(5, 0), Marker::Placeholder);
        }
        board
    }

    #[test]
    fn pointer_down_lifts_the_block_into_preview() {
        let mut board = board();
        let mut controller = DragController::default();

        let outcome = controller.pointer_down(&mut board, IVec2::ZERO);
        assert_eq!(
            outcome,
            DragOutcome::Picked {
                origin: IVec2::ZERO,
                cells: 4
            },
            "2x2 block picked"
        );
        assert!(board.fixed.is_empty(), "static cleared under the block");
        assert_eq!(board.preview.len(), 4, "block drawn in preview");
        assert!(
            board.preview.iter().all(|(_, marker)| marker == RED),
            "origin is not a placeholder zone"
        );
        assert!(
            controller.gesture().is_some_and(Gesture::is_tainted),
            "red cells taint the gesture"
        );
    }

    #[test]
    fn pointer_down_off_block_is_a_no_op() {
        let mut board = board();
        let before = board.clone();
        let mut controller = DragController::default();

        let outcome = controller.pointer_down(&mut board, IVec2::new(3, 3));
        assert_eq!(outcome, DragOutcome::Ignored, "empty cell");
        assert_eq!(board, before, "surfaces untouched");
        assert_eq!(controller.state(), &GestureState::Idle, "still idle");
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let mut board = board();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);
        let during = board.clone();

        let outcome = controller.pointer_down(&mut board, IVec2::ONE);
        assert_eq!(outcome, DragOutcome::Ignored, "gesture in flight");
        assert_eq!(board, during, "surfaces untouched");
    }

    #[test]
    fn jitter_does_not_move_the_block() {
        let mut board = board();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);
        let during = board.clone();

        let outcome = controller.pointer_move(&mut board, IVec2::ZERO);
        assert_eq!(outcome, DragOutcome::Ignored, "same cell");
        assert_eq!(board, during, "no redraw");
        assert_eq!(
            controller.gesture().map(Gesture::last),
            Some(IVec2::ZERO),
            "last cell unchanged"
        );
    }

    #[test]
    fn moves_accumulate_displacement() {
        let mut board = board();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);

        let steps = [IVec2::new(1, 0), IVec2::new(1, 2), IVec2::new(4, -1)];
        for step in steps {
            controller.pointer_move(&mut board, step);
        }

        let total = IVec2::new(4, -1);
        let Some(gesture) = controller.gesture() else {
            panic!("gesture should still be in flight");
        };
        let mut positions: Vec<_> = gesture.block().positions().collect();
        positions.sort_by_key(|pos| (pos.y, pos.x));
        let expected: Vec<_> = Bounds {
            min: IVec2::ZERO,
            max: IVec2::ONE,
        }
        .cells()
        .map(|pos| pos + total)
        .collect();
        assert_eq!(positions, expected, "members shifted by the summed deltas");
        assert_eq!(board.preview.len(), 4, "old preview cells cleared");
    }

    #[test]
    fn partial_overlap_with_zone_is_invalid() {
        let mut board = board();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);

        let outcome = controller.pointer_move(&mut board, IVec2::new(4, 0));
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                delta: IVec2::new(4, 0),
                valid: false
            },
            "left column hangs off the zone"
        );
        assert_eq!(board.preview.get(IVec2::new(4, 0)), RED, "off zone");
        assert_eq!(board.preview.get(IVec2::new(5, 0)), GREEN, "on zone");
    }

    #[test]
    fn valid_drop_commits_at_the_new_position() {
        let mut board = board();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);
        controller.pointer_move(&mut board, IVec2::new(5, 0));

        let outcome = controller.pointer_up(&mut board);
        assert_eq!(
            outcome,
            DragOutcome::Placed {
                offset: IVec2::new(5, 0)
            },
            "placed on the zone"
        );
        assert!(board.preview.is_empty(), "preview cleared");
        assert_eq!(board.fixed.len(), 4, "four committed cells");
        for pos in (Bounds {
            min: IVec2::new(5, 0),
            max: IVec2::new(6, 1),
        })
        .cells()
        {
            assert_eq!(board.fixed.get(pos), GREEN, "committed at {pos}");
        }
        assert!(!controller.is_dragging(), "back to idle");
    }

    #[test]
    fn invalid_drop_restores_the_static_surface() {
        let mut board = board();
        let before = board.fixed.clone();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ONE);
        controller.pointer_move(&mut board, IVec2::new(3, 4));
        controller.pointer_move(&mut board, IVec2::new(-2, 7));

        let outcome = controller.pointer_up(&mut board);
        assert_eq!(
            outcome,
            DragOutcome::Reverted { origin: IVec2::ONE },
            "nowhere legal to land"
        );
        assert_eq!(board.fixed, before, "block back where it started");
        assert!(board.preview.is_empty(), "preview cleared");
    }

    #[test]
    fn release_without_moving_puts_the_block_back() {
        let mut board = board();
        let before = board.clone();
        let mut controller = DragController::default();
        controller.pointer_down(&mut board, IVec2::ZERO);

        let outcome = controller.pointer_up(&mut board);
        assert_eq!(
            outcome,
            DragOutcome::Reverted {
                origin: IVec2::ZERO
            },
            "origin is not a placeholder zone"
        );
        assert_eq!(board, before, "board unchanged overall");
    }

    #[test]
    fn move_and_up_while_idle_are_ignored() {
        let mut board = board();
        let mut controller = DragController::default();
        assert_eq!(
            controller.pointer_move(&mut board, IVec2::new(2, 2)),
            DragOutcome::Ignored,
            "no gesture to move"
        );
        assert_eq!(
            controller.pointer_up(&mut board),
            DragOutcome::Ignored,
            "no gesture to release"
        );
    }

    #[test]
    fn non_rectangular_block_stays_put_under_strict_policy() {
        let mut board = board();
        board.fixed.clear(IVec2::ONE);
        let before = board.clone();
        let mut controller = DragController::new(SelectionPolicy::Strict);

        let outcome = controller.pointer_down(&mut board, IVec2::ZERO);
        assert_eq!(outcome, DragOutcome::Ignored, "selection refused");
        assert_eq!(board, before, "surfaces untouched");
        assert!(!controller.is_dragging(), "still idle");
    }

    #[test]
    fn strict_policy_keeps_a_piece_with_an_overhang_whole() {
        // ###
        // #..
        let mut board = Board::default();
        for x in 0..3 {
            board.fixed.set(IVec2::new(x, 1), GREEN);
        }
        board.fixed.set(IVec2::ZERO, GREEN);
        let before = board.clone();
        let mut controller = DragController::new(SelectionPolicy::Strict);

        let outcome = controller.pointer_down(&mut board, IVec2::new(2, 1));
        assert_eq!(outcome, DragOutcome::Ignored, "selection refused");
        assert_eq!(board, before, "surfaces untouched");
        assert_eq!(board.fixed.get(IVec2::ZERO), GREEN, "foot not left behind");
        assert!(!controller.is_dragging(), "still idle");
    }

    #[test]
    fn flood_fill_policy_moves_irregular_pieces() {
        let mut board = board();
        board.fixed.clear(IVec2::ONE);
        board.placeholder.set(IVec2::new(6, 1), Marker::Empty);
        let mut controller = DragController::new(SelectionPolicy::FloodFill);

        controller.pointer_down(&mut board, IVec2::ZERO);
        controller.pointer_move(&mut board, IVec2::new(5, 0));
        let outcome = controller.pointer_up(&mut board);
        assert_eq!(
            outcome,
            DragOutcome::Placed {
                offset: IVec2::new(5, 0)
            },
            "L piece fits the L zone"
        );
        assert_eq!(board.fixed.len(), 3, "three cells placed");
        assert_eq!(board.fixed.get(IVec2::new(6, 1)), Marker::Empty, "hole kept");
    }
}
