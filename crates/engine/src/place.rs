use thiserror::Error;

use crate::core::{FallingPiece, GameLogic, LogicState, Move};
use crate::types::{GameAction, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("game is not playable")]
    NotPlayable,
    #[error("no falling piece")]
    NoFalling,
    #[error("move is for a different piece")]
    WrongPiece,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("could not move to target x due to collision")]
    XBlocked,
    #[error("piece did not come to rest at the searched landing")]
    LandingMismatch,
}

/// Play a searched move through regular actions: rotate, shift along the
/// current row, tuck if needed, then land.
///
/// On error the logic is left as it was before the call.
pub fn apply_move(logic: &mut GameLogic, mv: &Move) -> Result<(), PlaceError> {
    if logic.state() != LogicState::Playing {
        return Err(PlaceError::NotPlayable);
    }
    let Some(start) = logic.falling().copied() else {
        return Err(PlaceError::NoFalling);
    };
    if start.kind != mv.kind {
        return Err(PlaceError::WrongPiece);
    }

    let snapshot = logic.clone();
    let result = steer(logic, mv);
    if result.is_err() {
        *logic = snapshot;
    }
    result
}

/// Rows the piece may be lowered to make room for a rotation
const MAX_SETTLE_ROWS: usize = 3;

fn current(logic: &GameLogic) -> Result<FallingPiece, PlaceError> {
    logic.falling().copied().ok_or(PlaceError::NoFalling)
}

fn steer(logic: &mut GameLogic, mv: &Move) -> Result<(), PlaceError> {
    rotate_to(logic, mv.rotation)?;
    shift_to(logic, mv.drop_x)?;

    if mv.tucked {
        // Drop onto the resting row, then slide under the overhang
        while logic.falling().is_some_and(|f| f.position.y < mv.position.y) {
            if !logic.apply_action(GameAction::SoftDrop) {
                break;
            }
        }
        shift_to(logic, mv.position.x)?;
    }

    if logic.ghost_position() != Some(mv.position) {
        return Err(PlaceError::LandingMismatch);
    }
    if !logic.apply_action(GameAction::HardDrop) {
        return Err(PlaceError::NotPlayable);
    }
    Ok(())
}

fn rotate_to(logic: &mut GameLogic, target: Rotation) -> Result<(), PlaceError> {
    for _ in 0..=MAX_SETTLE_ROWS {
        if try_rotate_to(logic, target)? {
            return Ok(());
        }
        // A taller rotated grid can stick out above the spawn row
        if !logic.apply_action(GameAction::SoftDrop) {
            break;
        }
    }
    Err(PlaceError::RotationBlocked)
}

fn try_rotate_to(logic: &mut GameLogic, target: Rotation) -> Result<bool, PlaceError> {
    // Shorter direction first
    let from = current(logic)?.rotation.index() as i32;
    let to = target.index() as i32;
    let cw = (to - from).rem_euclid(4);
    let ccw = (from - to).rem_euclid(4);
    let (action, steps) = if cw <= ccw {
        (GameAction::RotateCw, cw)
    } else {
        (GameAction::RotateCcw, ccw)
    };
    for _ in 0..steps {
        if !logic.apply_action(action) {
            return Ok(false);
        }
    }
    Ok(current(logic)?.rotation == target)
}

fn shift_to(logic: &mut GameLogic, target_x: i32) -> Result<(), PlaceError> {
    loop {
        let x = logic
            .falling()
            .map(|f| f.position.x)
            .ok_or(PlaceError::NoFalling)?;
        let action = match target_x.cmp(&x) {
            std::cmp::Ordering::Equal => return Ok(()),
            std::cmp::Ordering::Greater => GameAction::MoveRight,
            std::cmp::Ordering::Less => GameAction::MoveLeft,
        };
        if !logic.apply_action(action) {
            return Err(PlaceError::XBlocked);
        }
    }
}
