use crate::board::ops::index_of;
use crate::drag::DropTarget;
use crate::error::AppError;
use crate::model::{Task, partition};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKey {
    Up,
    Down,
    Left,
    Right,
    /// Space or enter: picks the focused card up, or drops the one in flight.
    Pickup,
    Drop,
    Escape,
}

impl FromStr for DragKey {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "k" => Ok(Self::Up),
            "down" | "arrowdown" | "j" => Ok(Self::Down),
            "left" | "arrowleft" | "h" => Ok(Self::Left),
            "right" | "arrowright" | "l" => Ok(Self::Right),
            "space" | "enter" | "pickup" => Ok(Self::Pickup),
            "drop" => Ok(Self::Drop),
            "escape" | "esc" => Ok(Self::Escape),
            other => Err(AppError::invalid_input(format!("unknown key '{other}'"))),
        }
    }
}

/// Resolves an arrow key to the target it would move the active task over:
/// the neighbouring card in the same column for up/down, the adjacent
/// column for left/right.
pub fn keyboard_target(tasks: &[Task], active_id: &str, key: DragKey) -> Option<DropTarget> {
    let active = &tasks[index_of(tasks, active_id)?];
    match key {
        DragKey::Up | DragKey::Down => {
            let column = partition(tasks, active.status);
            let position = column.iter().position(|task| task.id == active_id)?;
            let neighbour = if key == DragKey::Up {
                position.checked_sub(1).and_then(|index| column.get(index))
            } else {
                column.get(position + 1)
            };
            neighbour.map(|task| DropTarget::Task(task.id.clone()))
        }
        DragKey::Left => active.status.left().map(DropTarget::Column),
        DragKey::Right => active.status.right().map(DropTarget::Column),
        DragKey::Pickup | DragKey::Drop | DragKey::Escape => None,
    }
}
