//! Geometry of a board drawn as fixed-width columns of fixed-height cards.
//! Feeds collision detection when no real renderer supplies rectangles.

use crate::drag::{DropTarget, Rect};
use crate::model::{Task, TaskStatus, columns};

pub const COLUMN_WIDTH: f64 = 320.0;
pub const COLUMN_GAP: f64 = 24.0;
pub const HEADER_HEIGHT: f64 = 48.0;
pub const CARD_INSET: f64 = 12.0;
pub const CARD_HEIGHT: f64 = 96.0;
pub const CARD_GAP: f64 = 12.0;

/// Every card as a droppable, plus one drop zone per column: the free slot
/// under that column's last card.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    droppables: Vec<(DropTarget, Rect)>,
}

fn slot(status: TaskStatus, row: usize) -> Rect {
    let left = status.column_index() as f64 * (COLUMN_WIDTH + COLUMN_GAP) + CARD_INSET;
    let top = HEADER_HEIGHT + row as f64 * (CARD_HEIGHT + CARD_GAP);
    Rect::new(left, top, COLUMN_WIDTH - 2.0 * CARD_INSET, CARD_HEIGHT)
}

impl BoardLayout {
    pub fn of(tasks: &[Task]) -> Self {
        let mut droppables = Vec::with_capacity(tasks.len() + TaskStatus::ALL.len());
        for (status, column) in columns(tasks) {
            for (row, task) in column.iter().enumerate() {
                droppables.push((DropTarget::Task(task.id.clone()), slot(status, row)));
            }
            droppables.push((DropTarget::Column(status), slot(status, column.len())));
        }
        Self { droppables }
    }

    pub fn droppables(&self) -> &[(DropTarget, Rect)] {
        &self.droppables
    }

    pub fn rect_of(&self, target: &DropTarget) -> Option<Rect> {
        self.droppables
            .iter()
            .find(|(candidate, _)| candidate == target)
            .map(|(_, rect)| *rect)
    }

    pub fn into_droppables(self) -> Vec<(DropTarget, Rect)> {
        self.droppables
    }
}
