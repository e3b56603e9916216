//! Drag/reorder engine: turns pointer and keyboard drag events into list
//! reorders and status changes. Moves apply live while dragging; ending or
//! cancelling a drag never mutates the list.

use crate::board::ops::{array_move, index_of};
use crate::model::{Task, TaskStatus};
use serde::Serialize;

mod collision;
mod keyboard;
mod layout;

pub use collision::{Point, Rect, closest_corners};
pub use keyboard::{DragKey, keyboard_target};
pub use layout::BoardLayout;

/// Pointer travel, in pixels, before a press becomes a drag.
pub const ACTIVATION_DISTANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id")]
pub enum DropTarget {
    Task(String),
    Column(TaskStatus),
}

/// Where the pointer pressed and the card's rectangle at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub origin: Point,
    pub rect: Rect,
}

impl Grab {
    /// The card rectangle carried along to `at`.
    pub fn dragged_to(&self, at: Point) -> Rect {
        self.rect.translate(at.x - self.origin.x, at.y - self.origin.y)
    }

    fn collide(&self, at: Point, droppables: &[(DropTarget, Rect)]) -> Option<DropTarget> {
        closest_corners(&self.dragged_to(at), droppables)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pending {
        task_id: String,
        grab: Grab,
    },
    /// `grab` is `None` for keyboard drags.
    Dragging {
        active_id: String,
        over: Option<DropTarget>,
        grab: Option<Grab>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    PointerDown {
        task_id: String,
        at: Point,
        rect: Rect,
    },
    /// `droppables` is the current geometry of every drop target; the target
    /// under the dragged card is picked by closest corners.
    PointerMove {
        at: Point,
        droppables: Vec<(DropTarget, Rect)>,
    },
    Over(DropTarget),
    KeyboardPickup { task_id: String },
    Key(DragKey),
    End,
    Cancel,
}

/// The list after dragging `active_id` over `target`.
pub fn drag_over(tasks: &[Task], active_id: &str, target: &DropTarget) -> Vec<Task> {
    let Some(active_index) = index_of(tasks, active_id) else {
        return tasks.to_vec();
    };

    match target {
        DropTarget::Task(target_id) => {
            if target_id == active_id {
                return tasks.to_vec();
            }
            let Some(target_index) = index_of(tasks, target_id) else {
                return tasks.to_vec();
            };

            let target_status = tasks[target_index].status;
            if tasks[active_index].status == target_status {
                return array_move(tasks, active_index, target_index);
            }

            let mut next = tasks.to_vec();
            let mut active = next.remove(active_index);
            active.status = target_status;
            let before = index_of(&next, target_id).unwrap_or(0);
            next.insert(before, active);
            next
        }
        DropTarget::Column(status) => {
            if tasks[active_index].status == *status {
                return tasks.to_vec();
            }

            let mut next = tasks.to_vec();
            let mut active = next.remove(active_index);
            active.status = *status;
            let after_partition = next
                .iter()
                .rposition(|task| task.status == *status)
                .map_or(next.len(), |last| last + 1);
            next.insert(after_partition, active);
            next
        }
    }
}

#[derive(Debug)]
pub struct DragEngine {
    state: DragState,
}

impl Default for DragEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DragEngine {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { active_id, .. } => Some(active_id),
            _ => None,
        }
    }

    /// Advances the state machine. Returns the new list when the event moved
    /// or re-statused a task.
    pub fn handle(&mut self, tasks: &[Task], event: DragEvent) -> Option<Vec<Task>> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let (state, next) = transition(state, tasks, event);
        self.state = state;
        next.filter(|next| next.as_slice() != tasks)
    }
}

fn transition(
    state: DragState,
    tasks: &[Task],
    event: DragEvent,
) -> (DragState, Option<Vec<Task>>) {
    match (state, event) {
        (DragState::Idle, DragEvent::PointerDown { task_id, at, rect }) => {
            if index_of(tasks, &task_id).is_none() {
                return (DragState::Idle, None);
            }
            (
                DragState::Pending {
                    task_id,
                    grab: Grab { origin: at, rect },
                },
                None,
            )
        }
        (DragState::Idle, DragEvent::KeyboardPickup { task_id }) => {
            if index_of(tasks, &task_id).is_none() {
                return (DragState::Idle, None);
            }
            tracing::debug!(task_id = %task_id, "keyboard drag started");
            (
                DragState::Dragging {
                    active_id: task_id,
                    over: None,
                    grab: None,
                },
                None,
            )
        }
        (DragState::Pending { task_id, grab }, DragEvent::PointerMove { at, droppables }) => {
            if grab.origin.distance_to(at) < ACTIVATION_DISTANCE {
                return (DragState::Pending { task_id, grab }, None);
            }
            tracing::debug!(task_id = %task_id, "pointer drag started");
            let over = grab.collide(at, &droppables);
            hover(task_id, Some(grab), tasks, over)
        }
        (DragState::Pending { .. }, DragEvent::End | DragEvent::Cancel) => {
            (DragState::Idle, None)
        }
        (
            DragState::Dragging {
                active_id,
                over,
                grab: Some(grab),
            },
            DragEvent::PointerMove { at, droppables },
        ) => match grab.collide(at, &droppables) {
            Some(target) => hover(active_id, Some(grab), tasks, Some(target)),
            None => (
                DragState::Dragging {
                    active_id,
                    over,
                    grab: Some(grab),
                },
                None,
            ),
        },
        (DragState::Dragging { active_id, grab, .. }, DragEvent::Over(target)) => {
            hover(active_id, grab, tasks, Some(target))
        }
        (
            DragState::Dragging {
                active_id,
                over,
                grab,
            },
            DragEvent::Key(key),
        ) => match key {
            DragKey::Pickup | DragKey::Drop | DragKey::Escape => {
                tracing::debug!(task_id = %active_id, "drag finished");
                (DragState::Idle, None)
            }
            arrow => match keyboard_target(tasks, &active_id, arrow) {
                Some(target) => hover(active_id, grab, tasks, Some(target)),
                None => (
                    DragState::Dragging {
                        active_id,
                        over,
                        grab,
                    },
                    None,
                ),
            },
        },
        (DragState::Dragging { active_id, .. }, DragEvent::End | DragEvent::Cancel) => {
            tracing::debug!(task_id = %active_id, "drag finished");
            (DragState::Idle, None)
        }
        (state, _) => (state, None),
    }
}

fn hover(
    active_id: String,
    grab: Option<Grab>,
    tasks: &[Task],
    over: Option<DropTarget>,
) -> (DragState, Option<Vec<Task>>) {
    let next = over
        .as_ref()
        .map(|target| drag_over(tasks, &active_id, target));
    (
        DragState::Dragging {
            active_id,
            over,
            grab,
        },
        next,
    )
}
