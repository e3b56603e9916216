//! Board state controller. Owns the task list and every collaborator it
//! needs; each list change is persisted in full and then published to
//! subscribers.

use crate::clock::Clock;
use crate::drag::{DragEngine, DragEvent, DragKey, DropTarget, Point, Rect};
use crate::error::AppError;
use crate::generate::SubstepGenerator;
use crate::ids::IdGenerator;
use crate::model::{SubStep, Task, TaskStatus, partition};
use crate::storage::{Storage, TaskStore};
use serde::Serialize;
use std::collections::BTreeSet;

pub mod ops;
mod seed;

pub use seed::example_tasks;

/// How long the error banner stays visible.
pub const BANNER_TTL_MS: i64 = 5_000;
pub const BREAKDOWN_FAILED_MESSAGE: &str =
    "Failed to generate breakdown. Check API Key or try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub message: String,
    pub raised_at: i64,
}

impl Banner {
    pub fn is_visible_at(&self, now: i64) -> bool {
        now - self.raised_at < BANNER_TTL_MS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub active_drag: Option<String>,
    pub generating: BTreeSet<String>,
    pub banner: Option<Banner>,
}

/// Snapshot of the task a breakdown was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub task_id: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&BoardState)>;

pub struct Board<S> {
    state: BoardState,
    store: TaskStore<S>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    drag: DragEngine,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: Storage> Board<S> {
    /// Loads the stored board, seeding the example tasks when it is empty.
    pub fn open(storage: S, ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        let store = TaskStore::new(storage);
        let mut tasks = store.load();
        if tasks.is_empty() {
            tasks = example_tasks(clock.now_millis());
            tracing::debug!(count = tasks.len(), "seeding empty board");
            store.save(&tasks);
        }

        Self {
            state: BoardState {
                tasks,
                ..BoardState::default()
            },
            store,
            ids,
            clock,
            drag: DragEngine::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.iter().find(|task| task.id == id)
    }

    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        partition(&self.state.tasks, status)
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&BoardState) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn add_task(&mut self, title: &str, description: Option<&str>) -> Task {
        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let task = Task {
            id: self.ids.next_id(),
            title: title.to_string(),
            description,
            status: TaskStatus::Todo,
            substeps: Vec::new(),
            created_at: self.clock.now_millis(),
        };

        let next = ops::add_task(&self.state.tasks, task.clone());
        self.replace_tasks(next);
        task
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let next = ops::delete_task(&self.state.tasks, id);
        self.replace_tasks(next)
    }

    pub fn toggle_substep(&mut self, task_id: &str, step_id: &str) -> bool {
        let next = ops::toggle_substep(&self.state.tasks, task_id, step_id);
        self.replace_tasks(next)
    }

    /// Appends one fresh, incomplete sub-step per text. Returns the sub-steps
    /// that were added.
    pub fn append_substeps(&mut self, task_id: &str, texts: Vec<String>) -> Vec<SubStep> {
        if self.task(task_id).is_none() {
            return Vec::new();
        }

        let steps: Vec<SubStep> = texts
            .into_iter()
            .map(|text| SubStep {
                id: self.ids.next_id(),
                text,
                completed: false,
            })
            .collect();
        let next = ops::append_substeps(&self.state.tasks, task_id, steps.clone());
        self.replace_tasks(next);
        steps
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> bool {
        let next = ops::set_task_status(&self.state.tasks, id, status);
        self.replace_tasks(next)
    }

    pub fn move_task(&mut self, id: &str, before_id: Option<&str>) -> bool {
        let next = ops::move_task(&self.state.tasks, id, before_id);
        self.replace_tasks(next)
    }

    /// Pointer pressed at `at` on a card drawn at `rect`.
    pub fn drag_start(&mut self, task_id: &str, at: Point, rect: Rect) -> bool {
        self.dispatch_drag(DragEvent::PointerDown {
            task_id: task_id.to_string(),
            at,
            rect,
        })
    }

    pub fn drag_pickup(&mut self, task_id: &str) -> bool {
        self.dispatch_drag(DragEvent::KeyboardPickup {
            task_id: task_id.to_string(),
        })
    }

    pub fn drag_pointer_move(&mut self, at: Point, droppables: Vec<(DropTarget, Rect)>) -> bool {
        self.dispatch_drag(DragEvent::PointerMove { at, droppables })
    }

    pub fn drag_over(&mut self, target: DropTarget) -> bool {
        self.dispatch_drag(DragEvent::Over(target))
    }

    pub fn drag_key(&mut self, key: DragKey) -> bool {
        self.dispatch_drag(DragEvent::Key(key))
    }

    /// A key pressed while `focused` has keyboard focus. Pickup starts a drag
    /// of the focused card when none is running; every other press goes to
    /// the running drag.
    pub fn drag_press(&mut self, focused: &str, key: DragKey) -> bool {
        if key == DragKey::Pickup && self.drag.active_id().is_none() {
            return self.drag_pickup(focused);
        }
        self.drag_key(key)
    }

    pub fn drag_end(&mut self) -> bool {
        self.dispatch_drag(DragEvent::End)
    }

    pub fn drag_cancel(&mut self) -> bool {
        self.dispatch_drag(DragEvent::Cancel)
    }

    /// Feeds one event to the drag engine. Returns whether the list changed.
    pub fn dispatch_drag(&mut self, event: DragEvent) -> bool {
        let next = self.drag.handle(&self.state.tasks, event);
        let active = self.drag.active_id().map(str::to_string);

        let moved = next.is_some();
        if let Some(next) = next {
            self.state.tasks = next;
            self.store.save(&self.state.tasks);
        }

        let active_changed = self.state.active_drag != active;
        self.state.active_drag = active;

        if moved || active_changed {
            self.notify();
        }
        moved
    }

    /// Marks a task as generating. `None` when the task is missing or already
    /// has a request in flight.
    pub fn begin_generation(&mut self, task_id: &str) -> Option<GenerationRequest> {
        let task = self.task(task_id)?;
        if self.state.generating.contains(task_id) {
            return None;
        }

        let request = GenerationRequest {
            task_id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
        };
        self.state.generating.insert(request.task_id.clone());
        self.state.banner = None;
        self.notify();
        Some(request)
    }

    /// Clears the generating mark and applies the outcome: steps are
    /// appended, failures raise the banner and leave the task untouched.
    pub fn finish_generation(
        &mut self,
        task_id: &str,
        result: Result<Vec<String>, AppError>,
    ) -> Result<Vec<SubStep>, AppError> {
        self.state.generating.remove(task_id);

        match result {
            Ok(texts) if texts.is_empty() => {
                self.notify();
                Ok(Vec::new())
            }
            Ok(texts) => {
                let steps = self.append_substeps(task_id, texts);
                if steps.is_empty() {
                    self.notify();
                }
                Ok(steps)
            }
            Err(err) => {
                tracing::error!(task_id = %task_id, error = %err, "breakdown failed");
                self.raise_banner(BREAKDOWN_FAILED_MESSAGE);
                Err(err)
            }
        }
    }

    /// Requests sub-steps for a task and appends them.
    pub async fn breakdown(
        &mut self,
        task_id: &str,
        generator: &dyn SubstepGenerator,
    ) -> Result<Vec<SubStep>, AppError> {
        let Some(request) = self.begin_generation(task_id) else {
            return Ok(Vec::new());
        };

        let result = generator
            .generate_substeps(&request.title, request.description.as_deref())
            .await;
        self.finish_generation(&request.task_id, result)
    }

    pub fn is_generating(&self, task_id: &str) -> bool {
        self.state.generating.contains(task_id)
    }

    pub fn raise_banner(&mut self, message: &str) {
        self.state.banner = Some(Banner {
            message: message.to_string(),
            raised_at: self.clock.now_millis(),
        });
        self.notify();
    }

    pub fn visible_banner(&self) -> Option<&Banner> {
        let now = self.clock.now_millis();
        self.state
            .banner
            .as_ref()
            .filter(|banner| banner.is_visible_at(now))
    }

    pub fn dismiss_banner(&mut self) {
        if self.state.banner.take().is_some() {
            self.notify();
        }
    }

    fn replace_tasks(&mut self, next: Vec<Task>) -> bool {
        if next == self.state.tasks {
            return false;
        }

        self.state.tasks = next;
        self.store.save(&self.state.tasks);
        self.notify();
        true
    }

    fn notify(&mut self) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }
}
