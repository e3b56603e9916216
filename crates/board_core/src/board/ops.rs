//! Pure list transformations. Each takes the current list and returns the
//! next one; an operation that does not apply returns an identical copy.

use crate::model::{SubStep, Task, TaskStatus};

pub fn index_of(tasks: &[Task], id: &str) -> Option<usize> {
    tasks.iter().position(|task| task.id == id)
}

pub fn add_task(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = tasks.to_vec();
    next.push(task);
    next
}

pub fn delete_task(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|task| task.id != id).cloned().collect()
}

pub fn toggle_substep(tasks: &[Task], task_id: &str, step_id: &str) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(step) = next
        .iter_mut()
        .find(|task| task.id == task_id)
        .and_then(|task| task.substeps.iter_mut().find(|step| step.id == step_id))
    {
        step.completed = !step.completed;
    }
    next
}

pub fn append_substeps(tasks: &[Task], task_id: &str, steps: Vec<SubStep>) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(task) = next.iter_mut().find(|task| task.id == task_id) {
        task.substeps.extend(steps);
    }
    next
}

pub fn set_task_status(tasks: &[Task], id: &str, status: TaskStatus) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if let Some(task) = next.iter_mut().find(|task| task.id == id) {
        task.status = status;
    }
    next
}

/// Places `id` immediately before `before_id`, or last when `before_id` is
/// `None`.
pub fn move_task(tasks: &[Task], id: &str, before_id: Option<&str>) -> Vec<Task> {
    if before_id == Some(id) {
        return tasks.to_vec();
    }
    let Some(from) = index_of(tasks, id) else {
        return tasks.to_vec();
    };
    if let Some(before) = before_id
        && index_of(tasks, before).is_none()
    {
        return tasks.to_vec();
    }

    let mut next = tasks.to_vec();
    let task = next.remove(from);
    let to = match before_id {
        Some(before) => index_of(&next, before).unwrap_or(next.len()),
        None => next.len(),
    };
    next.insert(to, task);
    next
}

/// Remove at `from`, insert at `to`.
pub fn array_move(tasks: &[Task], from: usize, to: usize) -> Vec<Task> {
    let mut next = tasks.to_vec();
    if from >= next.len() || to >= next.len() {
        return next;
    }
    let task = next.remove(from);
    next.insert(to, task);
    next
}
