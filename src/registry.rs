use crate::models::{CHUNKS_PER_TASK, Task};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The live task list in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
}

impl TaskRegistry {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a task with no progress. Blank titles and exact duplicates
    /// are ignored and yield `None`.
    pub fn add(&mut self, title: &str) -> Option<&Task> {
        let title = title.trim();
        if title.is_empty() || self.tasks.iter().any(|task| task.title == title) {
            return None;
        }

        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            checked: 0,
        });
        self.tasks.last()
    }

    /// Sets the progress count as given; bounds are the caller's concern.
    pub fn update_progress(&mut self, id: &str, count: u32) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.checked = count;
        Some(task)
    }

    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn total_checked(&self) -> u64 {
        self.tasks.iter().map(|task| u64::from(task.checked)).sum()
    }
}

/// Maps a click on checkbox `clicked` (zero based) to the new progress count.
///
/// Checkboxes behave as a progress bar: clicking a filled box clears it and
/// everything after it, clicking an empty box fills everything up to it.
pub fn next_progress(current: u32, clicked: u32) -> u32 {
    let next = if clicked < current { clicked } else { clicked + 1 };
    next.min(CHUNKS_PER_TASK)
}

/// Clamps a requested count into the valid progress range.
pub fn clamp_progress(count: i64) -> u32 {
    count.clamp(0, i64::from(CHUNKS_PER_TASK)) as u32
}
