use crate::errors::StoreError;
use crate::models::Task;
use crate::persisted::Persisted;
use crate::storage::SharedBackend;
use crate::week::now_id;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const TASKS_KEY: &str = "tasks";

/// The ordered task collection, persisted under [`TASKS_KEY`].
pub struct TaskStore {
    tasks: Persisted<Vec<Task>>,
}

impl TaskStore {
    /// Loads the collection and repairs colliding ids left in storage.
    pub fn open(backend: SharedBackend) -> Result<Self, StoreError> {
        let mut tasks = Persisted::init(backend, TASKS_KEY, Vec::new())?;
        if let Some(repaired) = dedupe_ids(tasks.get()) {
            warn!("repaired duplicate task ids in stored collection");
            tasks.set(repaired)?;
        }
        debug!("loaded {} tasks from '{}'", tasks.get().len(), tasks.key());
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.get()
    }

    pub fn get(&self, id: f64) -> Option<&Task> {
        self.tasks().iter().find(|task| task.id == id)
    }

    /// Appends a new task. With a `day_id` the task lands on that day;
    /// without one its id is the current timestamp.
    pub fn add_task(&mut self, title: impl Into<String>, day_id: Option<f64>) -> Result<Task, StoreError> {
        let base = day_id.unwrap_or_else(now_id);
        let taken = id_set(self.tasks());
        let id = match day_id {
            Some(_) => fresh_id(base, &taken),
            None if taken.contains(&base.to_bits()) => fresh_id(base, &taken),
            None => base,
        };

        let task = Task {
            id,
            title: title.into(),
            done: false,
        };
        let mut next = self.tasks().to_vec();
        next.push(task.clone());
        self.commit(next)?;

        info!("added task {id}");
        Ok(task)
    }

    /// Flips `done`. Returns false when no task has `id`.
    pub fn toggle_task(&mut self, id: f64) -> Result<bool, StoreError> {
        self.modify(id, |task| task.done = !task.done)
    }

    /// Replaces the title. Returns false when no task has `id`.
    pub fn edit_task(&mut self, id: f64, title: impl Into<String>) -> Result<bool, StoreError> {
        let title = title.into();
        self.modify(id, move |task| task.title = title)
    }

    /// Removes the task. Returns false when no task has `id`.
    pub fn delete_task(&mut self, id: f64) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            debug!("delete of unknown task {id} ignored");
            return Ok(false);
        }
        let next = self.tasks().iter().filter(|task| task.id != id).cloned().collect();
        self.commit(next)?;
        info!("deleted task {id}");
        Ok(true)
    }

    fn modify(&mut self, id: f64, change: impl FnOnce(&mut Task)) -> Result<bool, StoreError> {
        let mut next = self.tasks().to_vec();
        let Some(task) = next.iter_mut().find(|task| task.id == id) else {
            debug!("update of unknown task {id} ignored");
            return Ok(false);
        };
        change(task);
        self.commit(next)?;
        info!("updated task {id}");
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<(), StoreError> {
        match dedupe_ids(&next) {
            Some(repaired) => {
                warn!("repaired duplicate task ids before saving");
                self.tasks.set(repaired)
            }
            None => self.tasks.set(next),
        }
    }
}

/// Returns a copy of `tasks` where only the first occurrence of every id is
/// kept as is, or `None` when there is nothing to repair.
pub fn dedupe_ids(tasks: &[Task]) -> Option<Vec<Task>> {
    if !has_duplicate_ids(tasks) {
        return None;
    }

    let mut seen = id_set(tasks);
    let mut first = HashSet::with_capacity(tasks.len());
    let repaired = tasks
        .iter()
        .map(|task| {
            if first.insert(task.id.to_bits()) {
                return task.clone();
            }
            let id = fresh_id(task.id, &seen);
            seen.insert(id.to_bits());
            Task { id, ..task.clone() }
        })
        .collect();
    Some(repaired)
}

pub fn has_duplicate_ids(tasks: &[Task]) -> bool {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks.iter().any(|task| !seen.insert(task.id.to_bits()))
}

fn id_set(tasks: &[Task]) -> HashSet<u64> {
    tasks.iter().map(|task| task.id.to_bits()).collect()
}

const FRACTION_ATTEMPTS: usize = 32;

/// `base` plus a random fraction, strictly above `base` and not in `taken`.
///
/// Past 2^53 a fraction no longer changes the value, so the id is bumped to
/// the next float above every id in use instead.
fn fresh_id(base: f64, taken: &HashSet<u64>) -> f64 {
    if base + 1.0 > base {
        let mut rng = rand::thread_rng();
        for _ in 0..FRACTION_ATTEMPTS {
            let candidate = base + rng.gen_range(0.0..1.0);
            if candidate > base && !taken.contains(&candidate.to_bits()) {
                return candidate;
            }
        }
    }

    let highest = taken
        .iter()
        .map(|bits| f64::from_bits(*bits))
        .filter(|id| id.is_finite())
        .fold(base, f64::max);
    let id = next_above(highest);
    warn!("no fractional id left above {base}, using {id}");
    id
}

/// Smallest float strictly greater than `value`, for finite `value`.
fn next_above(value: f64) -> f64 {
    if value == 0.0 {
        return f64::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}
