use crate::io::storage::StorageAdapter;
use crate::model::filter::FilterMode;
use crate::model::task::{Task, TaskRef, generate_id};
use crate::ops::projection::{self, Entry};

/// Where a task currently sits in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Index in the top-level list
    Top(usize),
    /// (parent index in the top-level list, index in its subtasks)
    Sub(usize, usize),
}

/// Sole owner of the task tree.
///
/// Every successful mutation bumps the revision and is persisted through the
/// storage adapter before returning. Operations addressing tasks or parents
/// that do not exist are silent no-ops: they return `false`/`None` and leave
/// the tree and the store untouched.
pub struct TaskStore<S: StorageAdapter> {
    tasks: Vec<Task>,
    storage: S,
    revision: u64,
    last_save_error: Option<String>,
}

impl<S: StorageAdapter> TaskStore<S> {
    /// Load the tree from storage (empty on absence or corruption).
    pub fn load(storage: S) -> Self {
        let tasks = storage.load();
        tracing::debug!(count = tasks.len(), "loaded task list");
        TaskStore {
            tasks,
            storage,
            revision: 0,
            last_save_error: None,
        }
    }

    /// Read-only view of the top-level list
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Incremented on every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Message of the most recent failed save, cleared by the next good one
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Number of tasks in the tree, subtasks included
    pub fn len(&self) -> usize {
        self.tasks.iter().map(Task::weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Filtered, flattened view of the current tree
    pub fn project(&self, mode: FilterMode) -> Vec<Entry<'_>> {
        projection::project(&self.tasks, mode)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new top-level task. Returns its id, or `None` when the
    /// trimmed text is empty.
    pub fn add_task(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignored empty task text");
            return None;
        }
        let id = self.fresh_id();
        self.tasks.push(Task::top_level(id.clone(), text.to_string()));
        self.commit();
        Some(id)
    }

    /// Append a subtask to the top-level task `parent_id`. Returns its id, or
    /// `None` when the text is empty or the parent does not exist.
    pub fn add_subtask(&mut self, parent_id: &str, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignored empty subtask text");
            return None;
        }
        let Some(parent_idx) = self.top_index(parent_id) else {
            tracing::debug!(parent_id, "add subtask: parent not found");
            return None;
        };
        let id = self.fresh_id();
        self.tasks[parent_idx]
            .subtasks
            .get_or_insert_with(Vec::new)
            .push(Task::subtask(id.clone(), text.to_string()));
        self.commit();
        Some(id)
    }

    /// Flip the completion flag of the addressed task.
    pub fn toggle_completed(&mut self, task: &TaskRef) -> bool {
        let Some(target) = self.get_mut(task) else {
            tracing::debug!(id = %task.id, "toggle: task not found");
            return false;
        };
        target.completed = !target.completed;
        self.commit();
        true
    }

    /// Remove the addressed task. Removing a top-level task removes its
    /// subtasks with it.
    pub fn delete_task(&mut self, task: &TaskRef) -> bool {
        match self.slot(task) {
            Some(Slot::Top(idx)) => {
                let removed = self.tasks.remove(idx);
                tracing::debug!(id = %removed.id, removed = removed.weight(), "deleted task");
            }
            Some(Slot::Sub(p, idx)) => {
                if let Some(subs) = self.tasks[p].subtasks.as_mut() {
                    subs.remove(idx);
                }
            }
            None => {
                tracing::debug!(id = %task.id, "delete: task not found");
                return false;
            }
        }
        self.commit();
        true
    }

    /// Detach the addressed task and reinsert it at `insert_index` (clamped
    /// to the container's bounds) of the top level (`target_parent = None`)
    /// or of a top-level task's subtasks.
    ///
    /// A task landing at the top level gets an empty subtask collection if it
    /// had none. A task landing in a subtask group gives up its own subtasks:
    /// they are placed in the same group right after it, in order, so the tree
    /// never nests deeper than one level.
    ///
    /// No-op when the source cannot be found, when the target parent does not
    /// exist, or when the target parent is the moved task itself.
    pub fn move_task(
        &mut self,
        task: &TaskRef,
        target_parent: Option<&str>,
        insert_index: usize,
    ) -> bool {
        let Some(source) = self.slot(task) else {
            tracing::debug!(id = %task.id, "move: source not found");
            return false;
        };
        let target = match target_parent {
            None => None,
            Some(pid) => {
                let Some(p) = self.top_index(pid) else {
                    tracing::debug!(parent_id = pid, "move: target parent not found");
                    return false;
                };
                if source == Slot::Top(p) {
                    tracing::debug!(id = %task.id, "move: cannot nest a task under itself");
                    return false;
                }
                Some(p)
            }
        };

        let mut item = match source {
            Slot::Top(idx) => self.tasks.remove(idx),
            Slot::Sub(p, idx) => match self.tasks[p].subtasks.as_mut() {
                Some(subs) => subs.remove(idx),
                None => return false,
            },
        };

        match target {
            None => {
                item.subtasks.get_or_insert_with(Vec::new);
                let at = insert_index.min(self.tasks.len());
                self.tasks.insert(at, item);
            }
            Some(mut p) => {
                // Detaching a top-level task above the parent shifts it up
                if let Slot::Top(removed) = source
                    && removed < p
                {
                    p -= 1;
                }
                let lifted = item.subtasks.take().unwrap_or_default();
                if !lifted.is_empty() {
                    tracing::debug!(id = %item.id, lifted = lifted.len(), "flattened subtasks into new parent");
                }
                let subs = self.tasks[p].subtasks.get_or_insert_with(Vec::new);
                let at = insert_index.min(subs.len());
                subs.insert(at, item);
                for (offset, sub) in lifted.into_iter().enumerate() {
                    subs.insert(at + 1 + offset, sub);
                }
            }
        }
        self.commit();
        true
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Resolve a task by `(id, is_sub, parent_id)`.
    pub fn get(&self, task: &TaskRef) -> Option<&Task> {
        match self.slot(task)? {
            Slot::Top(idx) => self.tasks.get(idx),
            Slot::Sub(p, idx) => self.tasks[p].subtasks().get(idx),
        }
    }

    /// Index of the addressed task within its own sibling list
    pub fn index_of(&self, task: &TaskRef) -> Option<usize> {
        match self.slot(task)? {
            Slot::Top(idx) | Slot::Sub(_, idx) => Some(idx),
        }
    }

    /// Find a task anywhere in the tree by id alone and return its address.
    pub fn locate(&self, id: &str) -> Option<TaskRef> {
        for task in &self.tasks {
            if task.id == id {
                return Some(TaskRef::top_level(id));
            }
            if task.subtasks().iter().any(|s| s.id == id) {
                return Some(TaskRef::subtask(id, task.id.clone()));
            }
        }
        None
    }

    fn get_mut(&mut self, task: &TaskRef) -> Option<&mut Task> {
        match self.slot(task)? {
            Slot::Top(idx) => self.tasks.get_mut(idx),
            Slot::Sub(p, idx) => self.tasks[p].subtasks.as_mut()?.get_mut(idx),
        }
    }

    fn top_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn slot(&self, task: &TaskRef) -> Option<Slot> {
        match task.parent() {
            Some(pid) => {
                let p = self.top_index(pid)?;
                let idx = self.tasks[p]
                    .subtasks()
                    .iter()
                    .position(|s| s.id == task.id)?;
                Some(Slot::Sub(p, idx))
            }
            None => self.top_index(&task.id).map(Slot::Top),
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    /// Record a successful mutation and persist the tree.
    fn commit(&mut self) {
        self.revision += 1;
        match self.storage.save(&self.tasks) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "could not persist task list");
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}
