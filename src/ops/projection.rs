use serde::Serialize;

use crate::model::filter::FilterMode;
use crate::model::task::{Task, TaskRef};

/// One visible row of a projection
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub task: &'a Task,
    pub is_subtask: bool,
    /// Owning top-level task, for subtask rows
    pub parent: Option<&'a Task>,
}

impl Entry<'_> {
    /// Address of this row's task
    pub fn task_ref(&self) -> TaskRef {
        match self.parent {
            Some(parent) if self.is_subtask => TaskRef::subtask(&self.task.id, &parent.id),
            _ => TaskRef::top_level(&self.task.id),
        }
    }
}

/// Flatten the tree into display order for `mode`.
///
/// Parents come before their children and stored order is kept. A subtask is
/// shown only when its parent is shown and its own flag passes the filter.
pub fn project(tasks: &[Task], mode: FilterMode) -> Vec<Entry<'_>> {
    let mut out = Vec::new();
    for task in tasks {
        if !mode.admits(task.completed) {
            continue;
        }
        out.push(Entry {
            task,
            is_subtask: false,
            parent: None,
        });
        for sub in task.subtasks() {
            if mode.admits(sub.completed) {
                out.push(Entry {
                    task: sub,
                    is_subtask: true,
                    parent: Some(task),
                });
            }
        }
    }
    out
}

/// Task counts over the whole tree, independent of any filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

pub fn counts(tasks: &[Task]) -> Counts {
    let mut c = Counts::default();
    for task in tasks.iter().flat_map(|t| std::iter::once(t).chain(t.subtasks())) {
        c.total += 1;
        if task.completed {
            c.completed += 1;
        } else {
            c.active += 1;
        }
    }
    c
}
