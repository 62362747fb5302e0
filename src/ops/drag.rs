//! Drag gestures over the projected list.
//!
//! A gesture starts on one row, hovers over others, and ends either with a
//! drop (one `TaskStore::move_task` call) or a cancel (no mutation).

use crate::io::storage::StorageAdapter;
use crate::model::task::{Task, TaskRef};
use crate::ops::task_store::TaskStore;

/// Per-gesture state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: TaskRef,
        /// Row currently showing the drop hint
        hover: Option<TaskRef>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    state: DragState,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The row being dragged
    pub fn source(&self) -> Option<&TaskRef> {
        match &self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// The row that should show a drop hint
    pub fn hint(&self) -> Option<&TaskRef> {
        match &self.state {
            DragState::Dragging { hover, .. } => hover.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Begin a gesture. Any unfinished gesture is discarded.
    pub fn start(&mut self, source: TaskRef) {
        tracing::trace!(id = %source.id, "drag start");
        self.state = DragState::Dragging {
            source,
            hover: None,
        };
    }

    /// Hover over a candidate target. Returns whether a drop hint should be
    /// shown; hovering the dragged row itself clears the hint.
    pub fn over(&mut self, target: &TaskRef) -> bool {
        let DragState::Dragging { source, hover } = &mut self.state else {
            return false;
        };
        if source.same_row(target) {
            *hover = None;
            return false;
        }
        *hover = Some(target.clone());
        true
    }

    /// The pointer left the hinted row.
    pub fn leave(&mut self) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = None;
        }
    }

    /// Drop onto `target`, moving the dragged task into the target's slot.
    /// Returns whether the tree changed. The gesture ends either way.
    pub fn drop_on<S: StorageAdapter>(
        &mut self,
        target: &TaskRef,
        store: &mut TaskStore<S>,
    ) -> bool {
        let DragState::Dragging { source, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        if source.same_row(target) {
            return false;
        }
        let Some((new_parent, index)) = resolve_drop(store.tasks(), target) else {
            tracing::debug!(target = %target.id, "drop: target parent not found");
            return false;
        };
        store.move_task(&source, new_parent.as_deref(), index)
    }

    /// End the gesture without dropping.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            tracing::trace!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Work out where a drop on `target` inserts: `(new parent, index)`.
///
/// A top-level target means the top level at the target's index (end of the
/// list if the target is gone). A subtask target means the target's parent at
/// the target's index within it (end of that group if the target is gone);
/// `None` if that parent no longer exists.
pub fn resolve_drop(tasks: &[Task], target: &TaskRef) -> Option<(Option<String>, usize)> {
    if !target.is_sub {
        let index = tasks
            .iter()
            .position(|t| t.id == target.id)
            .unwrap_or(tasks.len());
        return Some((None, index));
    }
    let parent_id = target.parent_id.as_deref()?;
    let parent = tasks.iter().find(|t| t.id == parent_id)?;
    let subs = parent.subtasks();
    let index = subs
        .iter()
        .position(|s| s.id == target.id)
        .unwrap_or(subs.len());
    Some((Some(parent.id.clone()), index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{MemoryStorage, StorageAdapter};
    use pretty_assertions::assert_eq;

    /// `[A, B, C]`, A owns `[A1, A2]`
    fn sample_store() -> TaskStore<MemoryStorage> {
        let mut a = Task::top_level("A".into(), "A".into());
        a.subtasks = Some(vec![
            Task::subtask("A1".into(), "A1".into()),
            Task::subtask("A2".into(), "A2".into()),
        ]);
        let mut storage = MemoryStorage::default();
        storage
            .save(&[
                a,
                Task::top_level("B".into(), "B".into()),
                Task::top_level("C".into(), "C".into()),
            ])
            .unwrap();
        TaskStore::load(storage)
    }

    fn layout(store: &TaskStore<MemoryStorage>) -> Vec<String> {
        let mut out = Vec::new();
        for t in store.tasks() {
            out.push(t.id.clone());
            for s in t.subtasks() {
                out.push(format!("  {}", s.id));
            }
        }
        out
    }

    #[test]
    fn test_state_transitions() {
        let mut engine = DragEngine::new();
        assert_eq!(engine.state(), &DragState::Idle);

        engine.start(TaskRef::top_level("B"));
        assert!(engine.is_dragging());
        assert_eq!(engine.source(), Some(&TaskRef::top_level("B")));

        engine.cancel();
        assert_eq!(engine.state(), &DragState::Idle);
        assert_eq!(engine.source(), None);
    }

    #[test]
    fn test_over_ignores_self() {
        let mut engine = DragEngine::new();
        assert!(!engine.over(&TaskRef::top_level("A"))); // idle

        engine.start(TaskRef::top_level("B"));
        assert!(engine.over(&TaskRef::top_level("A")));
        assert_eq!(engine.hint(), Some(&TaskRef::top_level("A")));

        assert!(!engine.over(&TaskRef::top_level("B")));
        assert_eq!(engine.hint(), None);

        engine.over(&TaskRef::subtask("A1", "A"));
        engine.leave();
        assert_eq!(engine.hint(), None);
        assert!(engine.is_dragging());
    }

    #[test]
    fn test_drop_reorders_top_level() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("C"));
        assert!(engine.drop_on(&TaskRef::top_level("A"), &mut store));
        assert_eq!(layout(&store), ["C", "A", "  A1", "  A2", "B"]);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_drop_downward_lands_after_target() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("A"));
        assert!(engine.drop_on(&TaskRef::top_level("B"), &mut store));
        assert_eq!(layout(&store), ["B", "A", "  A1", "  A2", "C"]);
    }

    #[test]
    fn test_drop_reparents_top_level_onto_subtask() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("B"));
        assert!(engine.drop_on(&TaskRef::subtask("A1", "A"), &mut store));
        assert_eq!(layout(&store), ["A", "  B", "  A1", "  A2", "C"]);
    }

    #[test]
    fn test_drop_subtask_onto_top_level() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::subtask("A2", "A"));
        assert!(engine.drop_on(&TaskRef::top_level("C"), &mut store));
        assert_eq!(layout(&store), ["A", "  A1", "B", "A2", "C"]);
        let moved = store.get(&TaskRef::top_level("A2")).unwrap();
        assert_eq!(moved.subtasks, Some(vec![]));
    }

    #[test]
    fn test_drop_subtask_within_group() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::subtask("A2", "A"));
        assert!(engine.drop_on(&TaskRef::subtask("A1", "A"), &mut store));
        assert_eq!(layout(&store), ["A", "  A2", "  A1", "B", "C"]);
    }

    #[test]
    fn test_drop_parent_onto_other_group_flattens() {
        let mut store = sample_store();
        store.add_subtask("C", "C1").unwrap();
        let c1 = store.tasks()[2].subtasks()[0].id.clone();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("A"));
        assert!(engine.drop_on(&TaskRef::subtask(&c1, "C"), &mut store));
        assert_eq!(
            layout(&store),
            [
                "B".to_string(),
                "C".to_string(),
                "  A".to_string(),
                "  A1".to_string(),
                "  A2".to_string(),
                format!("  {c1}"),
            ]
        );
    }

    #[test]
    fn test_drop_parent_onto_own_subtask_is_noop() {
        let mut store = sample_store();
        let before = layout(&store);
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("A"));
        assert!(!engine.drop_on(&TaskRef::subtask("A1", "A"), &mut store));
        assert_eq!(layout(&store), before);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("B"));
        assert!(!engine.drop_on(&TaskRef::top_level("B"), &mut store));
        assert_eq!(store.revision(), 0);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_drop_without_start_is_noop() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        assert!(!engine.drop_on(&TaskRef::top_level("A"), &mut store));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_drop_after_source_deleted_is_noop() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("B"));
        store.delete_task(&TaskRef::top_level("B"));
        let rev = store.revision();
        assert!(!engine.drop_on(&TaskRef::top_level("A"), &mut store));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_drop_onto_deleted_top_level_target_appends() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("A"));
        assert!(engine.drop_on(&TaskRef::top_level("gone"), &mut store));
        assert_eq!(layout(&store), ["B", "C", "A", "  A1", "  A2"]);
    }

    #[test]
    fn test_drop_onto_subtask_of_deleted_parent_is_noop() {
        let mut store = sample_store();
        let mut engine = DragEngine::new();
        engine.start(TaskRef::top_level("B"));
        assert!(!engine.drop_on(&TaskRef::subtask("X1", "X"), &mut store));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_resolve_drop() {
        let store = sample_store();
        let tasks = store.tasks();
        assert_eq!(resolve_drop(tasks, &TaskRef::top_level("B")), Some((None, 1)));
        assert_eq!(
            resolve_drop(tasks, &TaskRef::top_level("missing")),
            Some((None, 3))
        );
        assert_eq!(
            resolve_drop(tasks, &TaskRef::subtask("A2", "A")),
            Some((Some("A".to_string()), 1))
        );
        assert_eq!(
            resolve_drop(tasks, &TaskRef::subtask("gone", "A")),
            Some((Some("A".to_string()), 2))
        );
        assert_eq!(resolve_drop(tasks, &TaskRef::subtask("A1", "Z")), None);
    }
}
