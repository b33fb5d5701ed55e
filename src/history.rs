use crate::drawing::Shape;
use crate::error::ModelError;
use crate::scene::Scene;
use std::sync::Arc;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Vec<Arc<Shape>>>,
    redo: Vec<Vec<Arc<Shape>>>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn record(&mut self, scene: &Scene) {
        if self.undo.last().is_some_and(|last| last.as_slice() == scene.shapes()) {
            return;
        }
        self.undo.push(scene.snapshot());
        if self.undo.len() > self.limit {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo(&mut self, scene: &mut Scene) -> Result<(), ModelError> {
        let previous = self.undo.pop().ok_or(ModelError::NothingToUndo)?;
        self.redo.push(scene.snapshot());
        scene.restore(previous);
        Ok(())
    }

    pub fn redo(&mut self, scene: &mut Scene) -> Result<(), ModelError> {
        let next = self.redo.pop().ok_or(ModelError::NothingToRedo)?;
        self.undo.push(scene.snapshot());
        scene.restore(next);
        Ok(())
    }

    /// Hard-removes tombstones from the scene and every snapshot. Snapshots
    /// taken before a delete still hold the live record, so the delete stays
    /// undoable. Adjacent snapshots that become identical are collapsed.
    pub fn compact(&mut self, scene: &mut Scene) -> usize {
        let pruned = scene.prune_deleted();
        for stack in [&mut self.undo, &mut self.redo] {
            for snapshot in stack.iter_mut() {
                snapshot.retain(|s| !s.is_deleted());
            }
            stack.dedup();
        }
        log::debug!(
            "history compacted: {pruned} tombstones pruned, {} undo / {} redo steps kept",
            self.undo.len(),
            self.redo.len()
        );
        pruned
    }
}
