//! Selection set with multi-select support.
//!
//! The selection holds node ids only; it never owns nodes. Ids of nodes that
//! were removed from the scene linger until [`Selection::prune`] runs.
//!
//! - Click: Replace selection
//! - Shift+Click: Add to selection
//! - Ctrl+Click: Remove from selection
//! - Ctrl+Shift+Click: Toggle selection

use crate::node::NodeId;
use crate::scene::Scene;

/// Selection mode based on modifier keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace current selection (normal click)
    #[default]
    Replace,
    /// Add to current selection (Shift+click)
    Add,
    /// Remove from current selection (Ctrl+click)
    Remove,
    /// Toggle selection state (Ctrl+Shift+click)
    Toggle,
}

impl SelectionMode {
    /// Determine selection mode from modifier keys.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        match (shift, ctrl) {
            (true, true) => Self::Toggle,
            (true, false) => Self::Add,
            (false, true) => Self::Remove,
            (false, false) => Self::Replace,
        }
    }
}

/// Currently selected scene nodes, in selection order.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    selected: Vec<NodeId>,
    /// Last selected node
    primary: Option<NodeId>,
    dirty: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node at `index` in selection order, `None` when out of range.
    pub fn selected_object(&self, index: usize) -> Option<NodeId> {
        self.selected.get(index).copied()
    }

    /// Snapshot of the selection. Later selection changes do not affect
    /// the returned vector.
    pub fn all_selected(&self) -> Vec<NodeId> {
        self.selected.clone()
    }

    /// The last selected node.
    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Check and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Select a node with the given mode.
    pub fn select(&mut self, id: NodeId, mode: SelectionMode) {
        match mode {
            SelectionMode::Replace => {
                self.selected.clear();
                self.selected.push(id);
                self.primary = Some(id);
            }
            SelectionMode::Add => {
                if !self.selected.contains(&id) {
                    self.selected.push(id);
                }
                self.primary = Some(id);
            }
            SelectionMode::Remove => self.remove(id),
            SelectionMode::Toggle => {
                if self.selected.contains(&id) {
                    self.remove(id);
                } else {
                    self.selected.push(id);
                    self.primary = Some(id);
                }
            }
        }
        self.dirty = true;
    }

    pub fn add(&mut self, id: NodeId) {
        self.select(id, SelectionMode::Add);
    }

    pub fn toggle(&mut self, id: NodeId) {
        self.select(id, SelectionMode::Toggle);
    }

    /// Remove a node from the selection (e.g. when it is deleted).
    pub fn remove(&mut self, id: NodeId) {
        let was_selected = self.selected.contains(&id);
        self.selected.retain(|&e| e != id);
        if self.primary == Some(id) {
            self.primary = self.selected.last().copied();
        }
        if was_selected {
            self.dirty = true;
        }
    }

    /// Replace the selection with `ids`.
    pub fn select_multiple(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selected.clear();
        for id in ids {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        self.primary = self.selected.last().copied();
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.primary = None;
            self.dirty = true;
        }
    }

    /// Select every selectable node attached to the scene.
    pub fn select_all(&mut self, scene: &Scene) {
        let ids: Vec<NodeId> = scene
            .iter_depth_first()
            .filter(|&id| scene.node(id).is_some_and(|n| n.selectable))
            .collect();
        self.select_multiple(ids);
    }

    /// Drop ids whose nodes are gone from the scene or detached from the root.
    pub fn prune(&mut self, scene: &Scene) {
        let stale: Vec<NodeId> = self
            .selected
            .iter()
            .copied()
            .filter(|&id| !scene.is_attached(id))
            .collect();
        for id in stale {
            log::debug!("Dropping stale selection entry {}", id);
            self.remove(id);
        }
    }
}
