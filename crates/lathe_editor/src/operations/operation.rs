//! Operation trait, errors and grouping.

use lathe_scene::{NodeId, Scene, SceneError};
use thiserror::Error;

/// Result type for operation execution.
pub type OperationResult<T = ()> = Result<T, OperationError>;

/// Errors that can occur while executing or undoing an operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OperationError {
    /// Target node is not in the scene
    #[error("Scene node not found: {0}")]
    NodeNotFound(NodeId),

    /// The operation cannot run in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Undo or redo was requested while a transaction is open
    #[error("Transaction '{0}' is still open")]
    TransactionOpen(String),

    /// The scene rejected the change
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// An atomic, reversible scene mutation.
///
/// `execute` snapshots whatever state it overwrites; `undo` restores that
/// snapshot verbatim so repeated undo/redo cycles never drift.
pub trait Operation: Send {
    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str;

    /// Apply the operation to the scene.
    fn execute(&mut self, scene: &mut Scene) -> OperationResult;

    /// Restore the state captured by the last `execute`.
    fn undo(&mut self, scene: &mut Scene) -> OperationResult;
}

/// Ordered operations executed as a single undoable unit.
///
/// Children execute in order and undo in reverse. If a child fails, the
/// children that already ran are undone before the error is returned. A
/// failed undo likewise reapplies the children it had already undone.
pub struct GroupedOperation {
    name: String,
    children: Vec<Box<dyn Operation>>,
}

impl GroupedOperation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Box<dyn Operation>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn push(&mut self, op: Box<dyn Operation>) {
        self.children.push(op);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Operation for GroupedOperation {
    fn description(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        for i in 0..self.children.len() {
            if let Err(err) = self.children[i].execute(scene) {
                for done in self.children[..i].iter_mut().rev() {
                    if let Err(undo_err) = done.undo(scene) {
                        log::error!("Failed to roll back '{}': {}", done.description(), undo_err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        for i in (0..self.children.len()).rev() {
            if let Err(err) = self.children[i].undo(scene) {
                for undone in self.children[i + 1..].iter_mut() {
                    if let Err(redo_err) = undone.execute(scene) {
                        log::error!("Failed to reapply '{}': {}", undone.description(), redo_err);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{SetTransformOperation, TranslateOperation};
    use lathe_math::{Transform, Vec3};
    use lathe_scene::SceneNode;

    #[test]
    fn test_group_undoes_in_reverse() {
        let mut scene = Scene::new();
        let root = scene.root();
        let node = scene.add_node(SceneNode::new("cube"), root).unwrap();

        let mut group = GroupedOperation::new("Move twice");
        group.push(Box::new(TranslateOperation::new(node, Vec3::X)));
        group.push(Box::new(TranslateOperation::new(node, Vec3::Y)));

        group.execute(&mut scene).unwrap();
        assert_eq!(scene.global_position(node), Some(Vec3::new(1.0, 1.0, 0.0)));

        group.undo(&mut scene).unwrap();
        assert_eq!(scene.local_transform(node), Some(Transform::IDENTITY));
    }

    #[test]
    fn test_group_rolls_back_on_failure() {
        let mut scene = Scene::new();
        let root = scene.root();
        let node = scene.add_node(SceneNode::new("cube"), root).unwrap();
        let missing = SceneNode::new("missing").id();

        let mut group = GroupedOperation::new("Broken");
        group.push(Box::new(TranslateOperation::new(node, Vec3::X)));
        group.push(Box::new(SetTransformOperation::new(missing, Transform::IDENTITY)));

        let err = group.execute(&mut scene).unwrap_err();
        assert_eq!(err, OperationError::NodeNotFound(missing));
        assert_eq!(scene.local_transform(node), Some(Transform::IDENTITY));
    }

    #[test]
    fn test_group_undo_failure_reapplies_undone_children() {
        let mut scene = Scene::new();
        let root = scene.root();
        let first = scene.add_node(SceneNode::new("first"), root).unwrap();
        let second = scene.add_node(SceneNode::new("second"), root).unwrap();

        let mut group = GroupedOperation::new("Spread");
        group.push(Box::new(TranslateOperation::new(first, Vec3::X)));
        group.push(Box::new(TranslateOperation::new(second, Vec3::Y)));
        group.execute(&mut scene).unwrap();

        let detached = scene.remove_node(first).unwrap();
        assert_eq!(group.undo(&mut scene), Err(OperationError::NodeNotFound(first)));
        assert_eq!(scene.global_position(second), Some(Vec3::Y));

        scene.restore_subtree(detached).unwrap();
        group.undo(&mut scene).unwrap();
        assert_eq!(scene.local_transform(first), Some(Transform::IDENTITY));
        assert_eq!(scene.local_transform(second), Some(Transform::IDENTITY));
    }
}
