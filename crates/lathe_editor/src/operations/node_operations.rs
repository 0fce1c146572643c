//! Structural operations: add, remove and reparent scene nodes.

use lathe_scene::{DetachedSubtree, NodeId, Scene, SceneNode};

use super::{Operation, OperationError, OperationResult};

enum Pending {
    /// Built but never inserted
    Node(Box<SceneNode>),
    /// Taken out by an undo, ready to go back in
    Subtree(DetachedSubtree),
    /// Currently in the scene
    Inserted,
}

/// Insert a node (built off-scene) under a parent.
///
/// Undo removes the node's subtree and keeps it, so redo puts back the very
/// same node with the same id.
pub struct AddSceneNodeOperation {
    node: NodeId,
    parent: NodeId,
    pending: Pending,
}

impl AddSceneNodeOperation {
    pub fn new(node: SceneNode, parent: NodeId) -> Self {
        Self {
            node: node.id(),
            parent,
            pending: Pending::Node(Box::new(node)),
        }
    }

    /// Id of the node being added
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Operation for AddSceneNodeOperation {
    fn description(&self) -> &str {
        "Add Node"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        match &self.pending {
            Pending::Inserted => {
                return Err(OperationError::InvalidOperation(format!(
                    "{} is already in the scene",
                    self.node
                )));
            }
            Pending::Subtree(subtree) => scene.can_restore(subtree)?,
            Pending::Node(_) => {
                if !scene.contains(self.parent) {
                    return Err(OperationError::NodeNotFound(self.parent));
                }
                if scene.contains(self.node) {
                    return Err(OperationError::InvalidOperation(format!(
                        "{} is already in the scene",
                        self.node
                    )));
                }
            }
        }

        // Validated above, so the payload is only given up for an insert that succeeds
        match std::mem::replace(&mut self.pending, Pending::Inserted) {
            Pending::Node(node) => {
                scene.add_node(*node, self.parent)?;
            }
            Pending::Subtree(subtree) => {
                scene.restore_subtree(subtree)?;
            }
            Pending::Inserted => {}
        }
        Ok(())
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        if !matches!(self.pending, Pending::Inserted) {
            return Err(OperationError::InvalidOperation(format!(
                "{} was never added",
                self.node
            )));
        }
        let subtree = scene.remove_node(self.node)?;
        self.pending = Pending::Subtree(subtree);
        Ok(())
    }
}

/// Remove a node and its whole subtree.
///
/// Undo reinserts the subtree at its former parent and sibling index.
pub struct RemoveSceneNodeOperation {
    node: NodeId,
    removed: Option<DetachedSubtree>,
}

impl RemoveSceneNodeOperation {
    pub fn new(node: NodeId) -> Self {
        Self { node, removed: None }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Operation for RemoveSceneNodeOperation {
    fn description(&self) -> &str {
        "Remove Node"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        if !scene.contains(self.node) {
            return Err(OperationError::NodeNotFound(self.node));
        }
        self.removed = Some(scene.remove_node(self.node)?);
        Ok(())
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        let subtree = self.removed.as_ref().ok_or_else(|| {
            OperationError::InvalidOperation(format!("{} was never removed", self.node))
        })?;
        scene.can_restore(subtree)?;
        if let Some(subtree) = self.removed.take() {
            scene.restore_subtree(subtree)?;
        }
        Ok(())
    }
}

/// Move a node under a new parent, or detach it with `None`.
pub struct SetParentOperation {
    node: NodeId,
    new_parent: Option<NodeId>,
    /// Parent and sibling index before execute
    old: Option<(Option<NodeId>, Option<usize>)>,
}

impl SetParentOperation {
    pub fn new(node: NodeId, new_parent: Option<NodeId>) -> Self {
        Self {
            node,
            new_parent,
            old: None,
        }
    }
}

impl Operation for SetParentOperation {
    fn description(&self) -> &str {
        "Set Parent"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        if !scene.contains(self.node) {
            return Err(OperationError::NodeNotFound(self.node));
        }
        let old_parent = scene.parent(self.node);
        let old_index = scene.child_index(self.node);

        scene.set_parent(self.node, self.new_parent)?;
        self.old = Some((old_parent, old_index));
        Ok(())
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        let (old_parent, old_index) = self.old.ok_or_else(|| {
            OperationError::InvalidOperation(format!("{} was never reparented", self.node))
        })?;

        scene.set_parent(self.node, old_parent)?;
        if let Some(index) = old_index {
            scene.set_child_index(self.node, index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_scene::SceneError;

    #[test]
    fn test_add_undo_redo_keeps_id() {
        let mut scene = Scene::new();
        let root = scene.root();
        let node = SceneNode::new("part").with_selectable(true);
        let id = node.id();

        let mut op = AddSceneNodeOperation::new(node, root);
        op.execute(&mut scene).unwrap();
        assert_eq!(scene.children(root), &[id]);

        op.undo(&mut scene).unwrap();
        assert!(!scene.contains(id));

        op.execute(&mut scene).unwrap();
        assert!(scene.contains(id));
        assert!(scene.node(id).unwrap().selectable);
    }

    #[test]
    fn test_add_twice_fails() {
        let mut scene = Scene::new();
        let root = scene.root();
        let mut op = AddSceneNodeOperation::new(SceneNode::new("part"), root);
        op.execute(&mut scene).unwrap();
        assert!(op.execute(&mut scene).is_err());
    }

    #[test]
    fn test_remove_restores_position() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_node(SceneNode::new("a"), root).unwrap();
        let b = scene.add_node(SceneNode::new("b"), root).unwrap();
        let child = scene.add_node(SceneNode::new("b.child"), b).unwrap();
        let c = scene.add_node(SceneNode::new("c"), root).unwrap();

        let mut op = RemoveSceneNodeOperation::new(b);
        op.execute(&mut scene).unwrap();
        assert!(!scene.contains(child));
        assert_eq!(scene.children(root), &[a, c]);

        op.undo(&mut scene).unwrap();
        assert_eq!(scene.children(root), &[a, b, c]);
        assert_eq!(scene.parent(child), Some(b));
    }

    #[test]
    fn test_failed_remove_undo_can_retry() {
        let mut scene = Scene::new();
        let root = scene.root();
        let b = scene.add_node(SceneNode::new("b"), root).unwrap();
        let child = scene.add_node(SceneNode::new("b.child"), b).unwrap();

        let mut op = RemoveSceneNodeOperation::new(child);
        op.execute(&mut scene).unwrap();
        let parent = scene.remove_node(b).unwrap();

        assert!(matches!(
            op.undo(&mut scene),
            Err(OperationError::Scene(SceneError::NodeNotFound(id))) if id == b
        ));

        scene.restore_subtree(parent).unwrap();
        op.undo(&mut scene).unwrap();
        assert_eq!(scene.parent(child), Some(b));
    }

    #[test]
    fn test_failed_add_redo_can_retry() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_node(SceneNode::new("group"), root).unwrap();
        let node = SceneNode::new("part");
        let id = node.id();

        let mut op = AddSceneNodeOperation::new(node, group);
        op.execute(&mut scene).unwrap();
        op.undo(&mut scene).unwrap();
        let detached = scene.remove_node(group).unwrap();

        assert!(op.execute(&mut scene).is_err());
        assert!(!scene.contains(id));

        scene.restore_subtree(detached).unwrap();
        op.execute(&mut scene).unwrap();
        assert_eq!(scene.children(group), &[id]);
    }

    #[test]
    fn test_set_parent_undo_restores_order() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_node(SceneNode::new("a"), root).unwrap();
        let b = scene.add_node(SceneNode::new("b"), root).unwrap();
        let c = scene.add_node(SceneNode::new("c"), root).unwrap();

        let mut op = SetParentOperation::new(a, Some(c));
        op.execute(&mut scene).unwrap();
        assert_eq!(scene.parent(a), Some(c));

        op.undo(&mut scene).unwrap();
        assert_eq!(scene.children(root), &[a, b, c]);
    }

    #[test]
    fn test_set_parent_cycle_is_error() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.add_node(SceneNode::new("a"), root).unwrap();
        let b = scene.add_node(SceneNode::new("b"), a).unwrap();

        let mut op = SetParentOperation::new(a, Some(b));
        assert!(matches!(op.execute(&mut scene), Err(OperationError::Scene(_))));
        assert_eq!(scene.parent(a), Some(root));
    }
}
