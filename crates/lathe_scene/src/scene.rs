//! The scene tree: node arena, hierarchy, cached global transforms and
//! change notification.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};
use lathe_math::{Mat4, Transform, Vec3};

use crate::error::{Result, SceneError};
use crate::node::{NodeId, SceneNode};

/// Change notification published to scene subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneEvent {
    /// A node (and its subtree) was inserted
    NodeAdded(NodeId),
    /// A node (and its subtree) was removed
    NodeRemoved(NodeId),
    /// A node moved to a new parent, or was detached (`None`)
    NodeReparented { node: NodeId, parent: Option<NodeId> },
    /// A node's local transform changed
    TransformChanged(NodeId),
    /// A node's payload (name, flags, mesh, handle state) changed
    NodeChanged(NodeId),
}

/// A subtree taken out of the scene, kept so it can be put back verbatim.
#[derive(Clone, Debug)]
pub struct DetachedSubtree {
    root: NodeId,
    parent: Option<NodeId>,
    index: usize,
    nodes: Vec<SceneNode>,
}

impl DetachedSubtree {
    /// Id of the subtree's top node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Parent the subtree was removed from
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Position the subtree held among its siblings
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }
}

/// Rooted tree of scene nodes.
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    subscribers: Vec<Sender<SceneEvent>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let root = SceneNode::new("Root");
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
            subscribers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, root and detached nodes included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node's payload. Call [`Scene::mark_changed`]
    /// afterwards so subscribers hear about it.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == self.root {
                return true;
            }
            current = self.nodes.get(&cur).and_then(|n| n.parent);
        }
        false
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.nodes.get(&cur).and_then(|n| n.parent);
        }
        false
    }

    /// First node with the given name, in depth-first order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter_depth_first()
            .find(|&id| self.nodes.get(&id).is_some_and(|n| n.name == name))
    }

    /// Insert a detached node as the last child of `parent`.
    pub fn add_node(&mut self, mut node: SceneNode, parent: NodeId) -> Result<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateNode(id));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        self.update_globals(id);

        log::debug!("Added {} under {}", id, parent);
        self.emit(SceneEvent::NodeAdded(id));
        Ok(id)
    }

    /// Move `id` under `parent`, or detach it from the tree with `None`.
    ///
    /// A detached node stays in the arena and keeps its subtree; it is just
    /// no longer reachable from the root.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::NodeNotFound(id));
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return Err(SceneError::NodeNotFound(p));
            }
            if self.is_ancestor(id, p) {
                return Err(SceneError::Cycle { node: id, parent: p });
            }
        }

        let old_parent = self.nodes.get(&id).and_then(|n| n.parent);
        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.children.retain(|&c| c != id);
        }
        if let Some(new) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            new.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
        self.update_globals(id);

        self.emit(SceneEvent::NodeReparented { node: id, parent });
        Ok(())
    }

    /// Position of `id` among its parent's children
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Move `id` to `index` among its siblings; indices past the end clamp.
    pub fn set_child_index(&mut self, id: NodeId, index: usize) -> Result<()> {
        let parent = self
            .nodes
            .get(&id)
            .ok_or(SceneError::NodeNotFound(id))?
            .parent;
        let Some(siblings) = parent.and_then(|p| self.nodes.get_mut(&p)).map(|p| &mut p.children) else {
            return Ok(());
        };

        siblings.retain(|&c| c != id);
        let index = index.min(siblings.len());
        siblings.insert(index, id);

        self.emit(SceneEvent::NodeReparented { node: id, parent });
        Ok(())
    }

    /// Remove `id` and its whole subtree from the scene.
    pub fn remove_node(&mut self, id: NodeId) -> Result<DetachedSubtree> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        let parent = self
            .nodes
            .get(&id)
            .ok_or(SceneError::NodeNotFound(id))?
            .parent;

        let mut index = 0;
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            index = p.children.iter().position(|&c| c == id).unwrap_or(p.children.len());
            p.children.retain(|&c| c != id);
        }

        let ids: Vec<NodeId> = self.descendants(id).collect();
        let nodes = ids
            .iter()
            .filter_map(|nid| self.nodes.remove(nid))
            .collect();

        log::debug!("Removed {} ({} nodes)", id, ids.len());
        self.emit(SceneEvent::NodeRemoved(id));
        Ok(DetachedSubtree {
            root: id,
            parent,
            index,
            nodes,
        })
    }

    /// Whether [`Scene::restore_subtree`] would accept `subtree`. Once this
    /// passes, the restore itself cannot fail.
    pub fn can_restore(&self, subtree: &DetachedSubtree) -> Result<()> {
        if let Some(p) = subtree.parent {
            if !self.nodes.contains_key(&p) {
                return Err(SceneError::NodeNotFound(p));
            }
        }
        if let Some(dup) = subtree.nodes.iter().find(|n| self.nodes.contains_key(&n.id())) {
            return Err(SceneError::DuplicateNode(dup.id()));
        }
        Ok(())
    }

    /// Put a removed subtree back under its former parent at its former
    /// sibling index.
    pub fn restore_subtree(&mut self, subtree: DetachedSubtree) -> Result<NodeId> {
        self.can_restore(&subtree)?;

        let root = subtree.root;
        for node in subtree.nodes {
            self.nodes.insert(node.id(), node);
        }
        if let Some(p) = subtree.parent.and_then(|p| self.nodes.get_mut(&p)) {
            let index = subtree.index.min(p.children.len());
            p.children.insert(index, root);
        }
        self.update_globals(root);

        self.emit(SceneEvent::NodeAdded(root));
        Ok(root)
    }

    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(&id).map(|n| n.transform)
    }

    /// Replace a node's local transform and refresh the globals below it.
    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        self.update_globals(id);
        self.emit(SceneEvent::TransformChanged(id));
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<()> {
        let transform = self
            .local_transform(id)
            .ok_or(SceneError::NodeNotFound(id))?
            .with_position(position);
        self.set_local_transform(id, transform)
    }

    pub fn global_transform(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(&id).map(|n| n.global)
    }

    pub fn global_position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(&id).map(|n| n.global.get_translation())
    }

    /// Express a world-space direction in the frame of `id`'s parent, so it
    /// can be added to the node's local position.
    ///
    /// `None` for an unknown node or an ancestor with a zero scale component.
    pub fn world_to_parent_vector(&self, id: NodeId, vector: Vec3) -> Option<Vec3> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(&id)?.parent;
        while let Some(parent) = current {
            let node = self.nodes.get(&parent)?;
            ancestors.push(node.transform);
            current = node.parent;
        }
        // Outermost ancestor is undone first
        ancestors
            .iter()
            .rev()
            .try_fold(vector, |v, transform| transform.inverse_transform_vector(v))
    }

    /// Notify subscribers that a node's payload changed.
    pub fn mark_changed(&mut self, id: NodeId) {
        if self.nodes.contains_key(&id) {
            self.emit(SceneEvent::NodeChanged(id));
        }
    }

    /// Pre-order traversal from the root. Detached nodes are not visited.
    pub fn iter_depth_first(&self) -> DepthFirstIter<'_> {
        self.descendants(self.root)
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> DepthFirstIter<'_> {
        let stack = if self.nodes.contains_key(&id) { vec![id] } else { Vec::new() };
        DepthFirstIter { scene: self, stack }
    }

    /// Receive every subsequent [`SceneEvent`].
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SceneEvent) {
        // Receivers that were dropped are pruned here
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Recompute cached global matrices for `id` and its subtree.
    fn update_globals(&mut self, id: NodeId) {
        let parent_global = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(&p))
            .map(|p| p.global)
            .unwrap_or(Mat4::IDENTITY);

        let mut stack = vec![(id, parent_global)];
        while let Some((current, parent_global)) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.global = parent_global * node.transform.to_matrix();
                let global = node.global;
                stack.extend(node.children.iter().map(|&c| (c, global)));
            }
        }
    }
}

/// Pre-order depth-first iterator over node ids.
pub struct DepthFirstIter<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirstIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.scene.nodes.get(&id) {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}
