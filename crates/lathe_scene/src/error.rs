//! Error types for scene graph manipulation

use thiserror::Error;

use crate::node::NodeId;

/// Scene graph errors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// No node with this id is in the scene
    #[error("Scene node not found: {0}")]
    NodeNotFound(NodeId),

    /// A node with this id is already in the scene
    #[error("Scene node already present: {0}")]
    DuplicateNode(NodeId),

    /// The root cannot be removed or reparented
    #[error("The scene root cannot be removed or reparented")]
    RootImmutable,

    /// Reparenting would make a node its own ancestor
    #[error("Reparenting {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
