//! Reversible scene operations and the undo/redo stack.
//!
//! Every scene modification a tool makes is an [`Operation`] pushed onto the
//! [`OperationStack`], which executes it and records it for undo.

mod operation;
mod stack;
mod transform_operations;
mod node_operations;

pub use operation::{Operation, OperationResult, OperationError, GroupedOperation};
pub use stack::OperationStack;
pub use transform_operations::{
    RotateOperation,
    TranslateOperation,
    ScaleOperation,
    SetTransformOperation,
};
pub use node_operations::{AddSceneNodeOperation, RemoveSceneNodeOperation, SetParentOperation};
