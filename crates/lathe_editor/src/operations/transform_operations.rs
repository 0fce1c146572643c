//! Transform manipulation operations (rotate, translate, scale, set).

use lathe_math::{Transform, Vec3};
use lathe_scene::{NodeId, Scene};

use super::{Operation, OperationError, OperationResult};

/// Snapshot the node's local transform, apply `edit`, write it back.
fn edit_transform(
    scene: &mut Scene,
    node: NodeId,
    snapshot: &mut Option<Transform>,
    edit: impl FnOnce(&mut Transform),
) -> OperationResult {
    let old = scene
        .local_transform(node)
        .ok_or(OperationError::NodeNotFound(node))?;

    let mut new = old;
    edit(&mut new);
    scene.set_local_transform(node, new)?;

    *snapshot = Some(old);
    Ok(())
}

/// Put back the transform captured by [`edit_transform`].
fn restore_transform(scene: &mut Scene, node: NodeId, snapshot: Option<Transform>) -> OperationResult {
    let old = snapshot.ok_or_else(|| {
        OperationError::InvalidOperation(format!("{} has no transform to restore", node))
    })?;
    if !scene.contains(node) {
        return Err(OperationError::NodeNotFound(node));
    }
    scene.set_local_transform(node, old)?;
    Ok(())
}

/// Rotate a node about an axis through its origin.
pub struct RotateOperation {
    pub node: NodeId,
    pub axis: Vec3,
    /// Radians
    pub angle: f32,
    old_transform: Option<Transform>,
}

impl RotateOperation {
    pub fn new(node: NodeId, axis: Vec3, angle: f32) -> Self {
        Self {
            node,
            axis,
            angle,
            old_transform: None,
        }
    }
}

impl Operation for RotateOperation {
    fn description(&self) -> &str {
        "Rotate"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        let (axis, angle) = (self.axis, self.angle);
        edit_transform(scene, self.node, &mut self.old_transform, |t| {
            t.rotate_around_axis(axis, angle)
        })
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        restore_transform(scene, self.node, self.old_transform)
    }
}

/// Move a node by a delta in its parent's frame.
pub struct TranslateOperation {
    pub node: NodeId,
    pub delta: Vec3,
    old_transform: Option<Transform>,
}

impl TranslateOperation {
    pub fn new(node: NodeId, delta: Vec3) -> Self {
        Self {
            node,
            delta,
            old_transform: None,
        }
    }
}

impl Operation for TranslateOperation {
    fn description(&self) -> &str {
        "Translate"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        let delta = self.delta;
        edit_transform(scene, self.node, &mut self.old_transform, |t| t.translate(delta))
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        restore_transform(scene, self.node, self.old_transform)
    }
}

/// Multiply a node's scale component-wise.
pub struct ScaleOperation {
    pub node: NodeId,
    pub factor: Vec3,
    old_transform: Option<Transform>,
}

impl ScaleOperation {
    pub fn new(node: NodeId, factor: Vec3) -> Self {
        Self {
            node,
            factor,
            old_transform: None,
        }
    }
}

impl Operation for ScaleOperation {
    fn description(&self) -> &str {
        "Scale"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        if !self.factor.is_finite() {
            return Err(OperationError::InvalidOperation(format!(
                "non-finite scale factor {:?}",
                self.factor
            )));
        }
        let factor = self.factor;
        edit_transform(scene, self.node, &mut self.old_transform, |t| t.scale_by(factor))
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        restore_transform(scene, self.node, self.old_transform)
    }
}

/// Replace a node's local transform.
pub struct SetTransformOperation {
    pub node: NodeId,
    pub transform: Transform,
    old_transform: Option<Transform>,
}

impl SetTransformOperation {
    pub fn new(node: NodeId, transform: Transform) -> Self {
        Self {
            node,
            transform,
            old_transform: None,
        }
    }
}

impl Operation for SetTransformOperation {
    fn description(&self) -> &str {
        "Set Transform"
    }

    fn execute(&mut self, scene: &mut Scene) -> OperationResult {
        let transform = self.transform;
        edit_transform(scene, self.node, &mut self.old_transform, |t| *t = transform)
    }

    fn undo(&mut self, scene: &mut Scene) -> OperationResult {
        restore_transform(scene, self.node, self.old_transform)
    }
}
