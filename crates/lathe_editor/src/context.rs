//! Explicit editing context passed to tools.

use lathe_scene::{Camera, FixedCamera, Scene, Selection};

use crate::operations::{Operation, OperationResult, OperationStack};
use crate::preferences::Preferences;

/// Everything a tool may read or modify while handling an event.
pub struct SceneContext {
    pub scene: Scene,
    pub selection: Selection,
    pub operations: OperationStack,
    pub preferences: Preferences,
    camera: Box<dyn Camera>,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(Box::new(FixedCamera::top_down(10.0)), Preferences::default())
    }
}

impl SceneContext {
    pub fn new(camera: Box<dyn Camera>, preferences: Preferences) -> Self {
        Self {
            scene: Scene::new(),
            selection: Selection::new(),
            operations: OperationStack::with_capacity(preferences.undo_capacity),
            preferences,
            camera,
        }
    }

    /// Active camera
    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    pub fn set_camera(&mut self, camera: Box<dyn Camera>) {
        self.camera = camera;
    }

    /// Execute `op` through the operation stack.
    pub fn push_operation(&mut self, op: Box<dyn Operation>) -> OperationResult {
        self.operations.push(op, &mut self.scene)?;
        self.selection.prune(&self.scene);
        Ok(())
    }

    pub fn undo(&mut self) -> OperationResult<bool> {
        let undone = self.operations.undo(&mut self.scene)?;
        self.selection.prune(&self.scene);
        Ok(undone)
    }

    pub fn redo(&mut self) -> OperationResult<bool> {
        let redone = self.operations.redo(&mut self.scene)?;
        self.selection.prune(&self.scene);
        Ok(redone)
    }
}
