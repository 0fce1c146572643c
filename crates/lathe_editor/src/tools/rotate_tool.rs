//! Rotate tool.

use lathe_event::{Event, MouseButton};
use lathe_math::{radians, signum_or_zero, Vec3};
use lathe_scene::{Axis, NodeId};

use super::drag::AxisDrag;
use super::tool::{Renderer, Tool, ToolId};
use crate::context::SceneContext;
use crate::operations::RotateOperation;

pub const ROTATE_TOOL_ID: ToolId = ToolId("rotate");

/// Signed rotation for a drag delta: the delta's length, signed by its
/// component along the locked axis. A zero component gives zero.
pub fn rotation_angle(axis: Axis, delta: Vec3) -> f32 {
    signum_or_zero(axis.component(delta)) * delta.length()
}

/// Rotates the selection about a handle axis.
pub struct RotateTool {
    drag: AxisDrag,
    /// Rotation not yet applied because of snapping, radians
    snap_remainder: f32,
}

impl Default for RotateTool {
    fn default() -> Self {
        Self::new()
    }
}

impl RotateTool {
    pub fn new() -> Self {
        Self {
            drag: AxisDrag::new("RotateToolHandle"),
            snap_remainder: 0.0,
        }
    }

    pub fn drag(&self) -> &AxisDrag {
        &self.drag
    }

    /// Apply the snap increment, carrying the unapplied rest to the next sample.
    fn snapped(&mut self, angle: f32, snap_degrees: f32) -> f32 {
        if snap_degrees <= 0.0 {
            return angle;
        }
        let step = radians(snap_degrees);
        self.snap_remainder += angle;
        let applied = (self.snap_remainder / step).trunc() * step;
        self.snap_remainder -= applied;
        applied
    }

    fn rotate_selection(&mut self, ctx: &mut SceneContext, axis: Axis, delta: Vec3) {
        let angle = rotation_angle(axis, delta) * ctx.preferences.rotation_sensitivity;
        let angle = self.snapped(angle, ctx.preferences.rotation_snap_degrees);
        if angle == 0.0 || !angle.is_finite() {
            return;
        }

        let selected: Vec<NodeId> = ctx.selection.all_selected();
        for node in selected {
            let op = RotateOperation::new(node, axis.unit(), angle);
            if let Err(err) = ctx.push_operation(Box::new(op)) {
                log::warn!("Rotate {} failed: {}", node, err);
            }
        }
    }
}

impl Tool for RotateTool {
    fn id(&self) -> ToolId {
        ROTATE_TOOL_ID
    }

    fn name(&self) -> &str {
        "Rotate"
    }

    fn shortcut(&self) -> Option<char> {
        Some('e')
    }

    fn handle(&self) -> Option<NodeId> {
        self.drag.handle()
    }

    fn event(&mut self, event: &Event, ctx: &mut SceneContext, renderer: &dyn Renderer) -> bool {
        match *event {
            Event::ToolActivate => {
                self.drag.activate(ctx);
                false
            }
            Event::ToolDeactivate => {
                self.drag.deactivate(ctx);
                self.snap_remainder = 0.0;
                false
            }
            Event::MousePress { x, y, buttons } => {
                if self.drag.is_dragging() {
                    return true;
                }
                if !buttons.contains(MouseButton::Left) {
                    return false;
                }
                self.snap_remainder = 0.0;
                self.drag.press(ctx, renderer, x, y)
            }
            Event::MouseMove { x, y, .. } => {
                self.drag.hover(ctx, renderer, x, y);
                if !self.drag.is_dragging() {
                    return false;
                }
                if let Some((axis, delta)) = self.drag.sample(ctx, x, y) {
                    self.rotate_selection(ctx, axis, delta);
                }
                true
            }
            Event::MouseRelease { .. } => self.drag.release(ctx),
            Event::MouseWheel { .. } | Event::KeyPress { .. } | Event::KeyRelease { .. } => false,
        }
    }
}
