//! Scale tool.

use lathe_event::{Event, MouseButton};
use lathe_math::{signum_or_zero, Vec3};
use lathe_scene::{Axis, NodeId};

use super::drag::AxisDrag;
use super::tool::{Renderer, Tool, ToolId};
use crate::context::SceneContext;
use crate::operations::ScaleOperation;

pub const SCALE_TOOL_ID: ToolId = ToolId("scale");

/// Smallest per-sample scale factor; keeps scales positive.
pub const MIN_SCALE_FACTOR: f32 = 0.01;

/// Scales the selection along a handle axis.
pub struct ScaleTool {
    drag: AxisDrag,
}

impl Default for ScaleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleTool {
    pub fn new() -> Self {
        Self {
            drag: AxisDrag::new("ScaleToolHandle"),
        }
    }

    pub fn drag(&self) -> &AxisDrag {
        &self.drag
    }

    /// Component-wise factor for a drag delta along `axis`.
    pub fn scale_factor(axis: Axis, delta: Vec3, sensitivity: f32) -> Vec3 {
        let amount = signum_or_zero(axis.component(delta)) * delta.length() * sensitivity;
        let factor = (1.0 + amount).max(MIN_SCALE_FACTOR);
        match axis {
            Axis::X => Vec3::new(factor, 1.0, 1.0),
            Axis::Y => Vec3::new(1.0, factor, 1.0),
            Axis::Z => Vec3::new(1.0, 1.0, factor),
        }
    }

    fn scale_selection(&mut self, ctx: &mut SceneContext, axis: Axis, delta: Vec3) {
        let factor = Self::scale_factor(axis, delta, ctx.preferences.scale_sensitivity);
        if factor == Vec3::ONE {
            return;
        }

        for node in ctx.selection.all_selected() {
            if let Err(err) = ctx.push_operation(Box::new(ScaleOperation::new(node, factor))) {
                log::warn!("Scale {} failed: {}", node, err);
            }
        }
    }
}

impl Tool for ScaleTool {
    fn id(&self) -> ToolId {
        SCALE_TOOL_ID
    }

    fn name(&self) -> &str {
        "Scale"
    }

    fn shortcut(&self) -> Option<char> {
        Some('r')
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
                false
            }
            Event::MousePress { x, y, buttons } => {
                if self.drag.is_dragging() {
                    return true;
                }
                buttons.contains(MouseButton::Left) && self.drag.press(ctx, renderer, x, y)
            }
            Event::MouseMove { x, y, .. } => {
                self.drag.hover(ctx, renderer, x, y);
                if !self.drag.is_dragging() {
                    return false;
                }
                if let Some((axis, delta)) = self.drag.sample(ctx, x, y) {
                    self.scale_selection(ctx, axis, delta);
                }
                true
            }
            Event::MouseRelease { .. } => self.drag.release(ctx),
            Event::MouseWheel { .. } | Event::KeyPress { .. } | Event::KeyRelease { .. } => false,
        }
    }
}
