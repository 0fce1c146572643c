//! Translate tool.

use lathe_event::{Event, MouseButton};
use lathe_math::Vec3;
use lathe_scene::{Axis, NodeId};

use super::drag::AxisDrag;
use super::tool::{Renderer, Tool, ToolId};
use crate::context::SceneContext;
use crate::operations::TranslateOperation;

pub const TRANSLATE_TOOL_ID: ToolId = ToolId("translate");

/// Moves the selection along a handle axis. The handle follows.
pub struct TranslateTool {
    drag: AxisDrag,
}

impl Default for TranslateTool {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslateTool {
    pub fn new() -> Self {
        Self {
            drag: AxisDrag::new("TranslateToolHandle"),
        }
    }

    pub fn drag(&self) -> &AxisDrag {
        &self.drag
    }

    fn translate_selection(&mut self, ctx: &mut SceneContext, axis: Axis, delta: Vec3) {
        let amount = axis.component(delta);
        if amount == 0.0 {
            return;
        }
        let offset = axis.unit() * amount;

        // The drag offset is in world space; each node moves in its parent's frame
        for node in ctx.selection.all_selected() {
            let Some(local) = ctx.scene.world_to_parent_vector(node, offset) else {
                log::warn!("Cannot translate {}: degenerate parent scale", node);
                continue;
            };
            if let Err(err) = ctx.push_operation(Box::new(TranslateOperation::new(node, local))) {
                log::warn!("Translate {} failed: {}", node, err);
            }
        }

        if let Some(handle) = self.drag.handle() {
            if let Some(position) = ctx.scene.local_transform(handle).map(|t| t.position) {
                if let Err(err) = ctx.scene.set_position(handle, position + offset) {
                    log::warn!("Failed to move translate handle: {}", err);
                }
            }
        }
        self.drag.handle_moved(offset);
    }
}

impl Tool for TranslateTool {
    fn id(&self) -> ToolId {
        TRANSLATE_TOOL_ID
    }

    fn name(&self) -> &str {
        "Translate"
    }

    fn shortcut(&self) -> Option<char> {
        Some('w')
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
                    self.translate_selection(ctx, axis, delta);
                }
                true
            }
            Event::MouseRelease { .. } => self.drag.release(ctx),
            Event::MouseWheel { .. } | Event::KeyPress { .. } | Event::KeyRelease { .. } => false,
        }
    }
}
