//! Axis-constrained drag shared by the transform tools.
//!
//! The drag owns the tool's handle node. While an axis is locked, every
//! cursor sample is intersected with a plane through the handle and
//! compared with the previous sample.

use lathe_math::{Plane, Vec3};
use lathe_scene::{Axis, NodeId, SceneNode, ToolHandle};

use super::tool::Renderer;
use crate::context::SceneContext;

/// Plane a drag along `axis` is measured in, through `handle_position`.
pub fn drag_plane(axis: Axis, handle_position: Vec3) -> Plane {
    match axis {
        Axis::X | Axis::Y => Plane::new(Vec3::Z, handle_position.z),
        Axis::Z => Plane::new(Vec3::Y, handle_position.y),
    }
}

/// Drag state of one tool: handle node, locked axis and last sample.
#[derive(Debug)]
pub struct AxisDrag {
    handle_name: &'static str,
    handle: Option<NodeId>,
    locked_axis: Option<Axis>,
    dragging: bool,
    /// Last intersection, relative to the handle position
    target: Option<Vec3>,
}

impl AxisDrag {
    pub fn new(handle_name: &'static str) -> Self {
        Self {
            handle_name,
            handle: None,
            locked_axis: None,
            dragging: false,
            target: None,
        }
    }

    pub fn handle(&self) -> Option<NodeId> {
        self.handle
    }

    pub fn locked_axis(&self) -> Option<Axis> {
        self.locked_axis
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Attach the handle under the root at the first selected node's global
    /// position. Does nothing when the selection is empty.
    pub fn activate(&mut self, ctx: &mut SceneContext) -> bool {
        let Some(selected) = ctx.selection.selected_object(0) else {
            log::debug!("{}: nothing selected, handle stays hidden", self.handle_name);
            return false;
        };
        let Some(position) = ctx.scene.global_position(selected) else {
            log::debug!("{}: selected {} is not in the scene", self.handle_name, selected);
            return false;
        };

        let root = ctx.scene.root();
        let attached = match self.handle.filter(|&h| ctx.scene.contains(h)) {
            Some(handle) => ctx.scene.set_parent(handle, Some(root)).map(|_| handle),
            None => ctx.scene.add_node(SceneNode::new_tool_handle(self.handle_name), root),
        };
        let handle = match attached {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("{}: failed to attach handle: {}", self.handle_name, err);
                return false;
            }
        };
        self.handle = Some(handle);

        if let Err(err) = ctx.scene.set_position(handle, position) {
            log::warn!("{}: failed to place handle: {}", self.handle_name, err);
            return false;
        }
        true
    }

    /// Detach the handle from the scene and drop any drag in progress.
    pub fn deactivate(&mut self, ctx: &mut SceneContext) {
        self.release(ctx);
        self.update_handle(ctx, |h| h.set_active_axis(None));

        if let Some(handle) = self.handle.filter(|&h| ctx.scene.contains(h)) {
            if let Err(err) = ctx.scene.set_parent(handle, None) {
                log::warn!("{}: failed to detach handle: {}", self.handle_name, err);
            }
        }
    }

    fn handle_attached(&self, ctx: &SceneContext) -> bool {
        self.handle.is_some_and(|h| ctx.scene.is_attached(h))
    }

    fn update_handle(&self, ctx: &mut SceneContext, edit: impl FnOnce(&mut ToolHandle)) {
        let Some(handle) = self.handle else {
            return;
        };
        let changed = match ctx.scene.node_mut(handle).and_then(|n| n.tool_handle.as_mut()) {
            Some(state) => {
                let before = *state;
                edit(state);
                *state != before
            }
            None => false,
        };
        if changed {
            ctx.scene.mark_changed(handle);
        }
    }

    /// Highlight the handle axis under the cursor. No-op while locked.
    pub fn hover(&mut self, ctx: &mut SceneContext, renderer: &dyn Renderer, x: f32, y: f32) {
        if self.locked_axis.is_some() {
            return;
        }
        let axis = renderer.pick_id_at(x, y).and_then(|id| renderer.axis_for_id(id));
        self.update_handle(ctx, |h| h.set_active_axis(axis));
    }

    /// Start dragging if the cursor is over a handle axis.
    pub fn press(&mut self, ctx: &mut SceneContext, renderer: &dyn Renderer, x: f32, y: f32) -> bool {
        if !self.handle_attached(ctx) {
            return false;
        }
        let Some(axis) = renderer.pick_id_at(x, y).and_then(|id| renderer.axis_for_id(id)) else {
            return false;
        };

        self.locked_axis = Some(axis);
        self.dragging = true;
        self.target = None;
        self.update_handle(ctx, |h| {
            h.set_active_axis(Some(axis));
            h.set_locked_axis(Some(axis));
        });

        log::debug!("{}: dragging along {}", self.handle_name, axis);
        true
    }

    /// Intersect the cursor ray with the drag plane.
    ///
    /// The first sample of a drag only records the target; later samples
    /// return the locked axis and the change since the previous sample.
    pub fn sample(&mut self, ctx: &SceneContext, x: f32, y: f32) -> Option<(Axis, Vec3)> {
        let axis = self.locked_axis?;
        let handle_position = ctx.scene.global_position(self.handle?)?;

        let ray = ctx.camera().get_ray(x, y);
        let hit = drag_plane(axis, handle_position).intersection_point(&ray)?;
        let offset = hit - handle_position;
        if !offset.is_finite() {
            return None;
        }

        let delta = self.target.map(|target| offset - target);
        self.target = Some(offset);
        delta.map(|d| (axis, d))
    }

    /// Keep the stored target relative to a handle that moved by `by`.
    pub fn handle_moved(&mut self, by: Vec3) {
        if let Some(target) = &mut self.target {
            *target -= by;
        }
    }

    /// End the drag. Returns whether a drag was in progress.
    pub fn release(&mut self, ctx: &mut SceneContext) -> bool {
        let was_dragging = self.dragging;
        self.dragging = false;
        self.locked_axis = None;
        self.target = None;
        self.update_handle(ctx, |h| h.set_locked_axis(None));
        was_dragging
    }
}
