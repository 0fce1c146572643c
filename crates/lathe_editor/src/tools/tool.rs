//! Tool trait and the picking collaborator.

use lathe_event::Event;
use lathe_scene::{Axis, NodeId};

use crate::context::SceneContext;

/// Unique identifier for a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToolId(pub &'static str);

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of whatever the renderer drew at a screen coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PickId(pub u32);

/// Picking backend supplied by the renderer.
pub trait Renderer {
    /// Id of the object drawn at screen coordinate `(x, y)`.
    fn pick_id_at(&self, x: f32, y: f32) -> Option<PickId>;

    /// Handle axis a pick id belongs to, if it is one.
    fn axis_for_id(&self, id: PickId) -> Option<Axis>;
}

/// Whether `id` identifies a tool handle axis.
pub fn is_axis(renderer: &dyn Renderer, id: PickId) -> bool {
    renderer.axis_for_id(id).is_some()
}

/// A tool for viewport interaction.
pub trait Tool {
    /// Unique identifier for this tool.
    fn id(&self) -> ToolId;

    /// Display name.
    fn name(&self) -> &str;

    /// Keyboard shortcut, lowercase.
    fn shortcut(&self) -> Option<char> {
        None
    }

    /// Scene node of the tool's handle, once created.
    fn handle(&self) -> Option<NodeId> {
        None
    }

    /// Handle one event. Returns whether the event was consumed.
    fn event(&mut self, event: &Event, ctx: &mut SceneContext, renderer: &dyn Renderer) -> bool;
}
