//! Interactive manipulation tools.

mod tool;
mod drag;
mod rotate_tool;
mod translate_tool;
mod scale_tool;

pub use tool::{Tool, ToolId, Renderer, PickId, is_axis};
pub use drag::{AxisDrag, drag_plane};
pub use rotate_tool::{RotateTool, ROTATE_TOOL_ID};
pub use translate_tool::{TranslateTool, TRANSLATE_TOOL_ID};
pub use scale_tool::{ScaleTool, SCALE_TOOL_ID, MIN_SCALE_FACTOR};
pub use rotate_tool::rotation_angle;

#[cfg(test)]
pub(crate) mod test_support {
    use lathe_event::{Event, MouseButton, MouseButtons};
    use lathe_scene::Axis;

    use super::{PickId, Renderer};

    /// Renderer that reports the same handle axis everywhere.
    pub struct AxisRenderer {
        axis: Option<Axis>,
    }

    impl AxisRenderer {
        pub fn over(axis: Axis) -> Self {
            Self { axis: Some(axis) }
        }

        pub fn none() -> Self {
            Self { axis: None }
        }
    }

    impl Renderer for AxisRenderer {
        fn pick_id_at(&self, _x: f32, _y: f32) -> Option<PickId> {
            self.axis.map(|_| PickId(1))
        }

        fn axis_for_id(&self, id: PickId) -> Option<Axis> {
            if id == PickId(1) {
                self.axis
            } else {
                None
            }
        }
    }

    pub fn press(x: f32, y: f32) -> Event {
        Event::MousePress { x, y, buttons: MouseButtons::single(MouseButton::Left) }
    }

    pub fn moved(x: f32, y: f32) -> Event {
        Event::MouseMove { x, y, buttons: MouseButtons::single(MouseButton::Left) }
    }

    pub fn release(x: f32, y: f32) -> Event {
        Event::MouseRelease { x, y, buttons: MouseButtons::single(MouseButton::Left) }
    }
}
