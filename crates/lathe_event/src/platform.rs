//! Platform-side input, adapted from winit window events.

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::Key as WinitKey;

use crate::MouseButton;

/// Raw input as delivered by the windowing toolkit.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    /// Logical key went down or up
    Key { key: WinitKey, pressed: bool },
    /// Cursor moved to a window position
    CursorMoved { x: f32, y: f32 },
    /// Mouse button went down or up
    MouseButton { button: MouseButton, pressed: bool },
    /// Scroll, in lines
    Wheel { delta: f32 },
}

impl RawInput {
    /// Extract the input part of a window event; other events yield `None`.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => Some(RawInput::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            }),
            WindowEvent::CursorMoved { position, .. } => Some(RawInput::CursorMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    winit::event::MouseButton::Left => MouseButton::Left,
                    winit::event::MouseButton::Right => MouseButton::Right,
                    winit::event::MouseButton::Middle => MouseButton::Middle,
                    _ => return None,
                };
                Some(RawInput::MouseButton {
                    button,
                    pressed: *state == ElementState::Pressed,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                Some(RawInput::Wheel { delta })
            }
            _ => None,
        }
    }
}
