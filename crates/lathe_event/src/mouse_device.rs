//! Mouse device.

use crate::device::{EventHandler, InputDevice, SubscriberId, Subscribers};
use crate::platform::RawInput;
use crate::{Event, MouseButtons};

/// Tracks cursor position and button state, emits mouse events.
#[derive(Default)]
pub struct MouseDevice {
    subscribers: Subscribers,
    x: f32,
    y: f32,
    buttons: MouseButtons,
}

impl MouseDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Buttons currently held
    pub fn buttons(&self) -> MouseButtons {
        self.buttons
    }
}

impl InputDevice for MouseDevice {
    fn handle_event(&mut self, raw: &RawInput) {
        let event = match *raw {
            RawInput::CursorMoved { x, y } => {
                self.x = x;
                self.y = y;
                Event::MouseMove { x, y, buttons: self.buttons }
            }
            RawInput::MouseButton { button, pressed } => {
                self.buttons = self.buttons.with(button, pressed);
                let buttons = MouseButtons::single(button);
                if pressed {
                    Event::MousePress { x: self.x, y: self.y, buttons }
                } else {
                    Event::MouseRelease { x: self.x, y: self.y, buttons }
                }
            }
            RawInput::Wheel { delta } => Event::MouseWheel { delta },
            RawInput::Key { .. } => return,
        };
        self.subscribers.emit(&event);
    }

    fn subscribe(&mut self, handler: EventHandler) -> SubscriberId {
        self.subscribers.subscribe(handler)
    }

    fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}
