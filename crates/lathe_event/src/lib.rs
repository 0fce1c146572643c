//! # lathe_event - Canonical input events
//!
//! Input devices translate platform input ([`RawInput`]) into the canonical
//! [`Event`] model and publish it to every subscriber. Devices do not know
//! which tool is active; routing is the controller's job.
//!
//! ```text
//! winit WindowEvent → RawInput → InputDevice → Event → subscribers
//! ```

mod device;
mod key_device;
mod mouse_device;
mod platform;

pub use device::{InputDevice, Subscribers, SubscriberId, EventHandler};
pub use key_device::KeyDevice;
pub use mouse_device::MouseDevice;
pub use platform::RawInput;

/// Mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Set of mouse buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    pub const NONE: Self = Self { left: false, right: false, middle: false };

    pub fn single(button: MouseButton) -> Self {
        Self::NONE.with(button, true)
    }

    pub fn with(mut self, button: MouseButton, down: bool) -> Self {
        match button {
            MouseButton::Left => self.left = down,
            MouseButton::Right => self.right = down,
            MouseButton::Middle => self.middle = down,
        }
        self
    }

    pub fn contains(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
            MouseButton::Middle => self.middle,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.middle)
    }
}

/// Modifier keys held while an event happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Abstract key code, independent of the windowing toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Shift,
    Control,
    Alt,
    Space,
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// Printable character, lowercased
    Char(char),
    Unknown,
}

/// Canonical input event delivered to tools.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The receiving tool became the active tool
    ToolActivate,
    /// The receiving tool stops being the active tool
    ToolDeactivate,
    /// A button went down; `buttons` holds the pressed button
    MousePress { x: f32, y: f32, buttons: MouseButtons },
    /// Cursor moved; `buttons` holds every button currently down
    MouseMove { x: f32, y: f32, buttons: MouseButtons },
    /// A button went up; `buttons` holds the released button
    MouseRelease { x: f32, y: f32, buttons: MouseButtons },
    /// Scroll wheel, in lines
    MouseWheel { delta: f32 },
    KeyPress { key: Key, modifiers: Modifiers },
    KeyRelease { key: Key, modifiers: Modifiers },
}

/// Payload-free tag of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ToolActivate,
    ToolDeactivate,
    MousePress,
    MouseMove,
    MouseRelease,
    MouseWheel,
    KeyPress,
    KeyRelease,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ToolActivate => EventKind::ToolActivate,
            Event::ToolDeactivate => EventKind::ToolDeactivate,
            Event::MousePress { .. } => EventKind::MousePress,
            Event::MouseMove { .. } => EventKind::MouseMove,
            Event::MouseRelease { .. } => EventKind::MouseRelease,
            Event::MouseWheel { .. } => EventKind::MouseWheel,
            Event::KeyPress { .. } => EventKind::KeyPress,
            Event::KeyRelease { .. } => EventKind::KeyRelease,
        }
    }

    /// Screen position of mouse press/move/release events
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Event::MousePress { x, y, .. }
            | Event::MouseMove { x, y, .. }
            | Event::MouseRelease { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    pub fn is_mouse(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::MousePress | EventKind::MouseMove | EventKind::MouseRelease | EventKind::MouseWheel
        )
    }

    pub fn is_key(&self) -> bool {
        matches!(self.kind(), EventKind::KeyPress | EventKind::KeyRelease)
    }
}
