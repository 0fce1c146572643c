//! Keyboard device.

use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::device::{EventHandler, InputDevice, SubscriberId, Subscribers};
use crate::platform::RawInput;
use crate::{Event, Key, Modifiers};

/// Emits `KeyPress`/`KeyRelease` and tracks held modifiers.
#[derive(Default)]
pub struct KeyDevice {
    subscribers: Subscribers,
    modifiers: Modifiers,
}

impl KeyDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modifiers currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn track_modifier(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Shift => self.modifiers.shift = pressed,
            Key::Control => self.modifiers.ctrl = pressed,
            Key::Alt => self.modifiers.alt = pressed,
            _ => {}
        }
    }
}

/// Map a winit logical key to [`Key`].
pub(crate) fn map_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Delete => Key::Delete,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Shift => Key::Shift,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            NamedKey::Space => Key::Space,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            _ => Key::Unknown,
        },
        WinitKey::Character(text) => match text.chars().next() {
            Some(' ') => Key::Space,
            Some(c) => Key::Char(c.to_ascii_lowercase()),
            None => Key::Unknown,
        },
        _ => Key::Unknown,
    }
}

impl InputDevice for KeyDevice {
    fn handle_event(&mut self, raw: &RawInput) {
        let RawInput::Key { key, pressed } = raw else {
            return;
        };

        let key = map_key(key);
        self.track_modifier(key, *pressed);

        let event = if *pressed {
            Event::KeyPress { key, modifiers: self.modifiers }
        } else {
            Event::KeyRelease { key, modifiers: self.modifiers }
        };
        log::trace!("key device: {:?}", event);
        self.subscribers.emit(&event);
    }

    fn subscribe(&mut self, handler: EventHandler) -> SubscriberId {
        self.subscribers.subscribe(handler)
    }

    fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(device: &mut KeyDevice) -> Rc<RefCell<Vec<Event>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        device.subscribe(Box::new(move |e| sink.borrow_mut().push(*e)));
        events
    }

    #[test]
    fn test_press_and_release() {
        let mut device = KeyDevice::new();
        let events = recorder(&mut device);

        device.handle_event(&RawInput::Key { key: WinitKey::Named(NamedKey::Escape), pressed: true });
        device.handle_event(&RawInput::Key { key: WinitKey::Named(NamedKey::Escape), pressed: false });

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::KeyPress { key: Key::Escape, .. }));
        assert!(matches!(events[1], Event::KeyRelease { key: Key::Escape, .. }));
    }

    #[test]
    fn test_modifiers_tracked() {
        let mut device = KeyDevice::new();
        let events = recorder(&mut device);

        device.handle_event(&RawInput::Key { key: WinitKey::Named(NamedKey::Control), pressed: true });
        device.handle_event(&RawInput::Key { key: WinitKey::Character("Z".into()), pressed: true });

        let last = *events.borrow().last().unwrap();
        assert_eq!(
            last,
            Event::KeyPress {
                key: Key::Char('z'),
                modifiers: Modifiers { shift: false, ctrl: true, alt: false },
            }
        );

        device.handle_event(&RawInput::Key { key: WinitKey::Named(NamedKey::Control), pressed: false });
        assert!(!device.modifiers().ctrl);
    }

    #[test]
    fn test_ignores_mouse_input() {
        let mut device = KeyDevice::new();
        let events = recorder(&mut device);
        device.handle_event(&RawInput::CursorMoved { x: 1.0, y: 1.0 });
        assert!(events.borrow().is_empty());
    }
}
