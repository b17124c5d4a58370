use bitflags::bitflags;

use crate::Vec2;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CTRL = 2;
        const ALT = 4;
        const META = 8; // Cmd on Mac, Win key on Windows
    }
}

/// Pointer event in the receiving widget's client coordinates.
/// `screen_position` is window-relative and stays stable while a widget
/// moves under the pointer (drag distances are measured with it).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub screen_position: Vec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(screen_position: Vec2) -> Self {
        Self {
            position: screen_position,
            screen_position,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    Other(u32),
}

impl Key {
    /// Maps an X11 keysym, folding keypad navigation keys onto their main
    /// block equivalents.
    pub fn from_keysym(sym: u32) -> Key {
        match sym {
            0xff0d | 0xff8d => Key::Enter,
            0xff09 | 0xff89 => Key::Tab,
            0xff1b => Key::Escape,
            0xff50 | 0xff95 => Key::Home,
            0xff51 | 0xff96 => Key::ArrowLeft,
            0xff52 | 0xff97 => Key::ArrowUp,
            0xff53 | 0xff98 => Key::ArrowRight,
            0xff54 | 0xff99 => Key::ArrowDown,
            0xff55 | 0xff9a => Key::PageUp,
            0xff56 | 0xff9b => Key::PageDown,
            0xff57 | 0xff9c => Key::End,
            0x20 | 0xff80 => Key::Space,
            0x21..=0x7e => Key::Character(sym as u8 as char),
            other => Key::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn from_keysym(sym: u32, modifiers: Modifiers) -> Self {
        Self {
            key: Key::from_keysym(sym),
            modifiers,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
