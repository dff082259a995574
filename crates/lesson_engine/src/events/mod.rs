//! Input events and the quit-driven frame loop
//!
//! Backends translate their native events into [`Event`]. Lessons only care
//! whether an event asks to quit: closing the window, pressing any key, or
//! clicking any mouse button all do; nothing else does.

mod event_loop;

pub use event_loop::{run_until_quit, FrameStats};

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A letter key, stored uppercase
    Letter(char),
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Any other key, by backend key number
    Other(i32),
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
    /// Extra buttons, numbered from 4
    Other(u8),
}

/// Backend-neutral input event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked to close the window
    Quit,

    /// Key pressed, or auto-repeated while held
    KeyDown {
        /// The key
        key: KeyCode,
        /// True for auto-repeat presses
        repeat: bool,
    },

    /// Key released
    KeyUp {
        /// The key
        key: KeyCode,
    },

    /// Mouse button pressed
    MouseButtonDown {
        /// The button
        button: MouseButton,
        /// Cursor x at the time of the press
        x: f64,
        /// Cursor y at the time of the press
        y: f64,
    },

    /// Mouse button released
    MouseButtonUp {
        /// The button
        button: MouseButton,
    },

    /// Cursor moved
    MouseMotion {
        /// New x coordinate
        x: f64,
        /// New y coordinate
        y: f64,
    },

    /// Window client area changed size
    WindowResized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },

    /// Window gained input focus
    FocusGained,

    /// Window lost input focus
    FocusLost,
}

impl Event {
    /// Whether this event ends the event loop
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Self::Quit | Self::KeyDown { .. } | Self::MouseButtonDown { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_triggers() {
        assert!(Event::Quit.is_quit());
        assert!(Event::KeyDown { key: KeyCode::Letter('Q'), repeat: false }.is_quit());
        assert!(Event::KeyDown { key: KeyCode::Other(340), repeat: true }.is_quit());
        assert!(Event::MouseButtonDown { button: MouseButton::Right, x: 1.0, y: 2.0 }.is_quit());
    }

    #[test]
    fn test_everything_else_is_ignored() {
        let ignored = [
            Event::WindowResized { width: 800, height: 600 },
            Event::KeyUp { key: KeyCode::Escape },
            Event::MouseButtonUp { button: MouseButton::Left },
            Event::MouseMotion { x: 10.0, y: 10.0 },
            Event::FocusGained,
            Event::FocusLost,
        ];
        for event in &ignored {
            assert!(!event.is_quit(), "{:?} should not quit", event);
        }
    }
}
