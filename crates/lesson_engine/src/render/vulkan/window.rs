//! Window management using GLFW
//!
//! Opens the lesson window without a client API and translates GLFW events
//! into [`Event`]s.

use crate::core::WindowConfig;
use crate::events::{Event, KeyCode, MouseButton};
use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::vk;
use glfw::{Action, WindowEvent};

/// GLFW window with its event receiver
pub struct GlfwWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    cursor: (f64, f64),
}

impl GlfwWindow {
    /// Open a fixed-size window at the configured position
    pub fn new(glfw: &mut glfw::Glfw, config: &WindowConfig) -> VulkanResult<Self> {
        // Vulkan draws into the window, so no OpenGL context
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(false));
        glfw.window_hint(glfw::WindowHint::Visible(true));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or_else(|| VulkanError::Glfw(format!("could not open '{}'", config.title)))?;

        window.set_pos(config.x, config.y);
        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_size_polling(true);
        window.set_focus_polling(true);

        Ok(Self {
            window,
            events,
            cursor: (0.0, 0.0),
        })
    }

    /// Framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// Translate every queued GLFW event; `glfw.poll_events` must run first
    pub fn drain_events(&mut self, out: &mut Vec<Event>) {
        for (_, event) in glfw::flush_messages(&self.events) {
            if let WindowEvent::CursorPos(x, y) = event {
                self.cursor = (x, y);
            }
            if let Some(event) = translate(&event, self.cursor) {
                out.push(event);
            }
        }
    }

    /// Create a Vulkan surface for this window
    pub fn create_surface(&mut self, instance: vk::Instance) -> VulkanResult<vk::SurfaceKHR> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self
            .window
            .create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(VulkanError::Api(result))
        }
    }
}

fn translate(event: &WindowEvent, cursor: (f64, f64)) -> Option<Event> {
    match *event {
        WindowEvent::Close => Some(Event::Quit),
        WindowEvent::Key(key, _, Action::Press, _) => Some(Event::KeyDown {
            key: key_code(key),
            repeat: false,
        }),
        WindowEvent::Key(key, _, Action::Repeat, _) => Some(Event::KeyDown {
            key: key_code(key),
            repeat: true,
        }),
        WindowEvent::Key(key, _, Action::Release, _) => Some(Event::KeyUp { key: key_code(key) }),
        WindowEvent::MouseButton(button, Action::Press, _) => Some(Event::MouseButtonDown {
            button: mouse_button(button),
            x: cursor.0,
            y: cursor.1,
        }),
        WindowEvent::MouseButton(button, Action::Release, _) => Some(Event::MouseButtonUp {
            button: mouse_button(button),
        }),
        WindowEvent::CursorPos(x, y) => Some(Event::MouseMotion { x, y }),
        WindowEvent::Size(width, height) => Some(Event::WindowResized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        WindowEvent::Focus(true) => Some(Event::FocusGained),
        WindowEvent::Focus(false) => Some(Event::FocusLost),
        _ => None,
    }
}

fn key_code(key: glfw::Key) -> KeyCode {
    match key {
        glfw::Key::Space => KeyCode::Space,
        glfw::Key::Enter => KeyCode::Enter,
        glfw::Key::Escape => KeyCode::Escape,
        glfw::Key::Up => KeyCode::Up,
        glfw::Key::Down => KeyCode::Down,
        glfw::Key::Left => KeyCode::Left,
        glfw::Key::Right => KeyCode::Right,
        other => {
            let code = other as i32;
            match u8::try_from(code) {
                Ok(letter @ b'A'..=b'Z') => KeyCode::Letter(char::from(letter)),
                _ => KeyCode::Other(code),
            }
        }
    }
}

fn mouse_button(button: glfw::MouseButton) -> MouseButton {
    match button {
        glfw::MouseButton::Button1 => MouseButton::Left,
        glfw::MouseButton::Button2 => MouseButton::Right,
        glfw::MouseButton::Button3 => MouseButton::Middle,
        other => MouseButton::Other(other as u8 + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_code(glfw::Key::Q), KeyCode::Letter('Q'));
        assert_eq!(key_code(glfw::Key::Escape), KeyCode::Escape);
        assert_eq!(key_code(glfw::Key::F1), KeyCode::Other(glfw::Key::F1 as i32));
    }

    #[test]
    fn test_button_mapping() {
        assert_eq!(mouse_button(glfw::MouseButton::Button1), MouseButton::Left);
        assert_eq!(mouse_button(glfw::MouseButton::Button3), MouseButton::Middle);
        assert_eq!(mouse_button(glfw::MouseButton::Button5), MouseButton::Other(5));
    }

    #[test]
    fn test_event_translation() {
        let press = WindowEvent::Key(glfw::Key::A, 0, Action::Press, glfw::Modifiers::empty());
        assert!(translate(&press, (0.0, 0.0)).is_some_and(|e| e.is_quit()));

        let click = WindowEvent::MouseButton(glfw::MouseButton::Button2, Action::Press, glfw::Modifiers::empty());
        assert_eq!(
            translate(&click, (12.0, 34.0)),
            Some(Event::MouseButtonDown { button: MouseButton::Right, x: 12.0, y: 34.0 })
        );

        let resize = WindowEvent::Size(800, 600);
        assert!(!translate(&resize, (0.0, 0.0)).is_some_and(|e| e.is_quit()));
        assert_eq!(translate(&WindowEvent::Close, (0.0, 0.0)), Some(Event::Quit));
    }
}
