//! Window management and pointer input with winit.

use std::sync::Arc;

use anyhow::Result;
use glam::DVec2;
use portfolio3d_scene::{PointerEvent, WindowSettings};
use tracing::debug;
use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::EventLoopWindowTarget,
    window::{CursorIcon, Window, WindowBuilder},
};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::from(&WindowSettings::default())
    }
}

impl From<&WindowSettings> for WindowConfig {
    fn from(settings: &WindowSettings) -> Self {
        Self {
            title: settings.title.clone(),
            width: settings.width,
            height: settings.height,
            vsync: settings.vsync,
        }
    }
}

/// Window manager wrapping winit.
pub struct WindowManager {
    window: Arc<Window>,
}

impl WindowManager {
    /// Create the window on a running event loop.
    ///
    /// The cursor is a pointing hand over the whole window, since every plane is a link.
    pub fn new_with_event_loop(
        config: &WindowConfig,
        event_loop: &EventLoopWindowTarget<()>,
    ) -> Result<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(event_loop)?;
        window.set_cursor_icon(CursorIcon::Pointer);

        Ok(Self {
            window: Arc::new(window),
        })
    }

    /// Get Arc reference to the window.
    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }

    /// Get the current window size.
    pub fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }
}

/// Pointer tracking that turns winit events into scene pointer events.
///
/// Only the left button drives the scene.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last cursor position in physical pixels.
    pub cursor: DVec2,
    /// Whether the left button is currently held.
    pub left_down: bool,
    /// Whether the window currently has focus.
    pub focused: bool,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self {
            focused: true,
            ..Self::default()
        }
    }

    /// Translate a window event, returning the pointer event it produces, if any.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(DVec2::new(position.x, position.y)))
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::Focused(focused) => self.focus_changed(*focused),
            _ => None,
        }
    }

    /// Record a cursor move.
    pub fn cursor_moved(&mut self, position: DVec2) -> PointerEvent {
        self.cursor = position;
        PointerEvent::Moved(position)
    }

    /// Record a button transition at the last known cursor position.
    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed if !self.left_down => {
                self.left_down = true;
                Some(PointerEvent::Pressed(self.cursor))
            }
            ElementState::Released if self.left_down => {
                self.left_down = false;
                Some(PointerEvent::Released(self.cursor))
            }
            _ => None,
        }
    }

    /// Losing focus mid-press releases the button, since the release will never arrive.
    pub fn focus_changed(&mut self, focused: bool) -> Option<PointerEvent> {
        self.focused = focused;
        if !focused && self.left_down {
            debug!("focus lost with the button held; releasing");
            self.left_down = false;
            return Some(PointerEvent::Released(self.cursor));
        }
        None
    }
}
