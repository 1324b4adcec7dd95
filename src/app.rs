//! Window event handling for the portfolio viewer.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use portfolio3d_render::{InputState, Renderer, WindowConfig, WindowManager};
use portfolio3d_scene::{PointerEvent, Scene, SceneAction, SceneConfig};
use tracing::{debug, error, info};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoopWindowTarget,
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::opener::UrlOpener;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Scene plus the side effects its actions trigger. Owns no GPU state.
pub struct SceneDriver<O> {
    scene: Scene,
    opener: O,
}

impl<O: UrlOpener> SceneDriver<O> {
    pub fn new(scene: Scene, opener: O) -> Self {
        Self { scene, opener }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Run a pointer event through the scene and carry out what it asks for.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<SceneAction> {
        let actions = self.scene.handle_pointer(event);
        for action in &actions {
            match action {
                SceneAction::HoverChanged(hovered) => debug!(?hovered, "hover changed"),
                SceneAction::OpenUrl { index, url } => {
                    info!(index, %url, "opening portfolio link");
                    if let Err(err) = self.opener.open(url) {
                        error!("Failed to open {url}: {err:#}");
                    }
                }
            }
        }
        actions
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    /// Advance the idle animation.
    pub fn tick(&mut self, dt: f32) {
        self.scene.update(dt);
    }
}

/// The running viewer: window, renderer and scene.
pub struct PortfolioApp<O> {
    window: Arc<Window>,
    renderer: Renderer,
    input: InputState,
    driver: SceneDriver<O>,
    last_frame: Instant,
}

impl<O: UrlOpener> PortfolioApp<O> {
    /// Open the window and set up the GPU.
    pub fn new(
        event_loop: &EventLoopWindowTarget<()>,
        config: SceneConfig,
        opener: O,
    ) -> Result<Self> {
        let window_config = WindowConfig::from(&config.window);
        let window = WindowManager::new_with_event_loop(&window_config, event_loop)
            .context("Failed to create window")?
            .window();

        let size = window.inner_size();
        let scene = Scene::from_config(config, (size.width, size.height));
        let renderer = pollster::block_on(Renderer::new(window.clone(), &scene, window_config.vsync))
            .context("Failed to initialize renderer")?;

        Ok(Self {
            window,
            renderer,
            input: InputState::new(),
            driver: SceneDriver::new(scene, opener),
            last_frame: Instant::now(),
        })
    }

    /// Handle one winit event.
    pub fn handle_event(&mut self, event: &Event<()>) -> AppAction {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                self.handle_window_event(event)
            }
            Event::AboutToWait => {
                self.window.request_redraw();
                AppAction::Continue
            }
            _ => AppAction::Continue,
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> AppAction {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                AppAction::Quit
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("Escape pressed");
                AppAction::Quit
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize((size.width, size.height));
                self.driver.resize(size.width, size.height);
                AppAction::Continue
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.driver.tick(dt);
                match self.renderer.render(self.driver.scene()) {
                    Ok(()) => AppAction::Continue,
                    Err(err) => {
                        error!("Render failed: {err:#}");
                        AppAction::Quit
                    }
                }
            }
            other => {
                if let Some(pointer) = self.input.handle_event(other) {
                    self.driver.pointer(pointer);
                }
                AppAction::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opener::testing::RecordingOpener;
    use glam::DVec2;

    fn driver(opener: RecordingOpener) -> SceneDriver<RecordingOpener> {
        let config = SceneConfig {
            seed: Some(5),
            ..SceneConfig::default()
        };
        SceneDriver::new(Scene::from_config(config, (800, 600)), opener)
    }

    const CENTRE: DVec2 = DVec2::new(400.0, 300.0);

    #[test]
    fn click_on_plane_opens_its_link() {
        let mut driver = driver(RecordingOpener::default());
        driver.pointer(PointerEvent::Moved(CENTRE));
        driver.pointer(PointerEvent::Pressed(CENTRE));
        driver.pointer(PointerEvent::Released(CENTRE));

        let expected = driver.scene().planes()[0].target_url.clone();
        assert_eq!(*driver.opener().opened.borrow(), vec![expected]);
    }

    #[test]
    fn drag_does_not_open() {
        let mut driver = driver(RecordingOpener::default());
        driver.pointer(PointerEvent::Pressed(CENTRE));
        driver.pointer(PointerEvent::Moved(CENTRE + DVec2::new(30.0, 0.0)));
        driver.pointer(PointerEvent::Released(CENTRE + DVec2::new(30.0, 0.0)));

        assert!(driver.opener().opened.borrow().is_empty());
    }

    #[test]
    fn click_on_background_opens_nothing() {
        let mut driver = driver(RecordingOpener::default());
        let corner = DVec2::new(2.0, 2.0);
        driver.pointer(PointerEvent::Pressed(corner));
        let actions = driver.pointer(PointerEvent::Released(corner));

        assert!(actions.is_empty());
        assert!(driver.opener().opened.borrow().is_empty());
    }

    #[test]
    fn opener_failure_is_not_fatal() {
        let mut driver = driver(RecordingOpener {
            fail: true,
            ..RecordingOpener::default()
        });
        driver.pointer(PointerEvent::Pressed(CENTRE));
        let actions = driver.pointer(PointerEvent::Released(CENTRE));

        assert!(actions
            .iter()
            .any(|action| matches!(action, SceneAction::OpenUrl { index: 0, .. })));
        assert_eq!(driver.opener().opened.borrow().len(), 1);

        // The scene keeps responding afterwards.
        driver.pointer(PointerEvent::Moved(CENTRE));
        assert_eq!(driver.scene().hovered(), Some(0));
    }

    #[test]
    fn ticking_moves_free_planes() {
        let mut driver = driver(RecordingOpener::default());
        let before = driver.scene().planes()[0].transform.position.y;
        driver.tick(0.05);
        assert_ne!(driver.scene().planes()[0].transform.position.y, before);
    }
}
