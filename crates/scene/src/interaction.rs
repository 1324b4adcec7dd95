//! Pointer interaction: hover highlight, drag-to-rotate, click-to-open.

use glam::DVec2;
use tracing::debug;

use crate::config::InteractionConfig;
use crate::plane::Plane;
use crate::raycast::{pick, Ray};

/// Pointer input in window pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved.
    Moved(DVec2),
    /// Primary button went down.
    Pressed(DVec2),
    /// Primary button came up.
    Released(DVec2),
}

impl PointerEvent {
    /// Cursor position carried by the event.
    pub fn position(&self) -> DVec2 {
        match *self {
            PointerEvent::Moved(pos) | PointerEvent::Pressed(pos) | PointerEvent::Released(pos) => {
                pos
            }
        }
    }
}

/// Side effects requested by the scene. The application carries them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneAction {
    /// The plane under the cursor changed.
    HoverChanged(Option<usize>),
    /// A plane was clicked without dragging.
    OpenUrl {
        /// Plane index.
        index: usize,
        /// Link target.
        url: String,
    },
}

/// Tracks hover across events and applies pointer semantics to the planes.
#[derive(Debug, Clone)]
pub struct Interaction {
    config: InteractionConfig,
    hovered: Option<usize>,
}

impl Interaction {
    /// Create with the given tuning.
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            hovered: None,
        }
    }

    /// Plane currently under the cursor.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Apply one pointer event. `ray` is the ray under the event position, if the
    /// viewport is usable.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        ray: Option<Ray>,
        planes: &mut [Plane],
        radius: f32,
    ) -> Vec<SceneAction> {
        let hit = ray.and_then(|ray| pick(&ray, planes, radius)).map(|hit| hit.index);
        let mut actions = Vec::new();

        match event {
            PointerEvent::Moved(pos) => {
                if let Some(action) = self.update_hover(hit, planes) {
                    actions.push(action);
                }
                self.drag(pos, planes);
            }
            PointerEvent::Pressed(pos) => self.press(pos, hit, planes),
            PointerEvent::Released(_) => {
                for plane in planes.iter_mut() {
                    plane.state.is_mouse_down = false;
                }
                if let Some(index) = hit {
                    let plane = &planes[index];
                    if !plane.state.is_dragging {
                        debug!(index, url = %plane.target_url, "plane clicked");
                        actions.push(SceneAction::OpenUrl {
                            index,
                            url: plane.target_url.clone(),
                        });
                    }
                }
            }
        }

        actions
    }

    fn update_hover(&mut self, hit: Option<usize>, planes: &mut [Plane]) -> Option<SceneAction> {
        for plane in planes.iter_mut() {
            plane.tint = self.config.base_color;
        }
        if let Some(index) = hit {
            planes[index].tint = self.config.highlight_color;
        }

        if hit == self.hovered {
            return None;
        }
        self.hovered = hit;
        Some(SceneAction::HoverChanged(hit))
    }

    fn press(&mut self, pos: DVec2, hit: Option<usize>, planes: &mut [Plane]) {
        for plane in planes.iter_mut() {
            plane.state.is_dragging = false;
        }
        let Some(index) = hit else {
            return;
        };
        let state = &mut planes[index].state;
        state.is_mouse_down = true;
        state.previous_pointer = pos;
    }

    fn drag(&mut self, pos: DVec2, planes: &mut [Plane]) {
        let threshold = self.config.drag_threshold_px;
        let speed = self.config.rotate_speed;

        for plane in planes.iter_mut().filter(|plane| plane.state.is_mouse_down) {
            let state = &mut plane.state;
            // Judged per move event, so a slow drag still counts as a click.
            let delta = pos - state.previous_pointer;
            if delta.x.abs() > threshold || delta.y.abs() > threshold {
                state.is_dragging = true;
            }

            plane.transform.rotation.y += delta.x as f32 * speed;
            plane.transform.rotation.x += delta.y as f32 * speed;
            state.previous_pointer = pos;
        }
    }
}
