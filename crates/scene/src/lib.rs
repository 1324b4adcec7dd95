//! Scene model for the portfolio viewer.
//!
//! Everything here is GPU-free: the camera, the photo planes, pointer ray casting,
//! the interaction state machine and the idle animation. The renderer reads a
//! [`Scene`] each frame; the application feeds it pointer events and executes the
//! [`SceneAction`]s it returns.

pub mod animation;
pub mod camera;
pub mod config;
pub mod interaction;
pub mod plane;
pub mod raycast;

pub use animation::IdleAnimation;
pub use camera::Camera;
pub use config::{
    AmbientLightConfig, AnimationConfig, CameraConfig, ConfigError, DirectionalLightConfig,
    GroundConfig, InteractionConfig, LightingConfig, PlaneConfig, Rgb, SceneConfig, ShadowConfig,
    WindowSettings, DEFAULT_SCENE_PATH, MAX_DIRECTIONAL_LIGHTS,
};
pub use interaction::{Interaction, PointerEvent, SceneAction};
pub use plane::{Plane, PlaneState, PlaneTransform};
pub use raycast::{intersect_disk, pick, screen_to_ndc, PlaneHit, Ray};

use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

/// The portfolio scene: camera, planes, and the state driving them.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    viewport: (u32, u32),
    planes: Vec<Plane>,
    animation: IdleAnimation,
    interaction: Interaction,
}

impl Scene {
    /// Build the scene for a viewport of `viewport` pixels.
    ///
    /// Planes are created in config order, so `planes()[i]` belongs to `config.planes[i]`.
    pub fn from_config(config: SceneConfig, viewport: (u32, u32)) -> Self {
        let aspect = if viewport.1 > 0 {
            viewport.0 as f32 / viewport.1 as f32
        } else {
            1.0
        };
        let camera = Camera::from_config(&config.camera, aspect);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let planes: Vec<Plane> = config
            .planes
            .iter()
            .map(|plane| {
                Plane::from_config(
                    plane,
                    config.interaction.base_color,
                    config.tilt_jitter,
                    &mut rng,
                )
            })
            .collect();

        info!(
            planes = planes.len(),
            width = viewport.0,
            height = viewport.1,
            "scene created"
        );

        Self {
            animation: IdleAnimation::new(config.animation.clone()),
            interaction: Interaction::new(config.interaction.clone()),
            config,
            camera,
            viewport,
            planes,
        }
    }

    /// Configuration the scene was built from.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Current viewport in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Plane under the cursor, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.interaction.hovered()
    }

    pub fn animation(&self) -> &IdleAnimation {
        &self.animation
    }

    /// Keep the camera aspect in step with the window.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.resize(width, height);
    }

    /// Ray under a pointer position, if the viewport is usable.
    pub fn ray_at(&self, cursor: glam::DVec2) -> Option<Ray> {
        Ray::from_screen(cursor, self.viewport, &self.camera)
    }

    /// Nearest plane under a pointer position.
    pub fn pick_at(&self, cursor: glam::DVec2) -> Option<PlaneHit> {
        let ray = self.ray_at(cursor)?;
        pick(&ray, &self.planes, self.config.plane_radius)
    }

    /// Feed one pointer event through hover, drag and click handling.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<SceneAction> {
        let ray = self.ray_at(event.position());
        self.interaction
            .handle(event, ray, &mut self.planes, self.config.plane_radius)
    }

    /// Advance the idle animation by `dt` seconds and pose every free plane.
    pub fn update(&mut self, dt: f32) {
        self.animation.advance(dt);
        for (index, plane) in self.planes.iter_mut().enumerate() {
            self.animation.apply(index, plane);
        }
    }
}
