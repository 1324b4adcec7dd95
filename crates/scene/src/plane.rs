//! Photo planes and their per-plane interaction state.

use glam::{DVec2, Mat4, Quat, Vec3};
use rand::Rng;

use crate::config::{PlaneConfig, Rgb};

/// Position and Euler rotation (XYZ order, radians) of a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneTransform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl PlaneTransform {
    /// Rotation as a quaternion, `Rx * Ry * Rz`.
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_rotation_x(self.rotation.x)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_z(self.rotation.z)
    }

    /// Local-to-world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation_quat(), self.position)
    }
}

/// Pointer bookkeeping for one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneState {
    /// The pointer went down on this plane and has not been released.
    pub is_mouse_down: bool,
    /// A move during the current press exceeded the drag threshold.
    pub is_dragging: bool,
    /// Pointer position seen by the last drag update.
    pub previous_pointer: DVec2,
    /// Transform the plane was created with.
    pub original_position: Vec3,
    pub original_rotation: Vec3,
}

impl PlaneState {
    fn new(transform: &PlaneTransform) -> Self {
        Self {
            is_mouse_down: false,
            is_dragging: false,
            previous_pointer: DVec2::ZERO,
            original_position: transform.position,
            original_rotation: transform.rotation,
        }
    }
}

/// A circular textured surface linking to one portfolio entry.
#[derive(Debug, Clone)]
pub struct Plane {
    pub transform: PlaneTransform,
    /// Material color multiplied with the texture.
    pub tint: Rgb,
    pub target_url: String,
    /// Texture path as written in the config.
    pub texture: String,
    pub state: PlaneState,
}

impl Plane {
    /// Create a plane at its configured position with a random X/Y tilt in `[-jitter, jitter)`.
    pub fn from_config<R: Rng>(
        config: &PlaneConfig,
        base_color: Rgb,
        jitter: f32,
        rng: &mut R,
    ) -> Self {
        let mut tilt = || {
            if jitter > 0.0 {
                rng.gen_range(-jitter..jitter)
            } else {
                0.0
            }
        };
        let rotation = Vec3::new(tilt(), tilt(), 0.0);
        let transform = PlaneTransform {
            position: Vec3::from_array(config.position),
            rotation,
        };

        Self {
            transform,
            tint: base_color,
            target_url: config.target_url.clone(),
            texture: config.texture.clone(),
            state: PlaneState::new(&transform),
        }
    }

    /// Local-to-world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.model_matrix()
    }
}
