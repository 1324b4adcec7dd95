//! Idle floating motion applied to planes that are not held.

use crate::config::AnimationConfig;
use crate::plane::Plane;

/// Longest frame step fed to the clock, so a stalled window does not jump the motion.
const MAX_STEP_SECONDS: f32 = 0.1;

/// Sinusoidal bob and sway, phase-offset per plane.
#[derive(Debug, Clone)]
pub struct IdleAnimation {
    time: f32,
    config: AnimationConfig,
}

impl IdleAnimation {
    /// Start the clock at zero.
    pub fn new(config: AnimationConfig) -> Self {
        Self { time: 0.0, config }
    }

    /// Current clock value.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by elapsed seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_STEP_SECONDS);
        self.time += dt * self.config.speed;
    }

    /// Phase offset for the plane at `index`.
    pub fn phase(&self, index: usize) -> f32 {
        index as f32 * self.config.phase_step
    }

    /// Vertical offset from the rest height at the current time.
    pub fn bob_offset(&self, index: usize) -> f32 {
        (self.time + self.phase(index)).sin() * self.config.bob_amplitude
    }

    /// Z rotation at the current time.
    pub fn sway_angle(&self, index: usize) -> f32 {
        (self.time * self.config.sway_frequency + self.phase(index)).sin()
            * self.config.sway_amplitude
    }

    /// Pose the plane at `index`. Planes held by the pointer keep their transform.
    pub fn apply(&self, index: usize, plane: &mut Plane) {
        if plane.state.is_mouse_down {
            return;
        }
        plane.transform.position.y = plane.state.original_position.y + self.bob_offset(index);
        plane.transform.rotation.z = self.sway_angle(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlaneConfig, Rgb};
    use rand::{rngs::StdRng, SeedableRng};

    fn plane(y: f32) -> Plane {
        let mut rng = StdRng::seed_from_u64(0);
        let config = PlaneConfig::new("p.png", "https://example.com/", [1.0, y, -2.0]);
        Plane::from_config(&config, Rgb::WHITE, 0.1, &mut rng)
    }

    #[test]
    fn one_second_matches_sixty_fixed_frames() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        for _ in 0..60 {
            animation.advance(1.0 / 60.0);
        }
        assert!((animation.time() - 0.6).abs() < 1e-4);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        animation.advance(5.0);
        assert!((animation.time() - 0.06).abs() < 1e-6);

        animation.advance(-1.0);
        assert!((animation.time() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn planes_bob_around_their_rest_height() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        animation.time = std::f32::consts::FRAC_PI_2;

        let mut p = plane(0.5);
        let rotation_before = p.transform.rotation;
        animation.apply(0, &mut p);

        assert!((p.transform.position.y - 0.6).abs() < 1e-5);
        assert!((p.transform.rotation.z - (0.25 * std::f32::consts::PI).sin() * 0.05).abs() < 1e-6);
        // X/Y are left alone.
        assert_eq!(p.transform.position.x, 1.0);
        assert_eq!(p.transform.rotation.x, rotation_before.x);
        assert_eq!(p.transform.rotation.y, rotation_before.y);
    }

    #[test]
    fn consecutive_planes_are_a_quarter_turn_apart() {
        let animation = IdleAnimation::new(AnimationConfig::default());
        // At t = 0 plane 1 sits at its peak, plane 2 back at rest.
        assert!((animation.bob_offset(1) - 0.1).abs() < 1e-6);
        assert!(animation.bob_offset(2).abs() < 1e-6);
        assert!((animation.bob_offset(3) + 0.1).abs() < 1e-6);
    }

    #[test]
    fn held_planes_are_not_animated() {
        let mut animation = IdleAnimation::new(AnimationConfig::default());
        animation.advance(0.05);

        let mut p = plane(0.0);
        p.state.is_mouse_down = true;
        p.transform.position.y = 3.0;
        p.transform.rotation.z = 1.0;
        animation.apply(1, &mut p);

        assert_eq!(p.transform.position.y, 3.0);
        assert_eq!(p.transform.rotation.z, 1.0);
    }
}
