//! Pointer ray casting against the plane set.

use glam::{DVec2, Mat4, Vec3};

use crate::camera::Camera;
use crate::plane::Plane;

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Build the ray under a pointer position given in window pixels.
    ///
    /// Returns `None` for an empty viewport.
    pub fn from_screen(cursor: DVec2, viewport: (u32, u32), camera: &Camera) -> Option<Self> {
        let ndc = screen_to_ndc(cursor, viewport)?;
        let inv_view_proj = camera.view_projection_matrix().inverse();
        Some(Self::from_ndc(ndc, &inv_view_proj))
    }

    /// Unproject normalized device coordinates through an inverse view-projection.
    pub fn from_ndc(ndc: glam::Vec2, inv_view_proj: &Mat4) -> Self {
        let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Self::new(near, far - near)
    }
}

/// Convert window pixels to normalized device coordinates (-1..1, +Y up).
pub fn screen_to_ndc(cursor: DVec2, viewport: (u32, u32)) -> Option<glam::Vec2> {
    if viewport.0 == 0 || viewport.1 == 0 {
        return None;
    }
    let x = (cursor.x / viewport.0 as f64) * 2.0 - 1.0;
    let y = -(cursor.y / viewport.1 as f64) * 2.0 + 1.0;
    Some(glam::Vec2::new(x as f32, y as f32))
}

/// Intersect a ray with a disc of `radius` lying in the local XY plane of `model`.
///
/// Both faces count as hits. Returns the world-space distance along the ray.
pub fn intersect_disk(ray: &Ray, model: &Mat4, radius: f32) -> Option<f32> {
    let inverse = model.inverse();
    let local_origin = inverse.transform_point3(ray.origin);
    let local_dir = inverse.transform_vector3(ray.direction);

    if local_dir.z.abs() < 1e-8 {
        return None;
    }

    let t = -local_origin.z / local_dir.z;
    if t < 0.0 {
        return None;
    }

    let local_hit = local_origin + local_dir * t;
    if local_hit.x * local_hit.x + local_hit.y * local_hit.y > radius * radius {
        return None;
    }

    let world_hit = model.transform_point3(local_hit);
    Some((world_hit - ray.origin).length())
}

/// Nearest plane under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    /// Index of the plane in scene order
    pub index: usize,
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Find the closest plane hit by `ray`. Ties go to the lower index.
pub fn pick(ray: &Ray, planes: &[Plane], radius: f32) -> Option<PlaneHit> {
    let mut best: Option<PlaneHit> = None;
    for (index, plane) in planes.iter().enumerate() {
        let Some(distance) = intersect_disk(ray, &plane.model_matrix(), radius) else {
            continue;
        };
        if best.map_or(true, |hit| distance < hit.distance) {
            best = Some(PlaneHit {
                index,
                distance,
                point: ray.at(distance),
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use glam::Quat;

    #[test]
    fn ndc_maps_corners_and_centre() {
        let centre = screen_to_ndc(DVec2::new(400.0, 300.0), (800, 600)).unwrap();
        assert!(centre.length() < 1e-6);

        let top_left = screen_to_ndc(DVec2::new(0.0, 0.0), (800, 600)).unwrap();
        assert_eq!(top_left, glam::Vec2::new(-1.0, 1.0));

        let bottom_right = screen_to_ndc(DVec2::new(800.0, 600.0), (800, 600)).unwrap();
        assert_eq!(bottom_right, glam::Vec2::new(1.0, -1.0));

        assert!(screen_to_ndc(DVec2::ZERO, (0, 600)).is_none());
    }

    #[test]
    fn centre_ray_starts_at_camera_and_points_forward() {
        let camera = Camera::from_config(&CameraConfig::default(), 4.0 / 3.0);
        let ray = Ray::from_screen(DVec2::new(400.0, 300.0), (800, 600), &camera).unwrap();

        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        // Origin sits on the near plane in front of the camera.
        assert!((ray.origin - Vec3::new(0.0, 0.0, 2.9)).length() < 1e-3);
    }

    #[test]
    fn disk_hit_respects_radius() {
        let model = Mat4::IDENTITY;
        let through_centre = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let hit = intersect_disk(&through_centre, &model, 1.0).unwrap();
        assert!((hit - 3.0).abs() < 1e-5);

        let inside_edge = Ray::new(Vec3::new(0.7, 0.7, 3.0), Vec3::NEG_Z);
        assert!(intersect_disk(&inside_edge, &model, 1.0).is_some());

        let corner = Ray::new(Vec3::new(0.8, 0.8, 3.0), Vec3::NEG_Z);
        assert!(intersect_disk(&corner, &model, 1.0).is_none());
    }

    #[test]
    fn disk_is_double_sided() {
        let model = Mat4::IDENTITY;
        let from_behind = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let hit = intersect_disk(&from_behind, &model, 1.0).unwrap();
        assert!((hit - 2.0).abs() < 1e-5);
    }

    #[test]
    fn disk_behind_ray_or_edge_on_is_missed() {
        let model = Mat4::IDENTITY;
        let away = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        assert!(intersect_disk(&away, &model, 1.0).is_none());

        let edge_on = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_disk(&edge_on, &model, 1.0).is_none());
    }

    #[test]
    fn rotated_disk_distance_is_world_space() {
        // Disc turned to face +X, moved to x = -4.
        let model = Mat4::from_rotation_translation(
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::new(-4.0, 0.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_X);
        let hit = intersect_disk(&ray, &model, 1.0).unwrap();
        assert!((hit - 4.0).abs() < 1e-4);

        let scaled = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);
        let hit = intersect_disk(&ray, &scaled, 1.0).unwrap();
        assert!((hit - 5.0).abs() < 1e-4);
    }
}
