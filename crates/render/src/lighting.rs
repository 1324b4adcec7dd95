//! CPU-side uniform blocks shared with `shaders/portfolio.wgsl`.

use bytemuck::Zeroable;
use glam::{Mat4, Vec3};
use portfolio3d_scene::{
    DirectionalLightConfig, LightingConfig, Rgb, Scene, ShadowConfig, MAX_DIRECTIONAL_LIGHTS,
};

/// One directional light as the shader sees it.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    /// Unit vector from the surface towards the light; `w` is 1 when this light casts shadows.
    pub direction: [f32; 4],
    /// Linear color pre-multiplied by intensity.
    pub color: [f32; 4],
}

impl DirectionalLightUniform {
    /// Build from a light aimed at the origin from `position`.
    pub fn from_config(light: &DirectionalLightConfig, casts_shadow: bool) -> Self {
        let direction = Vec3::from_array(light.position).normalize_or_zero();
        let [r, g, b] = light.color.to_linear();
        Self {
            direction: [
                direction.x,
                direction.y,
                direction.z,
                if casts_shadow { 1.0 } else { 0.0 },
            ],
            color: [
                r * light.intensity,
                g * light.intensity,
                b * light.intensity,
                1.0,
            ],
        }
    }
}

/// Per-frame values: cameras, lights and shadow parameters.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Linear ambient color pre-multiplied by intensity.
    pub ambient: [f32; 4],
    /// x: shadows on, y: depth bias, z: shadow texel size, w: light count.
    pub shadow_params: [f32; 4],
    pub lights: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
}

impl GlobalsUniform {
    /// Collect the uniform block for the current scene state.
    ///
    /// `shadows_active` is false when shadow mapping is disabled at runtime, even if the
    /// scene config asks for it.
    pub fn from_scene(scene: &Scene, shadows_active: bool) -> Self {
        let config = scene.config();
        let camera = scene.camera();
        let lighting = &config.lighting;
        let caster = shadow_caster_index(lighting).filter(|_| shadows_active);

        let mut lights = [DirectionalLightUniform::zeroed(); MAX_DIRECTIONAL_LIGHTS];
        for (index, (slot, light)) in lights
            .iter_mut()
            .zip(&lighting.directional)
            .enumerate()
        {
            *slot = DirectionalLightUniform::from_config(light, caster == Some(index));
        }
        let light_count = lighting.directional.len().min(MAX_DIRECTIONAL_LIGHTS);

        let light_view_proj = caster
            .map(|index| {
                light_view_projection(
                    Vec3::from_array(lighting.directional[index].position),
                    config.shadows.extent,
                )
            })
            .unwrap_or(Mat4::IDENTITY);

        let [ar, ag, ab] = lighting.ambient.color.to_linear();
        let ambient = lighting.ambient.intensity;

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: [ar * ambient, ag * ambient, ab * ambient, 1.0],
            shadow_params: shadow_params(&config.shadows, caster.is_some(), light_count),
            lights,
        }
    }
}

fn shadow_params(shadows: &ShadowConfig, active: bool, light_count: usize) -> [f32; 4] {
    let texel = 1.0 / shadows.map_size.max(1) as f32;
    [
        if active { 1.0 } else { 0.0 },
        shadows.bias,
        texel,
        light_count as f32,
    ]
}

/// Index of the first light that casts shadows, if any is usable.
pub fn shadow_caster_index(lighting: &LightingConfig) -> Option<usize> {
    lighting
        .directional
        .iter()
        .take(MAX_DIRECTIONAL_LIGHTS)
        .position(|light| {
            light.cast_shadows && Vec3::from_array(light.position).length_squared() > 0.0
        })
}

/// Orthographic view-projection for a directional light shining on the origin.
///
/// The box is `2 * extent` wide and deep enough to hold everything within `extent` of
/// the origin.
pub fn light_view_projection(light_position: Vec3, extent: f32) -> Mat4 {
    let direction = light_position.normalize_or_zero();
    let direction = if direction == Vec3::ZERO {
        Vec3::Z
    } else {
        direction
    };
    let eye = direction * extent * 2.0;
    let up = if direction.y.abs() > 0.99 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
    let projection = Mat4::orthographic_rh(-extent, extent, -extent, extent, 0.1, extent * 4.0);
    projection * view
}

/// Per-object transform and material tint.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Linear tint multiplied with the texture sample.
    pub tint: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, tint: Rgb) -> Self {
        let [r, g, b] = tint.to_linear();
        Self {
            model: model.to_cols_array_2d(),
            tint: [r, g, b, 1.0],
        }
    }
}
