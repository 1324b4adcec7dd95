//! Scene configuration loaded from TOML.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;
use tracing::warn;

/// Default location of the scene description.
pub const DEFAULT_SCENE_PATH: &str = "config/scene.toml";

/// Maximum number of directional lights the renderer accepts.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Reasons a loaded configuration cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The scene has nothing to show.
    #[error("scene has no planes")]
    NoPlanes,
    /// Plane radius must be positive.
    #[error("plane radius must be positive, got {0}")]
    InvalidRadius(f32),
    /// A disc needs at least three segments.
    #[error("plane segments must be at least 3, got {0}")]
    TooFewSegments(u32),
    /// Field of view outside (0, 180) degrees.
    #[error("camera fov must be between 0 and 180 degrees, got {0}")]
    InvalidFov(f32),
    /// Clip planes out of order.
    #[error("camera near plane {near} must be positive and below far plane {far}")]
    InvalidClipPlanes {
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
    /// The camera has no viewing direction.
    #[error("camera position {0:?} equals its look-at target")]
    DegenerateCamera([f32; 3]),
    /// More directional lights than the shader supports.
    #[error("at most {max} directional lights are supported, got {found}")]
    TooManyLights {
        /// Supported count.
        max: usize,
        /// Configured count.
        found: usize,
    },
    /// Link target is not an http(s) URL.
    #[error("plane {index} target {url:?} is not an http(s) URL")]
    InvalidTargetUrl {
        /// Plane index in config order.
        index: usize,
        /// Offending value.
        url: String,
    },
}

/// An sRGB color written as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb(0xFFFFFF);

    /// Components in 0..=1 sRGB space.
    pub fn to_srgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xFF) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xFF) as f32 / 255.0;
        let b = (self.0 & 0xFF) as f32 / 255.0;
        [r, g, b]
    }

    /// Components converted to linear space for shading.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// One portfolio item.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaneConfig {
    /// Image path, relative to `asset_root`.
    pub texture: String,
    /// URL opened when the plane is clicked.
    pub target_url: String,
    /// Rest position in world space.
    pub position: [f32; 3],
}

impl PlaneConfig {
    /// Build a plane entry.
    pub fn new(texture: impl Into<String>, target_url: impl Into<String>, position: [f32; 3]) -> Self {
        Self {
            texture: texture.into(),
            target_url: target_url.into(),
            position,
        }
    }
}

fn default_planes() -> Vec<PlaneConfig> {
    vec![
        PlaneConfig::new("mm.png", "https://kuochunghsuan.com/", [0.0, 0.0, 0.0]),
        PlaneConfig::new(
            "forkVR.png",
            "https://kuochunghsuan.com/Forklife-License-VR-Training-S-curve",
            [5.0, 0.3, -2.0],
        ),
        PlaneConfig::new(
            "ARHealth.png",
            "https://kuochunghsuan.com/GoodFace-A-Digital-Facial-Palsy-Patient-Care-Application",
            [-5.0, -0.3, -4.0],
        ),
        PlaneConfig::new(
            "robotGame.png",
            "https://kuochunghsuan.com/Adventurer",
            [-10.0, 0.5, -6.0],
        ),
    ]
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "portfolio3d".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Perspective camera settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 3.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

/// A directional light shining from `position` toward the origin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DirectionalLightConfig {
    pub color: Rgb,
    pub intensity: f32,
    pub position: [f32; 3],
    /// Whether this light renders the shadow map. Only the first such light is used.
    #[serde(default)]
    pub cast_shadows: bool,
}

/// Ambient term.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AmbientLightConfig {
    pub color: Rgb,
    pub intensity: f32,
}

/// Lighting rig.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: AmbientLightConfig,
    pub directional: Vec<DirectionalLightConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: AmbientLightConfig {
                color: Rgb::WHITE,
                intensity: 0.5,
            },
            directional: vec![
                DirectionalLightConfig {
                    color: Rgb::WHITE,
                    intensity: 1.0,
                    position: [0.0, 0.0, 2.0],
                    cast_shadows: true,
                },
                DirectionalLightConfig {
                    color: Rgb::WHITE,
                    intensity: 0.5,
                    position: [0.0, 0.0, -2.0],
                    cast_shadows: false,
                },
            ],
        }
    }
}

/// Optional floor that receives shadows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GroundConfig {
    pub enabled: bool,
    /// Height of the floor plane.
    pub height: f32,
    /// Edge length of the square floor.
    pub size: f32,
    pub color: Rgb,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            height: -2.0,
            size: 60.0,
            color: Rgb(0xD8D8D8),
        }
    }
}

/// Shadow map settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub enabled: bool,
    /// Shadow map resolution in texels.
    pub map_size: u32,
    /// Half extent of the orthographic shadow frustum.
    pub extent: f32,
    /// Depth bias applied in the comparison.
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            map_size: 2048,
            extent: 16.0,
            bias: 0.002,
        }
    }
}

/// Pointer interaction tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub base_color: Rgb,
    pub highlight_color: Rgb,
    /// Pixels a single pointer move may cover, on either axis, before a press becomes a drag.
    pub drag_threshold_px: f64,
    /// Radians of rotation per pixel dragged.
    pub rotate_speed: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            base_color: Rgb::WHITE,
            highlight_color: Rgb(0xF8F4A6),
            drag_threshold_px: 5.0,
            rotate_speed: 0.01,
        }
    }
}

/// Idle floating animation tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Animation clock units per second.
    pub speed: f32,
    /// Vertical bob amplitude in world units.
    pub bob_amplitude: f32,
    /// Z-rotation sway amplitude in radians.
    pub sway_amplitude: f32,
    /// Sway frequency relative to the bob.
    pub sway_frequency: f32,
    /// Phase offset between consecutive planes.
    pub phase_step: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            // 0.01 per frame at 60 Hz
            speed: 0.6,
            bob_amplitude: 0.1,
            sway_amplitude: 0.05,
            sway_frequency: 0.5,
            phase_step: std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Complete description of the portfolio scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Clear color.
    pub background: Rgb,
    /// Directory texture paths are resolved against.
    pub asset_root: PathBuf,
    pub plane_radius: f32,
    pub plane_segments: u32,
    /// Initial X/Y tilt is drawn from `[-tilt_jitter, tilt_jitter)`.
    pub tilt_jitter: f32,
    /// Fixed seed for the initial tilt; random when absent.
    pub seed: Option<u64>,
    pub window: WindowSettings,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub ground: GroundConfig,
    pub shadows: ShadowConfig,
    pub interaction: InteractionConfig,
    pub animation: AnimationConfig,
    pub planes: Vec<PlaneConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Rgb(0x87CEEB),
            asset_root: PathBuf::from("assets"),
            plane_radius: 1.0,
            plane_segments: 64,
            tilt_jitter: 0.1,
            seed: None,
            window: WindowSettings::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            ground: GroundConfig::default(),
            shadows: ShadowConfig::default(),
            interaction: InteractionConfig::default(),
            animation: AnimationConfig::default(),
            planes: default_planes(),
        }
    }
}

impl SceneConfig {
    /// Load from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_SCENE_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SceneConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SceneConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Scene config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SceneConfig::default()
            }
        }
    }

    /// Write the configuration as pretty TOML.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Check the values the renderer and interaction code depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planes.is_empty() {
            return Err(ConfigError::NoPlanes);
        }
        if !(self.plane_radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.plane_radius));
        }
        if self.plane_segments < 3 {
            return Err(ConfigError::TooFewSegments(self.plane_segments));
        }
        let fov = self.camera.fov_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::InvalidFov(fov));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(ConfigError::InvalidClipPlanes {
                near: self.camera.near,
                far: self.camera.far,
            });
        }
        if self.camera.position == self.camera.look_at {
            return Err(ConfigError::DegenerateCamera(self.camera.position));
        }
        if self.lighting.directional.len() > MAX_DIRECTIONAL_LIGHTS {
            return Err(ConfigError::TooManyLights {
                max: MAX_DIRECTIONAL_LIGHTS,
                found: self.lighting.directional.len(),
            });
        }
        for (index, plane) in self.planes.iter().enumerate() {
            let url = plane.target_url.as_str();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidTargetUrl {
                    index,
                    url: plane.target_url.clone(),
                });
            }
        }
        Ok(())
    }

    /// Full path of a plane's texture.
    pub fn texture_path(&self, plane: &PlaneConfig) -> PathBuf {
        self.asset_root.join(&plane.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.planes.len(), 4);
        assert_eq!(config.background, Rgb(0x87CEEB));
    }

    #[test]
    fn hex_colors_convert_to_linear() {
        assert_eq!(Rgb::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Rgb(0x000000).to_linear(), [0.0, 0.0, 0.0]);

        let [r, g, b] = Rgb(0x87CEEB).to_srgb();
        assert!((r - 135.0 / 255.0).abs() < 1e-6);
        assert!((g - 206.0 / 255.0).abs() < 1e-6);
        assert!((b - 235.0 / 255.0).abs() < 1e-6);

        let linear = Rgb(0x808080).to_linear();
        assert!((linear[0] - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SceneConfig = toml::from_str(
            r#"
background = 0x101010
seed = 7

[camera]
fov_degrees = 60.0
"#,
        )
        .expect("parse");

        assert_eq!(config.background, Rgb(0x101010));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 3.0]);
        assert_eq!(config.planes.len(), 4);
    }

    #[test]
    fn config_survives_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("scene.toml");

        let mut config = SceneConfig::default();
        config.seed = Some(42);
        config.ground.enabled = true;
        config.planes.truncate(2);
        config.save_to_path(&path).expect("save");

        let loaded = SceneConfig::load_from_path(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_or_broken_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = SceneConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(missing, SceneConfig::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "planes = 3 = 4").expect("write");
        assert_eq!(SceneConfig::load_from_path(&broken), SceneConfig::default());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = SceneConfig::default();
        config.planes.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoPlanes));

        let mut config = SceneConfig::default();
        config.plane_segments = 2;
        assert_eq!(config.validate(), Err(ConfigError::TooFewSegments(2)));

        let mut config = SceneConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClipPlanes { .. })
        ));

        let mut config = SceneConfig::default();
        config.camera.look_at = config.camera.position;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DegenerateCamera([0.0, 0.0, 3.0]))
        );

        let mut config = SceneConfig::default();
        let light = config.lighting.directional[0].clone();
        config.lighting.directional = vec![light; 5];
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyLights { max: 4, found: 5 })
        );

        let mut config = SceneConfig::default();
        config.planes[1].target_url = "javascript:alert(1)".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTargetUrl { index: 1, .. })
        ));
    }

    #[test]
    fn texture_paths_resolve_against_asset_root() {
        let mut config = SceneConfig::default();
        config.asset_root = PathBuf::from("/srv/site/assets");
        let path = config.texture_path(&config.planes[0]);
        assert_eq!(path, PathBuf::from("/srv/site/assets/mm.png"));
    }
}
