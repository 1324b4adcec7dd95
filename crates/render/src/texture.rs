use std::path::Path;

use image::{imageops::FilterType, ImageReader, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

/// Edge length of the procedural fallback texture.
const CHECKER_SIZE: u32 = 64;
const CHECKER_TILE: u32 = 8;

/// Failure while loading a photo texture from disk.
#[derive(Debug, Error)]
pub enum TextureError {
    /// File could not be opened.
    #[error("failed to open texture: {0}")]
    Io(#[from] std::io::Error),
    /// Image decoding failed.
    #[error("failed to decode texture: {0}")]
    Image(#[from] image::ImageError),
    /// Decoded image has no pixels.
    #[error("texture {0} is empty")]
    Empty(String),
}

/// Decode an image file to RGBA8, downscaling to fit `max_dimension`.
pub fn load_rgba(path: &Path, max_dimension: u32) -> Result<RgbaImage, TextureError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(TextureError::Empty(path.display().to_string()));
    }

    let image = if image.width() > max_dimension || image.height() > max_dimension {
        debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            max_dimension,
            "downscaling texture"
        );
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        image
    };

    Ok(image.to_rgba8())
}

/// Load a texture, substituting a checkerboard when the file is missing or unreadable.
pub fn load_rgba_or_fallback(path: &Path, max_dimension: u32) -> RgbaImage {
    match load_rgba(path, max_dimension) {
        Ok(image) => image,
        Err(err) => {
            warn!("Falling back to checker texture for {}: {err}", path.display());
            checker_texture()
        }
    }
}

/// Magenta/grey checkerboard that makes missing assets obvious.
pub fn checker_texture() -> RgbaImage {
    RgbaImage::from_fn(CHECKER_SIZE, CHECKER_SIZE, |x, y| {
        if ((x / CHECKER_TILE) + (y / CHECKER_TILE)) % 2 == 0 {
            image::Rgba([255, 0, 255, 255])
        } else {
            image::Rgba([64, 64, 64, 255])
        }
    })
}

/// 1x1 white image for untextured surfaces.
pub fn white_texture() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]))
}

/// Sampled texture resident on the GPU.
pub struct GpuTexture {
    /// Backing texture.
    pub texture: wgpu::Texture,
    /// Full view for binding.
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Upload an RGBA8 image as an sRGB texture.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
