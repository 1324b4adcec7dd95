//! wgpu renderer for the portfolio scene: lit textured discs, an optional floor and a
//! directional shadow map.

use std::sync::Arc;

use anyhow::{bail, Result};
use glam::{Mat4, Vec3};
use portfolio3d_scene::Scene;
use tracing::{debug, info, warn};

mod gpu_mesh;
mod lighting;
mod mesh;
mod pipeline;
mod texture;
mod window;

pub use gpu_mesh::GpuMesh;
pub use lighting::{
    light_view_projection, shadow_caster_index, DirectionalLightUniform, GlobalsUniform,
    ObjectUniform,
};
pub use mesh::{circle_mesh, ground_mesh, MeshBuffers, MeshVertex};
pub use pipeline::{ObjectBinding, RenderContext, ScenePipeline};
pub use texture::{
    checker_texture, load_rgba, load_rgba_or_fallback, white_texture, GpuTexture, TextureError,
};
pub use window::{InputState, WindowConfig, WindowManager};

/// A mesh drawn with one material binding.
struct Drawable {
    binding: ObjectBinding,
}

/// Main renderer owning GPU resources.
pub struct Renderer {
    context: RenderContext,
    pipeline: ScenePipeline,
    plane_mesh: GpuMesh,
    planes: Vec<Drawable>,
    ground: Option<(GpuMesh, Drawable)>,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Create the GPU context and upload every plane texture.
    ///
    /// Textures that fail to load are replaced with a checkerboard.
    pub async fn new(window: Arc<winit::window::Window>, scene: &Scene, vsync: bool) -> Result<Self> {
        let config = scene.config();
        let context = RenderContext::new(window, vsync).await?;

        let shadows = config.shadows.enabled && shadow_caster_index(&config.lighting).is_some();
        if config.shadows.enabled && !shadows {
            warn!("Shadows enabled but no directional light casts them");
        }
        let pipeline = ScenePipeline::new(&context, shadows.then_some(config.shadows.map_size))?;

        let plane_mesh = GpuMesh::from_mesh_buffers(
            &context.device,
            &circle_mesh(config.plane_radius, config.plane_segments),
            "Plane",
        );

        let max_dimension = context.max_texture_dimension();
        let planes = scene
            .planes()
            .iter()
            .zip(&config.planes)
            .enumerate()
            .map(|(index, (plane, plane_config))| {
                let path = config.texture_path(plane_config);
                let image = load_rgba_or_fallback(&path, max_dimension);
                debug!(index, path = %path.display(), size = ?image.dimensions(), "plane texture");
                let label = format!("Plane {index}");
                let texture = GpuTexture::from_image(&context.device, &context.queue, &image, &label);
                let binding = pipeline.create_object_binding(
                    &context.device,
                    &texture,
                    &ObjectUniform::new(plane.model_matrix(), plane.tint),
                    &label,
                );
                Drawable { binding }
            })
            .collect::<Vec<_>>();

        let ground = config.ground.enabled.then(|| {
            let mesh = GpuMesh::from_mesh_buffers(
                &context.device,
                &ground_mesh(config.ground.size),
                "Ground",
            );
            let texture =
                GpuTexture::from_image(&context.device, &context.queue, &white_texture(), "Ground");
            let model = Mat4::from_translation(Vec3::new(0.0, config.ground.height, 0.0));
            let binding = pipeline.create_object_binding(
                &context.device,
                &texture,
                &ObjectUniform::new(model, config.ground.color),
                "Ground",
            );
            (mesh, Drawable { binding })
        });

        let [r, g, b] = config.background.to_linear();
        let clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        info!(
            planes = planes.len(),
            shadows,
            ground = ground.is_some(),
            "renderer initialized"
        );

        Ok(Self {
            context,
            pipeline,
            plane_mesh,
            planes,
            ground,
            clear_color,
        })
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size
    }

    /// Resize the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.context.resize(new_size);
        self.pipeline.resize(&self.context.device, new_size);
    }

    /// Draw one frame of `scene` and present it.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; only running out
    /// of GPU memory is an error.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out; skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => bail!("GPU out of memory"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let queue = &self.context.queue;
        let shadows = self.pipeline.shadows_enabled();
        self.pipeline
            .update_globals(queue, &GlobalsUniform::from_scene(scene, shadows));
        for (drawable, plane) in self.planes.iter().zip(scene.planes()) {
            drawable
                .binding
                .update(queue, &ObjectUniform::new(plane.model_matrix(), plane.tint));
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        if shadows {
            let mut pass = self.pipeline.begin_shadow_pass(&mut encoder);
            self.draw_objects(&mut pass);
        }
        {
            let mut pass = self
                .pipeline
                .begin_render_pass(&mut encoder, &view, self.clear_color);
            self.draw_objects(&mut pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn draw_objects<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if let Some((mesh, ground)) = &self.ground {
            pass.set_bind_group(1, ground.binding.bind_group(), &[]);
            mesh.draw(pass);
        }
        for plane in &self.planes {
            pass.set_bind_group(1, plane.binding.bind_group(), &[]);
            self.plane_mesh.draw(pass);
        }
    }
}
