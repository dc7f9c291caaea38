use std::path::Path;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;

use crate::geometry::PlaneGeometry;
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::pipeline::{PipelineLayouts, PlaneMesh, PlanePipeline};
use super::texture::{
    create_placeholder_texture, upload_image, TextureLoad, TextureLoader, TextureResources,
};
use super::uniforms::BulgeUniforms;

/// Background color behind the plane: 0x242424, expressed in linear light
/// for the sRGB swapchain.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0177,
    g: 0.0177,
    b: 0.0177,
    a: 1.0,
};

/// Pixel format image decodes are uploaded with (sRGB-encoded RGBA).
const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Owns every GPU resource: surface, pipeline, plane mesh, uniform buffer
/// and the image texture (placeholder until the async decode lands).
pub(crate) struct GpuState {
    context: GpuContext,
    layouts: PipelineLayouts,
    pipeline: PlanePipeline,
    mesh: PlaneMesh,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture: TextureResources,
    texture_bind_group: wgpu::BindGroup,
    loader: Option<TextureLoader>,
    multisample_target: Option<MultisampleTarget>,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        scale_factor: f64,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, scale_factor, config.antialiasing)?;
        let layouts = PipelineLayouts::new(&context.device)?;
        let pipeline = PlanePipeline::new(
            &context.device,
            &layouts,
            context.surface_format,
            context.sample_count,
        );
        let mesh = PlaneMesh::new(&context.device, &PlaneGeometry::unit_quad());

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<BulgeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &layouts.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let texture = create_placeholder_texture(&context.device, &context.queue, IMAGE_FORMAT);
        let texture_bind_group =
            create_texture_bind_group(&context.device, &layouts.texture_layout, &texture);

        let multisample_target = if context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            ))
        } else {
            None
        };

        let loader = Some(TextureLoader::spawn(config.image_path.clone()));

        Ok(Self {
            context,
            layouts,
            pipeline,
            mesh,
            uniform_buffer,
            uniform_bind_group,
            texture,
            texture_bind_group,
            loader,
            multisample_target,
        })
    }

    pub(crate) fn image_path(&self) -> Option<&Path> {
        self.loader.as_ref().map(|loader| loader.path())
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>, scale_factor: f64) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size, scale_factor);
        self.multisample_target = if self.context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            ))
        } else {
            None
        };
    }

    /// Polls the one-shot image decode. On completion the texture and its
    /// bind group are swapped in and the image resolution is returned so the
    /// caller can refresh `uTextureResolution`. A failed decode keeps the
    /// placeholder bound; there is no retry.
    pub(crate) fn poll_texture(&mut self) -> Option<[f32; 2]> {
        let loader = self.loader.as_mut()?;
        match loader.poll() {
            TextureLoad::Pending => None,
            TextureLoad::Ready(image) => {
                debug!(
                    width = image.width,
                    height = image.height,
                    "image decode complete; swapping texture in"
                );
                self.texture =
                    upload_image(&self.context.device, &self.context.queue, IMAGE_FORMAT, &image);
                self.texture_bind_group = create_texture_bind_group(
                    &self.context.device,
                    &self.layouts.texture_layout,
                    &self.texture,
                );
                let resolution = self.texture.resolution;
                self.loader = None;
                Some(resolution)
            }
            TextureLoad::Failed(err) => {
                warn!(
                    path = %loader.path().display(),
                    error = %err,
                    "image decode failed; keeping placeholder texture"
                );
                self.loader = None;
                None
            }
        }
    }

    /// Uploads the uniform block and issues the frame's single draw call.
    pub(crate) fn render(&mut self, uniforms: &BulgeUniforms) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) =
            if let Some(msaa) = self.multisample_target.as_ref() {
                (&msaa.view, Some(&view))
            } else {
                (&view, None)
            };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResources,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}
