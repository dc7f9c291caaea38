use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{anyhow, Context, Result};
use wgpu::util::{DeviceExt, TextureDataOrder};

/// An image decoded to tightly packed RGBA8 on the loader thread.
pub(crate) struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// GPU-side texture plus the metadata the uniform protocol needs.
pub(crate) struct TextureResources {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub resolution: [f32; 2],
}

/// Outcome of polling the asynchronous image decode.
pub(crate) enum TextureLoad {
    Pending,
    Ready(DecodedImage),
    Failed(anyhow::Error),
}

/// One-shot asynchronous image decode.
///
/// The decode runs on a worker thread; the render loop polls the channel
/// each frame without blocking. The worker fires at most once.
pub(crate) struct TextureLoader {
    receiver: Receiver<Result<DecodedImage>>,
    path: PathBuf,
}

impl TextureLoader {
    pub(crate) fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let _ = sender.send(decode_image(&worker_path));
        });
        Self { receiver, path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check on the decode. Returns `Pending` until the worker
    /// reports, then `Ready`/`Failed` exactly once.
    pub(crate) fn poll(&mut self) -> TextureLoad {
        match self.receiver.try_recv() {
            Ok(Ok(image)) => TextureLoad::Ready(image),
            Ok(Err(err)) => TextureLoad::Failed(err),
            Err(TryRecvError::Empty) => TextureLoad::Pending,
            Err(TryRecvError::Disconnected) => TextureLoad::Failed(anyhow!(
                "texture decode worker disconnected before returning a result"
            )),
        }
    }
}

fn decode_image(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image at {}", path.display()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// 1x1 stand-in bound until the real decode lands (or forever, if it fails).
pub(crate) fn create_placeholder_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: wgpu::TextureFormat,
) -> TextureResources {
    let data = [36u8, 36, 36, 255];
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("placeholder image texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &data,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    TextureResources {
        _texture: texture,
        view,
        sampler: create_sampler(device),
        resolution: [1.0, 1.0],
    }
}

/// Uploads a decoded image as the plane's texture.
pub(crate) fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: wgpu::TextureFormat,
    image: &DecodedImage,
) -> TextureResources {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("image texture"),
            size: wgpu::Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &image.pixels,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    TextureResources {
        _texture: texture,
        view,
        sampler: create_sampler(device),
        resolution: [image.width as f32, image.height as f32],
    }
}

fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_reports_failure_once() {
        let mut loader = TextureLoader::spawn(PathBuf::from("/nonexistent/bulgeview-test.png"));
        assert_eq!(loader.path(), Path::new("/nonexistent/bulgeview-test.png"));

        // The worker always reports; spin until it does.
        let failure = loop {
            match loader.poll() {
                TextureLoad::Pending => thread::yield_now(),
                other => break other,
            }
        };
        assert!(matches!(failure, TextureLoad::Failed(_)));

        // After the one-shot report the channel stays disconnected.
        assert!(matches!(loader.poll(), TextureLoad::Failed(_)));
    }
}
