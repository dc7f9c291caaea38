use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Sender};
use tracing::{error, info};
use winit::dpi::PhysicalSize;
use winit::event::{Event, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::window::{Window, WindowBuilder};

use crate::gpu::state::GpuState;
use crate::input::{PointerBackend, TouchPoint};
use crate::scene::Scene;
use crate::types::RendererConfig;

/// Aggregates the window, its GPU resources and the CPU-side scene state.
pub(crate) struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    scene: Scene,
    scale_factor: f64,
}

impl WindowState {
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let gpu = GpuState::new(window.as_ref(), size, scale_factor, config)?;
        let backend = PointerBackend::detect();
        let scene = Scene::new(size.width, size.height, backend);

        info!(
            width = size.width,
            height = size.height,
            scale = scale_factor,
            ?backend,
            image = ?gpu.image_path(),
            "initialised bulge viewer window"
        );

        Ok(Self {
            window,
            gpu,
            scene,
            scale_factor,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size, self.scale_factor);
        self.scene.resize(new_size.width, new_size.height);
    }

    pub(crate) fn rescale(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        let size = self.window.inner_size();
        self.gpu.resize(size, scale_factor);
    }

    /// One iteration of the render loop: finish the texture swap if the
    /// decode has landed, run the uniform-update protocol, draw.
    pub(crate) fn render_frame(&mut self, now: Instant) -> Result<(), wgpu::SurfaceError> {
        if let Some(resolution) = self.gpu.poll_texture() {
            self.scene.set_texture_resolution(resolution);
        }
        let uniforms = self.scene.advance_frame(now);
        self.gpu.render(uniforms)
    }

    fn handle_touch(&mut self, touch: Touch, now: Instant) {
        let point = TouchPoint {
            id: touch.id,
            x: touch.location.x,
            y: touch.location.y,
        };
        match touch.phase {
            TouchPhase::Started => self.scene.touch_started(point, now),
            TouchPhase::Moved => self.scene.touch_moved(point),
            TouchPhase::Ended | TouchPhase::Cancelled => self.scene.touch_ended(point.id, now),
        }
    }

    pub(crate) fn scene(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[derive(Debug, Clone, Copy)]
enum ControlMessage {
    Shutdown,
}

/// Handle to a render loop running on its own thread.
///
/// The loop itself runs until torn down; this handle is the explicit
/// cancellation path. `shutdown` (or dropping the handle) asks the event
/// loop to exit and joins the thread; `wait` blocks until the user closes
/// the window.
pub struct WindowRuntime {
    proxy: EventLoopProxy<ControlMessage>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl WindowRuntime {
    pub fn spawn(config: RendererConfig) -> Result<Self> {
        let (ready_tx, ready_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("bulgeview-window".into())
            .spawn(move || run_window_thread(config, ready_tx))
            .map_err(|err| anyhow!("failed to spawn window thread: {err}"))?;

        let proxy = ready_rx
            .recv()
            .map_err(|err| anyhow!("window thread failed to initialise: {err}"))??;

        Ok(Self {
            proxy,
            join_handle: Some(handle),
        })
    }

    /// Blocks until the window is closed (or the loop fails).
    pub fn wait(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }

    /// Tears the render loop down and joins its thread.
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(ControlMessage::Shutdown);
            handle
                .join()
                .map_err(|err| anyhow!("window thread panicked: {err:?}"))??;
        }
        Ok(())
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        if let Some(handle) = self.join_handle.take() {
            let _ = self.proxy.send_event(ControlMessage::Shutdown);
            let _ = handle.join();
        }
    }
}

fn run_window_thread(
    config: RendererConfig,
    ready_tx: Sender<Result<EventLoopProxy<ControlMessage>>>,
) -> Result<()> {
    let mut builder = EventLoopBuilder::<ControlMessage>::with_user_event();
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }

    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    let event_loop = builder
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let proxy = event_loop.create_proxy();

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = match WindowState::new(window.clone(), &config) {
        Ok(state) => state,
        Err(err) => {
            let wrapped = anyhow!("failed to initialise window renderer: {err}");
            let message = wrapped.to_string();
            let _ = ready_tx.send(Err(anyhow!(message)));
            return Err(wrapped);
        }
    };

    let _ = ready_tx.send(Ok(proxy.clone()));

    let run_result = event_loop.run(move |event, elwt| {
        match event {
            Event::UserEvent(ControlMessage::Shutdown) => {
                elwt.exit();
            }
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size);
                    }
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        state.rescale(scale_factor);
                    }
                    // Exactly one pointer family is consumed, decided once
                    // at startup from the capability probe.
                    WindowEvent::CursorMoved { position, .. } => {
                        if state.scene().backend() == PointerBackend::Mouse {
                            state.scene().pointer_moved(position.x, position.y);
                        }
                    }
                    WindowEvent::CursorEntered { .. } => {
                        if state.scene().backend() == PointerBackend::Mouse {
                            state.scene().pointer_entered(Instant::now());
                        }
                    }
                    WindowEvent::CursorLeft { .. } => {
                        if state.scene().backend() == PointerBackend::Mouse {
                            state.scene().pointer_left(Instant::now());
                        }
                    }
                    WindowEvent::Touch(touch) => {
                        if state.scene().backend() == PointerBackend::Touch {
                            state.handle_touch(touch, Instant::now());
                        }
                    }
                    WindowEvent::RedrawRequested => match state.render_frame(Instant::now()) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = state.window().inner_size();
                            state.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("surface out of memory; exiting");
                            elwt.exit();
                        }
                        Err(err) => {
                            error!(error = ?err, "surface error; retrying next frame");
                        }
                    },
                    _ => {}
                }
            }
            Event::AboutToWait => {
                // Re-arm the per-vsync callback; Fifo presentation paces the
                // loop to the display.
                state.window().request_redraw();
                elwt.set_control_flow(ControlFlow::Poll);
            }
            _ => {}
        }
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}
