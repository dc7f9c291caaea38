use std::time::Instant;

use crate::camera::OrthographicCamera;
use crate::clock::FrameClock;
use crate::gpu::uniforms::BulgeUniforms;
use crate::input::{InputListener, PointerBackend, TouchPoint, ViewportState};

/// Fixed per-frame time increment fed to `uTime`.
pub const TIME_STEP: f32 = 0.05;
/// Per-frame exponential smoothing factor applied to the pointer.
pub const POINTER_SMOOTHING: f32 = 0.1;

/// CPU-side scene state: viewport, camera, clock, input and the uniform
/// block, everything the per-frame protocol touches short of the GPU itself.
///
/// Keeping this free of GPU handles lets the frame/resize protocol run under
/// test exactly as it runs in production.
pub struct Scene {
    viewport: ViewportState,
    camera: OrthographicCamera,
    clock: FrameClock,
    listener: InputListener,
    uniforms: BulgeUniforms,
}

impl Scene {
    pub fn new(width: u32, height: u32, backend: PointerBackend) -> Self {
        let camera = OrthographicCamera::new();
        let mut uniforms = BulgeUniforms::new(width, height);
        uniforms.set_view_proj(camera.view_projection());
        Self {
            viewport: ViewportState::new(width, height),
            camera,
            clock: FrameClock::new(TIME_STEP),
            listener: InputListener::new(backend),
            uniforms,
        }
    }

    /// Runs one frame of the uniform-update protocol and returns the block
    /// ready for upload: advance time, smooth the pointer, sample the bulge.
    pub(crate) fn advance_frame(&mut self, now: Instant) -> &BulgeUniforms {
        let time = self.clock.advance();
        self.viewport.smooth(POINTER_SMOOTHING);
        self.uniforms.set_time(time);
        self.uniforms.set_mouse(self.viewport.smoothed());
        self.uniforms.set_bulge(self.listener.bulge(now));
        &self.uniforms
    }

    /// Applies a viewport resize: new dimensions, a projection recompute
    /// (kept for parity; the fixed frustum makes it a no-op) and a refreshed
    /// resolution uniform.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport.set_size(width, height);
        self.camera.update_projection();
        self.uniforms.set_view_proj(self.camera.view_projection());
        self.uniforms
            .set_resolution(width as f32, height as f32);
    }

    pub fn set_texture_resolution(&mut self, resolution: [f32; 2]) {
        self.uniforms
            .set_texture_resolution(resolution[0], resolution[1]);
    }

    pub fn pointer_entered(&mut self, now: Instant) {
        self.listener.pointer_entered(now);
    }

    pub fn pointer_left(&mut self, now: Instant) {
        self.listener.pointer_left(now);
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.listener.pointer_moved(x, y, &mut self.viewport);
    }

    pub fn touch_started(&mut self, point: TouchPoint, now: Instant) {
        self.listener.touch_started(point, now, &mut self.viewport);
    }

    pub fn touch_moved(&mut self, point: TouchPoint) {
        self.listener.touch_moved(point, &mut self.viewport);
    }

    pub fn touch_ended(&mut self, id: u64, now: Instant) {
        self.listener.touch_ended(id, now);
    }

    pub fn backend(&self) -> PointerBackend {
        self.listener.backend()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn time(&self) -> f32 {
        self.clock.seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_advances_time_by_one_step() {
        let mut scene = Scene::new(800, 600, PointerBackend::Mouse);
        assert_eq!(scene.time(), 0.0);
        scene.advance_frame(Instant::now());
        assert_eq!(scene.time(), 0.05);
    }

    #[test]
    fn resize_updates_viewport_and_recomputes_projection_once() {
        let mut scene = Scene::new(800, 600, PointerBackend::Mouse);
        let revision = scene.camera().projection_revision();

        scene.resize(1024, 768);

        assert_eq!(scene.viewport().width(), 1024);
        assert_eq!(scene.viewport().height(), 768);
        assert_eq!(scene.camera().projection_revision(), revision + 1);
    }

    #[test]
    fn frame_writes_smoothed_pointer_into_uniforms() {
        let mut scene = Scene::new(800, 600, PointerBackend::Mouse);
        scene.pointer_moved(800.0, 600.0);

        let now = Instant::now();
        scene.advance_frame(now);

        // One smoothing step toward (1, 1) from the origin.
        let smoothed = scene.viewport().smoothed();
        assert!((smoothed[0] - 0.1).abs() < 1e-6);
        assert!((smoothed[1] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut scene = Scene::new(800, 600, PointerBackend::Mouse);
        let revision = scene.camera().projection_revision();
        scene.resize(0, 768);
        assert_eq!(scene.viewport().width(), 800);
        assert_eq!(scene.camera().projection_revision(), revision);
    }
}
