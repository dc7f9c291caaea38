//! Renderer crate for the bulge viewer.
//!
//! The module glues a winit window, a `wgpu` pipeline and a pointer-driven
//! distortion shader together. The overall flow is:
//!
//! ```text
//!   CLI / bulgeview
//!          │ RendererConfig
//!          ▼
//!   WindowRuntime::spawn ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          ▲                        │                     │
//!          │                 input events ─▶ Scene ─▶ uniform block ─▶ GPU UBO
//!          └── shutdown()
//! ```
//!
//! `Scene` owns the CPU side of the per-frame protocol (frame clock, pointer
//! smoothing, hover state machine, uniform block) and stays free of GPU
//! handles so the protocol runs under test. `GpuState` owns every GPU
//! resource: the surface, the plane pipeline, the uniform buffer and the
//! image texture, which starts as a 1x1 placeholder until an asynchronous
//! decode delivers the real pixels.

mod camera;
mod clock;
mod compile;
mod geometry;
mod gpu;
mod input;
mod scene;
mod tween;
mod types;
mod window;

pub use camera::{Mat4, OrthographicCamera};
pub use clock::FrameClock;
pub use geometry::{PlaneGeometry, Vertex};
pub use gpu::{DEFAULT_RADIUS, DEFAULT_STRENGTH, INTRO_FACTOR, INTRO_POINTER, MAX_PIXEL_SCALE};
pub use input::{
    is_touch_capable, HoverPhase, InputListener, PointerBackend, TouchPoint, TouchTracker,
    ViewportState, HOVER_TWEEN_DURATION,
};
pub use scene::{Scene, POINTER_SMOOTHING, TIME_STEP};
pub use tween::{AnimatedScalar, Easing};
pub use types::{Antialiasing, RendererConfig};
pub use window::WindowRuntime;
