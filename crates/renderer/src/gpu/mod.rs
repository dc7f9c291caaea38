//! GPU plumbing for the distortion plane.
//!
//! `context` owns the wgpu surface/device, `pipeline` the render pipeline and
//! plane buffers, `texture` the async image decode, `uniforms` the std140
//! mirror of the shader block, and `state` glues them into the per-frame
//! draw.

pub(crate) mod context;
pub(crate) mod pipeline;
pub(crate) mod state;
pub(crate) mod texture;
pub(crate) mod uniforms;

pub use context::MAX_PIXEL_SCALE;
pub use uniforms::{DEFAULT_RADIUS, DEFAULT_STRENGTH, INTRO_FACTOR, INTRO_POINTER};
