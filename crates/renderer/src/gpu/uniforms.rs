use bytemuck::{Pod, Zeroable};

use crate::camera::Mat4;

/// Default bulge falloff radius in UV space.
pub const DEFAULT_RADIUS: f32 = 0.95;
/// Default bulge displacement strength.
pub const DEFAULT_STRENGTH: f32 = 1.1;
/// Resting pointer used while the intro reveal factor masks live input.
pub const INTRO_POINTER: [f32; 2] = [0.5, 0.0];
/// Constant reveal factor; 1.0 hands the distortion center to live input.
pub const INTRO_FACTOR: f32 = 1.0;

#[repr(C, align(8))]
#[derive(Clone, Copy)]
pub(crate) struct Std140Vec2 {
    value: [f32; 2],
}

unsafe impl Zeroable for Std140Vec2 {}
unsafe impl Pod for Std140Vec2 {}

impl Std140Vec2 {
    fn new(value: [f32; 2]) -> Self {
        Self { value }
    }
}

/// CPU mirror of the shader's std140 uniform block.
///
/// Field order and padding must match the GLSL `Params` block declared in
/// `compile.rs`; the layout test below pins the byte offsets.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct BulgeUniforms {
    pub view_proj: Mat4,
    pub resolution: Std140Vec2,
    pub texture_resolution: Std140Vec2,
    pub mouse: Std140Vec2,
    pub mouse_intro: Std140Vec2,
    pub time: f32,
    pub intro: f32,
    pub bulge: f32,
    pub radius: f32,
    pub strength: f32,
    pub _padding: [f32; 3],
}

unsafe impl Zeroable for BulgeUniforms {}
unsafe impl Pod for BulgeUniforms {}

impl BulgeUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            view_proj: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            resolution: Std140Vec2::new([width as f32, height as f32]),
            // Matches the 1x1 placeholder bound until the real image decode
            // lands; keeps the cover-fit math away from division by zero.
            texture_resolution: Std140Vec2::new([1.0, 1.0]),
            mouse: Std140Vec2::new([0.0, 0.0]),
            mouse_intro: Std140Vec2::new(INTRO_POINTER),
            time: 0.0,
            intro: INTRO_FACTOR,
            bulge: 0.0,
            radius: DEFAULT_RADIUS,
            strength: DEFAULT_STRENGTH,
            _padding: [0.0; 3],
        }
    }

    pub fn set_view_proj(&mut self, matrix: &Mat4) {
        self.view_proj = *matrix;
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = Std140Vec2::new([width, height]);
    }

    pub fn set_texture_resolution(&mut self, width: f32, height: f32) {
        self.texture_resolution = Std140Vec2::new([width, height]);
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    pub fn set_mouse(&mut self, mouse: [f32; 2]) {
        self.mouse = Std140Vec2::new(mouse);
    }

    pub fn set_bulge(&mut self, bulge: f32) {
        self.bulge = bulge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    /// Sanity-checks that the CPU mirror of the uniform block matches the
    /// std140 layout baked into the GLSL source.
    #[test]
    fn bulge_uniforms_follow_std140_layout() {
        let uniforms = BulgeUniforms::new(800, 600);
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<BulgeUniforms>(), 16);
        assert_eq!(size_of::<BulgeUniforms>(), 128);
        assert_eq!((&uniforms.view_proj as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.resolution as *const _ as usize) - base, 64);
        assert_eq!(
            (&uniforms.texture_resolution as *const _ as usize) - base,
            72
        );
        assert_eq!((&uniforms.mouse as *const _ as usize) - base, 80);
        assert_eq!((&uniforms.mouse_intro as *const _ as usize) - base, 88);
        assert_eq!((&uniforms.time as *const _ as usize) - base, 96);
        assert_eq!((&uniforms.intro as *const _ as usize) - base, 100);
        assert_eq!((&uniforms.bulge as *const _ as usize) - base, 104);
        assert_eq!((&uniforms.radius as *const _ as usize) - base, 108);
        assert_eq!((&uniforms.strength as *const _ as usize) - base, 112);
    }

    #[test]
    fn defaults_match_effect_constants() {
        let uniforms = BulgeUniforms::new(800, 600);
        assert_eq!(uniforms.radius, 0.95);
        assert_eq!(uniforms.strength, 1.1);
        assert_eq!(uniforms.bulge, 0.0);
    }
}
