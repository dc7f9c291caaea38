use std::borrow::Cow;

use anyhow::Result;
use wgpu::naga::ShaderStage;

/// Compiles the plane's vertex stage.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("plane vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    }))
}

/// Compiles the bulge-distortion fragment stage.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("bulge fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    }))
}

// Both stages declare the same std140 `Params` block; its layout must match
// `BulgeUniforms` in `gpu/uniforms.rs`.

/// Vertex stage: transforms the unit plane through the orthographic camera
/// and hands the interpolators its top-down UVs.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
layout(location = 0) out vec2 v_uv;

layout(std140, set = 0, binding = 0) uniform Params {
    mat4 uViewProj;
    vec2 uResolution;
    vec2 uTextureResolution;
    vec2 uMouse;
    vec2 uMouseIntro;
    float uTime;
    float uIntro;
    float uBulge;
    float uRadius;
    float uStrength;
} ubo;

void main() {
    v_uv = a_uv;
    gl_Position = ubo.uViewProj * vec4(a_position, 1.0);
}
";

/// Fragment stage: displaces UVs toward the pointer (scaled by radius and
/// strength), cover-fits the image against the surface, and samples it.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform Params {
    mat4 uViewProj;
    vec2 uResolution;
    vec2 uTextureResolution;
    vec2 uMouse;
    vec2 uMouseIntro;
    float uTime;
    float uIntro;
    float uBulge;
    float uRadius;
    float uStrength;
} ubo;

layout(set = 1, binding = 0) uniform texture2D uTexture;
layout(set = 1, binding = 1) uniform sampler uTextureSampler;

// background-size: cover against the surface/texture aspect ratios.
vec2 coverUv(vec2 uv) {
    float surfaceRatio = ubo.uResolution.x / ubo.uResolution.y;
    float imageRatio = ubo.uTextureResolution.x / ubo.uTextureResolution.y;
    vec2 ratio = vec2(
        min(surfaceRatio / imageRatio, 1.0),
        min(imageRatio / surfaceRatio, 1.0)
    );
    return vec2(
        uv.x * ratio.x + (1.0 - ratio.x) * 0.5,
        uv.y * ratio.y + (1.0 - ratio.y) * 0.5
    );
}

// Magnifies UVs around `center`; uBulge blends the effect in and out.
vec2 bulge(vec2 uv, vec2 center) {
    uv -= center;
    float dist = length(uv) / ubo.uRadius;
    float strengthAmount = ubo.uStrength / (1.0 + pow(dist, 4.0));
    uv *= (1.0 - ubo.uBulge) + ubo.uBulge * strengthAmount;
    uv += center;
    return uv;
}

void main() {
    vec2 center = mix(ubo.uMouseIntro, ubo.uMouse, ubo.uIntro);
    vec2 distorted = bulge(v_uv, center);
    outColor = texture(sampler2D(uTexture, uTextureSampler), coverUv(distorted));
}
";

#[cfg(test)]
mod tests {
    use super::*;

    /// The uniform names are the host/shader contract; both stages must
    /// declare the exact block the CPU mirror is laid out against.
    #[test]
    fn stages_declare_the_uniform_contract() {
        for source in [VERTEX_SHADER_GLSL, FRAGMENT_SHADER_GLSL] {
            for name in [
                "uViewProj",
                "uResolution",
                "uTextureResolution",
                "uMouse",
                "uMouseIntro",
                "uTime",
                "uIntro",
                "uBulge",
                "uRadius",
                "uStrength",
            ] {
                assert!(source.contains(name), "missing uniform {name}");
            }
            assert!(source.contains("layout(std140, set = 0, binding = 0) uniform Params"));
        }
        assert!(FRAGMENT_SHADER_GLSL.contains("uTexture"));
    }
}
