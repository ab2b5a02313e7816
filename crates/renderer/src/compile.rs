use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

/// Compiles the color field fragment shader.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("color bends fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(FRAGMENT_SHADER_GLSL),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Minimal full-screen triangle; `v_uv` has a bottom-left origin.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";

/// GPU twin of `field::shade`.
///
/// The uniform block layout must match `field::Uniforms`; the color array
/// length must match `bendconfig::MAX_COLORS`.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform ColorBendsParams {
    vec2 canvas;
    float time;
    float speed;
    vec2 rotation;
    int colorCount;
    int transparent;
    float scale;
    float frequency;
    float warpStrength;
    float mouseInfluence;
    vec2 pointer;
    float parallax;
    float noise;
    vec4 colors[8];
} ubo;

float bandIntensity(vec2 s, float index, float t) {
    float f = ubo.frequency;
    vec2 r = sin(1.5 * (s.yx * f) + 2.0 * cos(s * f));
    float m0 = length(r + vec2(sin(5.0 * r.y * f - 3.0 * t + index) / 4.0));
    float kBelow = clamp(ubo.warpStrength, 0.0, 1.0);
    float kMix = pow(kBelow, 0.3);
    float gain = 1.0 + max(ubo.warpStrength - 1.0, 0.0);
    vec2 disp = (r - s) * kBelow;
    vec2 warped = s + disp * gain;
    float m1 = length(warped + vec2(sin(5.0 * warped.y * f - 3.0 * t + index) / 4.0));
    float m = mix(m0, m1, kMix);
    return 1.0 - exp(-6.0 / exp(6.0 * m));
}

void main() {
    float t = ubo.time * ubo.speed;
    vec2 canvas = max(ubo.canvas, vec2(1.0));
    bool transparent = ubo.transparent > 0;

    vec2 p = v_uv * 2.0 - vec2(1.0);
    p += ubo.pointer * ubo.parallax * 0.1;
    vec2 rp = vec2(
        p.x * ubo.rotation.x - p.y * ubo.rotation.y,
        p.x * ubo.rotation.y + p.y * ubo.rotation.x
    );
    vec2 q = vec2(rp.x * (canvas.x / canvas.y), rp.y);
    q /= max(ubo.scale, 0.0001);
    q /= 0.5 + 0.2 * dot(q, q);
    q += vec2(0.2 * cos(t) - 7.56);
    vec2 toward = ubo.pointer - rp;
    q += toward * ubo.mouseInfluence * 0.2;

    vec3 col = vec3(0.0);
    float a = 1.0;
    int count = clamp(ubo.colorCount, 0, 8);
    vec2 s = q;

    if (count > 0) {
        vec3 sumCol = vec3(0.0);
        float cover = 0.0;
        for (int i = 0; i < 8; ++i) {
            if (i >= count) {
                break;
            }
            s -= vec2(0.01);
            float w = bandIntensity(s, float(i), t);
            sumCol += ubo.colors[i].rgb * w;
            cover = max(cover, w);
        }
        col = clamp(sumCol, vec3(0.0), vec3(1.0));
        if (transparent) {
            a = cover;
        }
    } else {
        s -= vec2(0.01);
        float r = bandIntensity(s, 0.0, t);
        s -= vec2(0.01);
        float g = bandIntensity(s, 1.0, t);
        s -= vec2(0.01);
        float b = bandIntensity(s, 2.0, t);
        col = vec3(r, g, b);
        if (transparent) {
            a = max(max(r, g), b);
        }
    }

    if (ubo.noise > 0.0001) {
        vec2 fragCoord = v_uv * canvas;
        float n = fract(sin(dot(fragCoord + vec2(ubo.time), vec2(12.9898, 78.233))) * 43758.5453123);
        col += vec3((n - 0.5) * ubo.noise);
        col = clamp(col, vec3(0.0), vec3(1.0));
    }

    if (transparent) {
        outColor = vec4(col * a, a);
    } else {
        outColor = vec4(col, a);
    }
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_color_array_matches_capacity() {
        let declaration = format!("vec4 colors[{}];", bendconfig::MAX_COLORS);
        assert!(FRAGMENT_SHADER_GLSL.contains(&declaration));
        let loop_bound = format!("i < {}", bendconfig::MAX_COLORS);
        assert!(FRAGMENT_SHADER_GLSL.contains(&loop_bound));
    }

    #[test]
    fn uniform_block_is_bound_at_set_zero() {
        assert!(FRAGMENT_SHADER_GLSL.contains("set = 0, binding = 0"));
        assert!(FRAGMENT_SHADER_GLSL.contains("} ubo;"));
        assert_eq!(std::mem::size_of::<field::Uniforms>() % 16, 0);
    }
}
