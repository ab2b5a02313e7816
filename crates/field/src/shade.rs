//! CPU evaluation of the ColorBends field.
//!
//! This is the same math the fragment shader runs, written out with `glam`
//! vectors. It is a pure function of `(Uniforms, fragment coordinate)`, which
//! makes it the reference for tests and for still-frame rendering.

use bendconfig::MAX_COLORS;
use glam::{FloatExt, Vec2};

use crate::uniforms::Uniforms;

const SCALE_EPSILON: f32 = 0.0001;
const NOISE_THRESHOLD: f32 = 0.0001;
const FIELD_OFFSET: f32 = 7.56;
const BAND_STEP: f32 = 0.01;

/// Distance metrics and resulting intensity for one color band.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BandSample {
    unwarped: f32,
    blended: f32,
    intensity: f32,
}

/// GLSL `fract`: `x - floor(x)`, always in `[0, 1)` for finite input.
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Steep falloff from distance to intensity, bounded in `[0, 1)`.
pub fn glow(metric: f32) -> f32 {
    1.0 - (-6.0 / (6.0 * metric).exp()).exp()
}

fn band(s: Vec2, index: f32, t: f32, frequency: f32, warp_strength: f32) -> BandSample {
    let r = Vec2::new(
        (1.5 * (s.y * frequency) + 2.0 * (s.x * frequency).cos()).sin(),
        (1.5 * (s.x * frequency) + 2.0 * (s.y * frequency).cos()).sin(),
    );
    let phase = |point: Vec2| Vec2::splat((5.0 * point.y * frequency - 3.0 * t + index).sin() / 4.0);
    let unwarped = (r + phase(r)).length();

    let k_below = warp_strength.clamp(0.0, 1.0);
    let k_mix = k_below.powf(0.3);
    let gain = 1.0 + (warp_strength - 1.0).max(0.0);
    let displacement = (r - s) * k_below;
    let warped_point = s + displacement * gain;
    let warped = (warped_point + phase(warped_point)).length();

    let blended = FloatExt::lerp(unwarped, warped, k_mix);
    BandSample {
        unwarped,
        blended,
        intensity: glow(blended),
    }
}

/// Maps a fragment coordinate (pixels, bottom-left origin) into band space.
fn field_point(uniforms: &Uniforms, frag_coord: Vec2) -> Vec2 {
    let canvas = Vec2::from_array(uniforms.canvas).max(Vec2::ONE);
    let t = uniforms.time * uniforms.speed;
    let pointer = Vec2::from_array(uniforms.pointer);
    let [cos, sin] = uniforms.rotation;

    let uv = frag_coord / canvas;
    let p = uv * 2.0 - Vec2::ONE + pointer * (uniforms.parallax * 0.1);
    let rotated = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);

    let mut q = Vec2::new(rotated.x * (canvas.x / canvas.y), rotated.y);
    q /= uniforms.scale.max(SCALE_EPSILON);
    q /= 0.5 + 0.2 * q.dot(q);
    q += Vec2::splat(0.2 * t.cos() - FIELD_OFFSET);
    let toward = pointer - rotated;
    q + toward * (uniforms.mouse_influence * 0.2)
}

/// Walks the bands at a fragment: one per configured color, or three for
/// the RGB fallback when no colors are configured.
fn band_samples(uniforms: &Uniforms, frag_coord: Vec2) -> impl Iterator<Item = BandSample> {
    let count = match uniforms.active_colors() {
        0 => 3,
        n => n.min(MAX_COLORS),
    };
    let t = uniforms.time * uniforms.speed;
    let frequency = uniforms.frequency;
    let warp_strength = uniforms.warp_strength;
    let mut s = field_point(uniforms, frag_coord);
    (0..count).map(move |index| {
        s -= Vec2::splat(BAND_STEP);
        band(s, index as f32, t, frequency, warp_strength)
    })
}

/// Evaluates the field at `frag_coord`, returning RGBA.
///
/// RGB is premultiplied by alpha when the uniforms request transparency.
pub fn shade(uniforms: &Uniforms, frag_coord: [f32; 2]) -> [f32; 4] {
    let frag_coord = Vec2::from_array(frag_coord);
    let transparent = uniforms.is_transparent();
    let mut col = [0.0_f32; 3];
    let alpha;

    if uniforms.active_colors() > 0 {
        let mut sum = [0.0_f32; 3];
        let mut cover = 0.0_f32;
        for (index, band) in band_samples(uniforms, frag_coord).enumerate() {
            let w = band.intensity;
            for (total, channel) in sum.iter_mut().zip(uniforms.color(index)) {
                *total += channel * w;
            }
            cover = cover.max(w);
        }
        for (out, total) in col.iter_mut().zip(sum) {
            *out = total.clamp(0.0, 1.0);
        }
        alpha = if transparent { cover } else { 1.0 };
    } else {
        for (channel, band) in col.iter_mut().zip(band_samples(uniforms, frag_coord)) {
            *channel = band.intensity;
        }
        alpha = if transparent {
            col[0].max(col[1]).max(col[2])
        } else {
            1.0
        };
    }

    if uniforms.noise > NOISE_THRESHOLD {
        let jitter = frag_coord + Vec2::splat(uniforms.time);
        let n = fract(jitter.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.547);
        for channel in &mut col {
            *channel = (*channel + (n - 0.5) * uniforms.noise).clamp(0.0, 1.0);
        }
    }

    if transparent {
        [col[0] * alpha, col[1] * alpha, col[2] * alpha, alpha]
    } else {
        [col[0], col[1], col[2], alpha]
    }
}
