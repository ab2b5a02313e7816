use crate::shade::shade;
use crate::uniforms::Uniforms;

/// Rasterizes the field into top-down, straight-alpha RGBA8 rows.
///
/// Each pixel is sampled at its centre; row 0 is the top of the image, so the
/// bottom-left-origin fragment coordinate is flipped here.
pub fn render_rgba8(uniforms: &Uniforms, width: u32, height: u32) -> Vec<u8> {
    let width = width.max(1);
    let height = height.max(1);
    let mut frame = *uniforms;
    frame.set_canvas(width, height);

    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for row in 0..height {
        let y = (height - row) as f32 - 0.5;
        for column in 0..width {
            let x = column as f32 + 0.5;
            pixels.extend_from_slice(&encode_straight(shade(&frame, [x, y])));
        }
    }
    pixels
}

/// Converts a premultiplied sample to straight-alpha 8-bit channels.
fn encode_straight([r, g, b, a]: [f32; 4]) -> [u8; 4] {
    let quantize = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    if a <= f32::EPSILON {
        return [0, 0, 0, 0];
    }
    let unpremultiply = |value: f32| if a >= 1.0 { value } else { value / a };
    [
        quantize(unpremultiply(r)),
        quantize(unpremultiply(g)),
        quantize(unpremultiply(b)),
        quantize(a),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendconfig::Options;

    #[test]
    fn produces_one_rgba_quad_per_pixel() {
        let config = Options::default().resolve().unwrap();
        let uniforms = Uniforms::from_config(&config, 1, 1);
        let pixels = render_rgba8(&uniforms, 7, 5);
        assert_eq!(pixels.len(), 7 * 5 * 4);
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = Options {
            colors: Some(vec!["#f0a".into(), "#0af".into()]),
            ..Options::default()
        }
        .resolve()
        .unwrap();
        let mut uniforms = Uniforms::from_config(&config, 1, 1);
        uniforms.set_time(4.0);
        assert_eq!(render_rgba8(&uniforms, 16, 9), render_rgba8(&uniforms, 16, 9));
    }

    #[test]
    fn straight_alpha_undoes_premultiplication() {
        assert_eq!(encode_straight([0.25, 0.0, 0.5, 0.5]), [128, 0, 255, 128]);
        assert_eq!(encode_straight([0.3, 0.3, 0.3, 0.0]), [0, 0, 0, 0]);
        assert_eq!(encode_straight([1.0, 0.5, 0.0, 1.0]), [255, 128, 0, 255]);
    }
}
