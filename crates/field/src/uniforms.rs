use bendconfig::{Config, MAX_COLORS};
use bytemuck::{Pod, Zeroable};

/// Per-frame parameter block consumed by the color field.
///
/// The layout mirrors the `ColorBendsParams` std140 block in the fragment
/// shader: scalars are packed into 16-byte rows and colors use a vec4 stride.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub canvas: [f32; 2],
    pub time: f32,
    pub speed: f32,
    pub rotation: [f32; 2],
    pub color_count: i32,
    pub transparent: i32,
    pub scale: f32,
    pub frequency: f32,
    pub warp_strength: f32,
    pub mouse_influence: f32,
    pub pointer: [f32; 2],
    pub parallax: f32,
    pub noise: f32,
    pub colors: [[f32; 4]; MAX_COLORS],
}

impl Uniforms {
    /// Builds the initial block at `t = 0` with the pointer at the origin.
    pub fn from_config(config: &Config, width: u32, height: u32) -> Self {
        let mut colors = [[0.0; 4]; MAX_COLORS];
        for (slot, color) in colors.iter_mut().zip(config.colors.slots()) {
            let [r, g, b] = color.to_array();
            *slot = [r, g, b, 0.0];
        }

        let mut uniforms = Self {
            canvas: [1.0, 1.0],
            time: 0.0,
            speed: config.speed,
            rotation: rotation_vector(config.rotation, config.auto_rotate, 0.0),
            color_count: config.colors.len() as i32,
            transparent: i32::from(config.transparent),
            scale: config.scale,
            frequency: config.frequency,
            warp_strength: config.warp_strength,
            mouse_influence: config.mouse_influence,
            pointer: [0.0, 0.0],
            parallax: config.parallax,
            noise: config.noise,
            colors,
        };
        uniforms.set_canvas(width, height);
        uniforms
    }

    /// Canvas dimensions are floored at one pixel so aspect math never divides by zero.
    pub fn set_canvas(&mut self, width: u32, height: u32) {
        self.canvas = [width.max(1) as f32, height.max(1) as f32];
    }

    pub fn set_rotation(&mut self, rotation: [f32; 2]) {
        self.rotation = rotation;
    }

    pub fn set_pointer(&mut self, pointer: [f32; 2]) {
        self.pointer = pointer;
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent > 0
    }

    /// Number of color bands actually evaluated, clamped to the slot capacity.
    pub fn active_colors(&self) -> usize {
        self.color_count.clamp(0, MAX_COLORS as i32) as usize
    }

    pub fn color(&self, index: usize) -> [f32; 3] {
        let [r, g, b, _] = self.colors[index];
        [r, g, b]
    }
}

/// Converts `(rotation mod 360) + auto_rotate * elapsed` degrees to `(cos, sin)`.
pub fn rotation_vector(rotation: f32, auto_rotate: f32, elapsed: f32) -> [f32; 2] {
    let degrees = (rotation % 360.0) + auto_rotate * elapsed;
    let radians = degrees.to_radians();
    [radians.cos(), radians.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bendconfig::Options;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 192);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
        assert_eq!(std::mem::offset_of!(Uniforms, scale), 32);
        assert_eq!(std::mem::offset_of!(Uniforms, pointer), 48);
        assert_eq!(std::mem::offset_of!(Uniforms, colors), 64);
    }

    #[test]
    fn zero_canvas_is_floored_to_one() {
        let mut uniforms = Uniforms::from_config(&Config::default(), 0, 0);
        assert_eq!(uniforms.canvas, [1.0, 1.0]);
        uniforms.set_canvas(640, 0);
        assert_eq!(uniforms.canvas, [640.0, 1.0]);
    }

    #[test]
    fn colors_fill_slots_and_zero_the_rest() {
        let config = Options {
            colors: Some(vec!["#ff0000".into(), "#00ff00".into()]),
            transparent: Some(false),
            ..Options::default()
        }
        .resolve()
        .unwrap();
        let uniforms = Uniforms::from_config(&config, 800, 600);
        assert_eq!(uniforms.color_count, 2);
        assert_eq!(uniforms.transparent, 0);
        assert_eq!(uniforms.color(0), [1.0, 0.0, 0.0]);
        assert_eq!(uniforms.color(1), [0.0, 1.0, 0.0]);
        assert!(uniforms.colors[2..].iter().all(|slot| *slot == [0.0; 4]));
    }

    #[test]
    fn active_colors_never_exceeds_capacity() {
        let mut uniforms = Uniforms::from_config(&Config::default(), 1, 1);
        uniforms.color_count = 9;
        assert_eq!(uniforms.active_colors(), MAX_COLORS);
        uniforms.color_count = -3;
        assert_eq!(uniforms.active_colors(), 0);
    }

    #[test]
    fn rotation_wraps_base_angle_and_adds_auto_rotation() {
        let [c, s] = rotation_vector(450.0, 0.0, 10.0);
        assert!(c.abs() < 1e-6);
        assert!((s - 1.0).abs() < 1e-6);

        let [c, s] = rotation_vector(0.0, 90.0, 2.0);
        assert!((c + 1.0).abs() < 1e-6);
        assert!(s.abs() < 1e-5);

        let [c, s] = rotation_vector(45.0, 0.0, 0.0);
        assert!((c * c + s * s - 1.0).abs() < 1e-6);
    }
}
