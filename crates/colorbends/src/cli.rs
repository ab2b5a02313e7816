use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use bendconfig::Options;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "colorbends",
    author,
    version,
    about = "Animated color-band shader background",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one frame on the CPU and write it as a PNG.
    Still(StillArgs),
    /// Print the configuration file location.
    Where,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub bends: BendArgs,

    /// Logical window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "960x540")]
    pub size: String,

    /// Window title.
    #[arg(long, default_value = "ColorBends")]
    pub title: String,
}

#[derive(Parser, Debug)]
pub struct StillArgs {
    #[command(flatten)]
    pub bends: BendArgs,

    /// Elapsed time in seconds to evaluate.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,

    /// Output resolution in pixels.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "640x360")]
    pub size: String,

    /// Destination PNG path.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,
}

/// Appearance flags; each one overrides the matching configuration key.
#[derive(Args, Debug, Default)]
pub struct BendArgs {
    /// TOML configuration file (defaults to `config.toml` in the config directory).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore configuration files entirely.
    #[arg(long)]
    pub no_config: bool,

    /// Base rotation in degrees.
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub rotation: Option<f32>,

    /// Animation time scale.
    #[arg(long, allow_negative_numbers = true)]
    pub speed: Option<f32>,

    /// Band color as `#RGB` or `#RRGGBB`; repeat or comma-separate for up to 8.
    #[arg(long = "color", value_name = "HEX", value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Composite over the desktop with alpha (`true` by default).
    #[arg(long, value_name = "BOOL")]
    pub transparent: Option<bool>,

    /// Extra rotation in degrees per second.
    #[arg(long, value_name = "DEG_PER_SEC", allow_negative_numbers = true)]
    pub auto_rotate: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub scale: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub frequency: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub warp_strength: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub mouse_influence: Option<f32>,

    #[arg(long, allow_negative_numbers = true)]
    pub parallax: Option<f32>,

    /// Film grain amount in `[0, 1]`.
    #[arg(long)]
    pub noise: Option<f32>,
}

impl BendArgs {
    pub fn to_options(&self) -> Options {
        Options {
            rotation: self.rotation,
            speed: self.speed,
            colors: (!self.colors.is_empty()).then(|| self.colors.clone()),
            transparent: self.transparent,
            auto_rotate: self.auto_rotate,
            scale: self.scale,
            frequency: self.frequency,
            warp_strength: self.warp_strength,
            mouse_influence: self.mouse_influence,
            parallax: self.parallax,
            noise: self.noise,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses the `--size` value (`WIDTHxHEIGHT`, both non-zero).
pub fn parse_surface_size(value: &str) -> Result<(u32, u32)> {
    let (width, height) = value
        .trim()
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| anyhow!("--size '{value}' is not WIDTHxHEIGHT, e.g. 1280x720"))?;

    let parse_dimension = |raw: &str, axis: &str| -> Result<u32> {
        match raw.trim().parse::<u32>() {
            Ok(0) => bail!("--size {axis} must be greater than zero"),
            Ok(pixels) => Ok(pixels),
            Err(_) => bail!("--size {axis} '{}' is not a whole number of pixels", raw.trim()),
        }
    };

    Ok((parse_dimension(width, "width")?, parse_dimension(height, "height")?))
}
