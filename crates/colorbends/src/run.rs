use anyhow::{anyhow, Context, Result};
use bendconfig::{Config, Options};
use field::{render_rgba8, rotation_vector, Uniforms};
use renderer::WindowOptions;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, BendArgs, RunArgs, StillArgs};
use crate::paths::AppPaths;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run_window(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args.bends)?;
    let size = parse_surface_size(&args.size)?;
    renderer::run_window(WindowOptions {
        title: args.title,
        size,
        config,
    })
}

/// Evaluates the field on the CPU at `--time` and writes a straight-alpha PNG.
pub fn render_still(args: StillArgs) -> Result<()> {
    let config = resolve_config(&args.bends)?;
    let (width, height) = parse_surface_size(&args.size)?;
    if !args.time.is_finite() || args.time < 0.0 {
        anyhow::bail!("--time must be a non-negative number of seconds");
    }

    let uniforms = still_uniforms(&config, width, height, args.time);
    let pixels = render_rgba8(&uniforms, width, height);
    let image = image::RgbaImage::from_raw(width, height, pixels)
        .ok_or_else(|| anyhow!("rendered buffer does not match {width}x{height}"))?;
    image
        .save_with_format(&args.output, image::ImageFormat::Png)
        .with_context(|| format!("failed to write still frame to {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        width,
        height,
        time = args.time,
        "wrote still frame"
    );
    Ok(())
}

pub fn print_paths() -> Result<()> {
    let paths = AppPaths::discover()?;
    println!("Configuration directory: {}", paths.config_dir().display());
    println!("Configuration file:      {}", paths.config_file().display());
    Ok(())
}

fn still_uniforms(config: &Config, width: u32, height: u32, time: f32) -> Uniforms {
    let mut uniforms = Uniforms::from_config(config, width, height);
    uniforms.set_time(time);
    uniforms.set_rotation(rotation_vector(config.rotation, config.auto_rotate, time));
    uniforms
}

/// File options (explicit `--config` or the discovered default) overlaid with CLI flags.
fn resolve_config(args: &BendArgs) -> Result<Config> {
    let base = if args.no_config {
        Options::default()
    } else {
        load_file_options(args)?
    };
    Ok(base.merge(args.to_options()).resolve()?)
}

fn load_file_options(args: &BendArgs) -> Result<Options> {
    if let Some(path) = &args.config {
        info!(path = %path.display(), "loading configuration");
        return Ok(Options::load(path)?);
    }

    let path = AppPaths::discover()?.config_file();
    if !path.is_file() {
        debug!(path = %path.display(), "no configuration file; using defaults");
        return Ok(Options::default());
    }
    info!(path = %path.display(), "loading configuration");
    Ok(Options::load(&path)?)
}
