//! Configuration for the ColorBends background.
//!
//! [`Options`] is what callers hand in (TOML file, CLI flags, code); every
//! field is optional. [`Options::resolve`] applies the documented defaults and
//! validates the color list, producing an immutable [`Config`].

mod color;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use color::{parse_color, Color, ColorList, MAX_COLORS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },
}

impl ConfigError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "io",
            ConfigError::Parse(_) => "parse",
            ConfigError::InvalidColor { .. } => "invalid-color",
        }
    }
}

pub const DEFAULT_ROTATION: f32 = 45.0;
pub const DEFAULT_SPEED: f32 = 0.2;
pub const DEFAULT_TRANSPARENT: bool = true;
pub const DEFAULT_AUTO_ROTATE: f32 = 0.0;
pub const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_FREQUENCY: f32 = 1.0;
pub const DEFAULT_WARP_STRENGTH: f32 = 1.0;
pub const DEFAULT_MOUSE_INFLUENCE: f32 = 1.0;
pub const DEFAULT_PARALLAX: f32 = 0.5;
pub const DEFAULT_NOISE: f32 = 0.1;

/// Caller-supplied options; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Base rotation in degrees.
    pub rotation: Option<f32>,
    /// Time scale applied to the animation.
    pub speed: Option<f32>,
    /// Hex color strings (`#RGB` or `#RRGGBB`).
    pub colors: Option<Vec<String>>,
    pub transparent: Option<bool>,
    /// Additional rotation in degrees per second.
    #[serde(alias = "autoRotate")]
    pub auto_rotate: Option<f32>,
    pub scale: Option<f32>,
    pub frequency: Option<f32>,
    #[serde(alias = "warpStrength")]
    pub warp_strength: Option<f32>,
    #[serde(alias = "mouseInfluence")]
    pub mouse_influence: Option<f32>,
    pub parallax: Option<f32>,
    /// Grain amount in `[0, 1]`.
    pub noise: Option<f32>,
}

impl Options {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Layers `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: Options) -> Options {
        Options {
            rotation: overrides.rotation.or(self.rotation),
            speed: overrides.speed.or(self.speed),
            colors: overrides.colors.or(self.colors),
            transparent: overrides.transparent.or(self.transparent),
            auto_rotate: overrides.auto_rotate.or(self.auto_rotate),
            scale: overrides.scale.or(self.scale),
            frequency: overrides.frequency.or(self.frequency),
            warp_strength: overrides.warp_strength.or(self.warp_strength),
            mouse_influence: overrides.mouse_influence.or(self.mouse_influence),
            parallax: overrides.parallax.or(self.parallax),
            noise: overrides.noise.or(self.noise),
        }
    }

    /// Applies defaults and validates colors.
    ///
    /// Only unset fields take defaults; explicit values (including zero or
    /// negative numbers) are kept and clamped where the field is consumed.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let colors = match &self.colors {
            Some(entries) => ColorList::parse(entries)?,
            None => ColorList::new(),
        };

        Ok(Config {
            rotation: self.rotation.unwrap_or(DEFAULT_ROTATION),
            speed: self.speed.unwrap_or(DEFAULT_SPEED),
            colors,
            transparent: self.transparent.unwrap_or(DEFAULT_TRANSPARENT),
            auto_rotate: self.auto_rotate.unwrap_or(DEFAULT_AUTO_ROTATE),
            scale: self.scale.unwrap_or(DEFAULT_SCALE),
            frequency: self.frequency.unwrap_or(DEFAULT_FREQUENCY),
            warp_strength: self.warp_strength.unwrap_or(DEFAULT_WARP_STRENGTH),
            mouse_influence: self.mouse_influence.unwrap_or(DEFAULT_MOUSE_INFLUENCE),
            parallax: self.parallax.unwrap_or(DEFAULT_PARALLAX),
            noise: self.noise.unwrap_or(DEFAULT_NOISE),
        })
    }
}

/// Fully resolved configuration, read once at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rotation: f32,
    pub speed: f32,
    pub colors: ColorList,
    pub transparent: bool,
    pub auto_rotate: f32,
    pub scale: f32,
    pub frequency: f32,
    pub warp_strength: f32,
    pub mouse_influence: f32,
    pub parallax: f32,
    pub noise: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rotation: DEFAULT_ROTATION,
            speed: DEFAULT_SPEED,
            colors: ColorList::new(),
            transparent: DEFAULT_TRANSPARENT,
            auto_rotate: DEFAULT_AUTO_ROTATE,
            scale: DEFAULT_SCALE,
            frequency: DEFAULT_FREQUENCY,
            warp_strength: DEFAULT_WARP_STRENGTH,
            mouse_influence: DEFAULT_MOUSE_INFLUENCE,
            parallax: DEFAULT_PARALLAX,
            noise: DEFAULT_NOISE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_resolve_to_defaults() {
        let config = Options::default().resolve().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rotation, 45.0);
        assert_eq!(config.speed, 0.2);
        assert!(config.transparent);
        assert_eq!(config.parallax, 0.5);
        assert_eq!(config.noise, 0.1);
        assert!(config.colors.is_empty());
    }

    #[test]
    fn explicit_zero_is_not_replaced_by_default() {
        let options = Options {
            scale: Some(0.0),
            noise: Some(0.0),
            rotation: Some(0.0),
            ..Options::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.scale, 0.0);
        assert_eq!(config.noise, 0.0);
        assert_eq!(config.rotation, 0.0);
    }

    #[test]
    fn parses_toml_with_camel_case_aliases() {
        let options = Options::from_toml_str(
            r##"
            rotation = 99
            speed = 0.18
            colors = ["#ff0000", "#0f0"]
            autoRotate = 5.0
            warp_strength = 1.5
            mouseInfluence = 0.25
            transparent = false
            "##,
        )
        .unwrap();
        let config = options.resolve().unwrap();
        assert_eq!(config.rotation, 99.0);
        assert_eq!(config.speed, 0.18);
        assert_eq!(config.auto_rotate, 5.0);
        assert_eq!(config.warp_strength, 1.5);
        assert_eq!(config.mouse_influence, 0.25);
        assert!(!config.transparent);
        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.colors.as_slice()[1].to_bytes(), [0, 255, 0]);
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = Options::from_toml_str("colour = \"#fff\"").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn malformed_color_rejects_whole_configuration() {
        let options = Options {
            colors: Some(vec!["#ff0000".into(), "#xyz".into()]),
            ..Options::default()
        };
        let err = options.resolve().unwrap_err();
        assert_eq!(err.kind(), "invalid-color");
        assert!(err.to_string().contains("#xyz"));
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = Options {
            rotation: Some(10.0),
            speed: Some(1.0),
            colors: Some(vec!["#fff".into()]),
            ..Options::default()
        };
        let overrides = Options {
            speed: Some(2.0),
            noise: Some(0.0),
            ..Options::default()
        };
        let merged = base.merge(overrides);
        assert_eq!(merged.rotation, Some(10.0));
        assert_eq!(merged.speed, Some(2.0));
        assert_eq!(merged.noise, Some(0.0));
        assert_eq!(merged.colors, Some(vec!["#fff".to_string()]));
    }

    #[test]
    fn load_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Options::load(&dir.path().join("missing.toml")).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "noise = 0.3\nparallax = 0.0\n").unwrap();
        let options = Options::load(&path).unwrap();
        assert_eq!(options.noise, Some(0.3));
        assert_eq!(options.parallax, Some(0.0));
    }
}
