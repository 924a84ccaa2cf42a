//! Configuration file management
//!
//! Loads TOML configuration files and provides render settings.
//! Default config path: ~/.config/glyphpen/config.toml

use crate::font::FontError;
use crate::render::{MissingGlyph, RenderOptions};
use crate::utils::color::{parse_hex_color_or, Rgb};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
    /// Output canvas settings
    pub canvas: CanvasConfig,
    /// Output file and text
    pub output: OutputConfig,
}

/// Missing glyph handling in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingGlyphMode {
    /// Fail the render
    #[default]
    Abort,
    /// Keep what was drawn and stop
    Stop,
    /// Draw `font.placeholder` instead
    Placeholder,
}

/// Font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family name or fontconfig pattern ("monospace", "Source Sans Pro")
    pub family: String,
    /// Pixel size
    pub size: u32,
    /// Coverage gamma (1.0 = unchanged, < 1.0 lighter, > 1.0 darker)
    pub gamma: f32,
    /// "abort" | "stop" | "placeholder"
    pub missing_glyph: MissingGlyphMode,
    /// Character drawn for missing glyphs when missing_glyph = "placeholder"
    pub placeholder: char,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Source Sans Pro".to_string(),
            size: 13,
            gamma: 1.0,
            missing_glyph: MissingGlyphMode::Abort,
            placeholder: '?',
        }
    }
}

/// Canvas settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Background color (RRGGBB)
    pub background: String,
    /// Text color (RRGGBB)
    pub foreground: String,
    /// Pen start column (pixels)
    pub origin_x: i32,
    /// Baseline row (pixels)
    pub baseline_y: i32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 100,
            background: "ffffff".to_string(),
            foreground: "000000".to_string(),
            origin_x: 0,
            baseline_y: 30,
        }
    }
}

impl CanvasConfig {
    pub fn background_rgb(&self) -> Rgb {
        parse_hex_color_or(&self.background, [255, 255, 255])
    }

    pub fn foreground_rgb(&self) -> Rgb {
        parse_hex_color_or(&self.foreground, [0, 0, 0])
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// PNG output path
    pub path: String,
    /// Text to render
    pub text: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output.png".to_string(),
            text: "db qp - The quick brown fox jumped over the lazy dog. Sniffle AWAY".to_string(),
        }
    }
}

impl Config {
    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = default_config_path() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => {
                        info!("Loaded config: {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Failed to load config {}: {:#}", path.display(), e);
                    }
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Render options for the configured gamma and missing glyph policy
    pub fn render_options(&self) -> std::result::Result<RenderOptions, FontError> {
        let missing_glyph = match self.font.missing_glyph {
            MissingGlyphMode::Abort => MissingGlyph::Abort,
            MissingGlyphMode::Stop => MissingGlyph::Stop,
            MissingGlyphMode::Placeholder => MissingGlyph::Placeholder(self.font.placeholder),
        };
        RenderOptions::new(self.font.gamma, missing_glyph)
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glyphpen").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r##"
            [font]
            family = "monospace"
            size = 12
            gamma = 1.8
            missing_glyph = "placeholder"
            placeholder = "#"

            [canvas]
            foreground = "ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.font.family, "monospace");
        assert_eq!(config.font.size, 12);
        assert_eq!(config.font.missing_glyph, MissingGlyphMode::Placeholder);
        // Unset fields keep their defaults
        assert_eq!(config.canvas.width, 600);
        assert_eq!(config.canvas.foreground_rgb(), [255, 0, 0]);
        assert_eq!(config.output.path, "output.png");

        let options = config.render_options().unwrap();
        assert_eq!(options.missing_glyph, MissingGlyph::Placeholder('#'));
        assert!((options.gamma.gamma() - 1.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.font.size, 13);
        assert_eq!(config.canvas.baseline_y, 30);
        assert_eq!(config.canvas.background_rgb(), [255, 255, 255]);
        let options = config.render_options().unwrap();
        assert_eq!(options.missing_glyph, MissingGlyph::Abort);
    }

    #[test]
    fn test_invalid_gamma_rejected() {
        let config: Config = toml::from_str("[font]\ngamma = -2.0\n").unwrap();
        assert!(matches!(
            config.render_options(),
            Err(FontError::InvalidGamma(_))
        ));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let config: Config = toml::from_str("[canvas]\nbackground = \"nope\"\n").unwrap();
        assert_eq!(config.canvas.background_rgb(), [255, 255, 255]);
    }

    #[test]
    fn test_unknown_missing_glyph_mode_fails() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[font]\nmissing_glyph = \"tofu\"\n");
        assert!(result.is_err());
    }
}
