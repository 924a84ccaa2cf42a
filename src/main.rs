//! glyphpen - render a string to PNG through FreeType
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  fontconfig  →  FreeType faces (fallback)│
//! │                          ↓               │
//! │  rustybuzz (liga, kern)  →  pen deltas   │
//! │                          ↓               │
//! │  glyph coverage  →  gamma  →  A8 mask    │
//! │                          ↓               │
//! │              RGB canvas  →  PNG          │
//! └──────────────────────────────────────────┘
//! ```

use anyhow::{anyhow, Context, Result};
use glyphpen::config::{self, Config};
use glyphpen::drawing::Canvas;
use glyphpen::render::{render_string, RenderStatus, TextRenderer};
use log::{info, warn};
use std::path::Path;

fn print_help() {
    println!(
        r#"glyphpen {} - render text with FreeType and fontconfig fallback

USAGE:
    glyphpen [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -c, --config <PATH>     Read settings from PATH
    --init-config           Write the default config file
    --family <NAME>         Font family or fontconfig pattern
    --size <PX>             Pixel size
    --gamma <G>             Coverage gamma (1.0 = unchanged)
    --text <TEXT>           Text to render
    -o, --output <PATH>     PNG output path

CONFIG FILE:
    ~/.config/glyphpen/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Value of `--name VALUE` or `--name=VALUE`
fn arg_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    for (i, arg) in args.iter().enumerate() {
        for name in names {
            if arg == name {
                return args.get(i + 1).map(String::as_str);
            }
            if let Some(value) = arg
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
            {
                return Some(value);
            }
        }
    }
    None
}

/// Write the default config to the user config path
fn init_config() -> Result<()> {
    let path = config::default_config_path().ok_or_else(|| anyhow!("No config directory"))?;
    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(&Config::default()).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    println!("Config written: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphpen {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        return init_config();
    }

    let mut config = match arg_value(&args, &["--config", "-c"]) {
        Some(path) => Config::load_from_file(Path::new(path))?,
        None => Config::load(),
    };

    if let Some(family) = arg_value(&args, &["--family"]) {
        config.font.family = family.to_string();
    }
    if let Some(size) = arg_value(&args, &["--size"]) {
        config.font.size = size
            .parse()
            .with_context(|| format!("Invalid --size: {}", size))?;
    }
    if let Some(gamma) = arg_value(&args, &["--gamma"]) {
        config.font.gamma = gamma
            .parse()
            .with_context(|| format!("Invalid --gamma: {}", gamma))?;
    }
    if let Some(text) = arg_value(&args, &["--text"]) {
        config.output.text = text.to_string();
    }
    if let Some(output) = arg_value(&args, &["--output", "-o"]) {
        config.output.path = output.to_string();
    }

    let options = config.render_options()?;

    let renderer = TextRenderer::new()?;
    let mut font = renderer
        .load_font(&config.font.family, config.font.size)
        .with_context(|| {
            format!(
                "Failed to load font \"{}\" at {}px",
                config.font.family, config.font.size
            )
        })?;

    info!(
        "Font metrics: ascent={} descent={} line_height={} space={}",
        font.ascent(),
        font.descent(),
        font.line_height(),
        font.space_width()
    );

    let canvas_config = &config.canvas;
    let mut canvas = Canvas::new(
        canvas_config.width,
        canvas_config.height,
        canvas_config.background_rgb(),
    );
    canvas.set_source(canvas_config.foreground_rgb());
    info!(
        "Canvas {}x{}, pen at ({}, {})",
        canvas.width(),
        canvas.height(),
        canvas_config.origin_x,
        canvas_config.baseline_y
    );

    let report = render_string(
        &mut canvas,
        canvas_config.origin_x,
        canvas_config.baseline_y,
        &mut font,
        &config.output.text,
        &options,
    )?;

    if let RenderStatus::Partial {
        byte_offset,
        missing,
    } = report.status
    {
        warn!(
            "Render incomplete: no glyph for {:?} at byte {} ({} glyphs drawn)",
            missing, byte_offset, report.glyphs_composited
        );
    }

    canvas.write_png(Path::new(&config.output.path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arg_value_forms() {
        let a = args(&["glyphpen", "--size", "12", "--family=Monospace", "-o", "x.png"]);
        assert_eq!(arg_value(&a, &["--size"]), Some("12"));
        assert_eq!(arg_value(&a, &["--family"]), Some("Monospace"));
        assert_eq!(arg_value(&a, &["--output", "-o"]), Some("x.png"));
        assert_eq!(arg_value(&a, &["--gamma"]), None);
    }

    #[test]
    fn test_arg_value_missing_value() {
        let a = args(&["glyphpen", "--text"]);
        assert_eq!(arg_value(&a, &["--text"]), None);
    }
}
