//! glyphpen - text to pixels through FreeType
//!
//! Resolves a family name with fontconfig, loads every matching face for
//! fallback, shapes the string with the first face's OpenType tables,
//! rasterizes each glyph to a gamma-corrected A8 mask and composites it
//! onto a surface at the pen position.
//!
//! ```no_run
//! use glyphpen::drawing::Canvas;
//! use glyphpen::render::{RenderOptions, TextRenderer};
//!
//! let renderer = TextRenderer::new()?;
//! let mut canvas = Canvas::new(600, 100, [255, 255, 255]);
//! let options = RenderOptions::new(1.0, Default::default())?;
//! renderer.render(&mut canvas, 0, 30, "monospace", 13, "Sniffle AWAY", &options)?;
//! # Ok::<(), glyphpen::font::FontError>(())
//! ```

pub mod config;
pub mod drawing;
pub mod font;
pub mod render;
pub mod utils;
