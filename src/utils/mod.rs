//! Utility functions shared across glyphpen

pub mod color;

pub use color::{blend_mask, parse_hex_color, parse_hex_color_or, Rgb};
