//! Destination surfaces for glyph masks
//!
//! The compositor only needs one operation from a surface: blend an A8
//! mask at a pixel offset with the surface's current source color.

pub mod canvas;

pub use canvas::{Canvas, MaskSurface};
