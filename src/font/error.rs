//! Font pipeline errors

use thiserror::Error;

/// Errors surfaced by the font-to-raster pipeline
///
/// Per-path load failures and missing shaping tables are not errors:
/// they are logged and the candidate is skipped.
#[derive(Debug, Error)]
pub enum FontError {
    /// fontconfig could not be used or returned nothing for the request
    #[error("font resolution failed for \"{family}\" at {size}px: {reason}")]
    Resolution {
        family: String,
        size: u32,
        reason: String,
    },

    /// Every candidate path failed to open as a face
    #[error("no usable font face for \"{family}\" at {size}px")]
    NoUsableFace { family: String, size: u32 },

    /// No loaded face has a glyph for this character
    #[error("no glyph for character {ch:?} at byte {byte_offset}")]
    GlyphNotFound { ch: char, byte_offset: usize },

    /// FreeType library initialization failed
    #[error("FreeType initialization failed: {0}")]
    LibraryInit(String),

    /// Gamma must be finite and positive
    #[error("invalid gamma {0} (must be finite and > 0)")]
    InvalidGamma(f32),
}

pub type Result<T> = std::result::Result<T, FontError>;
