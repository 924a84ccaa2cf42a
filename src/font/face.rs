//! Rasterizer face abstraction
//!
//! `RasterFace` is the seam between the pipeline and the rasterizer engine.
//! FreeType implements it in `font::freetype`; tests use a fake face.

use super::fixed::Vector;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Size metrics of a face at its loaded pixel size (26.6)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    pub ascender: i64,
    /// Negative below the baseline, as FreeType reports it
    pub descender: i64,
    pub height: i64,
    pub units_per_em: u16,
}

/// Raw 8-bit coverage produced by rendering one glyph outline
///
/// Rows are `pitch` bytes apart; only the first `width` bytes of each row
/// are coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageRaster {
    pub width: u32,
    pub rows: u32,
    pub pitch: usize,
    pub buffer: Vec<u8>,
}

impl CoverageRaster {
    /// Coverage at (x, y), or 0 outside the raster
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.rows {
            return 0;
        }
        self.buffer
            .get(y as usize * self.pitch + x as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.rows == 0
    }
}

/// A glyph loaded and rendered by a face
#[derive(Debug, Clone)]
pub struct RenderedGlyph {
    /// Advance in 26.6
    pub advance: Vector,
    /// Bitmap left edge relative to the origin (pixels, pen transform included)
    pub bitmap_left: i32,
    /// Bitmap top edge above the baseline (pixels, pen transform included)
    pub bitmap_top: i32,
    pub coverage: CoverageRaster,
}

/// One loaded font at a fixed pixel size
pub trait RasterFace {
    /// Glyph index for a character; `None` when the face has no glyph
    fn glyph_index(&self, ch: char) -> Option<u32>;

    /// Set the translation applied to outlines before rendering.
    /// `None` resets to the identity transform.
    fn set_transform(&mut self, delta: Option<Vector>);

    /// Load and render a glyph in normal (8-bit antialiased) mode
    fn render_glyph(&mut self, glyph_index: u32) -> Option<RenderedGlyph>;

    /// Unscaled (design unit) kerning between two glyphs of this face
    fn kerning(&self, left: u32, right: u32) -> Option<Vector>;

    fn metrics(&self) -> FaceMetrics;
}

/// Handle onto a face's OpenType layout tables
///
/// Shares the font bytes with the rasterizer face; rustybuzz parses them
/// on demand when a run is shaped.
#[derive(Clone)]
pub struct ShapingTable {
    data: Rc<Vec<u8>>,
    index: u32,
}

impl ShapingTable {
    /// Open the layout tables of a font file image.
    /// Returns `None` for formats rustybuzz cannot parse (Type 1, PCF, ...).
    pub fn open(data: Rc<Vec<u8>>, index: u32) -> Option<Self> {
        rustybuzz::Face::from_slice(&data, index)?;
        Some(Self { data, index })
    }

    /// Parse the face for shaping
    pub fn face(&self) -> Option<rustybuzz::Face<'_>> {
        rustybuzz::Face::from_slice(&self.data, self.index)
    }
}

impl std::fmt::Debug for ShapingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapingTable")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// A face owned by a `FontHandle`
pub struct LoadedFace {
    pub path: PathBuf,
    pub raster: Box<dyn RasterFace>,
    pub shaping: Option<ShapingTable>,
}

impl LoadedFace {
    pub fn new(path: &Path, raster: Box<dyn RasterFace>, shaping: Option<ShapingTable>) -> Self {
        Self {
            path: path.to_path_buf(),
            raster,
            shaping,
        }
    }
}

/// Opens font files as faces at a pixel size
pub trait FaceLoader {
    /// Open a rasterizer face. Errors are per-path and non-fatal to the caller.
    fn open_face(&self, path: &Path, size_px: u32) -> anyhow::Result<LoadedFace>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_get_respects_pitch() {
        let raster = CoverageRaster {
            width: 2,
            rows: 2,
            pitch: 4,
            buffer: vec![1, 2, 99, 99, 3, 4, 99, 99],
        };
        assert_eq!(raster.get(0, 0), 1);
        assert_eq!(raster.get(1, 1), 4);
        // Padding and out-of-range read as empty
        assert_eq!(raster.get(2, 0), 0);
        assert_eq!(raster.get(0, 2), 0);
    }

    #[test]
    fn test_shaping_table_rejects_garbage() {
        let data = Rc::new(vec![0u8; 64]);
        assert!(ShapingTable::open(data, 0).is_none());
    }
}
