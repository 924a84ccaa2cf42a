//! Glyph rasterizer
//!
//! Turns a rendered coverage raster into a gamma-corrected A8 mask
//! ready for compositing.

use super::error::{FontError, Result};
use super::face::CoverageRaster;

/// Row alignment of A8 masks (bytes)
const STRIDE_ALIGN: usize = 4;

/// Row stride for an A8 mask of `width` pixels
#[inline]
pub fn a8_stride(width: u32) -> usize {
    (width as usize + STRIDE_ALIGN - 1) & !(STRIDE_ALIGN - 1)
}

/// Coverage -> corrected coverage lookup table
#[derive(Clone)]
pub struct GammaTable {
    gamma: f32,
    lut: [u8; 256],
}

impl GammaTable {
    /// Build the table `round(255 * (c / 255)^gamma)`
    pub fn new(gamma: f32) -> Result<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(FontError::InvalidGamma(gamma));
        }
        let mut lut = [0u8; 256];
        for (c, out) in lut.iter_mut().enumerate() {
            let v = (c as f64 / 255.0).powf(gamma as f64) * 255.0;
            *out = v.round().clamp(0.0, 255.0) as u8;
        }
        Ok(Self { gamma, lut })
    }

    /// gamma = 1.0: coverage passes through unchanged
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (c, out) in lut.iter_mut().enumerate() {
            *out = c as u8;
        }
        Self { gamma: 1.0, lut }
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    #[inline]
    pub fn apply(&self, coverage: u8) -> u8 {
        self.lut[coverage as usize]
    }
}

impl std::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaTable").field("gamma", &self.gamma).finish()
    }
}

/// Gamma-corrected A8 glyph mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Bytes per row (>= width, padding is zero)
    pub stride: usize,
    /// Left edge relative to the render origin (pixels)
    pub left: i32,
    /// Top edge above the baseline (pixels)
    pub top: i32,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// Mask value at (x, y), 0 outside the bitmap or its data
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height || x as usize >= self.stride {
            return 0;
        }
        self.data
            .get(y as usize * self.stride + x as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate rows without padding
    ///
    /// Rows are cut to `width` and to the data actually present.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let width = self.width as usize;
        self.data
            .chunks(self.stride.max(1))
            .take(self.height as usize)
            .map(move |row| &row[..width.min(row.len())])
    }
}

/// Apply gamma correction to a coverage raster
pub fn rasterize(coverage: &CoverageRaster, left: i32, top: i32, gamma: &GammaTable) -> GlyphBitmap {
    let width = coverage.width;
    let height = coverage.rows;
    let stride = a8_stride(width);
    let mut data = vec![0u8; stride * height as usize];

    for y in 0..height {
        let row = &mut data[y as usize * stride..][..width as usize];
        for (x, out) in row.iter_mut().enumerate() {
            *out = gamma.apply(coverage.get(x as u32, y));
        }
    }

    GlyphBitmap {
        width,
        height,
        stride,
        left,
        top,
        data,
    }
}
