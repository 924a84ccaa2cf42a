//! RGB canvas backed by `image::RgbImage`

use crate::font::GlyphBitmap;
use crate::utils::color::{blend_mask, Rgb};
use anyhow::{Context, Result};
use image::{Rgb as Pixel, RgbImage};
use log::info;
use std::path::Path;

/// Surface that glyph masks can be composited onto
pub trait MaskSurface {
    /// Blend `mask` with its top-left corner at (x, y). Pixels outside the
    /// surface are clipped.
    fn mask(&mut self, mask: &GlyphBitmap, x: i32, y: i32);
}

/// RGB image with a source color used for mask compositing
pub struct Canvas {
    image: RgbImage,
    source: Rgb,
}

impl Canvas {
    /// Create a canvas filled with `background`
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, Pixel(background)),
            source: [0, 0, 0],
        }
    }

    pub fn set_source(&mut self, color: Rgb) {
        self.source = color;
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.image.get_pixel(x, y).0
    }

    /// Write the canvas as PNG
    pub fn write_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
        info!(
            "Wrote {}x{} PNG: {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }
}

impl MaskSurface for Canvas {
    fn mask(&mut self, mask: &GlyphBitmap, x: i32, y: i32) {
        let (width, height) = (self.image.width() as i64, self.image.height() as i64);
        for (row_index, row) in mask.rows().enumerate() {
            let py = y as i64 + row_index as i64;
            if py < 0 || py >= height {
                continue;
            }
            for (col, &alpha) in row.iter().enumerate() {
                let px = x as i64 + col as i64;
                if alpha == 0 || px < 0 || px >= width {
                    continue;
                }
                let pixel = self.image.get_pixel_mut(px as u32, py as u32);
                pixel.0 = blend_mask(pixel.0, self.source, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::raster::a8_stride;

    fn solid_mask(width: u32, height: u32, alpha: u8) -> GlyphBitmap {
        let stride = a8_stride(width);
        let mut data = vec![0u8; stride * height as usize];
        for y in 0..height as usize {
            for x in 0..width as usize {
                data[y * stride + x] = alpha;
            }
        }
        GlyphBitmap {
            width,
            height,
            stride,
            left: 0,
            top: 0,
            data,
        }
    }

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(5, 3, [10, 20, 30]);
        assert_eq!((canvas.width(), canvas.height()), (5, 3));
        assert_eq!(canvas.pixel(4, 2), [10, 20, 30]);
    }

    #[test]
    fn test_mask_blends_source() {
        let mut canvas = Canvas::new(8, 8, [255, 255, 255]);
        canvas.set_source([0, 0, 0]);
        canvas.mask(&solid_mask(2, 2, 255), 3, 4);
        assert_eq!(canvas.pixel(3, 4), [0, 0, 0]);
        assert_eq!(canvas.pixel(4, 5), [0, 0, 0]);
        assert_eq!(canvas.pixel(5, 4), [255, 255, 255]);
        assert_eq!(canvas.pixel(2, 4), [255, 255, 255]);
    }

    #[test]
    fn test_mask_padding_not_drawn() {
        // width 1 -> stride 4; padding must never reach the canvas
        let mut canvas = Canvas::new(8, 2, [255, 255, 255]);
        let mut mask = solid_mask(1, 1, 255);
        mask.data[1] = 255;
        canvas.mask(&mask, 0, 0);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0]);
        assert_eq!(canvas.pixel(1, 0), [255, 255, 255]);
    }

    #[test]
    fn test_mask_clipped_at_edges() {
        let mut canvas = Canvas::new(4, 4, [255, 255, 255]);
        canvas.mask(&solid_mask(3, 3, 255), -1, -1);
        canvas.mask(&solid_mask(3, 3, 255), 3, 3);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0]);
        assert_eq!(canvas.pixel(1, 1), [0, 0, 0]);
        assert_eq!(canvas.pixel(2, 2), [255, 255, 255]);
        assert_eq!(canvas.pixel(3, 3), [0, 0, 0]);
    }
}
