//! String rendering
//!
//! Single pass over the characters of a string: apply shaping deltas,
//! snap the pen, locate and rasterize each glyph, composite it onto the
//! destination surface and advance the pen.
//!
//! A character that no face can render stops the pass. Glyphs already
//! composited stay on the surface.

use crate::drawing::MaskSurface;
use crate::font::error::{FontError, Result};
use crate::font::fixed::{design_delta_to_26_6, snap_to_pixel, to_pixels, Vector};
use crate::font::{
    locate, rasterize, shape, FaceLoader, FontCatalog, FontFinder, FontHandle, FtLibrary,
    GammaTable, KerningState, LocatedGlyph, ShapedRun,
};
use log::{debug, trace, warn};

/// What to do when no face has a glyph for a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingGlyph {
    /// Fail the render with `FontError::GlyphNotFound`
    #[default]
    Abort,
    /// Stop and report a partial render
    Stop,
    /// Draw this character instead; fails like `Abort` if it is missing too
    Placeholder(char),
}

/// Per-call rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub gamma: GammaTable,
    pub missing_glyph: MissingGlyph,
}

impl RenderOptions {
    pub fn new(gamma: f32, missing_glyph: MissingGlyph) -> Result<Self> {
        Ok(Self {
            gamma: GammaTable::new(gamma)?,
            missing_glyph,
        })
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gamma: GammaTable::identity(),
            missing_glyph: MissingGlyph::Abort,
        }
    }
}

/// Pen position (26.6) and kerning state for one render call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenState {
    pub position: Vector,
    pub kerning: KerningState,
}

impl PenState {
    /// Pen at pixel column `x` on the baseline
    pub fn new(x: i32) -> Self {
        Self {
            position: Vector::from_pixels(x, 0),
            kerning: KerningState::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Every character was composited
    Complete,
    /// Stopped at `byte_offset`, where no face has `missing`
    Partial { byte_offset: usize, missing: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub glyphs_composited: usize,
    /// Final pen position (26.6)
    pub pen: Vector,
    pub status: RenderStatus,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.status == RenderStatus::Complete
    }
}

/// Scale an unscaled kerning value to 26.6 at `size_px`
fn scale_kerning(delta: i64, size_px: u32, units_per_em: u16) -> i64 {
    if units_per_em == 0 {
        return 0;
    }
    delta * size_px as i64 * 64 / units_per_em as i64
}

/// Render `text` with its baseline at `y`, starting at pixel column `x`
pub fn render_string<S>(
    surface: &mut S,
    x: i32,
    y: i32,
    font: &mut FontHandle,
    text: &str,
    options: &RenderOptions,
) -> Result<RenderReport>
where
    S: MaskSurface + ?Sized,
{
    let run = shape(font.shaping_table(), text);
    render_run(surface, x, y, font, text, &run, options)
}

/// Render `text` using an already shaped run
///
/// `run` must come from the same text. Its deltas are in the first face's
/// design units.
pub fn render_run<S>(
    surface: &mut S,
    x: i32,
    y: i32,
    font: &mut FontHandle,
    text: &str,
    run: &ShapedRun,
    options: &RenderOptions,
) -> Result<RenderReport>
where
    S: MaskSurface + ?Sized,
{
    let units_per_em = font.units_per_em();
    let size_px = font.size();
    let mut pen = PenState::new(x);
    let mut composited = 0;

    debug!(
        "Rendering {} bytes with \"{}\" {}px (shaped: {}, gamma {})",
        text.len(),
        font.family(),
        size_px,
        run.is_shaped(),
        options.gamma.gamma()
    );

    for (offset, ch) in text.char_indices() {
        if let Some(delta) = run.x_advance_delta(offset) {
            pen.position.x += design_delta_to_26_6(delta, units_per_em);
        }

        pen.position.x = snap_to_pixel(pen.position.x);

        let located = match locate(font, ch, Some(&mut pen.kerning), Some(pen.position)) {
            Some(glyph) => glyph,
            None => match options.missing_glyph {
                MissingGlyph::Abort => {
                    warn!("No glyph for {:?}, aborting render", ch);
                    return Err(FontError::GlyphNotFound {
                        ch,
                        byte_offset: offset,
                    });
                }
                MissingGlyph::Stop => {
                    warn!("No glyph for {:?}, stopping at byte {}", ch, offset);
                    return Ok(RenderReport {
                        glyphs_composited: composited,
                        pen: pen.position,
                        status: RenderStatus::Partial {
                            byte_offset: offset,
                            missing: ch,
                        },
                    });
                }
                MissingGlyph::Placeholder(placeholder) => {
                    locate_placeholder(font, placeholder, &mut pen)
                        .ok_or(FontError::GlyphNotFound {
                            ch,
                            byte_offset: offset,
                        })?
                }
            },
        };

        // Without shaping data the face's own kern pairs are used instead
        let mut kern_px = 0;
        if !run.is_shaped() {
            if let Some(kerning) = located.kerning {
                let face_units_per_em = font.face_units_per_em(located.face_index);
                let kern = snap_to_pixel(scale_kerning(kerning.x, size_px, face_units_per_em));
                kern_px = to_pixels(kern) as i32;
                pen.position.x += kern;
            }
        }

        pen.position += located.glyph.advance;

        let bitmap = rasterize(
            &located.glyph.coverage,
            located.glyph.bitmap_left + kern_px,
            located.glyph.bitmap_top,
            &options.gamma,
        );

        trace!(
            "{:?} at ({}, {}) {}x{}, pen -> {}",
            ch,
            bitmap.left,
            y - bitmap.top,
            bitmap.width,
            bitmap.height,
            pen.position.x
        );

        surface.mask(&bitmap, bitmap.left, y - bitmap.top);
        composited += 1;
    }

    Ok(RenderReport {
        glyphs_composited: composited,
        pen: pen.position,
        status: RenderStatus::Complete,
    })
}

fn locate_placeholder(font: &mut FontHandle, placeholder: char, pen: &mut PenState) -> Option<LocatedGlyph> {
    let glyph = locate(font, placeholder, Some(&mut pen.kerning), Some(pen.position));
    if glyph.is_some() {
        debug!("Substituted placeholder {:?}", placeholder);
    }
    glyph
}

/// FreeType + fontconfig renderer
///
/// Owns the FreeType library handle and the font catalog; loads a
/// `FontHandle` per call.
pub struct TextRenderer<L = FtLibrary, C = FontFinder> {
    loader: L,
    catalog: C,
}

impl TextRenderer {
    /// Initialize FreeType and fontconfig
    pub fn new() -> Result<Self> {
        Ok(Self {
            loader: FtLibrary::init()?,
            catalog: FontFinder::new()?,
        })
    }
}

impl<L: FaceLoader, C: FontCatalog> TextRenderer<L, C> {
    pub fn with_parts(loader: L, catalog: C) -> Self {
        Self { loader, catalog }
    }

    /// Load a font for (family, size)
    pub fn load_font(&self, family: &str, size_px: u32) -> Result<FontHandle> {
        FontHandle::load(&self.loader, &self.catalog, family, size_px)
    }

    /// Load `family` at `size_px` and render `text` at (x, baseline y)
    #[allow(clippy::too_many_arguments)]
    pub fn render<S>(
        &self,
        surface: &mut S,
        x: i32,
        y: i32,
        family: &str,
        size_px: u32,
        text: &str,
        options: &RenderOptions,
    ) -> Result<RenderReport>
    where
        S: MaskSurface + ?Sized,
    {
        let mut font = self.load_font(family, size_px)?;
        render_string(surface, x, y, &mut font, text, options)
    }
}
