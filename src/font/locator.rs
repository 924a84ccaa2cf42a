//! Glyph locator
//!
//! Finds the first face (in load order) that has a glyph for a character,
//! renders it, and tracks the previous glyph for kerning lookups.

use super::face::RenderedGlyph;
use super::fixed::Vector;
use super::handle::FontHandle;
use log::trace;

/// Previous glyph of a run, for kerning
///
/// Remembers which face the glyph came from: kerning pairs are only
/// looked up when both glyphs come from the same face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KerningState {
    previous: Option<(usize, u32)>,
}

impl KerningState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyph index of the previously located glyph
    pub fn previous(&self) -> Option<u32> {
        self.previous.map(|(_, glyph)| glyph)
    }

    /// Face index of the previously located glyph
    pub fn previous_face(&self) -> Option<usize> {
        self.previous.map(|(face, _)| face)
    }
}

/// A glyph found and rendered by one face of a `FontHandle`
#[derive(Debug, Clone)]
pub struct LocatedGlyph {
    /// Index of the matching face in load order
    pub face_index: usize,
    pub glyph_index: u32,
    /// Unscaled kerning against the previous glyph (design units)
    pub kerning: Option<Vector>,
    pub glyph: RenderedGlyph,
}

/// Locate and render `ch`
///
/// `transform` is applied to each face before rendering so the outline is
/// rendered at its final subpixel position. Returns `None` only when no
/// face has the character.
pub fn locate(
    font: &mut FontHandle,
    ch: char,
    mut kerning: Option<&mut KerningState>,
    transform: Option<Vector>,
) -> Option<LocatedGlyph> {
    for (face_index, face) in font.faces_mut().iter_mut().enumerate() {
        let raster = face.raster.as_mut();
        raster.set_transform(transform);

        let Some(glyph_index) = raster.glyph_index(ch) else {
            continue;
        };

        let Some(glyph) = raster.render_glyph(glyph_index) else {
            trace!("face {} failed to render glyph {} for {:?}", face_index, glyph_index, ch);
            continue;
        };

        let mut pair_kerning = None;
        if let Some(state) = kerning.as_deref_mut() {
            if let Some((prev_face, prev_glyph)) = state.previous {
                if prev_face == face_index {
                    pair_kerning = raster.kerning(prev_glyph, glyph_index);
                }
            }
            state.previous = Some((face_index, glyph_index));
        }

        trace!(
            "{:?} -> face {} glyph {} (advance {})",
            ch,
            face_index,
            glyph_index,
            glyph.advance.x
        );

        return Some(LocatedGlyph {
            face_index,
            glyph_index,
            kerning: pair_kerning,
            glyph,
        });
    }

    None
}
