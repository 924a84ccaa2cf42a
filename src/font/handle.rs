//! Font handle: the ordered face set loaded for one (family, size) request
//!
//! Faces are kept in resolver order. Glyph lookup falls back through
//! them; shaping and line metrics come from the first face only.

use super::error::{FontError, Result};
use super::face::{FaceLoader, FaceMetrics, LoadedFace, ShapingTable};
use super::fixed::to_pixels;
use super::fontconfig::FontCatalog;
use super::locator::locate;
use log::{info, warn};

pub struct FontHandle {
    family: String,
    size_px: u32,
    faces: Vec<LoadedFace>,
    /// Advance of U+0020 (pixels)
    space_width: u32,
}

impl FontHandle {
    /// Resolve `family` through the catalog and open every candidate
    ///
    /// Candidates that fail to open are logged and skipped. Fails with
    /// `NoUsableFace` when none opens.
    pub fn load<L, C>(loader: &L, catalog: &C, family: &str, size_px: u32) -> Result<Self>
    where
        L: FaceLoader + ?Sized,
        C: FontCatalog + ?Sized,
    {
        let paths = catalog.resolve(family, size_px)?;

        let mut faces = Vec::with_capacity(paths.len());
        for path in &paths {
            match loader.open_face(path, size_px) {
                Ok(face) => faces.push(face),
                Err(e) => warn!("Skipping font {}: {:#}", path.display(), e),
            }
        }

        if faces.is_empty() {
            warn!("Failed to load any font faces for \"{}\"", family);
        }

        Self::from_faces(family, size_px, faces)
    }

    /// Build a handle from already opened faces
    pub fn from_faces(family: &str, size_px: u32, faces: Vec<LoadedFace>) -> Result<Self> {
        if faces.is_empty() {
            return Err(FontError::NoUsableFace {
                family: family.to_string(),
                size: size_px,
            });
        }

        let mut handle = Self {
            family: family.to_string(),
            size_px,
            faces,
            space_width: 0,
        };

        handle.space_width = match locate(&mut handle, ' ', None, None) {
            Some(space) => to_pixels(space.glyph.advance.x).max(0) as u32,
            None => {
                warn!("No face has a space glyph for \"{}\"", family);
                0
            }
        };

        info!(
            "Font \"{}\" {}px: {} face(s), shaping {}, space width {}px",
            handle.family,
            handle.size_px,
            handle.faces.len(),
            if handle.shaping_table().is_some() {
                "enabled"
            } else {
                "disabled"
            },
            handle.space_width
        );

        Ok(handle)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> u32 {
        self.size_px
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[LoadedFace] {
        &self.faces
    }

    pub(crate) fn faces_mut(&mut self) -> &mut [LoadedFace] {
        &mut self.faces
    }

    fn primary_metrics(&self) -> Option<FaceMetrics> {
        self.faces.first().map(|f| f.raster.metrics())
    }

    /// Ascent of the first face (pixels)
    pub fn ascent(&self) -> u32 {
        self.primary_metrics()
            .map_or(0, |m| to_pixels(m.ascender).max(0) as u32)
    }

    /// Descent of the first face as a positive distance (pixels)
    pub fn descent(&self) -> u32 {
        self.primary_metrics()
            .map_or(0, |m| to_pixels(-m.descender).max(0) as u32)
    }

    /// Line height of the first face (pixels)
    pub fn line_height(&self) -> u32 {
        self.primary_metrics()
            .map_or(0, |m| to_pixels(m.height).max(0) as u32)
    }

    pub fn space_width(&self) -> u32 {
        self.space_width
    }

    /// Units per em of the first face, used to scale shaping deltas
    pub fn units_per_em(&self) -> u16 {
        self.primary_metrics().map_or(0, |m| m.units_per_em)
    }

    /// Units per em of the face at `index`, used to scale its kerning pairs
    pub fn face_units_per_em(&self, index: usize) -> u16 {
        self.faces
            .get(index)
            .map_or(0, |f| f.raster.metrics().units_per_em)
    }

    /// Shaping table of the first face
    ///
    /// Fallback faces never contribute shaping data. When the first face
    /// has no table, runs are not shaped at all.
    pub fn shaping_table(&self) -> Option<&ShapingTable> {
        self.faces.first().and_then(|f| f.shaping.as_ref())
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field(
                "faces",
                &self.faces.iter().map(|f| &f.path).collect::<Vec<_>>(),
            )
            .field("space_width", &self.space_width)
            .finish()
    }
}
