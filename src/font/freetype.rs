//! FreeType wrapper
//!
//! Face loading and normal-mode (8-bit AA) glyph rendering

use super::error::{FontError, Result};
use super::face::{
    CoverageRaster, FaceLoader, FaceMetrics, LoadedFace, RasterFace, RenderedGlyph, ShapingTable,
};
use super::fixed::Vector;
use anyhow::anyhow;
use freetype::face::{KerningMode, LoadFlag};
use freetype::render_mode::RenderMode;
use freetype::Library;
use log::{info, warn};
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;

// Directly declare functions not exported by freetype-sys
extern "C" {
    fn FT_Set_Transform(
        face: freetype::ffi::FT_Face,
        matrix: *const freetype::ffi::FT_Matrix,
        delta: *const freetype::ffi::FT_Vector,
    );
}

/// Serializes `FT_Init_FreeType` across threads
static LIBRARY_INIT: Mutex<()> = Mutex::new(());

/// Glyphs larger than this are treated as malformed
const MAX_GLYPH_DIMENSION: u32 = 4096;

/// FreeType library handle
///
/// Create once and pass to every `FontHandle::load`. Faces keep their own
/// reference to the library, so they may outlive this handle.
pub struct FtLibrary {
    library: Rc<Library>,
}

impl FtLibrary {
    pub fn init() -> Result<Self> {
        let _guard = LIBRARY_INIT.lock().unwrap_or_else(|e| e.into_inner());
        let library = Library::init().map_err(|e| FontError::LibraryInit(format!("{:?}", e)))?;
        info!("FreeType initialized");
        Ok(Self {
            library: Rc::new(library),
        })
    }
}

impl FaceLoader for FtLibrary {
    fn open_face(&self, path: &Path, size_px: u32) -> anyhow::Result<LoadedFace> {
        let data = std::fs::read(path)
            .map_err(|e| anyhow!("Failed to read font file: {} ({})", path.display(), e))?;
        // freetype-rs requires Rc<Vec<u8>>; the same bytes back the shaping table
        let data: Rc<Vec<u8>> = Rc::new(data);

        let face = self
            .library
            .new_memory_face(Rc::clone(&data), 0)
            .map_err(|e| anyhow!("FreeType face loading failed: {:?}", e))?;

        face.set_pixel_sizes(0, size_px)
            .map_err(|e| anyhow!("FreeType size setting failed: {:?}", e))?;

        let family = face.family_name().unwrap_or_else(|| "unknown".to_string());

        // Fails on non-sfnt formats; the face is still usable without shaping
        let shaping = ShapingTable::open(data, 0);
        if shaping.is_none() {
            warn!("No OpenType layout tables in {}", path.display());
        }

        info!(
            "FreeType face loaded: {} ({}px, {})",
            family,
            size_px,
            path.display()
        );

        Ok(LoadedFace::new(
            path,
            Box::new(FtFace { face, size_px }),
            shaping,
        ))
    }
}

/// FreeType face at a fixed pixel size
pub struct FtFace {
    face: freetype::Face,
    size_px: u32,
}

impl FtFace {
    /// Copy the rendered slot bitmap out of FreeType's glyph slot
    fn extract_glyph(glyph: &freetype::GlyphSlot) -> Option<RenderedGlyph> {
        let bitmap = glyph.bitmap();
        let advance = glyph.advance();

        let width = bitmap.width().max(0) as u32;
        let rows = bitmap.rows().max(0) as u32;

        if width > MAX_GLYPH_DIMENSION || rows > MAX_GLYPH_DIMENSION {
            warn!("FreeType: glyph too large ({}x{}), skipping", width, rows);
            return None;
        }

        let coverage = if width == 0 || rows == 0 {
            // Empty glyph (e.g., space)
            CoverageRaster::default()
        } else {
            let pitch = bitmap.pitch().unsigned_abs() as usize;
            let buffer = bitmap.buffer();
            let len = (pitch * rows as usize).min(buffer.len());
            CoverageRaster {
                width,
                rows,
                pitch,
                buffer: buffer[..len].to_vec(),
            }
        };

        Some(RenderedGlyph {
            advance: Vector::new(advance.x as i64, advance.y as i64),
            bitmap_left: glyph.bitmap_left(),
            bitmap_top: glyph.bitmap_top(),
            coverage,
        })
    }
}

impl RasterFace for FtFace {
    fn glyph_index(&self, ch: char) -> Option<u32> {
        // get_char_index returns 0 if not found
        self.face
            .get_char_index(ch as usize)
            .filter(|&index| index != 0)
    }

    fn set_transform(&mut self, delta: Option<Vector>) {
        let face_ptr: freetype::ffi::FT_Face = self.face.raw_mut();
        match delta {
            Some(v) => {
                let delta = freetype::ffi::FT_Vector {
                    x: v.x as freetype::ffi::FT_Pos,
                    y: v.y as freetype::ffi::FT_Pos,
                };
                unsafe {
                    FT_Set_Transform(face_ptr, std::ptr::null(), &delta);
                }
            }
            None => unsafe {
                FT_Set_Transform(face_ptr, std::ptr::null(), std::ptr::null());
            },
        }
    }

    fn render_glyph(&mut self, glyph_index: u32) -> Option<RenderedGlyph> {
        if self.face.load_glyph(glyph_index, LoadFlag::DEFAULT).is_err() {
            return None;
        }

        let glyph = self.face.glyph();
        if glyph.render_glyph(RenderMode::Normal).is_err() {
            return None;
        }

        Self::extract_glyph(glyph)
    }

    fn kerning(&self, left: u32, right: u32) -> Option<Vector> {
        if !self.face.has_kerning() {
            return None;
        }
        self.face
            .get_kerning(left, right, KerningMode::KerningUnscaled)
            .ok()
            .map(|v| Vector::new(v.x as i64, v.y as i64))
    }

    fn metrics(&self) -> FaceMetrics {
        let units_per_em = self.face.raw().units_per_EM;
        match self.face.size_metrics() {
            Some(m) => FaceMetrics {
                ascender: m.ascender as i64,
                descender: m.descender as i64,
                height: m.height as i64,
                units_per_em,
            },
            None => {
                warn!("FreeType size not set ({}px face)", self.size_px);
                FaceMetrics {
                    units_per_em,
                    ..FaceMetrics::default()
                }
            }
        }
    }
}
