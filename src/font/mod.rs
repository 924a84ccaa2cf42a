//! Font loading, glyph lookup and rasterization
//!
//! Handles:
//! - Font discovery (fontconfig)
//! - Face loading and glyph rendering (freetype)
//! - Ligature/kerning shaping (rustybuzz)
//! - Gamma-corrected A8 glyph masks

pub mod error;
pub mod face;
pub mod fixed;
pub mod fontconfig;
pub mod freetype;
pub mod handle;
pub mod locator;
pub mod raster;
pub mod shaper;

pub use error::FontError;
pub use face::{
    CoverageRaster, FaceLoader, FaceMetrics, LoadedFace, RasterFace, RenderedGlyph, ShapingTable,
};
pub use fixed::Vector;
pub use self::fontconfig::{FontCatalog, FontFinder, StaticCatalog};
pub use self::freetype::{FtFace, FtLibrary};
pub use handle::FontHandle;
pub use locator::{locate, KerningState, LocatedGlyph};
pub use raster::{rasterize, GammaTable, GlyphBitmap};
pub use shaper::{shape, Positioning, ShapedEntry, ShapedRun};

#[cfg(test)]
pub(crate) mod test_support {
    use super::face::{
        CoverageRaster, FaceLoader, FaceMetrics, LoadedFace, RasterFace, RenderedGlyph,
    };
    use super::fixed::{to_pixels, Vector};
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// In-memory face with fixed glyphs, kerning pairs and metrics
    #[derive(Clone)]
    pub struct FakeFace {
        glyphs: Vec<(char, u32, i64)>,
        kerning: HashMap<(u32, u32), i64>,
        metrics: FaceMetrics,
        transform: Vector,
    }

    impl FakeFace {
        pub const BEARING_X: i32 = 1;
        pub const BEARING_Y: i32 = 7;
        pub const GLYPH_W: u32 = 3;
        pub const GLYPH_H: u32 = 4;

        pub fn new() -> Self {
            Self {
                glyphs: Vec::new(),
                kerning: HashMap::new(),
                metrics: FaceMetrics {
                    ascender: 9 * 64,
                    descender: -3 * 64,
                    height: 12 * 64,
                    units_per_em: 1000,
                },
                transform: Vector::default(),
            }
        }

        /// Space (4px) plus ASCII letters (7px each)
        pub fn latin() -> Self {
            let mut face = Self::new().glyph(' ', 3, 4 * 64);
            for (i, ch) in ('A'..='Z').enumerate() {
                face = face.glyph(ch, 36 + i as u32, 7 * 64);
            }
            for (i, ch) in ('a'..='z').enumerate() {
                face = face.glyph(ch, 68 + i as u32, 7 * 64);
            }
            face
        }

        pub fn glyph(mut self, ch: char, index: u32, advance: i64) -> Self {
            self.glyphs.push((ch, index, advance));
            self
        }

        pub fn kern(mut self, left: u32, right: u32, x: i64) -> Self {
            self.kerning.insert((left, right), x);
            self
        }

        pub fn with_metrics(mut self, ascender: i64, descender: i64, height: i64, upem: u16) -> Self {
            self.metrics = FaceMetrics {
                ascender,
                descender,
                height,
                units_per_em: upem,
            };
            self
        }

        pub fn index_of(&self, ch: char) -> u32 {
            self.glyphs
                .iter()
                .find(|(c, _, _)| *c == ch)
                .map(|(_, i, _)| *i)
                .unwrap_or_else(|| panic!("fake face has no {:?}", ch))
        }

        pub fn loaded(self, path: &str) -> LoadedFace {
            LoadedFace::new(Path::new(path), Box::new(self), None)
        }
    }

    impl RasterFace for FakeFace {
        fn glyph_index(&self, ch: char) -> Option<u32> {
            self.glyphs.iter().find(|(c, _, _)| *c == ch).map(|(_, i, _)| *i)
        }

        fn set_transform(&mut self, delta: Option<Vector>) {
            self.transform = delta.unwrap_or_default();
        }

        fn render_glyph(&mut self, glyph_index: u32) -> Option<RenderedGlyph> {
            let &(ch, _, advance) = self.glyphs.iter().find(|(_, i, _)| *i == glyph_index)?;
            let coverage = if ch == ' ' {
                CoverageRaster::default()
            } else {
                let (w, h) = (Self::GLYPH_W, Self::GLYPH_H);
                CoverageRaster {
                    width: w,
                    rows: h,
                    pitch: w as usize,
                    buffer: (0..w * h).map(|i| (i * 20 + 40).min(255) as u8).collect(),
                }
            };
            Some(RenderedGlyph {
                advance: Vector::new(advance, 0),
                bitmap_left: to_pixels(self.transform.x) as i32 + Self::BEARING_X,
                bitmap_top: to_pixels(self.transform.y) as i32 + Self::BEARING_Y,
                coverage,
            })
        }

        fn kerning(&self, left: u32, right: u32) -> Option<Vector> {
            self.kerning.get(&(left, right)).map(|&x| Vector::new(x, 0))
        }

        fn metrics(&self) -> FaceMetrics {
            self.metrics
        }
    }

    /// Loader serving fake faces by path; unknown paths fail to open
    #[derive(Default)]
    pub struct FakeLoader {
        faces: HashMap<PathBuf, FakeFace>,
    }

    impl FakeLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, path: &str, face: FakeFace) -> Self {
            self.faces.insert(PathBuf::from(path), face);
            self
        }
    }

    impl FaceLoader for FakeLoader {
        fn open_face(&self, path: &Path, _size_px: u32) -> anyhow::Result<LoadedFace> {
            let face = self
                .faces
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow!("cannot open {}", path.display()))?;
            Ok(LoadedFace::new(path, Box::new(face), None))
        }
    }
}
