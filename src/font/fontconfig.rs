//! fontconfig integration
//!
//! Resolve a family name into a ranked list of font files

use super::error::{FontError, Result};
use fontconfig::{FontSet, Fontconfig, Pattern};
use fontconfig_sys as sys;
use log::{debug, info};
use std::ffi::CString;
use std::path::PathBuf;
use std::ptr;

const FC_TRUE: sys::FcBool = 1;

/// Source of candidate font files for a family request
pub trait FontCatalog {
    /// Candidate font files, best match first
    fn resolve(&self, family: &str, size_px: u32) -> Result<Vec<PathBuf>>;
}

/// Search fonts using fontconfig
pub struct FontFinder {
    fc: Fontconfig,
}

impl FontFinder {
    /// Initialize FontFinder
    pub fn new() -> Result<Self> {
        let fc = Fontconfig::new().ok_or_else(|| FontError::Resolution {
            family: String::new(),
            size: 0,
            reason: "fontconfig initialization failed".to_string(),
        })?;
        info!("fontconfig initialized");
        Ok(Self { fc })
    }
}

impl FontCatalog for FontFinder {
    /// Sort the whole catalog against `family` at `size_px`
    ///
    /// Config and default substitution run first, so generic names such as
    /// "monospace" or "sans" still give a deterministic ranking.
    fn resolve(&self, family: &str, size_px: u32) -> Result<Vec<PathBuf>> {
        let resolution_error = |reason: &str| FontError::Resolution {
            family: family.to_string(),
            size: size_px,
            reason: reason.to_string(),
        };

        let name =
            CString::new(family).map_err(|_| resolution_error("family name contains NUL"))?;

        // Parsed as a full pattern: "DejaVu Sans:bold" selects the bold face
        let raw = unsafe { sys::FcNameParse(name.as_ptr() as *const sys::FcChar8) };
        if raw.is_null() {
            return Err(resolution_error("invalid fontconfig pattern"));
        }
        let mut pattern = unsafe {
            let pattern = Pattern::from_pattern(&self.fc, raw);
            // from_pattern takes its own reference
            sys::FcPatternDestroy(raw);
            pattern
        };

        let font_set = unsafe {
            let pat = pattern.as_mut_ptr();
            sys::FcPatternAddDouble(pat, sys::constants::FC_SIZE.as_ptr(), size_px as f64);
            sys::FcConfigSubstitute(ptr::null_mut(), pat, sys::FcMatchPattern);
            sys::FcDefaultSubstitute(pat);

            let mut result = sys::FcResultNoMatch;
            let set = sys::FcFontSort(ptr::null_mut(), pat, FC_TRUE, ptr::null_mut(), &mut result);
            if set.is_null() {
                return Err(resolution_error("fontconfig returned no font set"));
            }
            FontSet::from_raw(&self.fc, set)
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        for font in font_set.iter() {
            if let Some(file) = font.filename() {
                let path = PathBuf::from(file);
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }

        if paths.is_empty() {
            return Err(resolution_error("fontconfig returned no candidates"));
        }

        info!(
            "Font resolved: \"{}\" {}px -> {} candidates (best: {})",
            family,
            size_px,
            paths.len(),
            paths[0].display()
        );
        debug!("Candidates: {:?}", paths);

        Ok(paths)
    }
}

/// Fixed list of font files, for callers that already know their fonts
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    pub paths: Vec<PathBuf>,
}

impl FontCatalog for StaticCatalog {
    fn resolve(&self, family: &str, size_px: u32) -> Result<Vec<PathBuf>> {
        if self.paths.is_empty() {
            return Err(FontError::Resolution {
                family: family.to_string(),
                size: size_px,
                reason: "no font files configured".to_string(),
            });
        }
        Ok(self.paths.clone())
    }
}
