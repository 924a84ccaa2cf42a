//! Text shaping
//!
//! Runs rustybuzz with the ligature and kerning features over a whole
//! string before rasterization. The result is one entry per byte of the
//! input, carrying any horizontal advance adjustment in design units.
//!
//! Only the first face's tables are used: glyphs reached through fallback
//! faces are never shaped.

use super::face::ShapingTable;
use log::debug;
use rustybuzz::ttf_parser::GlyphId;
use std::str::FromStr;

/// OpenType features driven by the shaping pass
const FEATURES: [&str; 2] = ["liga", "kern"];

/// Positioning adjustment for one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    #[default]
    None,
    /// Horizontal advance delta in design units
    Adjust { x_advance: i32 },
}

/// One entry of a shaped run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedEntry {
    /// Raw byte of the input at this position
    pub code: u32,
    pub positioning: Positioning,
}

/// Shaping result, indexed by byte offset into the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedRun {
    entries: Vec<ShapedEntry>,
    shaped: bool,
}

impl ShapedRun {
    /// Run with no adjustments (no shaping table available)
    pub fn unshaped(text: &str) -> Self {
        let entries = text
            .bytes()
            .map(|b| ShapedEntry {
                code: b as u32,
                positioning: Positioning::None,
            })
            .collect();
        Self {
            entries,
            shaped: false,
        }
    }

    /// Whether shaping tables were applied to this run
    pub fn is_shaped(&self) -> bool {
        self.shaped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, byte_offset: usize) -> Option<&ShapedEntry> {
        self.entries.get(byte_offset)
    }

    /// Design-unit advance delta at `byte_offset`, if any
    pub fn x_advance_delta(&self, byte_offset: usize) -> Option<i32> {
        match self.entries.get(byte_offset)?.positioning {
            Positioning::Adjust { x_advance } => Some(x_advance),
            Positioning::None => None,
        }
    }

    /// Shaped run from per-glyph `(cluster, x_advance delta)` pairs
    ///
    /// Zero deltas leave the entry untouched. Several glyphs in one cluster
    /// accumulate; clusters outside the text are ignored.
    pub fn with_deltas<I>(text: &str, deltas: I) -> Self
    where
        I: IntoIterator<Item = (u32, i32)>,
    {
        let mut run = Self::unshaped(text);
        run.apply_deltas(deltas);
        run
    }

    fn apply_deltas<I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = (u32, i32)>,
    {
        self.shaped = true;
        for (cluster, delta) in deltas {
            if delta == 0 {
                continue;
            }
            let Some(entry) = self.entries.get_mut(cluster as usize) else {
                continue;
            };
            entry.positioning = match entry.positioning {
                Positioning::None => Positioning::Adjust { x_advance: delta },
                Positioning::Adjust { x_advance } => Positioning::Adjust {
                    x_advance: x_advance + delta,
                },
            };
        }
    }
}

/// Shape `text` with the first face's layout tables
pub fn shape(table: Option<&ShapingTable>, text: &str) -> ShapedRun {
    let mut run = ShapedRun::unshaped(text);

    let Some(face) = table.and_then(|t| t.face()) else {
        return run;
    };

    if text.is_empty() {
        return run;
    }

    let features: Vec<rustybuzz::Feature> = FEATURES
        .iter()
        .filter_map(|s| rustybuzz::Feature::from_str(s).ok())
        .collect();

    let mut buffer = rustybuzz::UnicodeBuffer::new();
    // cluster = byte offset
    for (offset, ch) in text.char_indices() {
        buffer.add(ch, offset as u32);
    }

    let glyph_buffer = rustybuzz::shape(&face, &features, buffer);

    let deltas: Vec<(u32, i32)> = glyph_buffer
        .glyph_infos()
        .iter()
        .zip(glyph_buffer.glyph_positions())
        .map(|(info, pos)| {
            let nominal = face
                .glyph_hor_advance(GlyphId(info.glyph_id as u16))
                .unwrap_or(0) as i32;
            (info.cluster, pos.x_advance - nominal)
        })
        .collect();

    run.apply_deltas(deltas);

    debug!(
        "Shaped {} bytes into {} glyphs, {} adjusted",
        text.len(),
        glyph_buffer.len(),
        run.entries
            .iter()
            .filter(|e| e.positioning != Positioning::None)
            .count()
    );

    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    const DEJAVU_SANS: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

    /// DejaVu Sans layout tables, or None on hosts without the font
    fn dejavu_sans() -> Option<ShapingTable> {
        let Ok(data) = std::fs::read(DEJAVU_SANS) else {
            eprintln!("{} not installed, skipping", DEJAVU_SANS);
            return None;
        };
        ShapingTable::open(Rc::new(data), 0)
    }

    #[test]
    fn test_shape_kerns_real_font() {
        let Some(table) = dejavu_sans() else {
            return;
        };
        let run = shape(Some(&table), "AV");
        assert!(run.is_shaped());
        assert_eq!(run.len(), 2);
        // DejaVu Sans kerns A-V by -131 units on the A
        assert_eq!(run.x_advance_delta(0), Some(-131));
        assert_eq!(run.x_advance_delta(1), None);
    }

    #[test]
    fn test_unshaped_entries_per_byte() {
        let run = ShapedRun::unshaped("a€");
        assert_eq!(run.len(), 4);
        assert!(!run.is_shaped());
        assert_eq!(run.get(0).unwrap().code, 'a' as u32);
        assert_eq!(run.get(1).unwrap().code, 0xE2);
        assert_eq!(run.x_advance_delta(0), None);
    }

    #[test]
    fn test_shape_without_table_is_unshaped() {
        let run = shape(None, "AVA");
        assert_eq!(run, ShapedRun::unshaped("AVA"));
    }

    #[test]
    fn test_apply_deltas_marks_adjusted_entries() {
        let mut run = ShapedRun::unshaped("AVAT");
        run.apply_deltas([(0, -80), (1, 0), (2, -40), (3, 0)]);
        assert!(run.is_shaped());
        assert_eq!(run.x_advance_delta(0), Some(-80));
        assert_eq!(run.get(1).unwrap().positioning, Positioning::None);
        assert_eq!(run.x_advance_delta(2), Some(-40));
        assert_eq!(run.x_advance_delta(3), None);
    }

    #[test]
    fn test_apply_deltas_ligature_components_untouched() {
        // "ffi" ligated into one glyph at cluster 0
        let mut run = ShapedRun::unshaped("ffi!");
        run.apply_deltas([(0, 25), (3, 0)]);
        assert_eq!(run.x_advance_delta(0), Some(25));
        assert_eq!(run.x_advance_delta(1), None);
        assert_eq!(run.x_advance_delta(2), None);
    }

    #[test]
    fn test_apply_deltas_accumulates_and_ignores_out_of_range() {
        let run = ShapedRun::with_deltas("ab", [(1, 10), (1, 5), (9, 100)]);
        assert!(run.is_shaped());
        assert_eq!(run.x_advance_delta(1), Some(15));
        assert_eq!(run.len(), 2);
    }
}
