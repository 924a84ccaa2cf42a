//! Color parsing utilities
//!
//! Hex colors from the config file and mask blending for the canvas.

/// RGB color, 8 bits per channel
pub type Rgb = [u8; 3];

/// Parse 6-digit hex color (e.g., "ff0000" -> [255, 0, 0])
/// Also supports 3-digit short format (e.g., "f00" -> [255, 0, 0])
/// Returns None on invalid input.
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            // Short format: expand F -> FF
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// Parse hex color, falling back to `default` on invalid input
pub fn parse_hex_color_or(hex: &str, default: Rgb) -> Rgb {
    parse_hex_color(hex).unwrap_or(default)
}

/// Blend `source` over `base` with 8-bit coverage
///
/// Uses rounded integer math so alpha 0 keeps `base` and 255 gives `source`.
#[inline]
pub fn blend_mask(base: Rgb, source: Rgb, alpha: u8) -> Rgb {
    let a = alpha as u32;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = source[i] as u32 * a + base[i] as u32 * (255 - a);
        out[i] = ((v + 127) / 255) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff0000"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("00ff00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("#0000ff"), Some([0, 0, 255]));
        assert_eq!(parse_hex_color("f00"), Some([255, 0, 0]));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("€€"), None);
        assert_eq!(parse_hex_color_or("zzz", [1, 2, 3]), [1, 2, 3]);
    }

    #[test]
    fn test_blend_mask() {
        let white = [255, 255, 255];
        let black = [0, 0, 0];
        assert_eq!(blend_mask(white, black, 0), white);
        assert_eq!(blend_mask(white, black, 255), black);
        assert_eq!(blend_mask(white, black, 128), [127, 127, 127]);
    }
}
