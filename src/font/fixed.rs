//! 26.6 fixed-point helpers
//!
//! FreeType reports positions and advances in 1/64 pixel units.
//! The low 6 bits hold the fraction.

/// One pixel in 26.6 units
pub const ONE_PIXEL: i64 = 64;

/// 2D vector in 26.6 fixed point (same layout as `FT_Vector`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vector {
    pub x: i64,
    pub y: i64,
}

impl Vector {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Integer pixels to 26.6
    pub const fn from_pixels(x: i32, y: i32) -> Self {
        Self {
            x: (x as i64) << 6,
            y: (y as i64) << 6,
        }
    }
}

impl std::ops::AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Truncate a 26.6 value to whole device pixels
#[inline]
pub const fn to_pixels(v: i64) -> i64 {
    v >> 6
}

/// Round a 26.6 position to the nearest whole pixel
///
/// `(x + 31) & !63`: exact halves round down.
#[inline]
pub const fn snap_to_pixel(x: i64) -> i64 {
    (x + 31) & !63
}

/// Convert a design-unit advance delta into 26.6 pen units
///
/// Uses `(delta << 12) / units_per_em`. A zero `units_per_em`
/// (bitmap-only faces) yields no adjustment.
#[inline]
pub fn design_delta_to_26_6(delta: i32, units_per_em: u16) -> i64 {
    if units_per_em == 0 {
        return 0;
    }
    ((delta as i64) << 12) / units_per_em as i64
}
