//! Unit conversion utilities.
//!
//! DrawingML positions and sizes are expressed in EMUs (English Metric Units);
//! font sizes are expressed in hundredths of a point.

pub const EMUS_PER_INCH: i64 = 914_400;

#[inline]
pub fn inch_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

/// Font size in points to the `sz` attribute unit (1/100 pt).
#[inline]
pub fn pt_to_font_size(pt: f64) -> u32 {
    (pt * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_to_emu() {
        assert_eq!(inch_to_emu(1.0), 914_400);
        assert_eq!(inch_to_emu(7.5), 6_858_000);
        assert_eq!(inch_to_emu(10.0), 9_144_000);
    }

    #[test]
    fn test_pt_to_font_size() {
        assert_eq!(pt_to_font_size(44.0), 4400);
        assert_eq!(pt_to_font_size(18.5), 1850);
    }
}
