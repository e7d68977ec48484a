//! Unit conversion utilities.
//!
//! Spreadsheet geometry mixes three unit systems: column widths in "characters"
//! of the default font, row heights in points, and drawing positions in EMUs.
//! Everything is routed through pixels at 96 DPI.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_PIXEL: i64 = 9_525;
pub const DEFAULT_DPI: f64 = 96.0;

/// Default row height in points (Calibri 11).
pub const DEFAULT_ROW_HEIGHT_PT: f64 = 15.0;
/// Default column width in characters (Calibri 11).
pub const DEFAULT_COL_WIDTH: f64 = 8.43;

#[inline]
pub fn px_to_emu(px: f64) -> i64 {
    (px * EMUS_PER_PIXEL as f64).round() as i64
}

#[inline]
pub fn pt_to_px(pt: f64) -> f64 {
    pt * 4.0 / 3.0
}

#[inline]
pub fn px_to_pt(px: f64) -> f64 {
    px * 0.75
}

#[inline]
pub fn pt_to_emu_f64(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64) as i64
}

/// Character-width metrics of the default font.
///
/// Column widths are expressed in multiples of the widest digit of the default
/// font plus a fixed cell padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMetrics {
    pub max_digit_width: u32,
    pub padding: u32,
}

impl Default for ColumnMetrics {
    fn default() -> Self {
        Self {
            max_digit_width: 7,
            padding: 5,
        }
    }
}

impl ColumnMetrics {
    /// Metrics for a font whose widest digit is `max_digit_width` pixels.
    pub fn with_max_digit_width(max_digit_width: u32) -> Self {
        Self {
            max_digit_width,
            padding: (max_digit_width + 2) / 4 * 2 + 1,
        }
    }

    /// Find the metrics that produce `width_px` as the default column width.
    ///
    /// Excel rounds the default width (8 digits plus padding) up to a multiple
    /// of 8 pixels, so only a discrete set of widths is reachable.
    pub fn from_default_width_px(width_px: u32) -> Option<Self> {
        (4..=48)
            .map(Self::with_max_digit_width)
            .find(|m| m.default_width_px() == width_px)
    }

    /// Default column width in pixels.
    pub fn default_width_px(&self) -> u32 {
        (8 * self.max_digit_width + self.padding).div_ceil(8) * 8
    }

    /// Convert a width in characters to pixels.
    pub fn width_to_px(&self, width: f64) -> u32 {
        let mdw = self.max_digit_width as f64;
        let padding = self.padding as f64;
        if width <= 0.0 {
            0
        } else if width < 1.0 {
            (width * (mdw + padding)).round() as u32
        } else {
            (width * mdw).round() as u32 + self.padding
        }
    }

    /// Convert a width in pixels to characters.
    pub fn px_to_width(&self, px: u32) -> f64 {
        let mdw = self.max_digit_width as f64;
        let padding = self.padding as f64;
        let px = px as f64;
        if px <= mdw + padding {
            px / (mdw + padding)
        } else {
            (px - padding) / mdw
        }
    }

    /// The width value Excel stores in `<col width="…">` for a user width.
    pub fn stored_width(&self, width: f64) -> f64 {
        let mdw = self.max_digit_width as f64;
        let padding = self.padding as f64;
        if width <= 0.0 {
            0.0
        } else if width < 1.0 {
            ((width * (mdw + padding)).round() / mdw * 256.0).floor() / 256.0
        } else {
            (((width * mdw).round() + padding) / mdw * 256.0).floor() / 256.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics() {
        let m = ColumnMetrics::default();
        assert_eq!(m.default_width_px(), 64);
        assert_eq!(m.width_to_px(DEFAULT_COL_WIDTH), 64);
        assert_eq!(m.stored_width(DEFAULT_COL_WIDTH), 9.140625);
        assert_eq!(m, ColumnMetrics::with_max_digit_width(7));
    }

    #[test]
    fn test_pixel_round_trip() {
        let m = ColumnMetrics::default();
        assert_eq!(m.width_to_px(m.px_to_width(200)), 200);
        assert_eq!(m.width_to_px(m.px_to_width(100)), 100);
        assert_eq!(m.width_to_px(m.px_to_width(10)), 10);
        assert_eq!(m.width_to_px(0.0), 0);
    }

    #[test]
    fn test_default_width_lookup() {
        assert_eq!(ColumnMetrics::from_default_width_px(64), Some(ColumnMetrics::default()));
        assert_eq!(
            ColumnMetrics::from_default_width_px(72).map(|m| m.max_digit_width),
            Some(8)
        );
        assert_eq!(ColumnMetrics::from_default_width_px(999), None);
        assert_eq!(ColumnMetrics::from_default_width_px(65), None);
    }

    #[test]
    fn test_point_pixel_conversion() {
        assert_eq!(pt_to_px(DEFAULT_ROW_HEIGHT_PT), 20.0);
        assert_eq!(px_to_pt(100.0), 75.0);
        assert_eq!(px_to_emu(1.0), 9525);
        assert_eq!(px_to_emu(96.0), EMUS_PER_INCH);
    }
}
