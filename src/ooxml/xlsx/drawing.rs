//! Placement of floating objects on the cell grid.
//!
//! Objects are positioned by a top-left cell plus a pixel offset and a pixel
//! size. When the package is written those are resolved against the column
//! widths and row heights into a two-cell anchor.

use crate::common::unit::px_to_emu;
use crate::ooxml::charts::Chart;
use crate::ooxml::xlsx::image::Image;
use crate::ooxml::xlsx::reference::{COL_MAX, ColNum, ROW_MAX, RowNum};

/// Pixel geometry of the grid.
pub(crate) trait GridMetrics {
    fn column_width_px(&self, col: ColNum) -> u32;
    fn row_height_px(&self, row: RowNum) -> u32;
}

/// One corner of an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AnchorCell {
    pub col: ColNum,
    pub col_offset: f64,
    pub row: RowNum,
    pub row_offset: f64,
}

impl AnchorCell {
    pub(crate) fn col_offset_emu(&self) -> i64 {
        px_to_emu(self.col_offset)
    }

    pub(crate) fn row_offset_emu(&self) -> i64 {
        px_to_emu(self.row_offset)
    }
}

/// A resolved two-cell anchor plus the absolute position Excel also stores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DrawingAnchor {
    pub from: AnchorCell,
    pub to: AnchorCell,
    pub x_abs: f64,
    pub y_abs: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawingAnchor {
    /// Resolve an object of `width` x `height` pixels placed at `(row, col)`
    /// shifted by `(x_offset, y_offset)` pixels.
    pub(crate) fn resolve(
        grid: &impl GridMetrics,
        row: RowNum,
        col: ColNum,
        x_offset: f64,
        y_offset: f64,
        width: f64,
        height: f64,
    ) -> DrawingAnchor {
        let (col_start, x1) = walk_columns(grid, col, x_offset);
        let (row_start, y1) = walk_rows(grid, row, y_offset);

        let x_abs = (0..col_start)
            .map(|c| grid.column_width_px(c) as f64)
            .sum::<f64>()
            + x1;
        let y_abs = (0..row_start)
            .map(|r| grid.row_height_px(r) as f64)
            .sum::<f64>()
            + y1;

        let (col_end, x2) = walk_columns(grid, col_start, x1 + width);
        let (row_end, y2) = walk_rows(grid, row_start, y1 + height);

        DrawingAnchor {
            from: AnchorCell {
                col: col_start,
                col_offset: x1,
                row: row_start,
                row_offset: y1,
            },
            to: AnchorCell {
                col: col_end,
                col_offset: x2,
                row: row_end,
                row_offset: y2,
            },
            x_abs,
            y_abs,
            width,
            height,
        }
    }
}

/// Step right from `col` while the remaining offset spans whole columns.
fn walk_columns(grid: &impl GridMetrics, mut col: ColNum, mut offset: f64) -> (ColNum, f64) {
    while col < COL_MAX - 1 {
        let width = grid.column_width_px(col) as f64;
        if offset < width {
            break;
        }
        offset -= width;
        col += 1;
    }
    (col, offset)
}

fn walk_rows(grid: &impl GridMetrics, mut row: RowNum, mut offset: f64) -> (RowNum, f64) {
    while row < ROW_MAX - 1 {
        let height = grid.row_height_px(row) as f64;
        if offset < height {
            break;
        }
        offset -= height;
        row += 1;
    }
    (row, offset)
}

/// An image floating over the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedImage {
    pub row: RowNum,
    pub col: ColNum,
    pub x_offset: f64,
    pub y_offset: f64,
    pub image: Image,
}

/// A chart floating over the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedChart {
    pub row: RowNum,
    pub col: ColNum,
    pub x_offset: f64,
    pub y_offset: f64,
    pub chart: Chart,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 64 x 20 pixel cells, with column 2 hidden.
    struct Uniform;

    impl GridMetrics for Uniform {
        fn column_width_px(&self, col: ColNum) -> u32 {
            if col == 2 { 0 } else { 64 }
        }

        fn row_height_px(&self, _row: RowNum) -> u32 {
            20
        }
    }

    #[test]
    fn test_object_inside_one_cell() {
        let anchor = DrawingAnchor::resolve(&Uniform, 1, 1, 10.0, 5.0, 20.0, 10.0);
        assert_eq!(anchor.from.col, 1);
        assert_eq!(anchor.from.col_offset, 10.0);
        assert_eq!(anchor.to.col, 1);
        assert_eq!(anchor.to.col_offset, 30.0);
        assert_eq!(anchor.to.row, 1);
        assert_eq!(anchor.to.row_offset, 15.0);
        assert_eq!((anchor.x_abs, anchor.y_abs), (74.0, 25.0));
    }

    #[test]
    fn test_offset_spills_into_next_cells() {
        let anchor = DrawingAnchor::resolve(&Uniform, 0, 0, 70.0, 45.0, 100.0, 20.0);
        assert_eq!((anchor.from.col, anchor.from.col_offset), (1, 6.0));
        assert_eq!((anchor.from.row, anchor.from.row_offset), (2, 5.0));
        // 6 + 100 crosses column 1, skips hidden column 2, ends in column 3.
        assert_eq!((anchor.to.col, anchor.to.col_offset), (3, 42.0));
        assert_eq!((anchor.to.row, anchor.to.row_offset), (3, 5.0));
        assert_eq!(anchor.from.col_offset_emu(), 6 * 9525);
    }
}
