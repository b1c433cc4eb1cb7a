//! Greedy row packing of glyph cells into a power-of-two canvas.
//!
//! Sizing and placement are two walks over the same ordered widths. Both go
//! through [`AtlasPacker::walk_rows`], so the row count used to size the
//! canvas is exactly the number of rows placement ends up using.
//!
//! Cell geometry for a glyph of advance `w` on row `r` (0-based):
//!
//! ```text
//! x in [x, x + w)                  with xb free pixels on both sides
//! y in [yb + r * line, yb + r * line + font_height)
//! line = font_height + yb
//! ```

use spritefont_core::profiling::profile_function;

use crate::error::{BuildError, BuildResult};

/// Largest accepted glyph border, in pixels.
pub const MAX_GLYPH_BORDER: i32 = 10;

/// Smallest power of two that is `>= value`, with `next_power_of_two(0) == 0`.
///
/// Negative values violate the contract and yield [`BuildError::InvalidArgument`].
pub fn next_power_of_two(value: i64) -> BuildResult<u64> {
    match value {
        0 => Ok(0),
        v if v < 0 => Err(BuildError::invalid_argument(format!(
            "next_power_of_two of negative value {}",
            v
        ))),
        v => Ok((v as u64).next_power_of_two()),
    }
}

/// Validate a glyph border against `0..=MAX_GLYPH_BORDER`.
pub fn check_border(axis: &'static str, value: i32) -> BuildResult<u32> {
    if (0..=MAX_GLYPH_BORDER).contains(&value) {
        Ok(value as u32)
    } else {
        Err(BuildError::InvalidBorder { axis, value })
    }
}

/// Top-left pixel of a glyph cell in the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Output of [`AtlasPacker::pack`]: canvas size and one placement per input width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedAtlas {
    pub width: u32,
    pub height: u32,
    pub rows: u32,
    pub placements: Vec<Placement>,
}

/// Decides the canvas size and glyph cell positions for one font.
#[derive(Debug, Clone)]
pub struct AtlasPacker {
    font_height: u32,
    glyph_x_border: u32,
    glyph_y_border: u32,
    max_dimension: u32,
}

impl AtlasPacker {
    /// Default bound on canvas width and height.
    pub const DEFAULT_MAX_DIMENSION: u32 = 16384;

    pub fn new(font_height: i32, glyph_x_border: i32, glyph_y_border: i32) -> BuildResult<Self> {
        if font_height <= 0 {
            return Err(BuildError::invalid_argument(format!(
                "font height must be positive, got {}",
                font_height
            )));
        }
        Ok(Self {
            font_height: font_height as u32,
            glyph_x_border: check_border("x", glyph_x_border)?,
            glyph_y_border: check_border("y", glyph_y_border)?,
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
        })
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Vertical distance between consecutive rows.
    pub fn line_height(&self) -> u32 {
        self.font_height + self.glyph_y_border
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Walk `widths` in order, wrapping whenever the next padded cell would cross `row_width`.
    ///
    /// Calls `visit(index, x, row)` for every glyph and returns the number of
    /// rows used, or `None` when some glyph plus its borders is wider than
    /// `row_width` and no amount of wrapping could place it.
    fn walk_rows(
        &self,
        widths: &[u32],
        row_width: u64,
        mut visit: impl FnMut(usize, u64, u32),
    ) -> Option<u32> {
        let xb = u64::from(self.glyph_x_border);
        let mut x = xb;
        let mut row = 0u32;
        let mut row_is_empty = true;

        for (index, &width) in widths.iter().enumerate() {
            let width = u64::from(width);
            if xb + width + xb > row_width {
                return None;
            }
            if !row_is_empty && x + width + xb > row_width {
                row += 1;
                x = xb;
            }
            visit(index, x, row);
            x += width + xb;
            row_is_empty = false;
        }

        if widths.is_empty() { Some(0) } else { Some(row + 1) }
    }

    /// Rows needed to lay out `widths` in a canvas `max_row_width` pixels wide.
    ///
    /// `None` is the "does not fit" signal: a single glyph is too wide, so
    /// the caller has to grow the row width.
    pub fn row_count(&self, widths: &[u32], max_row_width: u64) -> Option<u32> {
        self.walk_rows(widths, max_row_width, |_, _, _| {})
    }

    /// Canvas height needed for `rows` rows, before rounding to a power of two.
    fn required_height(&self, rows: u32) -> u64 {
        u64::from(self.glyph_y_border) + u64::from(rows) * u64::from(self.line_height())
    }

    /// Smallest power-of-two canvas, no taller than wide, that fits every glyph.
    pub fn canvas_size(&self, widths: &[u32]) -> BuildResult<(u32, u32)> {
        profile_function!();
        let (width, height, _) = self.size_canvas(widths)?;
        Ok((width, height))
    }

    fn size_canvas(&self, widths: &[u32]) -> BuildResult<(u32, u32, u32)> {
        if widths.is_empty() {
            return Err(BuildError::invalid_argument("no glyphs to pack"));
        }

        let xb = u64::from(self.glyph_x_border);
        let total_padded_width = xb + widths.iter().map(|&w| u64::from(w) + xb).sum::<u64>();
        // isqrt of a u64 is at most 2^32, which always fits an i64
        let mut row_width = next_power_of_two(total_padded_width.isqrt() as i64)?.max(1);
        let max = u64::from(self.max_dimension);

        loop {
            if row_width > max {
                return Err(BuildError::AtlasTooLarge {
                    requested: row_width,
                    max_dimension: self.max_dimension,
                });
            }
            match self.row_count(widths, row_width) {
                None => {
                    tracing::trace!(row_width, "a glyph is wider than the row, growing");
                    row_width *= 2;
                }
                Some(rows) => {
                    let required = self.required_height(rows);
                    if required > row_width {
                        tracing::trace!(row_width, rows, required, "canvas too tall, growing");
                        row_width *= 2;
                    } else {
                        // required <= row_width <= max, so both fit a u32
                        let height = next_power_of_two(required as i64)?;
                        return Ok((row_width as u32, height as u32, rows));
                    }
                }
            }
        }
    }

    /// Assign each glyph its cell's top-left corner in a canvas `canvas_width` wide.
    ///
    /// Returns `None` when a glyph cannot fit `canvas_width` at all.
    pub fn place(&self, widths: &[u32], canvas_width: u32) -> Option<Vec<Placement>> {
        profile_function!();
        let line_height = self.line_height();
        let mut placements = Vec::with_capacity(widths.len());
        self.walk_rows(widths, u64::from(canvas_width), |_, x, row| {
            // baseline of the row sits at (row + 1) * line; the cell starts font_height above it
            let bottom = (row + 1) * line_height;
            placements.push(Placement {
                x: x as u32,
                y: bottom - self.font_height,
            });
        })?;
        Some(placements)
    }

    /// Size the canvas and place every glyph, in input order.
    pub fn pack(&self, widths: &[u32]) -> BuildResult<PackedAtlas> {
        profile_function!();
        let (width, height, rows) = self.size_canvas(widths)?;
        let placements = self
            .place(widths, width)
            .ok_or_else(|| BuildError::invalid_argument("placement disagrees with sizing"))?;
        tracing::debug!(
            glyphs = widths.len(),
            width,
            height,
            rows,
            "packed glyph cells"
        );
        Ok(PackedAtlas {
            width,
            height,
            rows,
            placements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0).unwrap(), 0);
        assert_eq!(next_power_of_two(1).unwrap(), 1);
        assert_eq!(next_power_of_two(2).unwrap(), 2);
        assert_eq!(next_power_of_two(3).unwrap(), 4);
        assert_eq!(next_power_of_two(1000).unwrap(), 1024);
        assert_eq!(next_power_of_two(1024).unwrap(), 1024);
        assert!(matches!(
            next_power_of_two(-1),
            Err(BuildError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_border_bounds() {
        assert!(AtlasPacker::new(12, 0, 10).is_ok());
        assert!(matches!(
            AtlasPacker::new(12, 11, 0),
            Err(BuildError::InvalidBorder { axis: "x", value: 11 })
        ));
        assert!(matches!(
            AtlasPacker::new(12, 0, -1),
            Err(BuildError::InvalidBorder { axis: "y", value: -1 })
        ));
        assert!(AtlasPacker::new(0, 0, 0).is_err());
    }

    #[test]
    fn test_row_count_fixed_pitch_ascii() {
        let packer = AtlasPacker::new(12, 0, 0).unwrap();
        let widths = vec![6; 95];
        // ten 6px cells fill 60 of 64 pixels
        assert_eq!(packer.row_count(&widths, 64), Some(10));
        assert_eq!(packer.row_count(&widths, 32), Some(19));
        assert_eq!(packer.row_count(&widths, 128), Some(5));
    }

    #[test]
    fn test_canvas_size_fixed_pitch_ascii() {
        let packer = AtlasPacker::new(12, 0, 0).unwrap();
        let widths = vec![6; 95];
        // 32 and 64 wide canvases would be taller than wide; 128 needs 5 rows = 60px
        assert_eq!(packer.canvas_size(&widths).unwrap(), (128, 64));
    }

    #[test]
    fn test_oversized_glyph_forces_growth() {
        let packer = AtlasPacker::new(12, 0, 0).unwrap();
        let widths = [5000];
        for row_width in [64, 128, 1024, 4096] {
            assert_eq!(packer.row_count(&widths, row_width), None);
        }
        assert_eq!(packer.row_count(&widths, 5000), Some(1));
        assert_eq!(packer.canvas_size(&widths).unwrap(), (8192, 16));
    }

    #[test]
    fn test_oversized_glyph_hits_bound() {
        let packer = AtlasPacker::new(12, 0, 0).unwrap().with_max_dimension(4096);
        let err = packer.canvas_size(&[5000]).unwrap_err();
        assert!(matches!(
            err,
            BuildError::AtlasTooLarge {
                requested: 8192,
                max_dimension: 4096
            }
        ));
    }

    #[test]
    fn test_borders_count_on_both_sides() {
        let packer = AtlasPacker::new(10, 2, 3).unwrap();
        // 2 + 10 + 2 + 10 + 2 = 26 fits 32; a third cell does not
        assert_eq!(packer.row_count(&[10, 10], 32), Some(1));
        assert_eq!(packer.row_count(&[10, 10, 10], 32), Some(2));
        // a lone 30px glyph needs 34px with borders
        assert_eq!(packer.row_count(&[30], 32), None);
    }

    #[test]
    fn test_place_wraps_rows() {
        let packer = AtlasPacker::new(10, 2, 3).unwrap();
        let placements = packer.place(&[10, 10, 10], 32).unwrap();
        assert_eq!(
            placements,
            vec![
                Placement { x: 2, y: 3 },
                Placement { x: 14, y: 3 },
                Placement { x: 2, y: 16 },
            ]
        );
    }

    #[test]
    fn test_pack_keeps_cells_inside_canvas() {
        let packer = AtlasPacker::new(17, 3, 4).unwrap();
        let widths: Vec<u32> = (0..200).map(|i| 3 + (i * 7) % 19).collect();
        let packed = packer.pack(&widths).unwrap();

        assert!(packed.width.is_power_of_two());
        assert!(packed.height.is_power_of_two());
        assert!(packed.height <= packed.width);
        for (placement, &width) in packed.placements.iter().zip(&widths) {
            assert!(placement.x >= 3);
            assert!(placement.x + width + 3 <= packed.width);
            assert!(placement.y + 17 <= packed.height);
        }
        let last_row = packed.placements.iter().map(|p| p.y).max().unwrap();
        assert_eq!(last_row, 4 + (packed.rows - 1) * packer.line_height());
    }

    #[test]
    fn test_zero_width_glyphs_still_occupy_a_row() {
        let packer = AtlasPacker::new(8, 0, 0).unwrap();
        assert_eq!(packer.row_count(&[0, 0], 1), Some(1));
        let packed = packer.pack(&[0, 0]).unwrap();
        assert_eq!(packed.placements, vec![Placement { x: 0, y: 0 }; 2]);
        assert_eq!((packed.width, packed.height), (8, 8));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let packer = AtlasPacker::new(8, 0, 0).unwrap();
        assert!(matches!(
            packer.pack(&[]),
            Err(BuildError::InvalidArgument { .. })
        ));
    }
}
