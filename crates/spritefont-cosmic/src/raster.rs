//! Glyph rasterization into an 8-bit grey canvas with swash.

use std::io::Cursor;

use cosmic_text::{SwashCache, SwashContent};
use image::{GrayImage, ImageFormat, Luma};
use spritefont::{BuildResult, Rasterizer};
use spritefont_core::profiling::profile_function;

use crate::error::{CosmicError, CosmicResult};
use crate::font::{FontSystem, SpriteFontFace};
use crate::metrics::shape_character;

/// Pixel layout of a glyph image handed to [`blit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coverage {
    /// One alpha byte per pixel.
    Mask,
    /// RGB coverage per pixel plus an unused byte.
    Subpixel,
    /// RGBA colour glyph; the alpha channel is used.
    Color,
}

impl From<SwashContent> for Coverage {
    fn from(content: SwashContent) -> Self {
        match content {
            SwashContent::Mask => Coverage::Mask,
            SwashContent::SubpixelMask => Coverage::Subpixel,
            SwashContent::Color => Coverage::Color,
        }
    }
}

impl Coverage {
    fn bytes_per_pixel(self) -> usize {
        match self {
            Coverage::Mask => 1,
            Coverage::Subpixel | Coverage::Color => 4,
        }
    }

    fn value(self, pixel: &[u8]) -> u8 {
        match self {
            Coverage::Mask => pixel[0],
            Coverage::Subpixel => pixel[0].max(pixel[1]).max(pixel[2]),
            Coverage::Color => pixel[3],
        }
    }
}

/// Copy a `width` x `height` glyph image into `canvas` with its top-left at (`left`, `top`).
///
/// Overlapping coverage keeps the brighter value and pixels outside the canvas
/// are clipped. Returns the number of canvas pixels touched.
pub(crate) fn blit(
    canvas: &mut GrayImage,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    coverage: Coverage,
    data: &[u8],
) -> usize {
    let stride = coverage.bytes_per_pixel();
    let mut touched = 0;
    for row in 0..height {
        let y = top + i64::from(row);
        if y < 0 || y >= i64::from(canvas.height()) {
            continue;
        }
        for column in 0..width {
            let x = left + i64::from(column);
            if x < 0 || x >= i64::from(canvas.width()) {
                continue;
            }
            let start = (row as usize * width as usize + column as usize) * stride;
            let Some(pixel) = data.get(start..start + stride) else {
                continue;
            };
            let value = coverage.value(pixel);
            let Luma([current]) = canvas.get_pixel_mut(x as u32, y as u32);
            *current = (*current).max(value);
            touched += 1;
        }
    }
    touched
}

/// [`Rasterizer`] that paints cosmic-text glyphs and encodes the canvas as a greyscale PNG.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    canvas: Option<GrayImage>,
}

impl CosmicRasterizer {
    pub fn new(font_system: &FontSystem) -> Self {
        Self {
            font_system: font_system.clone(),
            swash_cache: SwashCache::new(),
            canvas: None,
        }
    }

    /// The canvas being painted, between `begin` and `finish`.
    pub fn canvas(&self) -> Option<&GrayImage> {
        self.canvas.as_ref()
    }

    fn paint_character(&mut self, face: &SpriteFontFace, character: u32, x: u32, y: u32) -> CosmicResult<()> {
        face.validate()?;
        let canvas = self.canvas.as_mut().ok_or(CosmicError::CanvasNotStarted)?;
        let mut font_system = self.font_system.inner().write()?;

        let Some(buffer) = shape_character(&mut font_system, face, character) else {
            tracing::warn!(character, "codepoint is not a scalar value, leaving its cell empty");
            return Ok(());
        };

        let mut touched = 0;
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                // run.line_y is the baseline, measured from the top of the cell
                let physical = glyph.physical((x as f32, y as f32 + run.line_y), 1.0);
                let Some(image) = self.swash_cache.get_image(&mut font_system, physical.cache_key) else {
                    continue;
                };
                touched += blit(
                    canvas,
                    i64::from(physical.x) + i64::from(image.placement.left),
                    i64::from(physical.y) - i64::from(image.placement.top),
                    image.placement.width,
                    image.placement.height,
                    Coverage::from(image.content),
                    &image.data,
                );
            }
        }

        if touched == 0 && char::from_u32(character).is_some_and(|c| !c.is_whitespace() && !c.is_control()) {
            tracing::warn!(character, font = %face, "glyph painted no pixels");
        }
        Ok(())
    }

    fn encode(canvas: GrayImage) -> CosmicResult<Vec<u8>> {
        let mut png = Vec::new();
        image::DynamicImage::ImageLuma8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

impl Rasterizer<SpriteFontFace> for CosmicRasterizer {
    fn begin(&mut self, width: u32, height: u32) -> BuildResult<()> {
        tracing::debug!(width, height, "allocating glyph canvas");
        self.canvas = Some(GrayImage::new(width, height));
        Ok(())
    }

    fn paint(&mut self, font: &SpriteFontFace, character: u32, x: u32, y: u32) -> BuildResult<()> {
        profile_function!();
        Ok(self.paint_character(font, character, x, y)?)
    }

    fn finish(&mut self) -> BuildResult<Vec<u8>> {
        profile_function!();
        let canvas = self.canvas.take().ok_or(CosmicError::CanvasNotStarted)?;
        let png = Self::encode(canvas)?;
        tracing::debug!(bytes = png.len(), "encoded glyph canvas");
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontDatabase;

    #[test]
    fn test_blit_mask_at_offset() {
        let mut canvas = GrayImage::new(4, 4);
        let touched = blit(&mut canvas, 1, 2, 2, 1, Coverage::Mask, &[10, 200]);
        assert_eq!(touched, 2);
        assert_eq!(canvas.get_pixel(1, 2).0, [10]);
        assert_eq!(canvas.get_pixel(2, 2).0, [200]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_blit_clips_to_canvas() {
        let mut canvas = GrayImage::new(2, 2);
        let data = [255u8; 9];
        let touched = blit(&mut canvas, -1, -1, 3, 3, Coverage::Mask, &data);
        assert_eq!(touched, 4);
        assert!(canvas.pixels().all(|p| p.0 == [255]));
    }

    #[test]
    fn test_blit_keeps_brighter_coverage() {
        let mut canvas = GrayImage::new(1, 1);
        blit(&mut canvas, 0, 0, 1, 1, Coverage::Mask, &[180]);
        blit(&mut canvas, 0, 0, 1, 1, Coverage::Mask, &[20]);
        assert_eq!(canvas.get_pixel(0, 0).0, [180]);
    }

    #[test]
    fn test_blit_color_uses_alpha() {
        let mut canvas = GrayImage::new(2, 1);
        blit(&mut canvas, 0, 0, 2, 1, Coverage::Color, &[255, 0, 0, 64, 0, 0, 0, 128]);
        assert_eq!(canvas.get_pixel(0, 0).0, [64]);
        assert_eq!(canvas.get_pixel(1, 0).0, [128]);

        let mut subpixel = GrayImage::new(1, 1);
        blit(&mut subpixel, 0, 0, 1, 1, Coverage::Subpixel, &[10, 90, 40, 0]);
        assert_eq!(subpixel.get_pixel(0, 0).0, [90]);
    }

    #[test]
    fn test_blit_ignores_short_data() {
        let mut canvas = GrayImage::new(2, 2);
        assert_eq!(blit(&mut canvas, 0, 0, 2, 2, Coverage::Mask, &[1, 2]), 2);
    }

    #[test]
    fn test_finish_without_begin() {
        let fonts = FontSystem::new(FontDatabase::empty());
        let mut rasterizer = CosmicRasterizer::new(&fonts);
        assert!(rasterizer.finish().is_err());
    }

    #[test]
    fn test_blank_canvas_encodes_as_png() {
        let fonts = FontSystem::new(FontDatabase::empty());
        let mut rasterizer = CosmicRasterizer::new(&fonts);
        rasterizer.begin(64, 32).unwrap();
        assert_eq!(rasterizer.canvas().map(|c| c.dimensions()), Some((64, 32)));

        let png = rasterizer.finish().unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
        assert!(decoded.to_luma8().pixels().all(|p| p.0 == [0]));
        assert!(rasterizer.canvas().is_none());
    }
}
