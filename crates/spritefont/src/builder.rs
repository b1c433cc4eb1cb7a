//! The build pipeline: receipt in, sprite font atlas out.
//!
//! Glyph measurement and pixel work are delegated to two collaborators so
//! the pipeline itself only decides geometry:
//!
//! - [`GlyphMetricsSource`] reports advance width and line height per character.
//! - [`Rasterizer`] paints characters at the positions the packer chose and
//!   encodes the finished canvas.

use spritefont_core::profiling::{self, profile_function, profile_scope};

use crate::chars::{self, CharRange};
use crate::charset::CharacterSet;
use crate::config::BuilderConfig;
use crate::error::{BuildError, BuildResult};
use crate::glyph::{Glyph, SpriteFontAtlas};
use crate::packer::{AtlasPacker, check_border};

/// Integer metrics of one character, as reported by a [`GlyphMetricsSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    pub advance_width: i32,
    pub line_height: i32,
}

impl GlyphMetrics {
    pub fn new(advance_width: i32, line_height: i32) -> Self {
        Self {
            advance_width,
            line_height,
        }
    }
}

/// Measures characters of a font handle `F`.
pub trait GlyphMetricsSource<F: ?Sized> {
    fn measure(&mut self, font: &F, character: u32) -> BuildResult<GlyphMetrics>;
}

/// Paints characters of a font handle `F` into a canvas.
///
/// The builder calls [`begin`](Rasterizer::begin) once with the final canvas
/// size, [`paint`](Rasterizer::paint) once per character in ascending
/// character order, then [`finish`](Rasterizer::finish).
pub trait Rasterizer<F: ?Sized> {
    fn begin(&mut self, width: u32, height: u32) -> BuildResult<()>;

    /// Paint `character` with the top-left of its cell at (`x`, `y`).
    /// The cell is `font_height` pixels tall.
    fn paint(&mut self, font: &F, character: u32, x: u32, y: u32) -> BuildResult<()>;

    /// Encode the canvas, typically as PNG.
    fn finish(&mut self) -> BuildResult<Vec<u8>>;
}

impl<F: ?Sized, T: GlyphMetricsSource<F> + ?Sized> GlyphMetricsSource<F> for &mut T {
    fn measure(&mut self, font: &F, character: u32) -> BuildResult<GlyphMetrics> {
        (**self).measure(font, character)
    }
}

impl<F: ?Sized, T: Rasterizer<F> + ?Sized> Rasterizer<F> for &mut T {
    fn begin(&mut self, width: u32, height: u32) -> BuildResult<()> {
        (**self).begin(width, height)
    }

    fn paint(&mut self, font: &F, character: u32, x: u32, y: u32) -> BuildResult<()> {
        (**self).paint(font, character, x, y)
    }

    fn finish(&mut self) -> BuildResult<Vec<u8>> {
        (**self).finish()
    }
}

/// The immutable inputs of one build.
///
/// # Example
///
/// ```
/// use spritefont::{CharRange, SpriteFontReceipt};
///
/// let receipt = SpriteFontReceipt::new("Mono 12", vec![CharRange::new(32, 126)?], '?' as u32)
///     .with_borders(1, 1);
/// assert_eq!(receipt.glyph_x_border, 1);
/// # Ok::<(), spritefont::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFontReceipt<F> {
    pub font: F,
    pub ranges: Vec<CharRange>,
    pub default_character: u32,
    /// Padding left and right of every glyph, 0..=10.
    pub glyph_x_border: i32,
    /// Padding above every glyph, 0..=10.
    pub glyph_y_border: i32,
}

impl<F> SpriteFontReceipt<F> {
    /// A receipt with no glyph borders.
    pub fn new(font: F, ranges: Vec<CharRange>, default_character: u32) -> Self {
        Self {
            font,
            ranges,
            default_character,
            glyph_x_border: 0,
            glyph_y_border: 0,
        }
    }

    pub fn with_borders(mut self, glyph_x_border: i32, glyph_y_border: i32) -> Self {
        self.glyph_x_border = glyph_x_border;
        self.glyph_y_border = glyph_y_border;
        self
    }

    /// Check the borders and the character domain without building anything.
    pub fn validate(&self) -> BuildResult<()> {
        check_border("x", self.glyph_x_border)?;
        check_border("y", self.glyph_y_border)?;
        CharacterSet::resolve(&chars::merge(&self.ranges), self.default_character).map(|_| ())
    }
}

/// Builds sprite fonts with a pair of collaborators.
#[derive(Debug)]
pub struct SpriteFontBuilder<M, R> {
    config: BuilderConfig,
    metrics: M,
    rasterizer: R,
}

impl<M, R> SpriteFontBuilder<M, R> {
    pub fn new(metrics: M, rasterizer: R) -> Self {
        Self::with_config(BuilderConfig::default(), metrics, rasterizer)
    }

    pub fn with_config(config: BuilderConfig, metrics: M, rasterizer: R) -> Self {
        Self {
            config,
            metrics,
            rasterizer,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn metrics_mut(&mut self) -> &mut M {
        &mut self.metrics
    }

    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    pub fn into_parts(self) -> (M, R) {
        (self.metrics, self.rasterizer)
    }

    /// Build one atlas from `receipt`.
    pub fn build<F>(&mut self, receipt: &SpriteFontReceipt<F>) -> BuildResult<SpriteFontAtlas>
    where
        M: GlyphMetricsSource<F>,
        R: Rasterizer<F>,
    {
        profile_function!();
        check_border("x", receipt.glyph_x_border)?;
        check_border("y", receipt.glyph_y_border)?;

        let merged = chars::merge(&receipt.ranges);
        let set = CharacterSet::resolve(&merged, receipt.default_character)?;
        tracing::debug!(
            ranges = receipt.ranges.len(),
            merged = merged.len(),
            characters = set.len(),
            default_index = set.default_index(),
            "resolved character set"
        );

        let measured = self.measure_all(&receipt.font, set.characters())?;
        let layout = FontLayout::from_metrics(set.characters(), &measured)?;
        tracing::debug!(
            font_height = layout.font_height,
            character_width = layout.character_width,
            "measured glyphs"
        );

        let packer = AtlasPacker::new(layout.font_height, receipt.glyph_x_border, receipt.glyph_y_border)?
            .with_max_dimension(self.config.max_canvas_dimension);
        let packed = packer.pack(&layout.widths)?;

        let bitmap = {
            profile_scope!("rasterize");
            self.rasterizer.begin(packed.width, packed.height)?;
            for (&character, placement) in set.characters().iter().zip(&packed.placements) {
                self.rasterizer
                    .paint(&receipt.font, character, placement.x, placement.y)?;
            }
            self.rasterizer.finish()?
        };

        let glyphs: Vec<Glyph> = set
            .characters()
            .iter()
            .zip(&packed.placements)
            .zip(&layout.widths)
            .map(|((&character, placement), &width)| {
                let stored = if width as i32 == layout.character_width {
                    0
                } else {
                    // bounded by i16::MAX in FontLayout::from_metrics
                    width as i16
                };
                Glyph::new(character, placement.x as i32, placement.y as i32, stored)
            })
            .collect();

        let atlas = SpriteFontAtlas::new(
            layout.font_height,
            set.default_index() as i32,
            layout.character_width,
            glyphs,
            bitmap,
            receipt.glyph_x_border,
            receipt.glyph_y_border,
        )?;

        tracing::debug!(
            glyphs = atlas.glyphs().len(),
            width = packed.width,
            height = packed.height,
            bitmap_bytes = atlas.bitmap().len(),
            "built sprite font"
        );
        profiling::new_frame();
        Ok(atlas)
    }

    /// Metrics for every character, indexed like `characters`.
    fn measure_all<F>(&mut self, font: &F, characters: &[u32]) -> BuildResult<Vec<GlyphMetrics>>
    where
        F: ?Sized,
        M: GlyphMetricsSource<F>,
    {
        profile_function!();
        let mut measured = Vec::with_capacity(characters.len());
        for &character in characters {
            let metrics = self.metrics.measure(font, character)?;
            if metrics.advance_width < 0 || metrics.line_height < 0 {
                return Err(BuildError::invalid_argument(format!(
                    "negative metrics {:?} for U+{:04X}",
                    metrics, character
                )));
            }
            if metrics.advance_width == 0 {
                tracing::warn!(character, "glyph has zero advance width");
            }
            measured.push(metrics);
        }
        Ok(measured)
    }
}

/// Font-wide metrics derived from per-character measurements.
struct FontLayout {
    font_height: i32,
    /// Common advance, or 0 when the font is not fixed-pitch.
    character_width: i32,
    widths: Vec<u32>,
}

impl FontLayout {
    fn from_metrics(characters: &[u32], measured: &[GlyphMetrics]) -> BuildResult<Self> {
        if let Some((&character, metrics)) = characters
            .iter()
            .zip(measured)
            .find(|(_, m)| m.advance_width > i32::from(i16::MAX))
        {
            return Err(BuildError::GlyphTooWide {
                character,
                width: metrics.advance_width,
            });
        }

        let font_height = measured.iter().map(|m| m.line_height).max().unwrap_or(0);
        let first = measured.first().map_or(0, |m| m.advance_width);
        let character_width = if measured.iter().all(|m| m.advance_width == first) {
            first
        } else {
            0
        };
        // advances were checked non-negative while measuring
        let widths = measured.iter().map(|m| m.advance_width as u32).collect();

        Ok(Self {
            font_height,
            character_width,
            widths,
        })
    }
}

/// Build one atlas with the default configuration.
///
/// # Example
///
/// ```
/// use spritefont::{build, BuildResult, CharRange, GlyphMetrics, GlyphMetricsSource, Rasterizer};
///
/// struct Mono;
/// impl GlyphMetricsSource<str> for Mono {
///     fn measure(&mut self, _font: &str, _character: u32) -> BuildResult<GlyphMetrics> {
///         Ok(GlyphMetrics::new(6, 12))
///     }
/// }
///
/// struct Blank;
/// impl Rasterizer<str> for Blank {
///     fn begin(&mut self, _width: u32, _height: u32) -> BuildResult<()> { Ok(()) }
///     fn paint(&mut self, _font: &str, _c: u32, _x: u32, _y: u32) -> BuildResult<()> { Ok(()) }
///     fn finish(&mut self) -> BuildResult<Vec<u8>> { Ok(Vec::new()) }
/// }
///
/// let atlas = build("mono", &[CharRange::new(32, 126)?], '?' as u32, 0, 0, Mono, Blank)?;
/// assert_eq!(atlas.glyphs().len(), 95);
/// assert_eq!(atlas.default_character_index(), 31);
/// assert_eq!(atlas.character_width(), 6);
/// # Ok::<(), spritefont::BuildError>(())
/// ```
pub fn build<F, M, R>(
    font: &F,
    ranges: &[CharRange],
    default_character: u32,
    glyph_x_border: i32,
    glyph_y_border: i32,
    metrics: M,
    rasterizer: R,
) -> BuildResult<SpriteFontAtlas>
where
    F: ?Sized,
    M: GlyphMetricsSource<F>,
    R: Rasterizer<F>,
{
    let receipt = SpriteFontReceipt::new(font, ranges.to_vec(), default_character)
        .with_borders(glyph_x_border, glyph_y_border);
    SpriteFontBuilder::new(RefMetrics(metrics), RefRasterizer(rasterizer)).build(&receipt)
}

/// Adapts a collaborator for `F` to the `&F` handle stored in a borrowed receipt.
struct RefMetrics<M>(M);

impl<F: ?Sized, M: GlyphMetricsSource<F>> GlyphMetricsSource<&F> for RefMetrics<M> {
    fn measure(&mut self, font: &&F, character: u32) -> BuildResult<GlyphMetrics> {
        self.0.measure(*font, character)
    }
}

struct RefRasterizer<R>(R);

impl<F: ?Sized, R: Rasterizer<F>> Rasterizer<&F> for RefRasterizer<R> {
    fn begin(&mut self, width: u32, height: u32) -> BuildResult<()> {
        self.0.begin(width, height)
    }

    fn paint(&mut self, font: &&F, character: u32, x: u32, y: u32) -> BuildResult<()> {
        self.0.paint(*font, character, x, y)
    }

    fn finish(&mut self) -> BuildResult<Vec<u8>> {
        self.0.finish()
    }
}
