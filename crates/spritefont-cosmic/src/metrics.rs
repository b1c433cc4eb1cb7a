//! Glyph metrics from cosmic-text shaping.

use cosmic_text::{Buffer, Shaping};
use spritefont::{BuildResult, GlyphMetrics, GlyphMetricsSource};
use spritefont_core::profiling::profile_function;

use crate::error::CosmicError;
use crate::font::{FontSystem, SpriteFontFace};

/// Shape a single character of `face` into a fresh buffer.
///
/// Returns `None` for codepoints that are not Unicode scalar values (lone
/// surrogates), which have nothing to shape.
pub(crate) fn shape_character(
    font_system: &mut cosmic_text::FontSystem,
    face: &SpriteFontFace,
    character: u32,
) -> Option<Buffer> {
    let text = char::from_u32(character)?.to_string();
    let mut buffer = Buffer::new(font_system, face.metrics());
    buffer.set_text(font_system, &text, face.attributes.to_cosmic(), Shaping::Advanced);
    buffer.shape_until_scroll(font_system, false);
    Some(buffer)
}

/// Total advance of everything laid out in `buffer`.
pub(crate) fn buffer_advance(buffer: &Buffer) -> f32 {
    buffer
        .layout_runs()
        .flat_map(|run| run.glyphs.iter())
        .map(|glyph| glyph.w)
        .sum()
}

/// [`GlyphMetricsSource`] that shapes each character with cosmic-text.
///
/// The advance is the summed glyph advance rounded up to whole pixels; the
/// line height is the face's [`SpriteFontFace::line_height`].
#[derive(Clone)]
pub struct CosmicMetrics {
    font_system: FontSystem,
}

impl CosmicMetrics {
    pub fn new(font_system: &FontSystem) -> Self {
        Self {
            font_system: font_system.clone(),
        }
    }
}

impl GlyphMetricsSource<SpriteFontFace> for CosmicMetrics {
    fn measure(&mut self, font: &SpriteFontFace, character: u32) -> BuildResult<GlyphMetrics> {
        profile_function!();
        font.validate()?;
        let mut font_system = self.font_system.inner().write().map_err(CosmicError::from)?;

        let advance = match shape_character(&mut font_system, font, character) {
            Some(buffer) => buffer_advance(&buffer).max(0.0).ceil() as i32,
            None => {
                tracing::warn!(character, "codepoint is not a scalar value, measuring as empty");
                0
            }
        };

        tracing::trace!(character, advance, "measured glyph");
        Ok(GlyphMetrics::new(advance, font.line_height()))
    }
}
