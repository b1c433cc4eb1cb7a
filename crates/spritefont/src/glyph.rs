//! Glyph records and the finished sprite font atlas.

use std::sync::Arc;

use crate::error::{BuildError, BuildResult};
use crate::packer::check_border;

/// One character's placement in the atlas.
///
/// `x`/`y` is the top-left of the glyph cell (y grows downward); the cell is
/// `font_height` pixels tall. `width` is 0 when the glyph advance equals the
/// font-wide [`SpriteFontAtlas::character_width`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub character: u32,
    pub x: i32,
    pub y: i32,
    pub width: i16,
}

impl Glyph {
    pub fn new(character: u32, x: i32, y: i32, width: i16) -> Self {
        Self {
            character,
            x,
            y,
            width,
        }
    }
}

/// A built sprite font: metrics, glyph table and the encoded atlas bitmap.
///
/// Immutable once constructed. [`SpriteFontAtlas::new`] checks every table
/// invariant, so any value of this type is internally consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFontAtlas {
    font_height: i32,
    default_character_index: i32,
    character_width: i32,
    glyphs: Arc<[Glyph]>,
    bitmap: Arc<[u8]>,
    glyph_x_border: i32,
    glyph_y_border: i32,
}

impl SpriteFontAtlas {
    /// Sentinel for "no default character".
    pub const NO_DEFAULT_CHARACTER: i32 = -1;

    /// Assemble an atlas, validating borders, glyph ordering and the default index.
    pub fn new(
        font_height: i32,
        default_character_index: i32,
        character_width: i32,
        glyphs: impl Into<Arc<[Glyph]>>,
        bitmap: impl Into<Arc<[u8]>>,
        glyph_x_border: i32,
        glyph_y_border: i32,
    ) -> BuildResult<Self> {
        check_border("x", glyph_x_border)?;
        check_border("y", glyph_y_border)?;
        if font_height < 0 {
            return Err(BuildError::invalid_argument(format!(
                "negative font height {}",
                font_height
            )));
        }
        if character_width < 0 {
            return Err(BuildError::invalid_argument(format!(
                "negative character width {}",
                character_width
            )));
        }

        let glyphs = glyphs.into();
        if let Some(pair) = glyphs.windows(2).find(|pair| pair[0].character >= pair[1].character) {
            return Err(BuildError::invalid_argument(format!(
                "glyph table not strictly ascending at U+{:04X} -> U+{:04X}",
                pair[0].character, pair[1].character
            )));
        }

        let index_is_valid = default_character_index == Self::NO_DEFAULT_CHARACTER
            || (default_character_index >= 0 && (default_character_index as usize) < glyphs.len());
        if !index_is_valid {
            return Err(BuildError::invalid_argument(format!(
                "default character index {} outside a table of {} glyphs",
                default_character_index,
                glyphs.len()
            )));
        }

        Ok(Self {
            font_height,
            default_character_index,
            character_width,
            glyphs,
            bitmap: bitmap.into(),
            glyph_x_border,
            glyph_y_border,
        })
    }

    pub fn font_height(&self) -> i32 {
        self.font_height
    }

    pub fn default_character_index(&self) -> i32 {
        self.default_character_index
    }

    /// Fixed-pitch advance, or 0 for a variable-pitch font.
    pub fn character_width(&self) -> i32 {
        self.character_width
    }

    pub fn is_fixed_pitch(&self) -> bool {
        self.character_width > 0
    }

    /// Glyphs in ascending character order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// PNG bytes of the atlas bitmap.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    pub fn glyph_x_border(&self) -> i32 {
        self.glyph_x_border
    }

    pub fn glyph_y_border(&self) -> i32 {
        self.glyph_y_border
    }

    /// Distance between rows of text drawn with this font.
    pub fn line_height(&self) -> i32 {
        self.font_height + self.glyph_y_border
    }

    /// Look up a character's glyph.
    pub fn glyph(&self, character: u32) -> Option<&Glyph> {
        self.glyphs
            .binary_search_by_key(&character, |g| g.character)
            .ok()
            .map(|index| &self.glyphs[index])
    }

    pub fn default_glyph(&self) -> Option<&Glyph> {
        usize::try_from(self.default_character_index)
            .ok()
            .and_then(|index| self.glyphs.get(index))
    }

    /// The glyph for `character`, falling back to the default glyph.
    pub fn glyph_or_default(&self, character: u32) -> Option<&Glyph> {
        self.glyph(character).or_else(|| self.default_glyph())
    }

    /// Advance of `glyph`, resolving the "use font-wide width" sentinel.
    pub fn advance(&self, glyph: &Glyph) -> i32 {
        if glyph.width == 0 {
            self.character_width
        } else {
            i32::from(glyph.width)
        }
    }

    /// Copy of this atlas with a different bitmap.
    pub fn with_bitmap(&self, bitmap: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bitmap: bitmap.into(),
            ..self.clone()
        }
    }
}
