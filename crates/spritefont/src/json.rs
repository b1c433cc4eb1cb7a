//! Human-readable JSON projection of a sprite font, for tooling and debugging.
//!
//! The bitmap is not part of the projection; [`from_json`] returns an atlas
//! with an empty bitmap that can be filled with [`SpriteFontAtlas::with_bitmap`].

use serde::{Deserialize, Serialize};

use crate::error::BuildResult;
use crate::glyph::{Glyph, SpriteFontAtlas};

fn is_zero_i32(value: &i32) -> bool {
    *value == 0
}

fn is_zero_i16(value: &i16) -> bool {
    *value == 0
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FontJson {
    font_height: i32,
    default_character_index: i32,
    glyph_x_border: i32,
    glyph_y_border: i32,
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    character_width: i32,
    glyphs: Vec<GlyphJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GlyphJson {
    character: u32,
    x: i32,
    y: i32,
    #[serde(default, skip_serializing_if = "is_zero_i16")]
    width: i16,
}

impl From<&Glyph> for GlyphJson {
    fn from(glyph: &Glyph) -> Self {
        Self {
            character: glyph.character,
            x: glyph.x,
            y: glyph.y,
            width: glyph.width,
        }
    }
}

/// Serialize the metrics and glyph table of `atlas`.
pub fn to_json(atlas: &SpriteFontAtlas) -> BuildResult<String> {
    let font = FontJson {
        font_height: atlas.font_height(),
        default_character_index: atlas.default_character_index(),
        glyph_x_border: atlas.glyph_x_border(),
        glyph_y_border: atlas.glyph_y_border(),
        character_width: atlas.character_width(),
        glyphs: atlas.glyphs().iter().map(GlyphJson::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&font)?)
}

/// Parse a projection written by [`to_json`]. The result has an empty bitmap.
pub fn from_json(text: &str) -> BuildResult<SpriteFontAtlas> {
    let font: FontJson = serde_json::from_str(text)?;
    let glyphs: Vec<Glyph> = font
        .glyphs
        .into_iter()
        .map(|g| Glyph::new(g.character, g.x, g.y, g.width))
        .collect();
    SpriteFontAtlas::new(
        font.font_height,
        font.default_character_index,
        font.character_width,
        glyphs,
        Vec::<u8>::new(),
        font.glyph_x_border,
        font.glyph_y_border,
    )
}
