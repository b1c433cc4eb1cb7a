/// Configuration for [`SpriteFontBuilder`](crate::SpriteFontBuilder).
///
/// The receipt says *what* to build; this says how the builder behaves.
///
/// # Example
///
/// ```
/// use spritefont::{BuilderConfig, GlyphLayout};
///
/// let config = BuilderConfig::new()
///     .with_max_canvas_dimension(4096)
///     .with_glyph_layout(GlyphLayout::Compact);
/// assert_eq!(config.max_canvas_dimension, 4096);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Upper bound for the canvas width and height (power of 2).
    /// Default: 16384
    pub max_canvas_dimension: u32,
    /// Glyph record layout used when encoding font records.
    pub glyph_layout: crate::GlyphLayout,
    /// Whether archives also carry the JSON projection of each font.
    pub embed_json: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_canvas_dimension: 16384,
            glyph_layout: crate::GlyphLayout::Compact,
            embed_json: true,
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit for textures on older mobile GPUs (2048x2048).
    pub fn mobile() -> Self {
        Self {
            max_canvas_dimension: 2048,
            ..Default::default()
        }
    }

    /// Set the canvas bound. Values that are not a power of two are rounded down to one.
    pub fn with_max_canvas_dimension(mut self, max: u32) -> Self {
        self.max_canvas_dimension = if max == 0 { 0 } else { 1 << max.ilog2() };
        self
    }

    pub fn with_glyph_layout(mut self, layout: crate::GlyphLayout) -> Self {
        self.glyph_layout = layout;
        self
    }

    pub fn with_embed_json(mut self, embed: bool) -> Self {
        self.embed_json = embed;
        self
    }
}
