use cosmic_text::{Attrs, Family, Metrics, fontdb};
use std::sync::{Arc, RwLock};

use crate::error::{CosmicError, CosmicResult};

/// A font database that manages available fonts.
pub struct FontDatabase {
    inner: fontdb::Database,
}

impl FontDatabase {
    /// Create a new font database with system fonts loaded.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { inner: db }
    }

    /// Create an empty font database.
    pub fn empty() -> Self {
        Self {
            inner: fontdb::Database::new(),
        }
    }

    /// Load a font from bytes.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.inner
            .load_font_source(fontdb::Source::Binary(Arc::new(data)));
    }

    /// Load a font from a .ttf or .otf file.
    pub fn load_font_file(&mut self, path: impl AsRef<std::path::Path>) -> CosmicResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CosmicError::FontFileNotFound(path.to_path_buf()));
        }
        self.inner
            .load_font_file(path)
            .map_err(|err| CosmicError::FontLoadError(format!("{}: {}", path.display(), err)))
    }

    /// Load fonts from a directory.
    pub fn load_fonts_dir(&mut self, path: impl AsRef<std::path::Path>) {
        self.inner.load_fonts_dir(path);
    }

    /// Returns true if a face of the given family is available.
    pub fn has_family(&self, family: &str) -> bool {
        self.inner
            .faces()
            .any(|face| face.families.iter().any(|(f, _)| f == family))
    }

    /// List all available font families, sorted.
    pub fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .inner
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Get the number of font faces loaded.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cosmic-text font system.
///
/// Cloning is cheap; the metrics source and the rasterizer of one build
/// must share the same system so they resolve the same faces.
#[derive(Clone)]
pub struct FontSystem {
    inner: Arc<RwLock<cosmic_text::FontSystem>>,
}

impl FontSystem {
    /// Create a new font system with the given font database.
    pub fn new(db: FontDatabase) -> Self {
        let cosmic_font_system = cosmic_text::FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            db.inner,
        );
        Self {
            inner: Arc::new(RwLock::new(cosmic_font_system)),
        }
    }

    /// Create a new font system with system fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }

    pub(crate) fn inner(&self) -> &Arc<RwLock<cosmic_text::FontSystem>> {
        &self.inner
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Weight {
        match self {
            FontWeight::Thin => cosmic_text::Weight::THIN,
            FontWeight::ExtraLight => cosmic_text::Weight::EXTRA_LIGHT,
            FontWeight::Light => cosmic_text::Weight::LIGHT,
            FontWeight::Normal => cosmic_text::Weight::NORMAL,
            FontWeight::Medium => cosmic_text::Weight::MEDIUM,
            FontWeight::SemiBold => cosmic_text::Weight::SEMIBOLD,
            FontWeight::Bold => cosmic_text::Weight::BOLD,
            FontWeight::ExtraBold => cosmic_text::Weight::EXTRA_BOLD,
            FontWeight::Black => cosmic_text::Weight::BLACK,
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontStyle::Normal => cosmic_text::Style::Normal,
            FontStyle::Italic => cosmic_text::Style::Italic,
            FontStyle::Oblique => cosmic_text::Style::Oblique,
        }
    }
}

/// Font stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStretch {
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
}

impl FontStretch {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Stretch {
        match self {
            FontStretch::Condensed => cosmic_text::Stretch::Condensed,
            FontStretch::SemiCondensed => cosmic_text::Stretch::SemiCondensed,
            FontStretch::Normal => cosmic_text::Stretch::Normal,
            FontStretch::SemiExpanded => cosmic_text::Stretch::SemiExpanded,
            FontStretch::Expanded => cosmic_text::Stretch::Expanded,
        }
    }
}

/// Font attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAttributes {
    /// A family name, or one of the generic families "sans-serif", "serif",
    /// "monospace", "cursive" and "fantasy".
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    pub stretch: FontStretch,
}

impl FontAttributes {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            stretch: FontStretch::Normal,
        }
    }

    pub fn sans_serif() -> Self {
        Self::new("sans-serif")
    }

    pub fn serif() -> Self {
        Self::new("serif")
    }

    /// Monospace faces give fixed-pitch atlases without per-glyph widths.
    pub fn monospace() -> Self {
        Self::new("monospace")
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn stretch(mut self, stretch: FontStretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub(crate) fn family(&self) -> Family<'_> {
        match self.family.as_str() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            name => Family::Name(name),
        }
    }

    pub(crate) fn to_cosmic(&self) -> Attrs<'_> {
        Attrs::new()
            .family(self.family())
            .weight(self.weight.to_cosmic())
            .style(self.style.to_cosmic())
            .stretch(self.stretch.to_cosmic())
    }
}

impl Default for FontAttributes {
    fn default() -> Self {
        Self::sans_serif()
    }
}

/// The font handle of a sprite font receipt: a face and a pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFontFace {
    pub attributes: FontAttributes,
    /// Font size in pixels.
    pub size: f32,
}

impl SpriteFontFace {
    pub fn new(attributes: FontAttributes, size: f32) -> Self {
        Self { attributes, size }
    }

    /// Reject sizes cosmic-text cannot lay out.
    pub fn validate(&self) -> CosmicResult<()> {
        if self.size.is_finite() && self.size > 0.0 {
            Ok(())
        } else {
            Err(CosmicError::InvalidFontSize(self.size))
        }
    }

    /// Line height in whole pixels, 1.2 times the font size rounded up.
    pub fn line_height(&self) -> i32 {
        (self.size * 1.2).ceil() as i32
    }

    pub(crate) fn metrics(&self) -> Metrics {
        Metrics::new(self.size, self.line_height() as f32)
    }
}

impl std::fmt::Display for SpriteFontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}px", self.attributes.family, self.size)
    }
}
