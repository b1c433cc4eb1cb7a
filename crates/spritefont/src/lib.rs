//! Spritefont - Bitmap sprite font atlas builder
//!
//! This crate turns a font handle and a list of character ranges into a
//! single power-of-two texture atlas plus a compact glyph table:
//! - Character ranges are merged and expanded into a sorted character set
//! - Glyphs are measured once and packed into rows of a square-ish canvas
//! - The glyph table is persisted with a versioned big-endian codec
//!
//! Measuring and painting glyphs is left to two collaborators,
//! [`GlyphMetricsSource`] and [`Rasterizer`]. `spritefont-cosmic` provides
//! both on top of cosmic-text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spritefont::{
//!     parse_ranges, BuildResult, GlyphMetrics, GlyphMetricsSource, Rasterizer,
//!     SpriteFontArchive, SpriteFontBuilder, SpriteFontReceipt,
//! };
//!
//! struct Mono;
//! impl GlyphMetricsSource<()> for Mono {
//!     fn measure(&mut self, _font: &(), _character: u32) -> BuildResult<GlyphMetrics> {
//!         Ok(GlyphMetrics::new(6, 12))
//!     }
//! }
//!
//! struct Blank;
//! impl Rasterizer<()> for Blank {
//!     fn begin(&mut self, _width: u32, _height: u32) -> BuildResult<()> { Ok(()) }
//!     fn paint(&mut self, _font: &(), _c: u32, _x: u32, _y: u32) -> BuildResult<()> { Ok(()) }
//!     fn finish(&mut self) -> BuildResult<Vec<u8>> { Ok(Vec::new()) }
//! }
//!
//! let receipt = SpriteFontReceipt::new((), parse_ranges("32-126")?, '?' as u32).with_borders(1, 1);
//! let mut builder = SpriteFontBuilder::new(Mono, Blank);
//! let atlas = builder.build(&receipt)?;
//!
//! let mut archive = SpriteFontArchive::new();
//! archive.write_font("mono", &atlas, builder.config())?;
//! archive.save("fonts.sfpk")?;
//! # Ok::<(), spritefont::BuildError>(())
//! ```
//!
//! ## Features
//!
//! - **Range Merging**: overlapping and adjacent ranges collapse into one
//! - **Power-of-two Canvas**: grows by doubling up to a configurable bound
//! - **Fixed-pitch Detection**: per-glyph widths are omitted for monospace fonts
//! - **Two Glyph Layouts**: 8-byte compact records and 12-byte packed-word records
//! - **Archive and JSON Output**: binary container plus a readable projection

pub mod archive;
pub mod builder;
pub mod chars;
pub mod charset;
pub mod codec;
pub mod config;
pub mod error;
pub mod glyph;
pub mod json;
pub mod packer;

// Re-export main types
pub use archive::SpriteFontArchive;
pub use builder::{
    GlyphMetrics, GlyphMetricsSource, Rasterizer, SpriteFontBuilder, SpriteFontReceipt, build,
};
pub use chars::{CharRange, MAX_CODE_UNIT, merge, parse_default_character, parse_ranges};
pub use charset::CharacterSet;
pub use codec::{
    EncodeOptions, FontRecord, GlyphLayout, decode_font, decode_font_record, decode_glyph_table,
    encode_font, encode_glyph_table,
};
pub use config::BuilderConfig;
pub use error::{BuildError, BuildResult};
pub use glyph::{Glyph, SpriteFontAtlas};
pub use json::{from_json, to_json};
pub use packer::{AtlasPacker, MAX_GLYPH_BORDER, PackedAtlas, Placement, next_power_of_two};
