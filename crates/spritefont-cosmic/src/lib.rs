//! Spritefont Cosmic - cosmic-text collaborators for the sprite font builder
//!
//! This crate measures and paints glyphs for [`spritefont`]:
//! - [`CosmicMetrics`] shapes each character to find its advance width
//! - [`CosmicRasterizer`] paints swash glyph masks into a grey canvas and encodes it as PNG
//! - [`SpriteFontFace`] is the font handle both of them take
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spritefont::{CharRange, SpriteFontBuilder, SpriteFontReceipt};
//! use spritefont_cosmic::{CosmicMetrics, CosmicRasterizer, FontAttributes, FontSystem, SpriteFontFace};
//!
//! let fonts = FontSystem::with_system_fonts();
//! let face = SpriteFontFace::new(FontAttributes::monospace(), 16.0);
//! let receipt = SpriteFontReceipt::new(face, vec![CharRange::new(32, 126)?], '?' as u32)
//!     .with_borders(1, 1);
//!
//! let mut builder = SpriteFontBuilder::new(CosmicMetrics::new(&fonts), CosmicRasterizer::new(&fonts));
//! let atlas = builder.build(&receipt)?;
//! println!("{} glyphs, {} bytes of PNG", atlas.glyphs().len(), atlas.bitmap().len());
//! # Ok::<(), spritefont::BuildError>(())
//! ```
//!
//! ## Examples
//!
//! ```bash
//! cargo run --package spritefont-cosmic --example ascii_atlas -- monospace 16 ascii.sfpk
//! ```

pub mod error;
pub mod font;
pub mod metrics;
pub mod raster;

pub use error::{CosmicError, CosmicResult};
pub use font::{
    FontAttributes, FontDatabase, FontStretch, FontStyle, FontSystem, FontWeight, SpriteFontFace,
};
pub use metrics::CosmicMetrics;
pub use raster::CosmicRasterizer;

/// A builder wired to cosmic-text collaborators sharing one font system.
pub type CosmicBuilder = spritefont::SpriteFontBuilder<CosmicMetrics, CosmicRasterizer>;

/// Create a [`CosmicBuilder`] for `font_system` with the given configuration.
pub fn cosmic_builder(font_system: &FontSystem, config: spritefont::BuilderConfig) -> CosmicBuilder {
    spritefont::SpriteFontBuilder::with_config(
        config,
        CosmicMetrics::new(font_system),
        CosmicRasterizer::new(font_system),
    )
}
