//! ASCII Sprite Font Example
//!
//! Builds a sprite font atlas for printable ASCII from a system font family
//! and writes it to an archive:
//! - Resolving a family through the system font database
//! - Measuring and rasterizing glyphs with cosmic-text
//! - Packing the atlas and storing the `.bin`, `.png` and `.json` entries
//!
//! ## Usage
//! ```bash
//! cargo run -p spritefont-cosmic --example ascii_atlas -- [family] [size] [output] [--ranges 32-126,160-255] [--profile]
//! ```

use spritefont::{BuildError, BuilderConfig, SpriteFontArchive, SpriteFontReceipt, parse_ranges};
use spritefont_core::logging;
use spritefont_core::profiling::{ProfilingBackend, init_profiling};
use spritefont_cosmic::{FontAttributes, FontDatabase, FontSystem, SpriteFontFace, cosmic_builder};

struct Args {
    family: String,
    size: f32,
    output: String,
    ranges: String,
    profile: bool,
}

fn parse_args() -> Args {
    let mut positional = Vec::new();
    let mut ranges = String::from("32-126");
    let mut profile = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ranges" => {
                if let Some(value) = args.next() {
                    ranges = value;
                }
            }
            "--profile" => profile = true,
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let family = positional.next().unwrap_or_else(|| String::from("monospace"));
    let size = positional
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(16.0);
    let output = positional.next().unwrap_or_else(|| String::from("ascii.sfpk"));

    Args {
        family,
        size,
        output,
        ranges,
        profile,
    }
}

fn run(args: &Args) -> Result<(), BuildError> {
    let database = FontDatabase::new();
    tracing::info!(faces = database.len(), "font database ready");
    if !database.has_family(&args.family) {
        tracing::warn!(family = %args.family, "family not found by name, relying on fallback");
    }
    let fonts = FontSystem::new(database);

    let face = SpriteFontFace::new(FontAttributes::new(args.family.clone()), args.size);
    let receipt = SpriteFontReceipt::new(face, parse_ranges(&args.ranges)?, '?' as u32).with_borders(1, 1);

    let config = BuilderConfig::default();
    let mut builder = cosmic_builder(&fonts, config.clone());
    let atlas = builder.build(&receipt)?;
    tracing::info!(
        glyphs = atlas.glyphs().len(),
        font_height = atlas.font_height(),
        fixed_pitch = atlas.is_fixed_pitch(),
        png_bytes = atlas.bitmap().len(),
        "atlas built"
    );

    let name = args.family.replace(['/', '\\', ' '], "_");
    let mut archive = SpriteFontArchive::new();
    archive.write_font(&name, &atlas, &config)?;
    archive.save(&args.output)?;
    Ok(())
}

fn main() {
    logging::init();

    let args = parse_args();
    if args.profile {
        init_profiling(ProfilingBackend::PuffinHttp);
    }

    if let Err(err) = run(&args) {
        tracing::error!("Failed to build sprite font: {}", err);
        std::process::exit(1);
    }
}
