//! `xgtool-rs` extracts sprite and animation assets from a legacy game's
//! proprietary binary resource files and renders them into standard raster
//! images: JPEG stills for graphics and maps, animated GIFs for sprites.
//!
//! The file-format types live in the [`xg_types`] crate; this crate adds the
//! batch dispatch and rendering layers plus the CLI binary.

pub mod batch;
pub mod render;

pub use xg_types;

// Re-export commonly used types at crate root
pub use xg_types::file::{
	Anime, AnimeInfo, AnimeInfoIndex, GraphicData, GraphicInfo, GraphicInfoIndex, Map, Palette,
	Resources, XgFileError,
};

/// `use xgtool_rs::prelude::*;` to import commonly used items.
pub use xg_types::prelude;
