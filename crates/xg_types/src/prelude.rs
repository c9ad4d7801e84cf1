//! Prelude module for `xg_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use xg_types::prelude::*;
//!
//! # fn main() -> Result<(), XgFileError> {
//! let index = GraphicInfoIndex::from_bytes(&std::fs::read("GraphicInfo.bin")?)?;
//! let palette = Palette::open("palet_00.cgp")?;
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Anime types
	Anime,
	AnimeFrame,
	AnimeInfo,
	AnimeInfoIndex,
	AnimeSequence,

	// Palette types
	Color,

	FileType,
	FrameDescriptor,

	// Graphic types
	GraphicData,
	GraphicDataHeader,
	GraphicInfo,
	GraphicInfoIndex,

	// Map types
	Map,
	MapTile,
	Palette,

	// Resource sets
	Resources,
	SequenceHeader,
	Version,
	XgFileError,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
