//! File type support for the `xgtool-rs` project.

mod error;

pub mod anime;
pub mod graphic;
pub mod map;
pub mod palette;
pub mod resources;

// Re-export unified error type
pub use error::{FileType, XgFileError};

// Re-export main file types
pub use anime::{
	Anime, AnimeFrame, AnimeInfo, AnimeInfoIndex, AnimeSequence, FrameDescriptor, SequenceHeader,
};
pub use graphic::{GraphicData, GraphicDataHeader, GraphicInfo, GraphicInfoIndex, Version};
pub use map::{Map, MapTile};
pub use palette::{Color, Palette};
pub use resources::Resources;
