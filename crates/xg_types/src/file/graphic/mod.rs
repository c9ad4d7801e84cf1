//! Graphic resource support.
//!
//! Sprite graphics live in two files that cross-reference each other by
//! numeric ID:
//!
//! - **Graphic info file**: a flat array of fixed 40-byte records locating
//!   and describing every graphic payload (see [`GraphicInfo`])
//! - **Graphic payload file**: the payloads themselves, each starting with a
//!   16-byte header (see [`GraphicDataHeader`])
//!
//! # Info Record (40 bytes)
//!
//! ```text
//! Offset  Size  Field    Description
//! ------  ----  -------  ------------------------------------------
//! 0x00    4     id       Entry ID (i32); the external reference key,
//!                        may repeat across records
//! 0x04    4     addr     Byte offset of the payload in the graphic file
//! 0x08    4     len      Byte length of the payload (header included)
//! 0x0C    4     off_x    Render offset X
//! 0x10    4     off_y    Render offset Y
//! 0x14    4     width    Width in pixels (authoritative)
//! 0x18    4     height   Height in pixels (authoritative)
//! 0x1C    1     grid_w   Tile grid width
//! 0x1D    1     grid_h   Tile grid height
//! 0x1E    1     access   Access flag
//! 0x1F    5     -        Reserved
//! 0x24    4     map_id   Map tile ID; 0 = not a map tile
//! ```
//!
//! # Payload Header (16 bytes)
//!
//! ```text
//! Offset  Size  Field    Description
//! ------  ----  -------  ------------------------------------------
//! 0x00    2     magic    "RD" for a valid graphic
//! 0x02    1     version  0 raw, 1 encoded, 2 raw + palette,
//!                        3 encoded + palette
//! 0x03    1     -        Reserved
//! 0x04    4     width    Width (advisory; trust the info record)
//! 0x08    4     height   Height (advisory; trust the info record)
//! 0x0C    4     len      Length (advisory; trust the info record)
//! ```
//!
//! The body after the header is the pixel-index buffer, run-length encoded
//! for versions 1/3 (see [`rle`]). For versions 2/3 a palette table of 3-byte
//! RGB entries trails the pixel data.
//!
//! # Usage Examples
//!
//! ```no_run
//! use xg_types::file::graphic::{GraphicData, GraphicInfoIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = GraphicInfoIndex::from_bytes(&std::fs::read("GraphicInfo.bin")?)?;
//! let payload = std::fs::read("Graphic.bin")?;
//!
//! for info in index.iter() {
//!     match GraphicData::from_bytes(info, &payload) {
//!         Ok(graphic) => println!("{}: {} pixels", info.id, graphic.pixels().len()),
//!         Err(err) if err.is_entry_local() => eprintln!("skipping {}: {err}", info.id),
//!         Err(err) => return Err(err.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod info;
pub mod rle;

pub use data::{GraphicData, GraphicDataHeader, Version};
pub use info::{GraphicInfo, GraphicInfoIndex};

/// Graphic file constants.
pub mod constants {
	/// Magic bytes opening every valid graphic payload
	pub const MAGIC: [u8; 2] = *b"RD";

	/// Size of the payload header in bytes
	pub const HEADER_SIZE: usize = 16;

	/// Size of each graphic info record in bytes
	pub const INFO_RECORD_SIZE: usize = 40;
}
