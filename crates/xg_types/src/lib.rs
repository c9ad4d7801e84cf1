//! This crate provides core data types and file format support for the `xgtool-rs` project.
//!
//! # File Formats
//!
//! - **Graphic info**: Flat array of 40-byte records indexing graphic payloads by ID and map ID
//! - **Graphic**: Per-entry payloads with a 16-byte `"RD"` header, four version tags
//!   (raw / run-length encoded, each with or without an embedded palette)
//! - **CGP**: Headerless external palette tables of 3-byte RGB entries
//! - **Anime info**: 12-byte records grouping one or more animation sequences
//! - **Anime**: Sequence headers plus frame descriptors referencing graphic entries
//! - **Map**: Tile grids whose cells resolve to graphic entries via the map-ID index
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use xg_types::prelude::*;
//!
//! # fn main() -> Result<(), XgFileError> {
//! // Build the lookup indexes from a graphic info file
//! let data = std::fs::read("GraphicInfo.bin")?;
//! let index = GraphicInfoIndex::from_bytes(&data)?;
//!
//! // Decode one entry out of the payload file
//! let payload = std::fs::read("Graphic.bin")?;
//! if let Some(info) = index.get(1) {
//!     let graphic = GraphicData::from_bytes(info, &payload)?;
//!     println!("{} pixels", graphic.pixels().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use xg_types::file::{GraphicInfoIndex, XgFileError};
//!
//! # fn main() -> Result<(), XgFileError> {
//! let data = std::fs::read("GraphicInfo.bin")?;
//! let index = GraphicInfoIndex::from_bytes(&data)?;
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use xg_types::prelude::*;` to import commonly used items.
pub mod prelude;
