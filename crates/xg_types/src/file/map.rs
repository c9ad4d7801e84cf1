//! Map grid support.
//!
//! Map files describe a tile grid whose cells reference graphic entries by
//! map ID (the `map_id` field of graphic info records). The grid has two
//! layers: ground tiles and object overlays.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size         Field   Description
//! ------  -----------  ------  ---------------------------------
//! 0x00    4            magic   "MAP\0"
//! 0x04    4            east    Grid width in tiles (i32)
//! 0x08    4            south   Grid height in tiles (i32)
//! 0x0C    east*south*4 ground  Ground layer map IDs, row-major
//! ...     east*south*4 object  Object layer map IDs, row-major
//! ```
//!
//! A cell value of 0 means the layer is empty at that position.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::file::graphic::{GraphicInfo, GraphicInfoIndex};
use crate::file::{FileType, XgFileError};

mod constants {
	/// Magic number for map files
	pub const MAGIC: [u8; 4] = *b"MAP\0";

	/// Size of the map header in bytes
	pub const HEADER_SIZE: usize = 12;

	/// Size of one grid cell in bytes
	pub const CELL_SIZE: usize = 4;
}

/// One cell of the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapTile {
	/// Ground layer map ID; 0 = empty
	pub ground: i32,
	/// Object layer map ID; 0 = empty
	pub object: i32,
}

/// A parsed map grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
	east: i32,
	south: i32,
	ground: Vec<i32>,
	object: Vec<i32>,
}

impl Map {
	/// Parses a map from a full file image.
	///
	/// # Errors
	///
	/// Returns an error if the magic is wrong, the dimensions are not
	/// positive, or the file is too short for both layers.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::Map,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let magic: [u8; 4] = data[0..4].try_into()?;
		if magic != constants::MAGIC {
			return Err(XgFileError::invalid_magic(FileType::Map, &constants::MAGIC, &magic));
		}

		let east = i32::from_le_bytes(data[4..8].try_into()?);
		let south = i32::from_le_bytes(data[8..12].try_into()?);
		if east <= 0 || south <= 0 {
			return Err(XgFileError::decode_failed(
				FileType::Map,
				format!("grid dimensions {east}×{south} are not positive"),
			));
		}

		let cells = east as usize * south as usize;
		let layer_size = cells * constants::CELL_SIZE;
		let expected = constants::HEADER_SIZE + layer_size * 2;
		if data.len() < expected {
			return Err(XgFileError::insufficient_data(FileType::Map, expected, data.len()));
		}

		let read_layer = |offset: usize| -> Result<Vec<i32>, XgFileError> {
			data[offset..offset + layer_size]
				.chunks_exact(constants::CELL_SIZE)
				.map(|cell| Ok(i32::from_le_bytes(cell.try_into()?)))
				.collect()
		};

		Ok(Self {
			east,
			south,
			ground: read_layer(constants::HEADER_SIZE)?,
			object: read_layer(constants::HEADER_SIZE + layer_size)?,
		})
	}

	/// Parses a map from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the data is invalid.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, XgFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Opens a map file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is invalid.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, XgFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Returns the grid width in tiles.
	pub fn east(&self) -> i32 {
		self.east
	}

	/// Returns the grid height in tiles.
	pub fn south(&self) -> i32 {
		self.south
	}

	/// Returns the cell at the given tile coordinates, or `None` when the
	/// coordinates lie outside the grid.
	pub fn tile_at(&self, x: i32, y: i32) -> Option<MapTile> {
		if x < 0 || y < 0 || x >= self.east || y >= self.south {
			return None;
		}
		let index = y as usize * self.east as usize + x as usize;
		Some(MapTile {
			ground: self.ground[index],
			object: self.object[index],
		})
	}

	/// Returns an iterator over every cell as `(x, y, tile)`, row-major.
	pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, MapTile)> + '_ {
		(0..self.south).flat_map(move |y| {
			(0..self.east).map(move |x| {
				let index = y as usize * self.east as usize + x as usize;
				(
					x,
					y,
					MapTile {
						ground: self.ground[index],
						object: self.object[index],
					},
				)
			})
		})
	}

	/// Resolves a cell's ground tile to its graphic entry through the map-ID
	/// index. Empty cells and unknown map IDs yield `None`.
	pub fn resolve_ground<'a>(
		&self,
		index: &'a GraphicInfoIndex,
		x: i32,
		y: i32,
	) -> Option<&'a GraphicInfo> {
		let tile = self.tile_at(x, y)?;
		if tile.ground == 0 {
			return None;
		}
		index.get_map(tile.ground)
	}

	/// Resolves a cell's object overlay to its graphic entry through the
	/// map-ID index. Empty cells and unknown map IDs yield `None`.
	pub fn resolve_object<'a>(
		&self,
		index: &'a GraphicInfoIndex,
		x: i32,
		y: i32,
	) -> Option<&'a GraphicInfo> {
		let tile = self.tile_at(x, y)?;
		if tile.object == 0 {
			return None;
		}
		index.get_map(tile.object)
	}
}

impl fmt::Display for Map {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Map: {}×{} tiles", self.east, self.south)
	}
}
