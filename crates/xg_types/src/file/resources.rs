//! Resource sets: the opened files and indexes one extraction works over.
//!
//! A [`Resources`] value owns whatever subset of the resource files a task
//! needs: graphic pair, palette, anime pair, map. Files are read whole on
//! open and indexes are built eagerly, so later access is by slice: decoding
//! never shares a file cursor, which makes concurrent per-entry work safe
//! without locks.
//!
//! Two resource sets can cooperate: the "hidden" palette chain looks a
//! palette graphic up in a *second* set via [`Resources::overlay_palette`].

use std::path::Path;

use crate::file::anime::AnimeInfoIndex;
use crate::file::graphic::{GraphicData, GraphicInfoIndex};
use crate::file::map::Map;
use crate::file::palette::Palette;
use crate::file::XgFileError;

/// A collection of opened resource files and the indexes built from them.
#[derive(Debug, Clone, Default)]
pub struct Resources {
	graphic_index: Option<GraphicInfoIndex>,
	graphic_payload: Option<Vec<u8>>,
	palette: Option<Palette>,
	anime_index: Option<AnimeInfoIndex>,
	anime_payload: Option<Vec<u8>>,
	map: Option<Map>,
}

impl Resources {
	/// Creates an empty resource set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a graphic info file and builds the ID and map-ID indexes.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the index is malformed.
	pub fn open_graphic_info(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		let data = std::fs::read(path)?;
		self.graphic_index = Some(GraphicInfoIndex::from_bytes(&data)?);
		Ok(())
	}

	/// Opens a graphic payload file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read.
	pub fn open_graphic(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		self.graphic_payload = Some(std::fs::read(path)?);
		Ok(())
	}

	/// Opens an external CGP palette file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the table is malformed.
	pub fn open_palette(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		self.palette = Some(Palette::open(path)?);
		Ok(())
	}

	/// Opens an anime info file and builds its index.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the index is malformed.
	pub fn open_anime_info(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		let data = std::fs::read(path)?;
		self.anime_index = Some(AnimeInfoIndex::from_bytes(&data)?);
		Ok(())
	}

	/// Opens an anime payload file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read.
	pub fn open_anime(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		self.anime_payload = Some(std::fs::read(path)?);
		Ok(())
	}

	/// Opens a map file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is invalid.
	pub fn open_map(&mut self, path: impl AsRef<Path>) -> Result<(), XgFileError> {
		self.map = Some(Map::open(path)?);
		Ok(())
	}

	/// Returns the graphic index, if a graphic info file was opened.
	pub fn graphic_index(&self) -> Option<&GraphicInfoIndex> {
		self.graphic_index.as_ref()
	}

	/// Returns the graphic payload bytes, if a graphic file was opened.
	pub fn graphic_payload(&self) -> Option<&[u8]> {
		self.graphic_payload.as_deref()
	}

	/// Returns the external palette, if a CGP file was opened.
	pub fn palette(&self) -> Option<&Palette> {
		self.palette.as_ref()
	}

	/// Returns the anime index, if an anime info file was opened.
	pub fn anime_index(&self) -> Option<&AnimeInfoIndex> {
		self.anime_index.as_ref()
	}

	/// Returns the anime payload bytes, if an anime file was opened.
	pub fn anime_payload(&self) -> Option<&[u8]> {
		self.anime_payload.as_deref()
	}

	/// Returns the map, if a map file was opened.
	pub fn map(&self) -> Option<&Map> {
		self.map.as_ref()
	}

	/// Looks up the hidden palette graphic keyed by `id` in this set's
	/// map-ID index and returns its embedded palette.
	///
	/// Returns `Ok(None)` when this set has no graphic pair opened, the ID is
	/// not indexed, or the graphic carries no palette; absence moves the
	/// precedence chain along. A decode failure on a graphic that *is*
	/// indexed propagates: a present-but-corrupt overlay source is fatal.
	///
	/// # Errors
	///
	/// Returns the overlay graphic's decode error.
	pub fn overlay_palette(&self, id: i32) -> Result<Option<Palette>, XgFileError> {
		let (Some(index), Some(payload)) = (&self.graphic_index, &self.graphic_payload) else {
			return Ok(None);
		};
		let Some(info) = index.get_map(id) else {
			return Ok(None);
		};

		let graphic = GraphicData::from_bytes(info, payload)?;
		if graphic.has_palette() {
			Ok(Some(graphic.into_palette()))
		} else {
			Ok(None)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::graphic::{GraphicInfo, constants};

	fn palette_entry(colors: &[u8]) -> Vec<u8> {
		// A 1×1 version 2 graphic whose palette table is `colors`
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&constants::MAGIC);
		bytes.push(2);
		bytes.push(0);
		bytes.extend_from_slice(&[0u8; 12]);
		bytes.push(0); // single pixel
		bytes.extend_from_slice(colors);
		bytes
	}

	fn overlay_set(map_id: i32, entry: &[u8]) -> Resources {
		let record = GraphicInfo {
			id: 1,
			addr: 0,
			len: entry.len() as i32,
			off_x: 0,
			off_y: 0,
			width: 1,
			height: 1,
			grid_w: 1,
			grid_h: 1,
			access: 0,
			map_id,
		};

		let mut resources = Resources::new();
		resources.graphic_index =
			Some(GraphicInfoIndex::from_bytes(&record.to_bytes()).unwrap());
		resources.graphic_payload = Some(entry.to_vec());
		resources
	}

	#[test]
	fn test_overlay_palette_found() {
		let entry = palette_entry(&[255, 0, 0, 0, 255, 0]);
		let resources = overlay_set(42, &entry);

		let palette = resources.overlay_palette(42).unwrap().expect("palette should resolve");
		assert_eq!(palette.len(), 2);
	}

	#[test]
	fn test_overlay_palette_absent_id() {
		let entry = palette_entry(&[255, 0, 0]);
		let resources = overlay_set(42, &entry);

		assert!(resources.overlay_palette(7).unwrap().is_none());
	}

	#[test]
	fn test_overlay_palette_unopened_set() {
		let resources = Resources::new();
		assert!(resources.overlay_palette(42).unwrap().is_none());
	}

	#[test]
	fn test_overlay_palette_corrupt_graphic_is_fatal() {
		let mut entry = palette_entry(&[255, 0, 0]);
		entry[0] = b'X'; // break the magic

		let resources = overlay_set(42, &entry);
		let err = resources.overlay_palette(42).expect_err("decode should fail");
		assert!(matches!(err, XgFileError::InvalidMagic { .. }));
	}
}
