//! Graphic info records and the lookup indexes built from them.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::file::{FileType, XgFileError};

use super::constants;

/// One 40-byte record of the graphic info file.
///
/// Locates a payload in the graphic file (`addr`/`len`) and carries the
/// authoritative dimensions and render offsets for the entry. The ID is the
/// key other resources reference the entry by and is not unique; see
/// [`GraphicInfoIndex`] for the duplicate policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphicInfo {
	/// Entry ID; the external reference key, may repeat across records
	pub id: i32,
	/// Byte offset of the payload in the graphic file
	pub addr: i32,
	/// Byte length of the payload, header included
	pub len: i32,
	/// Render offset X
	pub off_x: i32,
	/// Render offset Y
	pub off_y: i32,
	/// Width in pixels; authoritative over the payload header's
	pub width: i32,
	/// Height in pixels; authoritative over the payload header's
	pub height: i32,
	/// Tile grid width
	pub grid_w: u8,
	/// Tile grid height
	pub grid_h: u8,
	/// Access flag
	pub access: u8,
	/// Map tile ID; 0 = not a map tile
	pub map_id: i32,
}

impl GraphicInfo {
	/// Parses a record from the first 40 bytes of `data`.
	///
	/// # Errors
	///
	/// Returns an error if fewer than 40 bytes are available.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::INFO_RECORD_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::GraphicInfo,
				constants::INFO_RECORD_SIZE,
				data.len(),
			));
		}

		Ok(Self {
			id: i32::from_le_bytes(data[0..4].try_into()?),
			addr: i32::from_le_bytes(data[4..8].try_into()?),
			len: i32::from_le_bytes(data[8..12].try_into()?),
			off_x: i32::from_le_bytes(data[12..16].try_into()?),
			off_y: i32::from_le_bytes(data[16..20].try_into()?),
			width: i32::from_le_bytes(data[20..24].try_into()?),
			height: i32::from_le_bytes(data[24..28].try_into()?),
			grid_w: data[28],
			grid_h: data[29],
			access: data[30],
			// bytes 31..36 are reserved
			map_id: i32::from_le_bytes(data[36..40].try_into()?),
		})
	}

	/// Serializes the record back to its 40-byte layout.
	///
	/// Reserved bytes are written as zero.
	pub fn to_bytes(&self) -> [u8; constants::INFO_RECORD_SIZE] {
		let mut buffer = [0u8; constants::INFO_RECORD_SIZE];
		buffer[0..4].copy_from_slice(&self.id.to_le_bytes());
		buffer[4..8].copy_from_slice(&self.addr.to_le_bytes());
		buffer[8..12].copy_from_slice(&self.len.to_le_bytes());
		buffer[12..16].copy_from_slice(&self.off_x.to_le_bytes());
		buffer[16..20].copy_from_slice(&self.off_y.to_le_bytes());
		buffer[20..24].copy_from_slice(&self.width.to_le_bytes());
		buffer[24..28].copy_from_slice(&self.height.to_le_bytes());
		buffer[28] = self.grid_w;
		buffer[29] = self.grid_h;
		buffer[30] = self.access;
		buffer[36..40].copy_from_slice(&self.map_id.to_le_bytes());
		buffer
	}

	/// Returns the number of pixels the decoded entry must hold.
	#[inline]
	pub fn pixel_count(&self) -> usize {
		(self.width.max(0) as usize) * (self.height.max(0) as usize)
	}

	/// Returns `true` when the entry represents a map tile.
	#[inline]
	pub fn is_map_tile(&self) -> bool {
		self.map_id != 0
	}
}

impl fmt::Display for GraphicInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"graphic {} ({}×{}, {} bytes at {:#x})",
			self.id, self.width, self.height, self.len, self.addr
		)
	}
}

/// Lookup structures built once from a graphic info file.
///
/// Two mappings are maintained: by entry ID, and by map ID (records with
/// `map_id == 0` are not map tiles and stay out of the second mapping).
///
/// Duplicate IDs follow a last-wins policy: the later record in file order
/// overwrites the earlier one, matching the way patch resources layer over
/// base resources. [`GraphicInfoIndex::record_count`] still reports every
/// record that was parsed.
///
/// The index is read-only after construction; iteration is in ascending ID
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicInfoIndex {
	by_id: BTreeMap<i32, GraphicInfo>,
	by_map_id: BTreeMap<i32, GraphicInfo>,
	record_count: usize,
}

impl GraphicInfoIndex {
	/// Builds the indexes from a full graphic info file image.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::MalformedIndex`] if the byte length is not an
	/// exact multiple of the 40-byte record size (a truncated record).
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() % constants::INFO_RECORD_SIZE != 0 {
			return Err(XgFileError::MalformedIndex {
				file_type: FileType::GraphicInfo,
				size: data.len(),
				record_size: constants::INFO_RECORD_SIZE,
			});
		}

		let mut by_id = BTreeMap::new();
		let mut by_map_id = BTreeMap::new();
		let mut record_count = 0;

		for chunk in data.chunks_exact(constants::INFO_RECORD_SIZE) {
			let info = GraphicInfo::from_bytes(chunk)?;
			record_count += 1;

			by_id.insert(info.id, info);
			if info.is_map_tile() {
				by_map_id.insert(info.map_id, info);
			}
		}

		Ok(Self {
			by_id,
			by_map_id,
			record_count,
		})
	}

	/// Builds the indexes from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the stream is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, XgFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Looks an entry up by ID.
	pub fn get(&self, id: i32) -> Option<&GraphicInfo> {
		self.by_id.get(&id)
	}

	/// Looks a map tile entry up by map ID.
	pub fn get_map(&self, map_id: i32) -> Option<&GraphicInfo> {
		self.by_map_id.get(&map_id)
	}

	/// Returns the number of distinct entry IDs.
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	/// Returns `true` when the index holds no entries.
	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Returns the number of distinct map IDs.
	pub fn map_len(&self) -> usize {
		self.by_map_id.len()
	}

	/// Returns the number of records parsed, duplicates included.
	pub fn record_count(&self) -> usize {
		self.record_count
	}

	/// Returns an iterator over entries in ascending ID order.
	pub fn iter(&self) -> impl Iterator<Item = &GraphicInfo> {
		self.by_id.values()
	}

	/// Returns an iterator over map tile entries in ascending map ID order.
	pub fn map_iter(&self) -> impl Iterator<Item = &GraphicInfo> {
		self.by_map_id.values()
	}
}

impl fmt::Display for GraphicInfoIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GraphicInfoIndex: {} entries, {} map tiles ({} records)",
			self.by_id.len(),
			self.by_map_id.len(),
			self.record_count
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: i32, map_id: i32) -> GraphicInfo {
		GraphicInfo {
			id,
			addr: 16,
			len: 20,
			off_x: 0,
			off_y: 0,
			width: 2,
			height: 2,
			grid_w: 1,
			grid_h: 1,
			access: 0,
			map_id,
		}
	}

	fn index_bytes(records: &[GraphicInfo]) -> Vec<u8> {
		records.iter().flat_map(|r| r.to_bytes()).collect()
	}

	#[test]
	fn test_roundtrip_record() {
		let info = GraphicInfo {
			id: -3,
			addr: 0x1234,
			len: 999,
			off_x: -32,
			off_y: 24,
			width: 64,
			height: 47,
			grid_w: 1,
			grid_h: 1,
			access: 1,
			map_id: 10_001,
		};

		let parsed = GraphicInfo::from_bytes(&info.to_bytes()).unwrap();
		assert_eq!(parsed, info);
	}

	#[test]
	fn test_every_record_retrievable() {
		let records: Vec<GraphicInfo> = (0..10).map(|i| record(i, 0)).collect();
		let index = GraphicInfoIndex::from_bytes(&index_bytes(&records)).unwrap();

		assert_eq!(index.len(), records.len());
		for info in &records {
			assert_eq!(index.get(info.id), Some(info));
		}
	}

	#[test]
	fn test_length_not_multiple_of_record_size() {
		let mut data = index_bytes(&[record(1, 0)]);
		data.push(0);

		let err = GraphicInfoIndex::from_bytes(&data).expect_err("length check should fail");
		match err {
			XgFileError::MalformedIndex {
				size,
				record_size,
				..
			} => {
				assert_eq!(size, 41);
				assert_eq!(record_size, constants::INFO_RECORD_SIZE);
			}
			_ => panic!("Unexpected error: {err:?}"),
		}
	}

	#[test]
	fn test_duplicate_id_last_wins() {
		let mut first = record(5, 0);
		first.addr = 100;
		let mut second = record(5, 0);
		second.addr = 200;

		let index = GraphicInfoIndex::from_bytes(&index_bytes(&[first, second])).unwrap();
		assert_eq!(index.len(), 1);
		assert_eq!(index.record_count(), 2);
		assert_eq!(index.get(5).unwrap().addr, 200);
	}

	#[test]
	fn test_map_index_skips_non_tiles() {
		let plain = record(1, 0);
		let tile = record(2, 5);

		let index = GraphicInfoIndex::from_bytes(&index_bytes(&[plain, tile])).unwrap();
		assert_eq!(index.len(), 2);
		assert_eq!(index.map_len(), 1);
		assert_eq!(index.get_map(5).unwrap().id, 2);
		assert!(index.get_map(0).is_none());
	}

	#[test]
	fn test_roundtrip_index() {
		let records: Vec<GraphicInfo> =
			(0..8).map(|i| record(i, if i % 2 == 0 { i + 100 } else { 0 })).collect();
		let index = GraphicInfoIndex::from_bytes(&index_bytes(&records)).unwrap();

		// Serialize the in-memory set back to the 40-byte layout and re-parse
		let reserialized: Vec<u8> = index.iter().flat_map(GraphicInfo::to_bytes).collect();
		let reparsed = GraphicInfoIndex::from_bytes(&reserialized).unwrap();

		assert_eq!(index.len(), reparsed.len());
		for info in index.iter() {
			assert_eq!(reparsed.get(info.id), Some(info));
		}
	}

	#[test]
	fn test_iteration_is_id_ordered() {
		let records = [record(7, 0), record(1, 0), record(4, 0)];
		let index = GraphicInfoIndex::from_bytes(&index_bytes(&records)).unwrap();

		let ids: Vec<i32> = index.iter().map(|info| info.id).collect();
		assert_eq!(ids, vec![1, 4, 7]);
	}

	#[test]
	fn test_empty_index() {
		let index = GraphicInfoIndex::from_bytes(&[]).unwrap();
		assert!(index.is_empty());
		assert_eq!(index.record_count(), 0);
	}
}
