//! Anime info records and the lookup index built from them.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use serde::Serialize;

use crate::file::{FileType, XgFileError};

use super::constants;

/// One 12-byte record of the anime info file.
///
/// Locates a group of animation sequences in the anime payload file: the
/// group starts at `addr` and holds `sequence_count` sequences back-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimeInfo {
	/// Record ID; the key animations are referenced by
	pub id: i32,
	/// Byte offset of the sequence group in the anime payload file
	pub addr: i32,
	/// Number of sequences in the group
	pub sequence_count: i16,
}

impl AnimeInfo {
	/// Parses a record from the first 12 bytes of `data`.
	///
	/// # Errors
	///
	/// Returns an error if fewer than 12 bytes are available.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::INFO_RECORD_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::AnimeInfo,
				constants::INFO_RECORD_SIZE,
				data.len(),
			));
		}

		Ok(Self {
			id: i32::from_le_bytes(data[0..4].try_into()?),
			addr: i32::from_le_bytes(data[4..8].try_into()?),
			sequence_count: i16::from_le_bytes(data[8..10].try_into()?),
			// bytes 10..12 are reserved
		})
	}

	/// Serializes the record back to its 12-byte layout.
	pub fn to_bytes(&self) -> [u8; constants::INFO_RECORD_SIZE] {
		let mut buffer = [0u8; constants::INFO_RECORD_SIZE];
		buffer[0..4].copy_from_slice(&self.id.to_le_bytes());
		buffer[4..8].copy_from_slice(&self.addr.to_le_bytes());
		buffer[8..10].copy_from_slice(&self.sequence_count.to_le_bytes());
		buffer
	}
}

impl fmt::Display for AnimeInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "anime {} ({} sequences at {:#x})", self.id, self.sequence_count, self.addr)
	}
}

/// Lookup structure built once from an anime info file.
///
/// Duplicate IDs follow the same last-wins policy as the graphic index.
/// Read-only after construction; iteration is in ascending ID order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimeInfoIndex {
	by_id: BTreeMap<i32, AnimeInfo>,
	record_count: usize,
}

impl AnimeInfoIndex {
	/// Builds the index from a full anime info file image.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::MalformedIndex`] if the byte length is not an
	/// exact multiple of the 12-byte record size.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() % constants::INFO_RECORD_SIZE != 0 {
			return Err(XgFileError::MalformedIndex {
				file_type: FileType::AnimeInfo,
				size: data.len(),
				record_size: constants::INFO_RECORD_SIZE,
			});
		}

		let mut by_id = BTreeMap::new();
		let mut record_count = 0;

		for chunk in data.chunks_exact(constants::INFO_RECORD_SIZE) {
			let info = AnimeInfo::from_bytes(chunk)?;
			record_count += 1;
			by_id.insert(info.id, info);
		}

		Ok(Self {
			by_id,
			record_count,
		})
	}

	/// Builds the index from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the stream is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, XgFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Looks a record up by ID.
	pub fn get(&self, id: i32) -> Option<&AnimeInfo> {
		self.by_id.get(&id)
	}

	/// Returns the number of distinct record IDs.
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	/// Returns `true` when the index holds no records.
	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Returns the number of records parsed, duplicates included.
	pub fn record_count(&self) -> usize {
		self.record_count
	}

	/// Returns an iterator over records in ascending ID order.
	pub fn iter(&self) -> impl Iterator<Item = &AnimeInfo> {
		self.by_id.values()
	}
}

impl fmt::Display for AnimeInfoIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"AnimeInfoIndex: {} entries ({} records)",
			self.by_id.len(),
			self.record_count
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_roundtrip_record() {
		let info = AnimeInfo {
			id: 100_000,
			addr: 0xBEEF,
			sequence_count: 8,
		};
		let parsed = AnimeInfo::from_bytes(&info.to_bytes()).unwrap();
		assert_eq!(parsed, info);
	}

	#[test]
	fn test_length_not_multiple_of_record_size() {
		let err =
			AnimeInfoIndex::from_bytes(&[0u8; 13]).expect_err("length check should fail");
		assert!(matches!(
			err,
			XgFileError::MalformedIndex {
				file_type: FileType::AnimeInfo,
				..
			}
		));
	}

	#[test]
	fn test_duplicate_id_last_wins() {
		let first = AnimeInfo {
			id: 9,
			addr: 0,
			sequence_count: 1,
		};
		let second = AnimeInfo {
			id: 9,
			addr: 64,
			sequence_count: 2,
		};

		let mut data = first.to_bytes().to_vec();
		data.extend_from_slice(&second.to_bytes());

		let index = AnimeInfoIndex::from_bytes(&data).unwrap();
		assert_eq!(index.len(), 1);
		assert_eq!(index.record_count(), 2);
		assert_eq!(index.get(9).unwrap().addr, 64);
	}
}
