//! Error types for file format parsing and manipulation.

use thiserror::Error;

/// File formats handled by this crate, used to qualify error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Graphic info index file
	GraphicInfo,
	/// Graphic payload file
	Graphic,
	/// External CGP palette file
	Palette,
	/// Anime info index file
	AnimeInfo,
	/// Anime payload file
	Anime,
	/// Map grid file
	Map,
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::GraphicInfo => "graphic info",
			Self::Graphic => "graphic",
			Self::Palette => "palette",
			Self::AnimeInfo => "anime info",
			Self::Anime => "anime",
			Self::Map => "map",
		};
		write!(f, "{name}")
	}
}

/// Errors that can occur when parsing or decoding resource files.
///
/// Errors fall into two classes. *Entry-local* errors concern a single entry
/// of a bulk extraction and are caught at the per-entry dispatch boundary:
/// the entry is logged and skipped, the batch continues. Everything else is
/// *resource-local* and aborts the whole batch. [`XgFileError::is_entry_local`]
/// encodes the classification.
#[derive(Debug, Error)]
pub enum XgFileError {
	/// Index byte length is not an exact multiple of the record size
	#[error("Malformed {file_type} index: {size} bytes is not a multiple of {record_size}")]
	MalformedIndex {
		/// Index file kind
		file_type: FileType,
		/// Total byte length of the index stream
		size: usize,
		/// Fixed record size the stream must divide into
		record_size: usize,
	},

	/// Not enough data to parse a fixed-size structure
	#[error("Insufficient {file_type} data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// File kind being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error("Invalid {file_type} magic: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// File kind being parsed
		file_type: FileType,
		/// Magic bytes the format requires
		expected: Vec<u8>,
		/// Magic bytes actually present
		actual: Vec<u8>,
	},

	/// Graphic header carries a version tag outside the four known variants
	#[error("Unsupported graphic version tag: {version}")]
	UnsupportedVersion {
		/// Raw version byte from the header
		version: u8,
	},

	/// Decoded data is inconsistent with the entry's declared shape
	#[error("Failed to decode {file_type} data: {message}")]
	DecodeFailed {
		/// File kind being decoded
		file_type: FileType,
		/// What went wrong
		message: String,
	},

	/// Entry payload range lies outside the payload file
	#[error("Graphic {id}: payload range {addr}+{len} exceeds file size {available}")]
	OutOfBounds {
		/// Entry ID
		id: i32,
		/// Declared payload offset
		addr: i64,
		/// Declared payload length
		len: i64,
		/// Size of the payload file
		available: usize,
	},

	/// No palette could be resolved for an entry from any source
	#[error("No palette available for entry {id}")]
	EmptyPalette {
		/// Entry ID the resolution ran for
		id: i32,
	},

	/// Animation frame references a graphic ID absent from the index
	#[error("Anime {anime_id}: frame references unknown graphic {graphic_id}")]
	FrameNotFound {
		/// Anime record ID
		anime_id: i32,
		/// Referenced graphic entry ID
		graphic_id: i32,
	},

	/// An explicitly supplied palette source is present but unparsable
	#[error("Malformed palette: {message}")]
	MalformedPalette {
		/// What went wrong
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),

	/// Slice conversion error
	#[error(transparent)]
	SliceError(#[from] std::array::TryFromSliceError),
}

impl XgFileError {
	/// Creates an [`XgFileError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`XgFileError::InvalidMagic`] error.
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}

	/// Creates an [`XgFileError::DecodeFailed`] error.
	pub fn decode_failed(file_type: FileType, message: impl Into<String>) -> Self {
		Self::DecodeFailed {
			file_type,
			message: message.into(),
		}
	}

	/// Returns `true` when the error concerns a single entry of a bulk
	/// extraction and the batch should skip the entry and continue.
	///
	/// Resource-local errors (malformed index, unreadable source file,
	/// malformed external palette) return `false` and abort the batch.
	pub fn is_entry_local(&self) -> bool {
		match self {
			Self::UnsupportedVersion {
				..
			}
			| Self::DecodeFailed {
				..
			}
			| Self::OutOfBounds {
				..
			}
			| Self::EmptyPalette {
				..
			}
			| Self::FrameNotFound {
				..
			} => true,
			// A bad magic inside a graphic entry is that entry's corruption;
			// a bad magic on a map file means the whole resource is unusable.
			Self::InvalidMagic {
				file_type,
				..
			} => *file_type == FileType::Graphic,
			// Truncation inside an entry or anime payload is entry corruption;
			// truncation of an index or palette file is resource corruption.
			Self::InsufficientData {
				file_type,
				..
			} => matches!(file_type, FileType::Graphic | FileType::Anime),
			_ => false,
		}
	}
}
