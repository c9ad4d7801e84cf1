//! Animation sequence wire structures.

use std::fmt;

use crate::file::{FileType, XgFileError};

use super::constants;

/// The 12-byte header opening each animation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHeader {
	/// Facing direction of the animated sprite
	pub direction: u16,
	/// Action kind (walk, attack, ...)
	pub action: u16,
	/// Total duration of one playthrough in milliseconds
	pub duration_ms: u32,
	/// Number of frame descriptors following the header
	pub frame_count: u32,
}

impl SequenceHeader {
	/// Parses a header from the first 12 bytes of `data`.
	///
	/// # Errors
	///
	/// Returns an error if fewer than 12 bytes are available.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::SEQUENCE_HEADER_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::Anime,
				constants::SEQUENCE_HEADER_SIZE,
				data.len(),
			));
		}

		Ok(Self {
			direction: u16::from_le_bytes(data[0..2].try_into()?),
			action: u16::from_le_bytes(data[2..4].try_into()?),
			duration_ms: u32::from_le_bytes(data[4..8].try_into()?),
			frame_count: u32::from_le_bytes(data[8..12].try_into()?),
		})
	}

	/// Serializes the header to its 12-byte layout.
	pub fn to_bytes(&self) -> [u8; constants::SEQUENCE_HEADER_SIZE] {
		let mut buffer = [0u8; constants::SEQUENCE_HEADER_SIZE];
		buffer[0..2].copy_from_slice(&self.direction.to_le_bytes());
		buffer[2..4].copy_from_slice(&self.action.to_le_bytes());
		buffer[4..8].copy_from_slice(&self.duration_ms.to_le_bytes());
		buffer[8..12].copy_from_slice(&self.frame_count.to_le_bytes());
		buffer
	}

	/// Returns the inter-frame delay: the sequence duration split evenly
	/// across its frames.
	pub fn frame_delay_ms(&self) -> u32 {
		self.duration_ms / self.frame_count.max(1)
	}
}

impl fmt::Display for SequenceHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"sequence (direction {}, action {}, {} frames over {} ms)",
			self.direction, self.action, self.frame_count, self.duration_ms
		)
	}
}

/// One 10-byte frame descriptor of an animation sequence.
///
/// References a graphic entry by ID and adjusts its placement within the
/// animation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
	/// Referenced graphic entry ID
	pub graphic_id: i32,
	/// Placement adjustment X
	pub off_x: i16,
	/// Placement adjustment Y
	pub off_y: i16,
	/// Whether the frame renders horizontally mirrored
	pub mirrored: bool,
}

impl FrameDescriptor {
	/// Parses a descriptor from the first 10 bytes of `data`.
	///
	/// # Errors
	///
	/// Returns an error if fewer than 10 bytes are available.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::FRAME_DESCRIPTOR_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::Anime,
				constants::FRAME_DESCRIPTOR_SIZE,
				data.len(),
			));
		}

		Ok(Self {
			graphic_id: i32::from_le_bytes(data[0..4].try_into()?),
			off_x: i16::from_le_bytes(data[4..6].try_into()?),
			off_y: i16::from_le_bytes(data[6..8].try_into()?),
			mirrored: i16::from_le_bytes(data[8..10].try_into()?) != 0,
		})
	}

	/// Serializes the descriptor to its 10-byte layout.
	pub fn to_bytes(&self) -> [u8; constants::FRAME_DESCRIPTOR_SIZE] {
		let mut buffer = [0u8; constants::FRAME_DESCRIPTOR_SIZE];
		buffer[0..4].copy_from_slice(&self.graphic_id.to_le_bytes());
		buffer[4..6].copy_from_slice(&self.off_x.to_le_bytes());
		buffer[6..8].copy_from_slice(&self.off_y.to_le_bytes());
		buffer[8..10].copy_from_slice(&i16::from(self.mirrored).to_le_bytes());
		buffer
	}
}

impl fmt::Display for FrameDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"frame → graphic {} at ({}, {}){}",
			self.graphic_id,
			self.off_x,
			self.off_y,
			if self.mirrored { ", mirrored" } else { "" }
		)
	}
}

/// One parsed animation sequence: header plus its frame descriptors in file
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeSequence {
	/// Sequence header
	pub header: SequenceHeader,
	/// Frame descriptors, in the exact order they appear on disk
	pub frames: Vec<FrameDescriptor>,
}

impl AnimeSequence {
	/// Returns the number of frames in the sequence.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` when the sequence holds no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns the on-disk byte size of the sequence.
	pub fn byte_size(&self) -> usize {
		constants::SEQUENCE_HEADER_SIZE + self.frames.len() * constants::FRAME_DESCRIPTOR_SIZE
	}
}

impl fmt::Display for AnimeSequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.header)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_header_roundtrip() {
		let header = SequenceHeader {
			direction: 3,
			action: 5,
			duration_ms: 1000,
			frame_count: 8,
		};
		let parsed = SequenceHeader::from_bytes(&header.to_bytes()).unwrap();
		assert_eq!(parsed, header);
	}

	#[test]
	fn test_descriptor_roundtrip() {
		let descriptor = FrameDescriptor {
			graphic_id: 4321,
			off_x: -10,
			off_y: 22,
			mirrored: true,
		};
		let parsed = FrameDescriptor::from_bytes(&descriptor.to_bytes()).unwrap();
		assert_eq!(parsed, descriptor);
	}

	#[test]
	fn test_frame_delay_splits_duration() {
		let header = SequenceHeader {
			direction: 0,
			action: 0,
			duration_ms: 900,
			frame_count: 6,
		};
		assert_eq!(header.frame_delay_ms(), 150);
	}

	#[test]
	fn test_frame_delay_with_zero_frames() {
		let header = SequenceHeader {
			direction: 0,
			action: 0,
			duration_ms: 900,
			frame_count: 0,
		};
		assert_eq!(header.frame_delay_ms(), 900);
	}

	#[test]
	fn test_truncated_descriptor() {
		let err = FrameDescriptor::from_bytes(&[0u8; 6]).expect_err("length check should fail");
		assert!(matches!(
			err,
			XgFileError::InsufficientData {
				file_type: FileType::Anime,
				..
			}
		));
		assert!(err.is_entry_local());
	}
}
