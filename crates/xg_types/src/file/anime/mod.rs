//! Animation resource support.
//!
//! Animated sprites live in two files, mirroring the graphic pair:
//!
//! - **Anime info file**: a flat array of fixed 12-byte records (see
//!   [`AnimeInfo`]); one record groups one or more sequences, which is why
//!   loading a single record yields a collection of animations
//! - **Anime payload file**: the sequence groups themselves
//!
//! # Sequence Group Layout
//!
//! At `AnimeInfo.addr`, `sequence_count` sequences are stored back-to-back.
//! Each sequence is a 12-byte header followed by its frame descriptors:
//!
//! ```text
//! Header (12 bytes):
//!   +0x00  2  direction
//!   +0x02  2  action
//!   +0x04  4  duration_ms   total playthrough time
//!   +0x08  4  frame_count
//!
//! Frame descriptor (10 bytes, × frame_count):
//!   +0x00  4  graphic_id    entry ID in the graphic info index
//!   +0x04  2  off_x         placement adjustment
//!   +0x06  2  off_y         placement adjustment
//!   +0x08  2  mirrored      non-zero renders the frame flipped
//! ```
//!
//! # Assembly
//!
//! [`AnimeInfo::assemble`] resolves every descriptor through the graphic
//! index, decodes the referenced entries, and picks each frame's palette:
//! the graphic's own embedded palette when it has one, the caller-supplied
//! base palette otherwise; frames of one animation may legally use
//! different palettes (per-frame recoloring). Output frame order always
//! matches descriptor order.
//!
//! # Usage Examples
//!
//! ```no_run
//! use xg_types::file::anime::AnimeInfoIndex;
//! use xg_types::file::graphic::GraphicInfoIndex;
//! use xg_types::file::palette::Palette;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graphic_index = GraphicInfoIndex::from_bytes(&std::fs::read("GraphicInfo.bin")?)?;
//! let graphic_payload = std::fs::read("Graphic.bin")?;
//! let anime_index = AnimeInfoIndex::from_bytes(&std::fs::read("AnimeInfo.bin")?)?;
//! let anime_payload = std::fs::read("Anime.bin")?;
//! let palette = Palette::open("palet_00.cgp")?;
//!
//! for info in anime_index.iter() {
//!     let animes =
//!         info.load_all(&anime_payload, &graphic_index, &graphic_payload, &palette)?;
//!     for anime in &animes {
//!         println!("{}: {} frames", anime.id, anime.frames.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod info;
pub mod sequence;

pub use info::{AnimeInfo, AnimeInfoIndex};
pub use sequence::{AnimeSequence, FrameDescriptor, SequenceHeader};

use crate::file::graphic::{GraphicData, GraphicInfoIndex};
use crate::file::palette::Palette;
use crate::file::{FileType, XgFileError};

/// Anime file constants.
pub mod constants {
	/// Size of each anime info record in bytes
	pub const INFO_RECORD_SIZE: usize = 12;

	/// Size of each sequence header in bytes
	pub const SEQUENCE_HEADER_SIZE: usize = 12;

	/// Size of each frame descriptor in bytes
	pub const FRAME_DESCRIPTOR_SIZE: usize = 10;
}

/// One assembled animation frame, ready for a rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeFrame {
	/// Graphic entry the frame was decoded from
	pub graphic_id: i32,
	/// Frame width in pixels
	pub width: i32,
	/// Frame height in pixels
	pub height: i32,
	/// Composite render offset X (entry offset plus descriptor adjustment)
	pub off_x: i32,
	/// Composite render offset Y (entry offset plus descriptor adjustment)
	pub off_y: i32,
	/// Whether the frame renders horizontally mirrored
	pub mirrored: bool,
	/// Display time before the next frame, in milliseconds
	pub delay_ms: u32,
	/// Decoded pixel-index buffer (`width * height` bytes)
	pub pixels: Vec<u8>,
	/// Palette chosen for this frame
	pub palette: Palette,
}

/// One assembled animation: an ordered, positioned frame sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anime {
	/// ID of the anime info record the animation came from
	pub id: i32,
	/// Facing direction of the animated sprite
	pub direction: u16,
	/// Action kind (walk, attack, ...)
	pub action: u16,
	/// Frames in descriptor order
	pub frames: Vec<AnimeFrame>,
}

impl std::fmt::Display for Anime {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"Anime {{ id: {}, direction: {}, action: {}, {} frames }}",
			self.id,
			self.direction,
			self.action,
			self.frames.len()
		)
	}
}

impl AnimeInfo {
	/// Parses this record's sequence group out of the anime payload file.
	///
	/// # Errors
	///
	/// Returns an entry-local error when the group lies outside the payload
	/// or a sequence is truncated; a corrupt record never aborts a batch.
	pub fn sequences(&self, payload: &[u8]) -> Result<Vec<AnimeSequence>, XgFileError> {
		let mut pos = usize::try_from(self.addr).map_err(|_| {
			XgFileError::decode_failed(
				FileType::Anime,
				format!("anime {}: negative sequence group address {}", self.id, self.addr),
			)
		})?;

		let count = usize::try_from(self.sequence_count).map_err(|_| {
			XgFileError::decode_failed(
				FileType::Anime,
				format!("anime {}: negative sequence count {}", self.id, self.sequence_count),
			)
		})?;

		let mut sequences = Vec::with_capacity(count);
		for _ in 0..count {
			let header = SequenceHeader::from_bytes(payload.get(pos..).unwrap_or_default())?;
			pos += constants::SEQUENCE_HEADER_SIZE;

			let frame_count = header.frame_count as usize;
			let frames_size = frame_count * constants::FRAME_DESCRIPTOR_SIZE;
			if payload.len().saturating_sub(pos) < frames_size {
				return Err(XgFileError::insufficient_data(
					FileType::Anime,
					pos + frames_size,
					payload.len(),
				));
			}

			let mut frames = Vec::with_capacity(frame_count);
			for _ in 0..frame_count {
				frames.push(FrameDescriptor::from_bytes(&payload[pos..])?);
				pos += constants::FRAME_DESCRIPTOR_SIZE;
			}

			sequences.push(AnimeSequence {
				header,
				frames,
			});
		}

		Ok(sequences)
	}

	/// Assembles one sequence into a renderable animation.
	///
	/// Every frame descriptor is resolved through `index` and decoded from
	/// `graphic_payload`. A frame keeps its graphic's embedded palette when
	/// present and falls back to `base_palette` otherwise. Frame order in the
	/// output exactly matches descriptor order.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::FrameNotFound`] when a descriptor references an
	/// ID absent from the index, [`XgFileError::EmptyPalette`] when neither
	/// palette source has colors for a frame, or the frame's own decode
	/// error. All of these are local to this one animation.
	pub fn assemble(
		&self,
		sequence: &AnimeSequence,
		index: &GraphicInfoIndex,
		graphic_payload: &[u8],
		base_palette: &Palette,
	) -> Result<Anime, XgFileError> {
		let delay_ms = sequence.header.frame_delay_ms();
		let mut frames = Vec::with_capacity(sequence.frames.len());

		for descriptor in &sequence.frames {
			let info = index.get(descriptor.graphic_id).ok_or(XgFileError::FrameNotFound {
				anime_id: self.id,
				graphic_id: descriptor.graphic_id,
			})?;

			let graphic = GraphicData::from_bytes(info, graphic_payload)?;
			let (pixels, embedded) = graphic.into_parts();

			let palette = if embedded.is_empty() { base_palette.clone() } else { embedded };
			if palette.is_empty() {
				return Err(XgFileError::EmptyPalette {
					id: descriptor.graphic_id,
				});
			}

			frames.push(AnimeFrame {
				graphic_id: descriptor.graphic_id,
				width: info.width,
				height: info.height,
				off_x: info.off_x + i32::from(descriptor.off_x),
				off_y: info.off_y + i32::from(descriptor.off_y),
				mirrored: descriptor.mirrored,
				delay_ms,
				pixels,
				palette,
			});
		}

		Ok(Anime {
			id: self.id,
			direction: sequence.header.direction,
			action: sequence.header.action,
			frames,
		})
	}

	/// Parses and assembles every sequence of this record.
	///
	/// # Errors
	///
	/// Returns the first parse or assembly error; all are local to this one
	/// record.
	pub fn load_all(
		&self,
		anime_payload: &[u8],
		index: &GraphicInfoIndex,
		graphic_payload: &[u8],
		base_palette: &Palette,
	) -> Result<Vec<Anime>, XgFileError> {
		self.sequences(anime_payload)?
			.iter()
			.map(|sequence| self.assemble(sequence, index, graphic_payload, base_palette))
			.collect()
	}
}
