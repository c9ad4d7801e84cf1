//! Graphic payload headers and entry decoding.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use crate::file::palette::Palette;
use crate::file::{FileType, XgFileError};

use super::{constants, info::GraphicInfo, rle};

/// Payload encoding variant, from the header's version byte.
///
/// The four observed variants form a closed set; decoding dispatches on an
/// explicit match, and any other tag fails the entry with
/// [`XgFileError::UnsupportedVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
	/// Pixel-index buffer stored as-is
	Raw,
	/// Pixel-index buffer run-length encoded
	Encoded,
	/// Raw buffer followed by an embedded palette table
	RawPalette,
	/// Encoded buffer followed by an embedded palette table
	EncodedPalette,
}

impl Version {
	/// Maps a header version byte to its variant.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::UnsupportedVersion`] for tags outside `0..=3`.
	pub fn from_tag(tag: u8) -> Result<Self, XgFileError> {
		match tag {
			0 => Ok(Self::Raw),
			1 => Ok(Self::Encoded),
			2 => Ok(Self::RawPalette),
			3 => Ok(Self::EncodedPalette),
			version => Err(XgFileError::UnsupportedVersion {
				version,
			}),
		}
	}

	/// Returns the wire tag for this variant.
	pub fn tag(self) -> u8 {
		match self {
			Self::Raw => 0,
			Self::Encoded => 1,
			Self::RawPalette => 2,
			Self::EncodedPalette => 3,
		}
	}

	/// Returns `true` when the pixel buffer is run-length encoded.
	pub fn is_encoded(self) -> bool {
		matches!(self, Self::Encoded | Self::EncodedPalette)
	}

	/// Returns `true` when a palette table trails the pixel data.
	pub fn has_palette(self) -> bool {
		matches!(self, Self::RawPalette | Self::EncodedPalette)
	}
}

/// The 16-byte header opening every graphic payload.
///
/// Only the magic and version are load-bearing. The trailing width, height,
/// and length fields are advisory and must never be trusted over the info
/// record's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicDataHeader {
	/// Magic bytes; `"RD"` for a valid graphic
	pub magic: [u8; 2],
	/// Payload encoding variant
	pub version: Version,
	/// Width as written in the payload (advisory)
	pub width: i32,
	/// Height as written in the payload (advisory)
	pub height: i32,
	/// Length as written in the payload (advisory)
	pub len: i32,
}

impl GraphicDataHeader {
	/// Parses a header from the first 16 bytes of `data`.
	///
	/// # Errors
	///
	/// Returns an error if fewer than 16 bytes are available, the magic is
	/// wrong, or the version tag is unknown.
	pub fn from_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(XgFileError::insufficient_data(
				FileType::Graphic,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let magic: [u8; 2] = data[0..2].try_into()?;
		if magic != constants::MAGIC {
			return Err(XgFileError::invalid_magic(FileType::Graphic, &constants::MAGIC, &magic));
		}

		Ok(Self {
			magic,
			version: Version::from_tag(data[2])?,
			width: i32::from_le_bytes(data[4..8].try_into()?),
			height: i32::from_le_bytes(data[8..12].try_into()?),
			len: i32::from_le_bytes(data[12..16].try_into()?),
		})
	}

	/// Serializes the header to its 16-byte layout.
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		buffer[0..2].copy_from_slice(&self.magic);
		buffer[2] = self.version.tag();
		buffer[4..8].copy_from_slice(&self.width.to_le_bytes());
		buffer[8..12].copy_from_slice(&self.height.to_le_bytes());
		buffer[12..16].copy_from_slice(&self.len.to_le_bytes());
		buffer
	}
}

impl fmt::Display for GraphicDataHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GraphicDataHeader {{ version: {}, {}×{}, {} bytes }}",
			self.version.tag(),
			self.width,
			self.height,
			self.len
		)
	}
}

/// A fully decoded graphic entry.
///
/// The pixel buffer always holds exactly `info.width * info.height` palette
/// indices, whatever the payload's encoding variant was. The palette is the
/// entry's embedded one for versions 2/3 and empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicData {
	info: GraphicInfo,
	header: GraphicDataHeader,
	pixels: Vec<u8>,
	palette: Palette,
}

impl GraphicData {
	/// Decodes an entry out of the full graphic payload file image.
	///
	/// Slices `info.addr..info.addr + info.len` out of `payload` after bounds
	/// validation. The record's `len` is always used; the header's advisory
	/// length never is. Every failure is recoverable by a caller processing
	/// many entries (see [`XgFileError::is_entry_local`]).
	///
	/// # Errors
	///
	/// Returns [`XgFileError::OutOfBounds`] for ranges past the file,
	/// [`XgFileError::InvalidMagic`] for foreign payloads, and
	/// [`XgFileError::DecodeFailed`] for size or codec inconsistencies.
	pub fn from_bytes(info: &GraphicInfo, payload: &[u8]) -> Result<Self, XgFileError> {
		let out_of_bounds = || XgFileError::OutOfBounds {
			id: info.id,
			addr: i64::from(info.addr),
			len: i64::from(info.len),
			available: payload.len(),
		};

		let addr = usize::try_from(info.addr).map_err(|_| out_of_bounds())?;
		let len = usize::try_from(info.len).map_err(|_| out_of_bounds())?;
		let end = addr.checked_add(len).filter(|&end| end <= payload.len()).ok_or_else(out_of_bounds)?;

		Self::from_entry_bytes(info, &payload[addr..end])
	}

	/// Decodes an entry from a seekable payload source.
	///
	/// Seeks to `info.addr` and reads exactly `info.len` bytes. Sharing one
	/// reader across concurrent decodes is not safe; callers doing
	/// concurrent work should load the payload once and use
	/// [`GraphicData::from_bytes`], which needs no cursor.
	///
	/// # Errors
	///
	/// Returns an error if seeking or reading fails, or the entry is corrupt.
	pub fn from_reader<R: Read + Seek>(
		info: &GraphicInfo,
		reader: &mut R,
	) -> Result<Self, XgFileError> {
		let addr = u64::try_from(info.addr).map_err(|_| XgFileError::OutOfBounds {
			id: info.id,
			addr: i64::from(info.addr),
			len: i64::from(info.len),
			available: 0,
		})?;
		let len = usize::try_from(info.len).map_err(|_| XgFileError::OutOfBounds {
			id: info.id,
			addr: i64::from(info.addr),
			len: i64::from(info.len),
			available: 0,
		})?;

		reader.seek(SeekFrom::Start(addr))?;
		let mut entry = vec![0u8; len];
		reader.read_exact(&mut entry)?;

		Self::from_entry_bytes(info, &entry)
	}

	/// Decodes an entry from its own payload bytes (header included).
	///
	/// # Errors
	///
	/// Returns an error if the header or body is invalid.
	pub fn from_entry_bytes(info: &GraphicInfo, entry: &[u8]) -> Result<Self, XgFileError> {
		let header = GraphicDataHeader::from_bytes(entry)?;
		let body = &entry[constants::HEADER_SIZE..];
		let expected = info.pixel_count();

		let (pixels, palette) = match header.version {
			Version::Raw => {
				if body.len() != expected {
					return Err(XgFileError::decode_failed(
						FileType::Graphic,
						format!("raw pixel buffer is {} bytes, expected {expected}", body.len()),
					));
				}
				(body.to_vec(), Palette::new())
			}
			Version::Encoded => {
				let (pixels, _) = rle::decode(body, expected)?;
				(pixels, Palette::new())
			}
			Version::RawPalette => {
				if body.len() < expected {
					return Err(XgFileError::decode_failed(
						FileType::Graphic,
						format!("raw pixel buffer is {} bytes, expected {expected}", body.len()),
					));
				}
				let palette = Self::embedded_palette(&body[expected..])?;
				(body[..expected].to_vec(), palette)
			}
			Version::EncodedPalette => {
				let (pixels, consumed) = rle::decode(body, expected)?;
				let palette = Self::embedded_palette(&body[consumed..])?;
				(pixels, palette)
			}
		};

		Ok(Self {
			info: *info,
			header,
			pixels,
			palette,
		})
	}

	/// Parses the palette table trailing a version 2/3 body.
	///
	/// An unparsable embedded table is this entry's corruption, not a fatal
	/// palette-source failure, so it reports as [`XgFileError::DecodeFailed`].
	fn embedded_palette(table: &[u8]) -> Result<Palette, XgFileError> {
		Palette::from_rgb_bytes(table).map_err(|err| {
			XgFileError::decode_failed(FileType::Graphic, format!("embedded palette: {err}"))
		})
	}

	/// Returns the info record the entry was decoded through.
	pub fn info(&self) -> &GraphicInfo {
		&self.info
	}

	/// Returns the parsed payload header.
	pub fn header(&self) -> &GraphicDataHeader {
		&self.header
	}

	/// Returns the decoded pixel-index buffer (`width * height` bytes).
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns the embedded palette; empty for versions 0/1.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// Returns `true` when the entry carried its own palette.
	pub fn has_palette(&self) -> bool {
		!self.palette.is_empty()
	}

	/// Returns the authoritative width from the info record.
	pub fn width(&self) -> i32 {
		self.info.width
	}

	/// Returns the authoritative height from the info record.
	pub fn height(&self) -> i32 {
		self.info.height
	}

	/// Consumes the entry, returning its embedded palette.
	pub fn into_palette(self) -> Palette {
		self.palette
	}

	/// Consumes the entry, returning the pixel buffer and palette.
	pub fn into_parts(self) -> (Vec<u8>, Palette) {
		(self.pixels, self.palette)
	}
}

impl fmt::Display for GraphicData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GraphicData {{ id: {}, {}×{}, version: {}, palette: {} colors }}",
			self.info.id,
			self.info.width,
			self.info.height,
			self.header.version.tag(),
			self.palette.len()
		)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn info(id: i32, addr: i32, len: i32, width: i32, height: i32) -> GraphicInfo {
		GraphicInfo {
			id,
			addr,
			len,
			off_x: 0,
			off_y: 0,
			width,
			height,
			grid_w: 1,
			grid_h: 1,
			access: 0,
			map_id: 0,
		}
	}

	fn header_bytes(version: u8, width: i32, height: i32, len: i32) -> Vec<u8> {
		let mut bytes = Vec::with_capacity(constants::HEADER_SIZE);
		bytes.extend_from_slice(&constants::MAGIC);
		bytes.push(version);
		bytes.push(0);
		bytes.extend_from_slice(&width.to_le_bytes());
		bytes.extend_from_slice(&height.to_le_bytes());
		bytes.extend_from_slice(&len.to_le_bytes());
		bytes
	}

	fn entry(version: u8, width: i32, height: i32, body: &[u8]) -> Vec<u8> {
		let mut bytes =
			header_bytes(version, width, height, (constants::HEADER_SIZE + body.len()) as i32);
		bytes.extend_from_slice(body);
		bytes
	}

	#[test]
	fn test_raw_entry() {
		// A 2×2 version 0 entry: 16-byte header + 4 index bytes
		let payload = entry(0, 2, 2, &[1, 2, 3, 4]);
		let info = info(1, 0, payload.len() as i32, 2, 2);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &[1, 2, 3, 4]);
		assert!(!graphic.has_palette());
		assert_eq!(graphic.header().version, Version::Raw);
	}

	#[test]
	fn test_invalid_magic_is_entry_local() {
		let mut payload = entry(0, 2, 2, &[1, 2, 3, 4]);
		payload[0] = b'X';
		payload[1] = b'X';
		let info = info(1, 0, payload.len() as i32, 2, 2);

		let err = GraphicData::from_bytes(&info, &payload).expect_err("magic check should fail");
		assert!(matches!(err, XgFileError::InvalidMagic { .. }));
		assert!(err.is_entry_local());
	}

	#[test]
	fn test_raw_size_mismatch() {
		// 5 body bytes for a 2×2 entry
		let payload = entry(0, 2, 2, &[1, 2, 3, 4, 5]);
		let info = info(1, 0, payload.len() as i32, 2, 2);

		let err = GraphicData::from_bytes(&info, &payload).expect_err("size check should fail");
		assert!(matches!(err, XgFileError::DecodeFailed { .. }));
		assert!(err.is_entry_local());
	}

	#[test]
	fn test_encoded_entry() {
		let pixels: Vec<u8> = (0..16).collect();
		let payload = entry(1, 4, 4, &rle::encode(&pixels));
		let info = info(2, 0, payload.len() as i32, 4, 4);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &pixels[..]);
		assert!(!graphic.has_palette());
	}

	#[test]
	fn test_raw_palette_entry() {
		let mut body = vec![0u8, 1, 1, 0];
		body.extend_from_slice(&[255, 0, 0, 0, 255, 0]); // two palette colors
		let payload = entry(2, 2, 2, &body);
		let info = info(3, 0, payload.len() as i32, 2, 2);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &[0, 1, 1, 0]);
		assert!(graphic.has_palette());
		assert_eq!(graphic.palette().len(), 2);
		assert_eq!(graphic.palette().get(1).unwrap().g, 255);
	}

	#[test]
	fn test_encoded_palette_entry() {
		let pixels = [5u8; 9];
		let mut body = rle::encode(&pixels);
		body.extend_from_slice(&[10, 20, 30]); // one palette color
		let payload = entry(3, 3, 3, &body);
		let info = info(4, 0, payload.len() as i32, 3, 3);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &pixels[..]);
		assert_eq!(graphic.palette().len(), 1);
	}

	#[test]
	fn test_corrupt_embedded_palette_is_entry_local() {
		// Trailing table of 4 bytes is not a whole number of colors
		let mut body = vec![0u8, 1, 1, 0];
		body.extend_from_slice(&[255, 0, 0, 0]);
		let payload = entry(2, 2, 2, &body);
		let info = info(3, 0, payload.len() as i32, 2, 2);

		let err = GraphicData::from_bytes(&info, &payload).expect_err("palette check should fail");
		assert!(matches!(err, XgFileError::DecodeFailed { .. }));
		assert!(err.is_entry_local());
	}

	#[test]
	fn test_unknown_version_tag() {
		let payload = entry(9, 2, 2, &[1, 2, 3, 4]);
		let info = info(5, 0, payload.len() as i32, 2, 2);

		let err = GraphicData::from_bytes(&info, &payload).expect_err("version check should fail");
		match err {
			XgFileError::UnsupportedVersion {
				version,
			} => assert_eq!(version, 9),
			_ => panic!("Unexpected error: {err:?}"),
		}
	}

	#[test]
	fn test_payload_range_out_of_bounds() {
		let payload = entry(0, 2, 2, &[1, 2, 3, 4]);
		let info = info(6, 8, payload.len() as i32, 2, 2);

		let err = GraphicData::from_bytes(&info, &payload).expect_err("bounds check should fail");
		assert!(matches!(err, XgFileError::OutOfBounds { .. }));
		assert!(err.is_entry_local());
	}

	#[test]
	fn test_record_len_wins_over_header_len() {
		// The header lies about the length; the record's len governs the slice
		let mut payload = entry(0, 2, 2, &[1, 2, 3, 4]);
		payload[12..16].copy_from_slice(&9999_i32.to_le_bytes());
		let info = info(7, 0, payload.len() as i32, 2, 2);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &[1, 2, 3, 4]);
	}

	#[test]
	fn test_entry_at_offset() {
		// Entry preceded by unrelated bytes; addr locates it
		let mut payload = vec![0xEE; 7];
		payload.extend_from_slice(&entry(0, 2, 2, &[4, 3, 2, 1]));
		let info = info(8, 7, (payload.len() - 7) as i32, 2, 2);

		let graphic = GraphicData::from_bytes(&info, &payload).unwrap();
		assert_eq!(graphic.pixels(), &[4, 3, 2, 1]);
	}

	#[test]
	fn test_from_reader_matches_from_bytes() {
		let mut payload = vec![0xEE; 32];
		payload.extend_from_slice(&entry(0, 2, 2, &[4, 3, 2, 1]));
		let info = info(9, 32, (payload.len() - 32) as i32, 2, 2);

		let from_bytes = GraphicData::from_bytes(&info, &payload).unwrap();
		let from_reader = GraphicData::from_reader(&info, &mut Cursor::new(&payload)).unwrap();
		assert_eq!(from_bytes, from_reader);
	}

	#[test]
	fn test_header_roundtrip() {
		let header = GraphicDataHeader {
			magic: constants::MAGIC,
			version: Version::EncodedPalette,
			width: 64,
			height: 47,
			len: 1234,
		};
		let parsed = GraphicDataHeader::from_bytes(&header.to_bytes()).unwrap();
		assert_eq!(parsed, header);
	}
}
