//! Palette support.
//!
//! Graphics store pixels as palette indices; the color table for an entry can
//! come from three places, tried in order:
//!
//! 1. A palette embedded in the entry's own payload (graphic versions 2/3)
//! 2. A "hidden" overlay palette graphic from a separate resource set, keyed
//!    by the same ID through that set's map-ID index
//! 3. An external CGP palette file supplied by the caller
//!
//! The CGP file format is a headerless table of 3-byte RGB entries; the file
//! length alone determines the color count.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::file::XgFileError;

/// RGB color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
}

impl Color {
	/// Creates a new RGB color.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r,
			g,
			b,
		}
	}

	/// Creates a new grayscale color.
	pub const fn gray(value: u8) -> Self {
		Self::new(value, value, value)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
	}
}

/// Ordered color table; index position = pixel color index.
///
/// A palette holds at most 256 colors. The empty palette is a valid value
/// meaning "not yet resolved"; [`resolve`] walks the source precedence chain
/// until it finds a non-empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Maximum number of colors a palette may hold
	pub const MAX_COLORS: usize = 256;

	/// Size of one CGP color entry in bytes (R, G, B)
	pub const CGP_ENTRY_SIZE: usize = 3;

	/// Creates a new, empty (unresolved) palette.
	pub fn new() -> Self {
		Self {
			colors: Vec::new(),
		}
	}

	/// Builds a palette from pre-parsed colors.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::MalformedPalette`] if more than
	/// [`Palette::MAX_COLORS`] colors are given.
	pub fn from_colors(colors: Vec<Color>) -> Result<Self, XgFileError> {
		if colors.len() > Self::MAX_COLORS {
			return Err(XgFileError::MalformedPalette {
				message: format!(
					"{} colors exceed the {}-entry limit",
					colors.len(),
					Self::MAX_COLORS
				),
			});
		}

		Ok(Self {
			colors,
		})
	}

	/// Parses a palette from a headerless RGB table.
	///
	/// This is both the CGP file layout and the layout of palette tables
	/// embedded in version 2/3 graphic payloads.
	///
	/// # Errors
	///
	/// Returns [`XgFileError::MalformedPalette`] if the byte length is not a
	/// multiple of [`Palette::CGP_ENTRY_SIZE`] or the table holds more than
	/// [`Palette::MAX_COLORS`] entries.
	pub fn from_rgb_bytes(data: &[u8]) -> Result<Self, XgFileError> {
		if data.len() % Self::CGP_ENTRY_SIZE != 0 {
			return Err(XgFileError::MalformedPalette {
				message: format!(
					"{} bytes is not a multiple of the {}-byte entry size",
					data.len(),
					Self::CGP_ENTRY_SIZE
				),
			});
		}

		let colors: Vec<Color> = data
			.chunks_exact(Self::CGP_ENTRY_SIZE)
			.map(|entry| Color::new(entry[0], entry[1], entry[2]))
			.collect();

		Self::from_colors(colors)
	}

	/// Loads a palette from a reader holding a CGP table.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the table is malformed.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, XgFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_rgb_bytes(&data)
	}

	/// Opens a CGP palette file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is malformed.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, XgFileError> {
		let data = std::fs::read(path)?;
		Self::from_rgb_bytes(&data)
	}

	/// Gets a color by index, or `None` when the index lies past the table.
	#[inline]
	pub fn get(&self, index: u8) -> Option<Color> {
		self.colors.get(index as usize).copied()
	}

	/// Returns the number of colors in the palette.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` when the palette holds no colors (not yet resolved).
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Returns the color table as a slice.
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors", self.colors.len())
	}
}

/// Resolves the color table for an entry from the source precedence chain.
///
/// Sources are consulted in order: `embedded` (the entry's own payload
/// palette), then `overlay` (the hidden palette graphic, evaluated lazily
/// because it requires decoding a graphic from a separate resource set), then
/// `external` (a CGP file). The first non-empty palette wins.
///
/// Absence of a source is not an error; the chain just moves on. A failure
/// *inside* the overlay lookup (a corrupt overlay graphic, an IO fault) is
/// not absence and propagates immediately.
///
/// # Errors
///
/// Returns [`XgFileError::EmptyPalette`] naming `id` when every source is
/// empty or absent, or the overlay source's own error.
pub fn resolve<F>(
	id: i32,
	embedded: Option<&Palette>,
	overlay: F,
	external: Option<&Palette>,
) -> Result<Palette, XgFileError>
where
	F: FnOnce() -> Result<Option<Palette>, XgFileError>,
{
	if let Some(palette) = embedded
		&& !palette.is_empty()
	{
		return Ok(palette.clone());
	}

	if let Some(palette) = overlay()?
		&& !palette.is_empty()
	{
		return Ok(palette);
	}

	if let Some(palette) = external
		&& !palette.is_empty()
	{
		return Ok(palette.clone());
	}

	Err(XgFileError::EmptyPalette {
		id,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rgb_table(colors: &[(u8, u8, u8)]) -> Vec<u8> {
		colors.iter().flat_map(|&(r, g, b)| [r, g, b]).collect()
	}

	#[test]
	fn test_from_rgb_bytes() {
		let data = rgb_table(&[(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
		let palette = Palette::from_rgb_bytes(&data).unwrap();

		assert_eq!(palette.len(), 3);
		assert_eq!(palette.get(0), Some(Color::new(255, 0, 0)));
		assert_eq!(palette.get(2), Some(Color::new(0, 0, 255)));
		assert_eq!(palette.get(3), None);
	}

	#[test]
	fn test_record_count_follows_length() {
		for count in [0usize, 1, 16, 256] {
			let data = vec![0u8; count * Palette::CGP_ENTRY_SIZE];
			let palette = Palette::from_rgb_bytes(&data).unwrap();
			assert_eq!(palette.len(), count);
		}
	}

	#[test]
	fn test_odd_length_is_malformed() {
		let err = Palette::from_rgb_bytes(&[1, 2, 3, 4]).expect_err("length check should fail");
		assert!(matches!(err, XgFileError::MalformedPalette { .. }));
		assert!(!err.is_entry_local());
	}

	#[test]
	fn test_oversized_table_is_malformed() {
		let data = vec![0u8; 257 * Palette::CGP_ENTRY_SIZE];
		let err = Palette::from_rgb_bytes(&data).expect_err("size check should fail");
		assert!(matches!(err, XgFileError::MalformedPalette { .. }));
	}

	#[test]
	fn test_empty_palette_is_valid() {
		let palette = Palette::from_rgb_bytes(&[]).unwrap();
		assert!(palette.is_empty());
	}

	#[test]
	fn test_resolve_prefers_embedded() {
		let embedded = Palette::from_rgb_bytes(&rgb_table(&[(1, 1, 1)])).unwrap();
		let overlay = Palette::from_rgb_bytes(&rgb_table(&[(2, 2, 2)])).unwrap();
		let external = Palette::from_rgb_bytes(&rgb_table(&[(3, 3, 3)])).unwrap();

		let resolved = resolve(
			7,
			Some(&embedded),
			|| Ok(Some(overlay.clone())),
			Some(&external),
		)
		.unwrap();
		assert_eq!(resolved.get(0), Some(Color::new(1, 1, 1)));
	}

	#[test]
	fn test_resolve_falls_back_to_overlay_then_external() {
		let overlay = Palette::from_rgb_bytes(&rgb_table(&[(2, 2, 2)])).unwrap();
		let external = Palette::from_rgb_bytes(&rgb_table(&[(3, 3, 3)])).unwrap();

		// Embedded missing: overlay wins
		let resolved =
			resolve(7, None, || Ok(Some(overlay.clone())), Some(&external)).unwrap();
		assert_eq!(resolved.get(0), Some(Color::new(2, 2, 2)));

		// Embedded empty counts as missing too
		let empty = Palette::new();
		let resolved =
			resolve(7, Some(&empty), || Ok(Some(overlay.clone())), Some(&external)).unwrap();
		assert_eq!(resolved.get(0), Some(Color::new(2, 2, 2)));

		// Overlay absent: external wins
		let resolved = resolve(7, None, || Ok(None), Some(&external)).unwrap();
		assert_eq!(resolved.get(0), Some(Color::new(3, 3, 3)));
	}

	#[test]
	fn test_resolve_all_absent_is_empty_palette() {
		let err = resolve(9, None, || Ok(None), None).expect_err("resolution should fail");
		match err {
			XgFileError::EmptyPalette {
				id,
			} => assert_eq!(id, 9),
			_ => panic!("Unexpected error: {err:?}"),
		}
	}

	#[test]
	fn test_resolve_overlay_failure_is_fatal() {
		let external = Palette::from_rgb_bytes(&rgb_table(&[(3, 3, 3)])).unwrap();
		let err = resolve(
			9,
			None,
			|| {
				Err(XgFileError::from(std::io::Error::from(
					std::io::ErrorKind::UnexpectedEof,
				)))
			},
			Some(&external),
		)
		.expect_err("overlay failure should propagate");
		assert!(matches!(err, XgFileError::IOError(_)));
	}

	#[test]
	fn test_resolve_skips_overlay_when_embedded_present() {
		let embedded = Palette::from_rgb_bytes(&rgb_table(&[(1, 1, 1)])).unwrap();
		// The overlay closure must not run at all when the embedded palette wins.
		let resolved = resolve(
			7,
			Some(&embedded),
			|| panic!("overlay should not be evaluated"),
			None,
		)
		.unwrap();
		assert_eq!(resolved.get(0), Some(Color::new(1, 1, 1)));
	}
}
