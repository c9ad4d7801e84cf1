//! Rendering collaborators: decoded core output in, standard raster images
//! out.
//!
//! The core hands over pixel-index buffers, palettes, offsets, and delays;
//! everything here is presentation. Pixel rows arrive in the payload's
//! bottom-up order and are flipped while converting. Palette index 0 is the
//! transparency key in RGBA output; JPEG output renders it black.

use std::io::Write;

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{overlay, replace};
use image::{Delay, Frame, Rgb, RgbImage, Rgba, RgbaImage};
use log::warn;

use xg_types::file::graphic::{GraphicData, GraphicInfoIndex};
use xg_types::file::{Anime, Color, FileType, Map, Palette, XgFileError, palette};

/// JPEG quality used for all still output
const JPEG_QUALITY: u8 = 75;

fn image_error(file_type: FileType, err: &image::ImageError) -> XgFileError {
	XgFileError::decode_failed(file_type, format!("image encoding failed: {err}"))
}

/// Validates dimensions against the pixel buffer and converts them to `u32`.
fn dimensions(width: i32, height: i32, pixel_count: usize) -> Result<(u32, u32), XgFileError> {
	let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
		return Err(XgFileError::decode_failed(
			FileType::Graphic,
			format!("negative dimensions {width}×{height}"),
		));
	};

	if w as usize * h as usize != pixel_count {
		return Err(XgFileError::decode_failed(
			FileType::Graphic,
			format!("{pixel_count} pixels do not fill {w}×{h}"),
		));
	}

	Ok((w, h))
}

/// Converts a pixel-index buffer to an RGB image.
///
/// Unresolvable indices (past the palette) render black, as does the
/// transparency key.
///
/// # Errors
///
/// Returns an entry-local error when the buffer does not match the
/// dimensions.
pub fn indexed_to_rgb(
	width: i32,
	height: i32,
	pixels: &[u8],
	palette: &Palette,
) -> Result<RgbImage, XgFileError> {
	let (w, h) = dimensions(width, height, pixels.len())?;
	let mut image = RgbImage::new(w, h);

	for y in 0..h {
		let row = &pixels[y as usize * w as usize..][..w as usize];
		for (x, &index) in row.iter().enumerate() {
			let color = palette.get(index).unwrap_or(Color::new(0, 0, 0));
			// Payload rows are bottom-up
			image.put_pixel(x as u32, h - 1 - y, Rgb([color.r, color.g, color.b]));
		}
	}

	Ok(image)
}

/// Converts a pixel-index buffer to an RGBA image, with index 0 transparent
/// and optional horizontal mirroring.
///
/// # Errors
///
/// Returns an entry-local error when the buffer does not match the
/// dimensions.
pub fn indexed_to_rgba(
	width: i32,
	height: i32,
	pixels: &[u8],
	palette: &Palette,
	mirrored: bool,
) -> Result<RgbaImage, XgFileError> {
	let (w, h) = dimensions(width, height, pixels.len())?;
	let mut image = RgbaImage::new(w, h);

	for y in 0..h {
		let row = &pixels[y as usize * w as usize..][..w as usize];
		for (x, &index) in row.iter().enumerate() {
			let pixel = if index == 0 {
				Rgba([0, 0, 0, 0])
			} else {
				let color = palette.get(index).unwrap_or(Color::new(0, 0, 0));
				Rgba([color.r, color.g, color.b, 255])
			};

			let x = if mirrored { w - 1 - x as u32 } else { x as u32 };
			image.put_pixel(x, h - 1 - y, pixel);
		}
	}

	Ok(image)
}

/// Builds GIF frames for an assembled animation.
///
/// The canvas is the union box of every frame's offset rectangle; each frame
/// is blitted at its offset with its own palette, mirror flag, and delay.
/// An animation without frames yields an empty list.
///
/// # Errors
///
/// Returns an entry-local error when a frame's buffer is inconsistent or the
/// union box cannot form a canvas.
pub fn anime_frames(anime: &Anime) -> Result<Vec<Frame>, XgFileError> {
	if anime.frames.is_empty() {
		return Ok(Vec::new());
	}

	let min_x = anime.frames.iter().map(|f| f.off_x).min().unwrap_or_default();
	let min_y = anime.frames.iter().map(|f| f.off_y).min().unwrap_or_default();
	let max_x = anime.frames.iter().map(|f| f.off_x + f.width).max().unwrap_or_default();
	let max_y = anime.frames.iter().map(|f| f.off_y + f.height).max().unwrap_or_default();

	let (Ok(canvas_w), Ok(canvas_h)) =
		(u32::try_from(max_x - min_x), u32::try_from(max_y - min_y))
	else {
		return Err(XgFileError::decode_failed(
			FileType::Anime,
			format!("{anime} spans a degenerate canvas"),
		));
	};

	let mut frames = Vec::with_capacity(anime.frames.len());
	for frame in &anime.frames {
		let sprite =
			indexed_to_rgba(frame.width, frame.height, &frame.pixels, &frame.palette, frame.mirrored)?;

		let mut canvas = RgbaImage::new(canvas_w.max(1), canvas_h.max(1));
		overlay(
			&mut canvas,
			&sprite,
			i64::from(frame.off_x - min_x),
			i64::from(frame.off_y - min_y),
		);

		frames.push(Frame::from_parts(
			canvas,
			0,
			0,
			Delay::from_numer_denom_ms(frame.delay_ms, 1),
		));
	}

	Ok(frames)
}

/// Composites a map's ground layer onto one canvas.
///
/// The cell size is taken from the first resolvable ground tile; tiles that
/// fail to decode entry-locally are logged and left blank.
///
/// # Errors
///
/// Returns an error when no ground tile resolves at all, or a tile fails
/// fatally.
pub fn compose_map(
	map: &Map,
	index: &GraphicInfoIndex,
	payload: &[u8],
	external: Option<&Palette>,
) -> Result<RgbImage, XgFileError> {
	let cell = map.tiles().find_map(|(x, y, _)| {
		let info = map.resolve_ground(index, x, y)?;
		let w = u32::try_from(info.width).ok()?;
		let h = u32::try_from(info.height).ok()?;
		Some((w, h))
	});
	let Some((cell_w, cell_h)) = cell else {
		return Err(XgFileError::decode_failed(
			FileType::Map,
			"no ground tile resolves through the map-ID index",
		));
	};

	let canvas_w = cell_w.checked_mul(map.east() as u32);
	let canvas_h = cell_h.checked_mul(map.south() as u32);
	let (Some(canvas_w), Some(canvas_h)) = (canvas_w, canvas_h) else {
		return Err(XgFileError::decode_failed(
			FileType::Map,
			format!("{map} does not fit an image canvas"),
		));
	};

	let mut canvas = RgbImage::new(canvas_w, canvas_h);
	for (x, y, _) in map.tiles() {
		let Some(info) = map.resolve_ground(index, x, y) else {
			continue;
		};

		match render_tile(info, payload, external) {
			Ok(tile) => {
				replace(&mut canvas, &tile, i64::from(x) * i64::from(cell_w), i64::from(y) * i64::from(cell_h));
			}
			Err(err) if err.is_entry_local() => {
				warn!("skipping map tile ({x}, {y}): {err}");
			}
			Err(err) => return Err(err),
		}
	}

	Ok(canvas)
}

fn render_tile(
	info: &xg_types::file::GraphicInfo,
	payload: &[u8],
	external: Option<&Palette>,
) -> Result<RgbImage, XgFileError> {
	let graphic = GraphicData::from_bytes(info, payload)?;
	let resolved = palette::resolve(info.id, Some(graphic.palette()), || Ok(None), external)?;
	indexed_to_rgb(info.width, info.height, graphic.pixels(), &resolved)
}

/// Encodes an RGB image as JPEG.
///
/// # Errors
///
/// Returns an entry-local error when encoding fails and an IO error when the
/// sink does.
pub fn write_jpeg<W: Write>(writer: &mut W, image: &RgbImage) -> Result<(), XgFileError> {
	let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
	encoder.encode_image(image).map_err(|err| image_error(FileType::Graphic, &err))
}

/// Encodes a frame sequence as an animated GIF with infinite repeat.
///
/// # Errors
///
/// Returns an entry-local error when encoding fails and an IO error when the
/// sink does.
pub fn write_gif<W: Write>(writer: W, frames: Vec<Frame>) -> Result<(), XgFileError> {
	let mut encoder = GifEncoder::new(writer);
	encoder.set_repeat(Repeat::Infinite).map_err(|err| image_error(FileType::Anime, &err))?;
	encoder.encode_frames(frames).map_err(|err| image_error(FileType::Anime, &err))
}

#[cfg(test)]
mod tests {
	use super::*;
	use xg_types::file::AnimeFrame;

	fn palette() -> Palette {
		Palette::from_rgb_bytes(&[0, 0, 0, 255, 0, 0, 0, 255, 0]).unwrap()
	}

	#[test]
	fn test_rgb_rows_flip_bottom_up() {
		// Buffer row 0 (indices 1,1) is the bottom row of the image
		let image = indexed_to_rgb(2, 2, &[1, 1, 2, 2], &palette()).unwrap();
		assert_eq!(image.get_pixel(0, 0).0, [0, 255, 0]);
		assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0]);
	}

	#[test]
	fn test_rgba_transparency_key() {
		let image = indexed_to_rgba(2, 1, &[0, 1], &palette(), false).unwrap();
		assert_eq!(image.get_pixel(0, 0).0[3], 0);
		assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
	}

	#[test]
	fn test_rgba_mirroring() {
		let image = indexed_to_rgba(2, 1, &[1, 2], &palette(), true).unwrap();
		assert_eq!(image.get_pixel(0, 0).0, [0, 255, 0, 255]);
		assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
	}

	#[test]
	fn test_buffer_size_mismatch() {
		let err =
			indexed_to_rgb(2, 2, &[1, 2, 3], &palette()).expect_err("size check should fail");
		assert!(err.is_entry_local());
	}

	fn anime_with_offsets() -> Anime {
		let frame = |off_x: i32, off_y: i32| AnimeFrame {
			graphic_id: 1,
			width: 2,
			height: 2,
			off_x,
			off_y,
			mirrored: false,
			delay_ms: 120,
			pixels: vec![1, 1, 2, 2],
			palette: palette(),
		};

		Anime {
			id: 9,
			direction: 0,
			action: 0,
			frames: vec![frame(0, 0), frame(3, 1)],
		}
	}

	#[test]
	fn test_anime_frames_share_union_canvas() {
		let frames = anime_frames(&anime_with_offsets()).unwrap();
		assert_eq!(frames.len(), 2);

		// Union of (0,0)+2×2 and (3,1)+2×2 is 5×3
		for frame in &frames {
			assert_eq!(frame.buffer().dimensions(), (5, 3));
			assert_eq!(frame.delay().numer_denom_ms().0, 120);
		}
	}

	#[test]
	fn test_anime_without_frames_yields_no_output() {
		let anime = Anime {
			id: 9,
			direction: 0,
			action: 0,
			frames: Vec::new(),
		};
		assert!(anime_frames(&anime).unwrap().is_empty());
	}

	#[test]
	fn test_jpeg_and_gif_encode_to_memory() {
		let image = indexed_to_rgb(2, 2, &[1, 1, 2, 2], &palette()).unwrap();
		let mut jpeg = Vec::new();
		write_jpeg(&mut jpeg, &image).unwrap();
		assert!(!jpeg.is_empty());

		let frames = anime_frames(&anime_with_offsets()).unwrap();
		let mut gif = Vec::new();
		write_gif(&mut gif, frames).unwrap();
		assert_eq!(&gif[0..3], b"GIF");
	}
}
