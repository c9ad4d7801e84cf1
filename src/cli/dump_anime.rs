//! `dump-anime`: assemble every animation and write animated GIFs.
//!
//! The base palette for each anime record is resolved through the hidden
//! overlay set (when `--pgif`/`--pgf` are given) and the external CGP file;
//! individual frames still prefer their own embedded palettes.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info};

use xg_types::file::{AnimeInfo, Resources, palette};
use xgtool_rs::batch::{self, BatchContext};
use xgtool_rs::render;

/// Arguments for the `dump-anime` subcommand.
#[derive(clap::Args)]
pub struct Args {
	/// Anime info file path
	#[arg(long = "aif", value_name = "FILE")]
	anime_info: PathBuf,

	/// Anime payload file path
	#[arg(long = "af", value_name = "FILE")]
	anime: PathBuf,

	/// Graphic info file path
	#[arg(long = "gif", value_name = "FILE")]
	graphic_info: PathBuf,

	/// Graphic payload file path
	#[arg(long = "gf", value_name = "FILE")]
	graphic: PathBuf,

	/// Palette graphic info file path (hidden palette resource set)
	#[arg(long = "pgif", value_name = "FILE", requires = "palette_graphic")]
	palette_graphic_info: Option<PathBuf>,

	/// Palette graphic payload file path (hidden palette resource set)
	#[arg(long = "pgf", value_name = "FILE", requires = "palette_graphic_info")]
	palette_graphic: Option<PathBuf>,

	/// External CGP palette file path
	#[arg(long = "pf", value_name = "FILE")]
	palette: Option<PathBuf>,

	/// Output directory
	#[arg(short, long, default_value = "output")]
	outdir: PathBuf,

	/// Decode and render without writing output files
	#[arg(long)]
	dry_run: bool,

	/// Worker thread count
	#[arg(long, default_value_t = batch::available_workers())]
	jobs: usize,
}

pub fn run(args: &Args) -> anyhow::Result<()> {
	let mut resources = Resources::new();
	resources
		.open_anime_info(&args.anime_info)
		.with_context(|| format!("opening anime info {}", args.anime_info.display()))?;
	resources
		.open_anime(&args.anime)
		.with_context(|| format!("opening anime payload {}", args.anime.display()))?;
	resources
		.open_graphic_info(&args.graphic_info)
		.with_context(|| format!("opening graphic info {}", args.graphic_info.display()))?;
	resources
		.open_graphic(&args.graphic)
		.with_context(|| format!("opening graphic payload {}", args.graphic.display()))?;
	if let Some(path) = &args.palette {
		resources.open_palette(path).with_context(|| format!("opening palette {}", path.display()))?;
	}

	let mut overlay_set = Resources::new();
	if let Some(path) = &args.palette_graphic_info {
		overlay_set
			.open_graphic_info(path)
			.with_context(|| format!("opening palette graphic info {}", path.display()))?;
	}
	if let Some(path) = &args.palette_graphic {
		overlay_set
			.open_graphic(path)
			.with_context(|| format!("opening palette graphic payload {}", path.display()))?;
	}

	let anime_index = resources.anime_index().context("anime info index not loaded")?;
	let anime_payload = resources.anime_payload().context("anime payload not loaded")?;
	let graphic_index = resources.graphic_index().context("graphic info index not loaded")?;
	let graphic_payload = resources.graphic_payload().context("graphic payload not loaded")?;

	if !args.dry_run {
		fs::create_dir_all(&args.outdir)?;
	}

	let records: Vec<AnimeInfo> = anime_index.iter().copied().collect();
	info!("dumping {} anime records with {} workers", records.len(), args.jobs);

	let ctx = BatchContext::new();
	let report = batch::run(&records, args.jobs, &ctx, |record| {
		let base = palette::resolve(
			record.id,
			None,
			|| overlay_set.overlay_palette(record.id),
			resources.palette(),
		)?;

		let animes = record.load_all(anime_payload, graphic_index, graphic_payload, &base)?;
		for (ordinal, anime) in animes.iter().enumerate() {
			let frames = render::anime_frames(anime)?;
			if frames.is_empty() {
				debug!("{anime} renders no frames");
				continue;
			}

			let path = args.outdir.join(format!("{}-{}.gif", record.id, ordinal));
			let sink = super::output_sink(args.dry_run, &path)?;
			render::write_gif(sink, frames)?;
		}

		Ok(())
	})?;

	info!("dump-anime finished: {} processed, {} skipped", report.processed, report.skipped);
	Ok(())
}
