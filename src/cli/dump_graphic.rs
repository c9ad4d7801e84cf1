//! `dump-graphic`: decode every indexed graphic entry to a JPEG still.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::info;

use xg_types::file::{GraphicData, GraphicInfo, Resources, palette};
use xgtool_rs::batch::{self, BatchContext};
use xgtool_rs::render;

/// Arguments for the `dump-graphic` subcommand.
#[derive(clap::Args)]
pub struct Args {
	/// Graphic info file path
	#[arg(long = "gif", value_name = "FILE")]
	graphic_info: PathBuf,

	/// Graphic payload file path
	#[arg(long = "gf", value_name = "FILE")]
	graphic: PathBuf,

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
		.open_graphic_info(&args.graphic_info)
		.with_context(|| format!("opening graphic info {}", args.graphic_info.display()))?;
	resources
		.open_graphic(&args.graphic)
		.with_context(|| format!("opening graphic payload {}", args.graphic.display()))?;
	if let Some(path) = &args.palette {
		resources.open_palette(path).with_context(|| format!("opening palette {}", path.display()))?;
	}

	let index = resources.graphic_index().context("graphic info index not loaded")?;
	let payload = resources.graphic_payload().context("graphic payload not loaded")?;

	if !args.dry_run {
		fs::create_dir_all(&args.outdir)?;
	}

	let entries: Vec<GraphicInfo> = index.iter().copied().collect();
	info!("dumping {} graphic entries with {} workers", entries.len(), args.jobs);

	let ctx = BatchContext::new();
	let report = batch::run(&entries, args.jobs, &ctx, |entry| {
		let graphic = GraphicData::from_bytes(entry, payload)?;

		// Embedded palette first, external CGP second; no overlay set here
		let resolved =
			palette::resolve(entry.id, Some(graphic.palette()), || Ok(None), resources.palette())?;

		let image = render::indexed_to_rgb(entry.width, entry.height, graphic.pixels(), &resolved)?;
		let path = args.outdir.join(format!("{}.jpg", entry.id));
		let mut sink = super::output_sink(args.dry_run, &path)?;
		render::write_jpeg(&mut sink, &image)
	})?;

	info!("dump-graphic finished: {} processed, {} skipped", report.processed, report.skipped);
	Ok(())
}
