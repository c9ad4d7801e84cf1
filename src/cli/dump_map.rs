//! `dump-map`: composite a map's ground layer into one JPEG.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::info;

use xg_types::file::Resources;
use xgtool_rs::render;

/// Arguments for the `dump-map` subcommand.
#[derive(clap::Args)]
pub struct Args {
	/// Map file path
	#[arg(long = "mf", value_name = "FILE")]
	map: PathBuf,

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
}

pub fn run(args: &Args) -> anyhow::Result<()> {
	let mut resources = Resources::new();
	resources
		.open_map(&args.map)
		.with_context(|| format!("opening map {}", args.map.display()))?;
	resources
		.open_graphic_info(&args.graphic_info)
		.with_context(|| format!("opening graphic info {}", args.graphic_info.display()))?;
	resources
		.open_graphic(&args.graphic)
		.with_context(|| format!("opening graphic payload {}", args.graphic.display()))?;
	if let Some(path) = &args.palette {
		resources.open_palette(path).with_context(|| format!("opening palette {}", path.display()))?;
	}

	let map = resources.map().context("map not loaded")?;
	let index = resources.graphic_index().context("graphic info index not loaded")?;
	let payload = resources.graphic_payload().context("graphic payload not loaded")?;

	info!("compositing {map}");
	let canvas = render::compose_map(map, index, payload, resources.palette())?;

	if !args.dry_run {
		fs::create_dir_all(&args.outdir)?;
	}

	let stem = args.map.file_stem().map_or_else(|| "map".into(), |s| s.to_string_lossy());
	let path = args.outdir.join(format!("{stem}.jpg"));
	let mut sink = super::output_sink(args.dry_run, &path)?;
	render::write_jpeg(&mut sink, &canvas)?;

	info!("dump-map finished: wrote {}", path.display());
	Ok(())
}
