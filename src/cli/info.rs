//! `info`: print a JSON summary of resource indexes.
//!
//! The summary reports record counts next to distinct-ID counts, which makes
//! duplicate-heavy (patch-layered) resource files visible at a glance.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use xg_types::file::{AnimeInfo, AnimeInfoIndex, GraphicInfo, GraphicInfoIndex};

/// Arguments for the `info` subcommand.
#[derive(clap::Args)]
pub struct Args {
	/// Graphic info file path
	#[arg(long = "gif", value_name = "FILE")]
	graphic_info: Option<PathBuf>,

	/// Anime info file path
	#[arg(long = "aif", value_name = "FILE")]
	anime_info: Option<PathBuf>,

	/// Include the full per-entry listing
	#[arg(long)]
	entries: bool,
}

#[derive(Serialize)]
struct GraphicSummary {
	records: usize,
	entries: usize,
	map_tiles: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	listing: Option<Vec<GraphicInfo>>,
}

#[derive(Serialize)]
struct AnimeSummary {
	records: usize,
	entries: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	listing: Option<Vec<AnimeInfo>>,
}

#[derive(Serialize)]
struct Summary {
	#[serde(skip_serializing_if = "Option::is_none")]
	graphic: Option<GraphicSummary>,
	#[serde(skip_serializing_if = "Option::is_none")]
	anime: Option<AnimeSummary>,
}

pub fn run(args: &Args) -> anyhow::Result<()> {
	if args.graphic_info.is_none() && args.anime_info.is_none() {
		anyhow::bail!("at least one of --gif or --aif is required");
	}

	let graphic = args
		.graphic_info
		.as_ref()
		.map(|path| -> anyhow::Result<GraphicSummary> {
			let data = std::fs::read(path)
				.with_context(|| format!("opening graphic info {}", path.display()))?;
			let index = GraphicInfoIndex::from_bytes(&data)?;
			Ok(GraphicSummary {
				records: index.record_count(),
				entries: index.len(),
				map_tiles: index.map_len(),
				listing: args.entries.then(|| index.iter().copied().collect()),
			})
		})
		.transpose()?;

	let anime = args
		.anime_info
		.as_ref()
		.map(|path| -> anyhow::Result<AnimeSummary> {
			let data = std::fs::read(path)
				.with_context(|| format!("opening anime info {}", path.display()))?;
			let index = AnimeInfoIndex::from_bytes(&data)?;
			Ok(AnimeSummary {
				records: index.record_count(),
				entries: index.len(),
				listing: args.entries.then(|| index.iter().copied().collect()),
			})
		})
		.transpose()?;

	let summary = Summary {
		graphic,
		anime,
	};
	println!("{}", serde_json::to_string_pretty(&summary)?);
	Ok(())
}
