//! CLI surface: one module per subcommand.

mod dump_anime;
mod dump_graphic;
mod dump_map;
mod info;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::{Parser, Subcommand};

use xg_types::file::XgFileError;

/// Extracts sprite and animation assets from a legacy game's resource files.
#[derive(Parser)]
#[command(name = "xgtool")]
#[command(version)]
#[command(about = "Dump graphics, animations, and maps from legacy resource files", long_about = None)]
pub struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode every indexed graphic entry and write JPEG stills
	DumpGraphic(dump_graphic::Args),

	/// Assemble every animation and write animated GIFs
	DumpAnime(dump_anime::Args),

	/// Composite a map's ground layer and write one JPEG
	DumpMap(dump_map::Args),

	/// Print a JSON summary of resource indexes
	Info(info::Args),
}

impl Cli {
	/// Dispatches the selected subcommand.
	pub fn run(self) -> anyhow::Result<()> {
		match self.command {
			Commands::DumpGraphic(args) => dump_graphic::run(&args),
			Commands::DumpAnime(args) => dump_anime::run(&args),
			Commands::DumpMap(args) => dump_map::run(&args),
			Commands::Info(args) => info::run(&args),
		}
	}
}

/// Opens the output sink for one artifact: a buffered file, or a discarding
/// sink for dry runs.
fn output_sink(dry_run: bool, path: &Path) -> Result<Box<dyn Write>, XgFileError> {
	if dry_run {
		Ok(Box::new(io::sink()))
	} else {
		Ok(Box::new(BufWriter::new(File::create(path)?)))
	}
}
