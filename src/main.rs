//! Command-line entry point for the resource extraction tool.

mod cli;

use clap::Parser;

fn main() {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	if let Err(err) = cli::Cli::parse().run() {
		log::error!("{err:#}");
		std::process::exit(1);
	}
}
