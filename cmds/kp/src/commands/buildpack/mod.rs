//! Buildpack command handlers. Buildpacks are managed declaratively, so the
//! CLI only reads them.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

pub mod list;
pub mod status;

#[derive(Args)]
pub struct BuildpackArgs {
	#[command(subcommand)]
	pub command: BuildpackCommands,
}

#[derive(Subcommand)]
pub enum BuildpackCommands {
	/// List buildpacks in a namespace
	List(list::ListArgs),

	/// Display buildpack status
	Status(status::StatusArgs),
}

/// Run the buildpack command.
pub fn run<W: Write>(args: BuildpackArgs, writer: W) -> Result<()> {
	match args.command {
		BuildpackCommands::List(args) => list::run(args, writer),
		BuildpackCommands::Status(args) => status::run(args, writer),
	}
}
