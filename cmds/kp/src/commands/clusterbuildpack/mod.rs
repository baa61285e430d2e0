//! ClusterBuildpack command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

pub mod list;
pub mod status;

#[derive(Args)]
pub struct ClusterBuildpackArgs {
	#[command(subcommand)]
	pub command: ClusterBuildpackCommands,
}

#[derive(Subcommand)]
pub enum ClusterBuildpackCommands {
	/// List cluster buildpacks
	List(list::ListArgs),

	/// Display cluster buildpack status
	Status(status::StatusArgs),
}

/// Run the clusterbuildpack command.
pub fn run<W: Write>(args: ClusterBuildpackArgs, writer: W) -> Result<()> {
	match args.command {
		ClusterBuildpackCommands::List(args) => list::run(args, writer),
		ClusterBuildpackCommands::Status(args) => status::run(args, writer),
	}
}
