//! ClusterStore command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

pub mod add;
pub mod create;
pub mod delete;
pub mod list;
pub mod remove;
pub mod save;
pub mod status;

#[derive(Args)]
pub struct ClusterStoreArgs {
	#[command(subcommand)]
	pub command: ClusterStoreCommands,
}

#[derive(Subcommand)]
pub enum ClusterStoreCommands {
	/// Create a cluster store from buildpackage images
	Create(create::CreateArgs),

	/// Add buildpackages to a cluster store
	Add(add::AddArgs),

	/// Remove buildpackages from a cluster store
	Remove(remove::RemoveArgs),

	/// Create or update a cluster store
	Save(save::SaveArgs),

	/// Display cluster store status
	Status(status::StatusArgs),

	/// List cluster stores
	List(list::ListArgs),

	/// Delete a cluster store
	Delete(delete::DeleteArgs),
}

/// Run the clusterstore command.
pub fn run<W: Write>(args: ClusterStoreArgs, writer: W) -> Result<()> {
	match args.command {
		ClusterStoreCommands::Create(args) => create::run(args, writer),
		ClusterStoreCommands::Add(args) => add::run(args, writer),
		ClusterStoreCommands::Remove(args) => remove::run(args, writer),
		ClusterStoreCommands::Save(args) => save::run(args, writer),
		ClusterStoreCommands::Status(args) => status::run(args, writer),
		ClusterStoreCommands::List(args) => list::run(args, writer),
		ClusterStoreCommands::Delete(args) => delete::run(args, writer),
	}
}
