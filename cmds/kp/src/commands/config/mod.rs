//! Build-service settings command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

pub mod default_repository;
pub mod default_service_account;

#[derive(Args)]
pub struct ConfigArgs {
	#[command(subcommand)]
	pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
	/// Show or set the default repository builder images are written to
	DefaultRepository(default_repository::DefaultRepositoryArgs),

	/// Show or set the service account cluster builders run as
	DefaultServiceAccount(default_service_account::DefaultServiceAccountArgs),
}

/// Run the config command.
pub fn run<W: Write>(args: ConfigArgs, writer: W) -> Result<()> {
	match args.command {
		ConfigCommands::DefaultRepository(args) => default_repository::run(args, writer),
		ConfigCommands::DefaultServiceAccount(args) => default_service_account::run(args, writer),
	}
}
