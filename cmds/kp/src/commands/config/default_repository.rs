//! Default repository get/set subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracing::instrument;

use crate::{
	commands::util,
	k8s::{client::ClusterConnection, config::KpConfig},
};

#[derive(Args)]
pub struct DefaultRepositoryArgs {
	/// Repository to set; prints the current one when omitted
	pub value: Option<String>,
}

/// Run the config default-repository subcommand.
pub fn run<W: Write>(args: DefaultRepositoryArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of config default-repository.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: DefaultRepositoryArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let config = KpConfig::new(connection.client().clone());

	match args.value {
		Some(repository) => {
			config
				.set_default_repository(&repository)
				.await
				.context("setting default repository")?;
			writeln!(writer, "default repository set to {repository:?}")?;
		}
		None => {
			let repository = config.default_repository().await?;
			writeln!(writer, "{repository}")?;
		}
	}
	Ok(())
}
