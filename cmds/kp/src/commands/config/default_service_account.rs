//! Default service account get/set subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracing::instrument;

use crate::{
	commands::util,
	k8s::{client::ClusterConnection, config::KpConfig},
};

#[derive(Args)]
pub struct DefaultServiceAccountArgs {
	/// Service account to set; prints the current one when omitted
	pub value: Option<String>,
}

/// Run the config default-service-account subcommand.
pub fn run<W: Write>(args: DefaultServiceAccountArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of config default-service-account.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: DefaultServiceAccountArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let config = KpConfig::new(connection.client().clone());

	match args.value {
		Some(name) => {
			config
				.set_default_service_account(&name)
				.await
				.context("setting default service account")?;
			writeln!(writer, "default service account set to {name:?}")?;
		}
		None => {
			let service_account = config
				.service_account_ref()
				.await
				.context("getting default service account")?;
			writeln!(writer, "{}", service_account.name)?;
		}
	}
	Ok(())
}
