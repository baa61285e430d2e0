//! Cluster store delete subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStore;
use kube::api::{Api, DeleteParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output};

#[derive(Args)]
pub struct DeleteArgs {
	/// Cluster store name
	pub name: String,

	/// Delete without asking for confirmation
	#[arg(short = 'f', long)]
	pub force: bool,

	/// Only validate the deletion server side, do not persist it
	#[arg(long)]
	pub dry_run: bool,
}

/// Run the clusterstore delete subcommand.
///
/// Deleting a store breaks builders referencing it, so the command asks for
/// confirmation unless `--force` is given.
pub fn run<W: Write>(args: DeleteArgs, mut writer: W) -> Result<()> {
	if !args.force {
		let confirmed = util::confirm(&format!(
			"WARNING: builders referring to buildpacks in this store will no longer schedule rebuilds for buildpack updates.\nPlease confirm deletion of ClusterStore {:?}",
			args.name
		))?;
		if !confirmed {
			writeln!(writer, "skipping ClusterStore deletion")?;
			return Ok(());
		}
	}

	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store delete.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: DeleteArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

	let params = DeleteParams {
		dry_run: args.dry_run,
		..DeleteParams::default()
	};
	api.delete(&args.name, &params)
		.await
		.with_context(|| format!("deleting ClusterStore {:?}", args.name))?;

	output::write_result(&mut writer, "ClusterStore", &args.name, "deleted", args.dry_run)?;
	Ok(())
}
