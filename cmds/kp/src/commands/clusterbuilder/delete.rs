//! Cluster builder delete subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterBuilder;
use kube::api::{Api, DeleteParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output};

#[derive(Args)]
pub struct DeleteArgs {
	/// Cluster builder name
	pub name: String,

	/// Only validate the deletion server side, do not persist it
	#[arg(long)]
	pub dry_run: bool,
}

/// Run the clusterbuilder delete subcommand.
pub fn run<W: Write>(args: DeleteArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder delete.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: DeleteArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();

	let params = DeleteParams {
		dry_run: args.dry_run,
		..DeleteParams::default()
	};
	api.delete(&args.name, &params)
		.await
		.with_context(|| format!("deleting ClusterBuilder {:?}", args.name))?;

	output::write_result(
		&mut writer,
		"ClusterBuilder",
		&args.name,
		"deleted",
		args.dry_run,
	)?;
	Ok(())
}
