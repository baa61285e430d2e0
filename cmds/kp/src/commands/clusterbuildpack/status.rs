//! Cluster buildpack status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterBuildpack;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::{buildpack, util},
	k8s::client::ClusterConnection,
};

#[derive(Args)]
pub struct StatusArgs {
	/// Cluster buildpack name
	pub name: String,
}

/// Run the clusterbuildpack status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster buildpack status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuildpack> = connection.cluster_api();

	let cluster_buildpack = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterBuildpack {:?}", args.name))?;

	let summary = util::ready_summary(&cluster_buildpack);
	buildpack::status::write_status(
		&mut writer,
		summary,
		&cluster_buildpack.spec.image,
		cluster_buildpack.status.as_ref(),
	)
}
