//! Cluster builder status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterBuilder;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::{builder, util},
	k8s::client::ClusterConnection,
};

#[derive(Args)]
pub struct StatusArgs {
	/// Cluster builder name
	pub name: String,
}

/// Run the clusterbuilder status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();

	let cluster_builder = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterBuilder {:?}", args.name))?;

	let summary = util::ready_summary(&cluster_builder);
	builder::status::write_status(
		&mut writer,
		summary,
		cluster_builder.status.as_ref(),
		&cluster_builder.spec.order,
	)
}
