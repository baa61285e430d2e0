//! Cluster stack status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStack;
use kube::api::Api;
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output::StatusWriter};

#[derive(Args)]
pub struct StatusArgs {
	/// Cluster stack name
	pub name: String,
}

/// Run the clusterstack status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster stack status. Prefers the digest-pinned
/// images resolved by the controller over the spec references.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStack> = connection.cluster_api();

	let stack = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterStack {:?}", args.name))?;

	let (phrase, detail) = util::ready_summary(&stack);
	let id = stack
		.status
		.as_ref()
		.and_then(|s| s.id.as_deref())
		.or(stack.spec.id.as_deref());
	let build_image = stack
		.status
		.as_ref()
		.and_then(|s| s.build_image.as_ref())
		.and_then(|i| i.latest_image.as_deref())
		.unwrap_or(&stack.spec.build_image.image);
	let run_image = stack
		.status
		.as_ref()
		.and_then(|s| s.run_image.as_ref())
		.and_then(|i| i.latest_image.as_deref())
		.unwrap_or(&stack.spec.run_image.image);

	let mut status = StatusWriter::new(writer);
	status.field("Status", phrase)?;
	status.optional_field("Reason", detail.as_deref())?;
	status.optional_field("Id", id)?;
	status.field("Build Image", build_image)?;
	status.field("Run Image", run_image)?;
	status.finish()?;
	Ok(())
}
