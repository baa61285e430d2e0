//! Cluster stack list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterStack, KpackResource};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output::TableWriter};

#[derive(Args)]
pub struct ListArgs {}

/// Run the clusterstack list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster stack list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	_args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStack> = connection.cluster_api();

	let stacks = api
		.list(&ListParams::default())
		.await
		.context("listing ClusterStacks")?;
	if stacks.items.is_empty() {
		anyhow::bail!("no clusterstacks found");
	}

	let mut table = TableWriter::new(writer, &["NAME", "READY", "ID"])?;
	for stack in &stacks.items {
		let id = stack
			.status
			.as_ref()
			.and_then(|s| s.id.as_deref())
			.or(stack.spec.id.as_deref())
			.unwrap_or("");
		table.row(&[
			stack.metadata.name.as_deref().unwrap_or(""),
			stack.ready_text(),
			id,
		])?;
	}
	table.finish()?;
	Ok(())
}
