//! Cluster builder list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterBuilder, KpackResource};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output::TableWriter};

#[derive(Args)]
pub struct ListArgs {}

/// Run the clusterbuilder list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	_args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();

	let builders = api
		.list(&ListParams::default())
		.await
		.context("listing ClusterBuilders")?;
	if builders.items.is_empty() {
		anyhow::bail!("no clusterbuilders found");
	}

	let mut table = TableWriter::new(writer, &["NAME", "READY", "LATEST IMAGE"])?;
	for builder in &builders.items {
		let latest_image = builder
			.status
			.as_ref()
			.and_then(|s| s.latest_image.as_deref())
			.unwrap_or("");
		table.row(&[
			builder.metadata.name.as_deref().unwrap_or(""),
			builder.ready_text(),
			latest_image,
		])?;
	}
	table.finish()?;
	Ok(())
}
