//! Cluster buildpack list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterBuildpack, KpackResource};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output::TableWriter};

#[derive(Args)]
pub struct ListArgs {}

/// Run the clusterbuildpack list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster buildpack list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	_args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuildpack> = connection.cluster_api();

	let buildpacks = api
		.list(&ListParams::default())
		.await
		.context("listing ClusterBuildpacks")?;
	if buildpacks.items.is_empty() {
		anyhow::bail!("no clusterbuildpacks found");
	}

	let mut table = TableWriter::new(writer, &["NAME", "READY", "IMAGE"])?;
	for buildpack in &buildpacks.items {
		table.row(&[
			buildpack.metadata.name.as_deref().unwrap_or(""),
			buildpack.ready_text(),
			&buildpack.spec.image,
		])?;
	}
	table.finish()?;
	Ok(())
}
