//! Cluster store list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterStore, KpackResource};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{commands::util, k8s::client::ClusterConnection, output::TableWriter};

#[derive(Args)]
pub struct ListArgs {}

/// Run the clusterstore list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	_args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

	let stores = api
		.list(&ListParams::default())
		.await
		.context("listing ClusterStores")?;
	if stores.items.is_empty() {
		anyhow::bail!("no clusterstores found");
	}

	let mut table = TableWriter::new(writer, &["NAME", "READY"])?;
	for store in &stores.items {
		table.row(&[
			store.metadata.name.as_deref().unwrap_or(""),
			store.ready_text(),
		])?;
	}
	table.finish()?;
	Ok(())
}
