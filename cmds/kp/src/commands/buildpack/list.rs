//! Buildpack list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Buildpack, KpackResource};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::TableWriter,
};

#[derive(Args)]
pub struct ListArgs {
	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the buildpack list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of buildpack list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Buildpack> = connection.namespaced_api();

	let buildpacks = api
		.list(&ListParams::default())
		.await
		.context("listing Buildpacks")?;
	if buildpacks.items.is_empty() {
		anyhow::bail!(
			"no buildpacks found in {:?} namespace",
			connection.namespace()
		);
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
