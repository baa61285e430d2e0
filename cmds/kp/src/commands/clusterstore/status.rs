//! Cluster store status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStore;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util,
	k8s::client::ClusterConnection,
	output::{StatusWriter, TableWriter},
};

#[derive(Args)]
pub struct StatusArgs {
	/// Cluster store name
	pub name: String,
}

/// Run the clusterstore status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

	let store = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterStore {:?}", args.name))?;

	let (phrase, detail) = util::ready_summary(&store);
	let mut status = StatusWriter::new(&mut writer);
	status.field("Status", phrase)?;
	status.optional_field("Reason", detail.as_deref())?;
	status.finish()?;

	let buildpacks = store
		.status
		.as_ref()
		.map(|s| s.buildpacks.as_slice())
		.unwrap_or_default();
	if !buildpacks.is_empty() {
		writeln!(writer)?;
		let mut table =
			TableWriter::new(&mut writer, &["BUILDPACKAGE ID", "VERSION", "HOMEPAGE"])?;
		for buildpack in buildpacks {
			table.row(&[
				&buildpack.id,
				&buildpack.version,
				buildpack.homepage.as_deref().unwrap_or(""),
			])?;
		}
		table.finish()?;
	}

	Ok(())
}
