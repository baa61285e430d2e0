//! Image list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Image, KpackResource};
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

/// Run the image list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let images = api
		.list(&ListParams::default())
		.await
		.context("listing Images")?;
	if images.items.is_empty() {
		anyhow::bail!("no images found in {:?} namespace", connection.namespace());
	}

	let mut table = TableWriter::new(writer, &["NAME", "READY", "LATEST IMAGE"])?;
	for image in &images.items {
		let latest_image = image
			.status
			.as_ref()
			.and_then(|s| s.latest_image.as_deref())
			.unwrap_or("");
		table.row(&[
			image.metadata.name.as_deref().unwrap_or(""),
			image.ready_text(),
			latest_image,
		])?;
	}
	table.finish()?;
	Ok(())
}
