//! Build list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Build, BUILD_IMAGE_LABEL};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::TableWriter,
};

#[derive(Args)]
pub struct ListArgs {
	/// Image to list builds for; all images when omitted
	pub image: Option<String>,

	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the build list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of build list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Build> = connection.namespaced_api();

	let mut params = ListParams::default();
	if let Some(image) = &args.image {
		params = params.labels(&format!("{BUILD_IMAGE_LABEL}={image}"));
	}

	let mut builds = api.list(&params).await.context("listing Builds")?.items;
	if builds.is_empty() {
		match &args.image {
			Some(image) => anyhow::bail!("no builds found for Image {:?}", image),
			None => anyhow::bail!(
				"no builds found in {:?} namespace",
				connection.namespace()
			),
		}
	}
	super::sort_builds(&mut builds);

	let mut table = TableWriter::new(writer, &["BUILD", "IMAGE", "STATUS", "BUILT IMAGE", "REASON"])?;
	for build in &builds {
		let number = build
			.build_number()
			.map(|n| n.to_string())
			.unwrap_or_default();
		let built_image = build
			.status
			.as_ref()
			.and_then(|s| s.latest_image.as_deref())
			.unwrap_or("");
		table.row(&[
			&number,
			super::image_label(build),
			super::status_text(build),
			built_image,
			build.build_reason().unwrap_or(""),
		])?;
	}
	table.finish()?;
	Ok(())
}
