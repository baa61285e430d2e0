//! Image status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::Image;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::StatusWriter,
};

#[derive(Args)]
pub struct StatusArgs {
	/// Image name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the image status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let image = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting Image {:?}", args.name))?;

	let (phrase, detail) = util::ready_summary(&image);
	let mut status = StatusWriter::new(writer);
	status.field("Status", phrase)?;
	status.optional_field("Reason", detail.as_deref())?;
	status.optional_field(
		"Latest Image",
		image.status.as_ref().and_then(|s| s.latest_image.as_deref()),
	)?;
	status.optional_field(
		"Last Build Reason",
		image
			.status
			.as_ref()
			.and_then(|s| s.latest_build_reason.as_deref()),
	)?;
	status.field(
		"Builder",
		&format!("{}/{}", image.spec.builder.kind, image.spec.builder.name),
	)?;

	let source = &image.spec.source;
	if let Some(git) = &source.git {
		status.field("Source", &format!("git {}", git.url))?;
		status.field("Revision", &git.revision)?;
	} else if let Some(blob) = &source.blob {
		status.field("Source", &format!("blob {}", blob.url))?;
	} else if let Some(registry) = &source.registry {
		status.field("Source", &format!("registry {}", registry.image))?;
	}
	status.optional_field("Sub Path", source.sub_path.as_deref())?;

	status.finish()?;
	Ok(())
}
