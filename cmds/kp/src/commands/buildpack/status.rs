//! Buildpack status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Buildpack, BuildpackStatus};
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::{StatusWriter, TableWriter},
};

#[derive(Args)]
pub struct StatusArgs {
	/// Buildpack name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the buildpack status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of buildpack status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Buildpack> = connection.namespaced_api();

	let buildpack = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting Buildpack {:?}", args.name))?;

	let summary = util::ready_summary(&buildpack);
	write_status(
		&mut writer,
		summary,
		&buildpack.spec.image,
		buildpack.status.as_ref(),
	)
}

/// Status block shared with the clusterbuildpack status command: ready
/// state, source image and the buildpacks discovered inside it.
pub(crate) fn write_status<W: Write>(
	mut writer: W,
	summary: (&str, Option<String>),
	image: &str,
	buildpack_status: Option<&BuildpackStatus>,
) -> Result<()> {
	let (phrase, detail) = summary;

	let mut status = StatusWriter::new(&mut writer);
	status.field("Status", phrase)?;
	status.optional_field("Reason", detail.as_deref())?;
	status.field("Image", image)?;
	status.finish()?;

	let buildpacks = buildpack_status.map(|s| s.buildpacks.as_slice()).unwrap_or_default();
	if !buildpacks.is_empty() {
		writeln!(writer)?;
		let mut table = TableWriter::new(&mut writer, &["BUILDPACK ID", "VERSION", "HOMEPAGE"])?;
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
