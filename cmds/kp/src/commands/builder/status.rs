//! Builder status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Builder, BuilderStatus, OrderEntry};
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::{StatusWriter, TableWriter},
};

#[derive(Args)]
pub struct StatusArgs {
	/// Builder name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the builder status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of builder status.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Builder> = connection.namespaced_api();

	let builder = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting Builder {:?}", args.name))?;

	let summary = util::ready_summary(&builder);
	write_status(
		&mut writer,
		summary,
		builder.status.as_ref(),
		&builder.spec.order,
	)
}

/// Status block shared with the clusterbuilder status command: ready state,
/// composed image, stack, buildpack metadata and the detection order.
pub(crate) fn write_status<W: Write>(
	mut writer: W,
	summary: (&str, Option<String>),
	builder_status: Option<&BuilderStatus>,
	spec_order: &[OrderEntry],
) -> Result<()> {
	let (phrase, detail) = summary;

	let mut status = StatusWriter::new(&mut writer);
	status.field("Status", phrase)?;
	status.optional_field("Reason", detail.as_deref())?;
	status.optional_field(
		"Image",
		builder_status.and_then(|s| s.latest_image.as_deref()),
	)?;
	let stack = builder_status.and_then(|s| s.stack.as_ref());
	status.optional_field("Stack ID", stack.and_then(|s| s.id.as_deref()))?;
	status.optional_field("Run Image", stack.and_then(|s| s.run_image.as_deref()))?;
	status.finish()?;

	let buildpacks = builder_status.map(|s| s.builder_metadata.as_slice()).unwrap_or_default();
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

	// The reconciled order, falling back to the spec before the first build
	let order = match builder_status.map(|s| s.order.as_slice()) {
		Some(order) if !order.is_empty() => order,
		_ => spec_order,
	};
	if !order.is_empty() {
		writeln!(writer)?;
		writeln!(writer, "DETECTION ORDER")?;
		for (position, entry) in order.iter().enumerate() {
			writeln!(writer, "Group #{}", position + 1)?;
			for buildpack in &entry.group {
				let version = buildpack
					.version
					.as_deref()
					.map(|v| format!("@{v}"))
					.unwrap_or_default();
				let optional = if buildpack.optional == Some(true) {
					" (optional)"
				} else {
					""
				};
				writeln!(writer, "  {}{version}{optional}", buildpack.id)?;
			}
		}
	}

	Ok(())
}
