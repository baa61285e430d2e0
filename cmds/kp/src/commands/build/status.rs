//! Build status subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Build, KpackResource, BUILD_IMAGE_LABEL};
use kube::api::{Api, ListParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::{StatusWriter, TableWriter},
};

#[derive(Args)]
pub struct StatusArgs {
	/// Image to inspect; the newest build in the namespace when omitted
	pub image: Option<String>,

	/// Build number, defaults to the latest build
	#[arg(short = 'b', long = "build")]
	pub build: Option<u64>,

	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the build status subcommand.
pub fn run<W: Write>(args: StatusArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of build status.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: StatusArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Build> = connection.namespaced_api();

	let build = match &args.image {
		Some(image) => {
			let params = ListParams::default().labels(&format!("{BUILD_IMAGE_LABEL}={image}"));
			let builds = api.list(&params).await.context("listing Builds")?.items;

			match args.build {
				Some(number) => builds
					.into_iter()
					.find(|b| b.build_number() == Some(number))
					.with_context(|| {
						format!("build {number} not found for Image {image:?}")
					})?,
				None => builds
					.into_iter()
					.max_by_key(Build::build_number)
					.with_context(|| format!("no builds found for Image {image:?}"))?,
			}
		}
		None => {
			if args.build.is_some() {
				anyhow::bail!("--build requires an image name");
			}

			let builds = api
				.list(&ListParams::default())
				.await
				.context("listing Builds")?
				.items;
			builds
				.into_iter()
				.max_by_key(|b| b.metadata.creation_timestamp.clone())
				.with_context(|| {
					format!("no builds found in {:?} namespace", connection.namespace())
				})?
		}
	};

	let mut status = StatusWriter::new(&mut writer);
	status.optional_field("Image", Some(super::image_label(&build)))?;
	status.optional_field(
		"Build",
		build.build_number().map(|n| n.to_string()).as_deref(),
	)?;
	status.field("Status", super::status_text(&build))?;
	status.optional_field("Reason", build.build_reason())?;
	status.optional_field(
		"Message",
		build
			.ready_condition()
			.and_then(|c| c.message.as_deref())
			.filter(|_| super::status_text(&build) == "FAILURE"),
	)?;
	status.optional_field(
		"Built Image",
		build.status.as_ref().and_then(|s| s.latest_image.as_deref()),
	)?;
	status.optional_field(
		"Pod",
		build.status.as_ref().and_then(|s| s.pod_name.as_deref()),
	)?;
	status.finish()?;

	let buildpacks = build
		.status
		.as_ref()
		.map(|s| s.build_metadata.as_slice())
		.unwrap_or_default();
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
