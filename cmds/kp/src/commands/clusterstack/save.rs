//! Cluster stack save subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterStack, ClusterStackSpec, StackImage};
use kube::{
	api::{Api, PostParams},
	core::ObjectMeta,
};
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
};

#[derive(Args)]
pub struct SaveArgs {
	/// Cluster stack name
	pub name: String,

	/// Build-time base image reference
	#[arg(short = 'b', long = "build-image")]
	pub build_image: Option<String>,

	/// Run-time base image reference
	#[arg(short = 'r', long = "run-image")]
	pub run_image: Option<String>,

	/// Stack identifier
	#[arg(long = "stack-id")]
	pub stack_id: Option<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterstack save subcommand.
pub fn run<W: Write>(args: SaveArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster stack save: create when the stack does
/// not exist, otherwise patch the provided fields.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: SaveArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStack> = connection.cluster_api();

	let existing = api
		.get_opt(&args.name)
		.await
		.with_context(|| format!("getting ClusterStack {:?}", args.name))?;

	match existing {
		None => {
			let (Some(build_image), Some(run_image)) = (&args.build_image, &args.run_image)
			else {
				anyhow::bail!(
					"--build-image and --run-image are required when creating a ClusterStack"
				);
			};

			let stack = ClusterStack {
				metadata: ObjectMeta {
					name: Some(args.name.clone()),
					..ObjectMeta::default()
				},
				spec: ClusterStackSpec {
					id: args.stack_id.clone(),
					build_image: StackImage::new(build_image),
					run_image: StackImage::new(run_image),
				},
				status: None,
			};

			let params = PostParams {
				dry_run: args.submit.dry_run,
				..PostParams::default()
			};
			let created = api
				.create(&params, &stack)
				.await
				.with_context(|| format!("creating ClusterStack {:?}", args.name))?;

			util::report(
				&mut writer,
				&args.submit,
				"ClusterStack",
				&args.name,
				"created",
				&created,
			)
		}
		Some(current) => {
			let mut desired = current.clone();
			super::apply_overrides(
				&mut desired.spec,
				args.build_image.as_deref(),
				args.run_image.as_deref(),
				args.stack_id.as_deref(),
			);

			let patched =
				submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
					.await
					.with_context(|| format!("patching ClusterStack {:?}", args.name))?;

			let verb = if patched.is_some() { "updated" } else { "unchanged" };
			util::report(
				&mut writer,
				&args.submit,
				"ClusterStack",
				&args.name,
				verb,
				&patched.unwrap_or(desired),
			)
		}
	}
}
