//! Cluster stack patch subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStack;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
};

#[derive(Args)]
pub struct PatchArgs {
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

/// Run the clusterstack patch subcommand.
pub fn run<W: Write>(args: PatchArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster stack patch.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: PatchArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStack> = connection.cluster_api();

	let current = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterStack {:?}", args.name))?;

	let mut desired = current.clone();
	super::apply_overrides(
		&mut desired.spec,
		args.build_image.as_deref(),
		args.run_image.as_deref(),
		args.stack_id.as_deref(),
	);

	let patched = submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
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
