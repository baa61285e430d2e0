//! Cluster builder patch subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterBuilder;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
};

#[derive(Args)]
pub struct PatchArgs {
	/// Cluster builder name
	pub name: String,

	/// Cluster stack the builder runs on
	#[arg(long)]
	pub stack: Option<String>,

	/// Cluster store supplying the buildpacks
	#[arg(long)]
	pub store: Option<String>,

	/// Path to a buildpack order yaml
	#[arg(long, conflicts_with = "buildpacks")]
	pub order: Option<String>,

	/// Buildpack id, optionally pinned as id@version (repeatable)
	#[arg(short = 'b', long = "buildpack")]
	pub buildpacks: Vec<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterbuilder patch subcommand.
pub fn run<W: Write>(args: PatchArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder patch.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: PatchArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();

	let current = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterBuilder {:?}", args.name))?;

	let order = util::resolve_order(args.order.as_deref(), &args.buildpacks)?;
	let mut desired = current.clone();
	super::apply_overrides(
		&mut desired.spec,
		args.stack.as_deref(),
		args.store.as_deref(),
		Some(order),
	);

	let patched = submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
		.await
		.with_context(|| format!("patching ClusterBuilder {:?}", args.name))?;

	let verb = if patched.is_some() { "updated" } else { "unchanged" };
	util::report(
		&mut writer,
		&args.submit,
		"ClusterBuilder",
		&args.name,
		verb,
		&patched.unwrap_or(desired),
	)
}
