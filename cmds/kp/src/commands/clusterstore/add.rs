//! Cluster store add subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStore;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
	store,
};

#[derive(Args)]
pub struct AddArgs {
	/// Cluster store name
	pub name: String,

	/// Digested buildpackage image reference (repeatable)
	#[arg(short = 'b', long = "buildpackage", required = true)]
	pub buildpackages: Vec<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterstore add subcommand.
pub fn run<W: Write>(args: AddArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store add.
///
/// Buildpackages whose digest is already present are skipped; when nothing
/// is left to add the store is not patched at all.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: AddArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

	let current = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting ClusterStore {:?}", args.name))?;

	let outcome = store::add_sources(&current, &args.buildpackages)?;
	if !outcome.changed() {
		writeln!(writer, "nothing to add: buildpackages already exist in the store")?;
		return Ok(());
	}

	let patched = submit_merge_patch(&api, &args.name, &current, &outcome.store, args.submit.dry_run)
		.await
		.with_context(|| format!("patching ClusterStore {:?}", args.name))?;

	util::report(
		&mut writer,
		&args.submit,
		"ClusterStore",
		&args.name,
		"updated",
		&patched.unwrap_or(outcome.store),
	)
}
