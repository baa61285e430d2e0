//! Cluster store save subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStore;
use kube::api::{Api, PostParams};
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
	store,
};

#[derive(Args)]
pub struct SaveArgs {
	/// Cluster store name
	pub name: String,

	/// Digested buildpackage image reference (repeatable)
	#[arg(short = 'b', long = "buildpackage", required = true)]
	pub buildpackages: Vec<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterstore save subcommand.
pub fn run<W: Write>(args: SaveArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store save: create when the store does
/// not exist, otherwise add the buildpackages.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: SaveArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

	let existing = api
		.get_opt(&args.name)
		.await
		.with_context(|| format!("getting ClusterStore {:?}", args.name))?;

	match existing {
		None => {
			let store = store::new_store(&args.name, &args.buildpackages)?;
			let params = PostParams {
				dry_run: args.submit.dry_run,
				..PostParams::default()
			};
			let created = api
				.create(&params, &store)
				.await
				.with_context(|| format!("creating ClusterStore {:?}", args.name))?;

			util::report(
				&mut writer,
				&args.submit,
				"ClusterStore",
				&args.name,
				"created",
				&created,
			)
		}
		Some(current) => {
			let outcome = store::add_sources(&current, &args.buildpackages)?;
			if !outcome.changed() {
				writeln!(writer, "nothing to add: buildpackages already exist in the store")?;
				return Ok(());
			}

			let patched =
				submit_merge_patch(&api, &args.name, &current, &outcome.store, args.submit.dry_run)
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
	}
}
