//! Cluster store create subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::ClusterStore;
use kube::api::{Api, PostParams};
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::client::ClusterConnection,
	store,
};

#[derive(Args)]
pub struct CreateArgs {
	/// Cluster store name
	pub name: String,

	/// Digested buildpackage image reference (repeatable)
	#[arg(short = 'b', long = "buildpackage", required = true)]
	pub buildpackages: Vec<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterstore create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster store create.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStore> = connection.cluster_api();

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
