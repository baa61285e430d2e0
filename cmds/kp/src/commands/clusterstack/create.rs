//! Cluster stack create subcommand handler.

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
	k8s::client::ClusterConnection,
};

#[derive(Args)]
pub struct CreateArgs {
	/// Cluster stack name
	pub name: String,

	/// Build-time base image reference
	#[arg(short = 'b', long = "build-image")]
	pub build_image: String,

	/// Run-time base image reference
	#[arg(short = 'r', long = "run-image")]
	pub run_image: String,

	/// Stack identifier; the controller resolves it from the build image
	/// when omitted
	#[arg(long = "stack-id")]
	pub stack_id: Option<String>,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the clusterstack create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster stack create.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterStack> = connection.cluster_api();

	let stack = ClusterStack {
		metadata: ObjectMeta {
			name: Some(args.name.clone()),
			..ObjectMeta::default()
		},
		spec: ClusterStackSpec {
			id: args.stack_id.clone(),
			build_image: StackImage::new(&args.build_image),
			run_image: StackImage::new(&args.run_image),
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
