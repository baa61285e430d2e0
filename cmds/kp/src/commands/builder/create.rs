//! Builder create subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Builder, BuilderSpec, TypedReference};
use kube::{
	api::{Api, PostParams},
	core::ObjectMeta,
};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag, SubmitFlags},
	k8s::client::ClusterConnection,
};

#[derive(Args)]
pub struct CreateArgs {
	/// Builder name
	pub name: String,

	/// Registry tag the builder image is written to
	#[arg(short = 't', long)]
	pub tag: String,

	/// Cluster stack the builder runs on
	#[arg(long, default_value = "default")]
	pub stack: String,

	/// Cluster store supplying the buildpacks
	#[arg(long, default_value = "default")]
	pub store: String,

	/// Path to a buildpack order yaml
	#[arg(
		long,
		conflicts_with = "buildpacks",
		required_unless_present = "buildpacks"
	)]
	pub order: Option<String>,

	/// Buildpack id, optionally pinned as id@version (repeatable)
	#[arg(short = 'b', long = "buildpack")]
	pub buildpacks: Vec<String>,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the builder create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of builder create.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Builder> = connection.namespaced_api();

	let order = util::resolve_order(args.order.as_deref(), &args.buildpacks)?;
	let builder = Builder {
		metadata: ObjectMeta {
			name: Some(args.name.clone()),
			namespace: Some(connection.namespace().to_string()),
			..ObjectMeta::default()
		},
		spec: BuilderSpec {
			tag: args.tag.clone(),
			stack: TypedReference::new("ClusterStack", &args.stack),
			store: TypedReference::new("ClusterStore", &args.store),
			order,
			service_account: None,
		},
		status: None,
	};

	let params = PostParams {
		dry_run: args.submit.dry_run,
		..PostParams::default()
	};
	let created = api
		.create(&params, &builder)
		.await
		.with_context(|| format!("creating Builder {:?}", args.name))?;

	util::report(
		&mut writer,
		&args.submit,
		"Builder",
		&args.name,
		"created",
		&created,
	)
}
