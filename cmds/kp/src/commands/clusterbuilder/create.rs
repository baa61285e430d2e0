//! Cluster builder create subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{ClusterBuilder, ClusterBuilderSpec, TypedReference};
use kube::{
	api::{Api, PostParams},
	core::ObjectMeta,
};
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	k8s::{
		client::ClusterConnection,
		config::{default_builder_tag, KpConfig},
	},
};

#[derive(Args)]
pub struct CreateArgs {
	/// Cluster builder name
	pub name: String,

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
	pub submit: SubmitFlags,
}

/// Run the clusterbuilder create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder create. The image tag is derived
/// from the default repository in `kp-config`.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();
	let config = KpConfig::new(connection.client().clone());

	let repository = config.default_repository().await?;
	let service_account_ref = config.service_account_ref().await?;
	let order = util::resolve_order(args.order.as_deref(), &args.buildpacks)?;

	let builder = ClusterBuilder {
		metadata: ObjectMeta {
			name: Some(args.name.clone()),
			..ObjectMeta::default()
		},
		spec: ClusterBuilderSpec {
			tag: default_builder_tag(&repository, &args.name),
			stack: TypedReference::new("ClusterStack", &args.stack),
			store: TypedReference::new("ClusterStore", &args.store),
			order,
			service_account_ref: Some(service_account_ref),
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
		.with_context(|| format!("creating ClusterBuilder {:?}", args.name))?;

	util::report(
		&mut writer,
		&args.submit,
		"ClusterBuilder",
		&args.name,
		"created",
		&created,
	)
}
