//! Cluster builder save subcommand handler.

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
		patch::submit_merge_patch,
	},
};

#[derive(Args)]
pub struct SaveArgs {
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

/// Run the clusterbuilder save subcommand.
pub fn run<W: Write>(args: SaveArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of cluster builder save: create when the builder
/// does not exist, otherwise patch the provided fields.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: SaveArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, None).await?;
	let api: Api<ClusterBuilder> = connection.cluster_api();

	let existing = api
		.get_opt(&args.name)
		.await
		.with_context(|| format!("getting ClusterBuilder {:?}", args.name))?;
	let order = util::resolve_order(args.order.as_deref(), &args.buildpacks)?;

	match existing {
		None => {
			if order.is_empty() {
				anyhow::bail!(
					"--order or --buildpack is required when creating a ClusterBuilder"
				);
			}

			let config = KpConfig::new(connection.client().clone());
			let repository = config.default_repository().await?;
			let service_account_ref = config.service_account_ref().await?;

			let builder = ClusterBuilder {
				metadata: ObjectMeta {
					name: Some(args.name.clone()),
					..ObjectMeta::default()
				},
				spec: ClusterBuilderSpec {
					tag: default_builder_tag(&repository, &args.name),
					stack: TypedReference::new(
						"ClusterStack",
						args.stack.as_deref().unwrap_or("default"),
					),
					store: TypedReference::new(
						"ClusterStore",
						args.store.as_deref().unwrap_or("default"),
					),
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
		Some(current) => {
			let mut desired = current.clone();
			super::apply_overrides(
				&mut desired.spec,
				args.stack.as_deref(),
				args.store.as_deref(),
				Some(order),
			);

			let patched =
				submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
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
	}
}
