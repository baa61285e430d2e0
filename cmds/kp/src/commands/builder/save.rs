//! Builder save subcommand handler.

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
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
};

#[derive(Args)]
pub struct SaveArgs {
	/// Builder name
	pub name: String,

	/// Registry tag the builder image is written to
	#[arg(short = 't', long)]
	pub tag: Option<String>,

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
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the builder save subcommand.
pub fn run<W: Write>(args: SaveArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of builder save: create when the builder does not
/// exist, otherwise patch the provided fields.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: SaveArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Builder> = connection.namespaced_api();

	let existing = api
		.get_opt(&args.name)
		.await
		.with_context(|| format!("getting Builder {:?}", args.name))?;
	let order = util::resolve_order(args.order.as_deref(), &args.buildpacks)?;

	match existing {
		None => {
			let Some(tag) = &args.tag else {
				anyhow::bail!("--tag is required when creating a Builder");
			};
			if order.is_empty() {
				anyhow::bail!("--order or --buildpack is required when creating a Builder");
			}

			let builder = Builder {
				metadata: ObjectMeta {
					name: Some(args.name.clone()),
					namespace: Some(connection.namespace().to_string()),
					..ObjectMeta::default()
				},
				spec: BuilderSpec {
					tag: tag.clone(),
					stack: TypedReference::new(
						"ClusterStack",
						args.stack.as_deref().unwrap_or("default"),
					),
					store: TypedReference::new(
						"ClusterStore",
						args.store.as_deref().unwrap_or("default"),
					),
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
		Some(current) => {
			let mut desired = current.clone();
			super::apply_overrides(
				&mut desired.spec,
				args.tag.as_deref(),
				args.stack.as_deref(),
				args.store.as_deref(),
				Some(order),
			);

			let patched =
				submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
					.await
					.with_context(|| format!("patching Builder {:?}", args.name))?;

			let verb = if patched.is_some() { "updated" } else { "unchanged" };
			util::report(
				&mut writer,
				&args.submit,
				"Builder",
				&args.name,
				verb,
				&patched.unwrap_or(desired),
			)
		}
	}
}
