//! Image save subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{Image, ImageBuild, ImageSpec, SourceConfig};
use kube::{
	api::{Api, PostParams},
	core::ObjectMeta,
};
use tracing::instrument;

use crate::{
	commands::{
		image::{BuilderFlags, SourceFlags},
		util::{self, NamespaceFlag, SubmitFlags},
	},
	k8s::{
		client::ClusterConnection,
		patch::submit_merge_patch,
		wait::{wait_for_ready, DEFAULT_WAIT_TIMEOUT},
	},
};

#[derive(Args)]
pub struct SaveArgs {
	/// Image name
	pub name: String,

	/// Registry tag the built image is written to
	#[arg(short = 't', long)]
	pub tag: Option<String>,

	#[command(flatten)]
	pub source: SourceFlags,

	#[command(flatten)]
	pub builder: BuilderFlags,

	/// Service account holding the registry and git credentials
	#[arg(long)]
	pub service_account: Option<String>,

	/// Build-time environment variable in key=value form (repeatable)
	#[arg(short = 'e', long = "env")]
	pub env: Vec<String>,

	/// Build-time environment variable to remove (repeatable)
	#[arg(short = 'd', long = "delete-env")]
	pub delete_env: Vec<String>,

	/// Wait for the image to become ready
	#[arg(short = 'w', long)]
	pub wait: bool,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the image save subcommand.
pub fn run<W: Write>(args: SaveArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image save: create when the image does not
/// exist, otherwise patch the provided fields.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: SaveArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let existing = api
		.get_opt(&args.name)
		.await
		.with_context(|| format!("getting Image {:?}", args.name))?;
	let env = util::parse_env_pairs(&args.env)?;

	let (resource, verb) = match existing {
		None => {
			let Some(tag) = &args.tag else {
				anyhow::bail!("--tag is required when creating an Image");
			};

			let mut source = SourceConfig::default();
			args.source.apply(&mut source)?;
			if source == SourceConfig::default() {
				anyhow::bail!(
					"--git, --blob or --registry-image is required when creating an Image"
				);
			}
			if !args.delete_env.is_empty() {
				anyhow::bail!("--delete-env is only valid for an existing Image");
			}
			let build = (!env.is_empty()).then(|| ImageBuild { env });

			let image = Image {
				metadata: ObjectMeta {
					name: Some(args.name.clone()),
					namespace: Some(connection.namespace().to_string()),
					..ObjectMeta::default()
				},
				spec: ImageSpec {
					tag: tag.clone(),
					additional_tags: Vec::new(),
					builder: util::builder_reference(
						args.builder.builder.as_deref(),
						args.builder.cluster_builder.as_deref(),
					),
					service_account_name: args.service_account.clone(),
					source,
					build,
				},
				status: None,
			};

			let params = PostParams {
				dry_run: args.submit.dry_run,
				..PostParams::default()
			};
			let created = api
				.create(&params, &image)
				.await
				.with_context(|| format!("creating Image {:?}", args.name))?;
			(created, "created")
		}
		Some(current) => {
			let mut desired = current.clone();
			if let Some(tag) = &args.tag {
				desired.spec.tag = tag.clone();
			}
			args.source.apply(&mut desired.spec.source)?;
			if args.builder.provided() {
				desired.spec.builder = util::builder_reference(
					args.builder.builder.as_deref(),
					args.builder.cluster_builder.as_deref(),
				);
			}
			if let Some(service_account) = &args.service_account {
				desired.spec.service_account_name = Some(service_account.clone());
			}
			super::update_env(&mut desired.spec.build, &env, &args.delete_env)?;

			let patched =
				submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
					.await
					.with_context(|| format!("patching Image {:?}", args.name))?;

			match patched {
				Some(patched) => (patched, "updated"),
				None => (desired, "unchanged"),
			}
		}
	};

	util::report(
		&mut writer,
		&args.submit,
		"Image",
		&args.name,
		verb,
		&resource,
	)?;

	if args.wait && !args.submit.dry_run {
		wait_for_ready(&api, &resource, DEFAULT_WAIT_TIMEOUT).await?;
	}
	Ok(())
}
