//! Image patch subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::Image;
use kube::api::Api;
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
pub struct PatchArgs {
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

/// Run the image patch subcommand.
pub fn run<W: Write>(args: PatchArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image patch.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: PatchArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let current = api
		.get(&args.name)
		.await
		.with_context(|| format!("getting Image {:?}", args.name))?;

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
	let env = util::parse_env_pairs(&args.env)?;
	super::update_env(&mut desired.spec.build, &env, &args.delete_env)?;

	let patched = submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
		.await
		.with_context(|| format!("patching Image {:?}", args.name))?;

	let verb = if patched.is_some() { "updated" } else { "unchanged" };
	let resource = patched.unwrap_or(desired);
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
