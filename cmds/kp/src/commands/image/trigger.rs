//! Image trigger subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use kpack_model::{Image, BUILD_NEEDED_ANNOTATION};
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
};

#[derive(Args)]
pub struct TriggerArgs {
	/// Image name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the image trigger subcommand.
pub fn run<W: Write>(args: TriggerArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image trigger: stamps the build-needed annotation
/// so the controller schedules a fresh build for an unchanged spec.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: TriggerArgs,
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
	desired
		.metadata
		.annotations
		.get_or_insert_with(Default::default)
		.insert(BUILD_NEEDED_ANNOTATION.to_string(), Utc::now().to_rfc3339());

	let patched = submit_merge_patch(&api, &args.name, &current, &desired, args.submit.dry_run)
		.await
		.with_context(|| format!("triggering build for Image {:?}", args.name))?;

	util::report(
		&mut writer,
		&args.submit,
		"Image",
		&args.name,
		"triggered",
		&patched.unwrap_or(desired),
	)
}
