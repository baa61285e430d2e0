//! Secret delete subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use k8s_openapi::api::core::v1::{Secret, ServiceAccount};
use kube::api::{Api, DeleteParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
	output, secrets,
};

#[derive(Args)]
pub struct DeleteArgs {
	/// Secret name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	/// Only validate the deletion server side, do not persist it
	#[arg(long)]
	pub dry_run: bool,
}

/// Run the secret delete subcommand.
pub fn run<W: Write>(args: DeleteArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of secret delete. The service account is unlinked
/// first so a failed delete never leaves a dangling reference.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: DeleteArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let secret_api: Api<Secret> = connection.namespaced_api();
	let sa_api: Api<ServiceAccount> = connection.namespaced_api();

	let current = sa_api
		.get(super::SERVICE_ACCOUNT)
		.await
		.with_context(|| format!("getting ServiceAccount {:?}", super::SERVICE_ACCOUNT))?;
	let desired = secrets::detach_secret(&current, &args.name)?;
	submit_merge_patch(&sa_api, super::SERVICE_ACCOUNT, &current, &desired, args.dry_run)
		.await
		.with_context(|| format!("patching ServiceAccount {:?}", super::SERVICE_ACCOUNT))?;

	let params = DeleteParams {
		dry_run: args.dry_run,
		..DeleteParams::default()
	};
	secret_api
		.delete(&args.name, &params)
		.await
		.with_context(|| format!("deleting Secret {:?}", args.name))?;

	output::write_result(&mut writer, "Secret", &args.name, "deleted", args.dry_run)?;
	Ok(())
}
