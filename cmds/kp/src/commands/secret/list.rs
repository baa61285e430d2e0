//! Secret list subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use k8s_openapi::api::core::v1::ServiceAccount;
use kube::api::Api;
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output::TableWriter,
	secrets,
};

#[derive(Args)]
pub struct ListArgs {
	#[command(flatten)]
	pub namespace: NamespaceFlag,
}

/// Run the secret list subcommand.
pub fn run<W: Write>(args: ListArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of secret list.
#[instrument(skip_all)]
pub async fn run_async<W: Write>(
	args: ListArgs,
	connection: Option<ClusterConnection>,
	writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<ServiceAccount> = connection.namespaced_api();

	let service_account = api
		.get(super::SERVICE_ACCOUNT)
		.await
		.with_context(|| format!("getting ServiceAccount {:?}", super::SERVICE_ACCOUNT))?;
	let managed = secrets::managed_secrets(&service_account)?;
	if managed.is_empty() {
		anyhow::bail!("no secrets found in {:?} namespace", connection.namespace());
	}

	let mut table = TableWriter::new(writer, &["NAME", "TARGET"])?;
	for (name, target) in &managed {
		table.row(&[name, target])?;
	}
	table.finish()?;
	Ok(())
}
