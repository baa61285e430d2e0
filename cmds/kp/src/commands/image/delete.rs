//! Image delete subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::Image;
use kube::api::{Api, DeleteParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag},
	k8s::client::ClusterConnection,
	output,
};

#[derive(Args)]
pub struct DeleteArgs {
	/// Image name
	pub name: String,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	/// Only validate the deletion server side, do not persist it
	#[arg(long)]
	pub dry_run: bool,
}

/// Run the image delete subcommand.
pub fn run<W: Write>(args: DeleteArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image delete.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: DeleteArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let params = DeleteParams {
		dry_run: args.dry_run,
		..DeleteParams::default()
	};
	api.delete(&args.name, &params)
		.await
		.with_context(|| format!("deleting Image {:?}", args.name))?;

	output::write_result(&mut writer, "Image", &args.name, "deleted", args.dry_run)?;
	Ok(())
}
