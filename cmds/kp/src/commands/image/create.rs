//! Image create subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
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
		wait::{wait_for_ready, DEFAULT_WAIT_TIMEOUT},
	},
};

#[derive(Args)]
#[command(group = ArgGroup::new("source").required(true))]
pub struct CreateArgs {
	/// Image name
	pub name: String,

	/// Registry tag the built image is written to
	#[arg(short = 't', long)]
	pub tag: String,

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

	/// Wait for the image to become ready
	#[arg(short = 'w', long)]
	pub wait: bool,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the image create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of image create.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let api: Api<Image> = connection.namespaced_api();

	let mut source = SourceConfig::default();
	args.source.apply(&mut source)?;
	let env = util::parse_env_pairs(&args.env)?;
	let build = (!env.is_empty()).then(|| ImageBuild { env });

	let image = Image {
		metadata: ObjectMeta {
			name: Some(args.name.clone()),
			namespace: Some(connection.namespace().to_string()),
			..ObjectMeta::default()
		},
		spec: ImageSpec {
			tag: args.tag.clone(),
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

	util::report(
		&mut writer,
		&args.submit,
		"Image",
		&args.name,
		"created",
		&created,
	)?;

	if args.wait && !args.submit.dry_run {
		wait_for_ready(&api, &created, DEFAULT_WAIT_TIMEOUT).await?;
	}
	Ok(())
}
