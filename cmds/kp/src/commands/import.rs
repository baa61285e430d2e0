//! Import command handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::instrument;

use crate::{
	commands::util::{self, SubmitFlags},
	descriptor,
	import::{self, ImportPlan, PlannedItem},
	k8s::{client::ClusterConnection, config::KpConfig},
	output::{self, OutputFormat, TableWriter},
};

#[derive(Args)]
pub struct ImportArgs {
	/// Dependency descriptor file
	#[arg(short = 'f', long)]
	pub filename: String,

	/// Print the planned operations before applying them
	#[arg(long)]
	pub show_changes: bool,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

/// Run the import command.
pub fn run<W: Write>(args: ImportArgs, writer: W) -> Result<()> {
	util::block_on(run_async(args, None, writer))?
}

/// Async implementation of import: parse and migrate the descriptor, plan
/// against the cluster, then apply in dependency order.
#[instrument(skip_all, fields(filename = %args.filename))]
pub async fn run_async<W: Write>(
	args: ImportArgs,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let contents = std::fs::read_to_string(&args.filename)
		.with_context(|| format!("reading descriptor {:?}", args.filename))?;
	let descriptor = descriptor::parse(&contents)
		.with_context(|| format!("parsing descriptor {:?}", args.filename))?;

	let connection = util::connect_or(connection, None).await?;
	let config = KpConfig::new(connection.client().clone());
	let repository = config.default_repository().await?;

	let plan = import::plan(&connection, &descriptor, &repository)
		.await
		.context("planning import")?;
	if args.show_changes {
		write_changes(&mut writer, &plan)?;
	}

	let applied = import::execute(&connection, &plan, args.submit.dry_run)
		.await
		.context("applying import")?;

	if let Some(format) = args.submit.output {
		return write_objects(&mut writer, format, &plan);
	}
	for change in &applied {
		output::write_result(
			&mut writer,
			change.kind,
			&change.name,
			change.action.verb(),
			args.submit.dry_run,
		)?;
	}
	Ok(())
}

/// Summary table of the planned operations, in application order.
fn write_changes<W: Write>(writer: &mut W, plan: &ImportPlan) -> Result<()> {
	let mut table = TableWriter::new(&mut *writer, &["KIND", "NAME", "CHANGE"])?;
	for item in &plan.stores {
		table.row(&["ClusterStore", &item.name, item.change.describe()])?;
	}
	for item in &plan.stacks {
		table.row(&["ClusterStack", &item.name, item.change.describe()])?;
	}
	for item in &plan.builders {
		table.row(&["ClusterBuilder", &item.name, item.change.describe()])?;
	}
	if let Some(item) = &plan.lifecycle {
		table.row(&["ConfigMap", &item.name, item.change.describe()])?;
	}
	table.finish()?;
	writeln!(writer)?;
	Ok(())
}

/// Dump the manifests the plan would change, as a multi-document stream.
fn write_objects<W: Write>(writer: &mut W, format: OutputFormat, plan: &ImportPlan) -> Result<()> {
	let mut objects = Vec::new();
	collect_changed(&mut objects, &plan.stores)?;
	collect_changed(&mut objects, &plan.stacks)?;
	collect_changed(&mut objects, &plan.builders)?;
	if let Some(item) = &plan.lifecycle {
		collect_changed(&mut objects, std::slice::from_ref(item))?;
	}

	for (index, object) in objects.iter().enumerate() {
		if format == OutputFormat::Yaml && index > 0 {
			writeln!(writer, "---")?;
		}
		output::print_object(writer, format, object)?;
	}
	Ok(())
}

fn collect_changed<K: Serialize>(
	objects: &mut Vec<serde_json::Value>,
	items: &[PlannedItem<K>],
) -> Result<()> {
	for item in items {
		if item.change.is_change() {
			objects.push(serde_json::to_value(&item.desired)?);
		}
	}
	Ok(())
}
