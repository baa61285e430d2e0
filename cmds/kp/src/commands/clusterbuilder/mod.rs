//! ClusterBuilder command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kpack_model::{ClusterBuilderSpec, OrderEntry, TypedReference};

pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
pub mod save;
pub mod status;

#[derive(Args)]
pub struct ClusterBuilderArgs {
	#[command(subcommand)]
	pub command: ClusterBuilderCommands,
}

#[derive(Subcommand)]
pub enum ClusterBuilderCommands {
	/// Create a cluster builder from a stack, store and buildpack order
	Create(create::CreateArgs),

	/// Update the configuration of a cluster builder
	Patch(patch::PatchArgs),

	/// Create or update a cluster builder
	Save(save::SaveArgs),

	/// Display cluster builder status
	Status(status::StatusArgs),

	/// List cluster builders
	List(list::ListArgs),

	/// Delete a cluster builder
	Delete(delete::DeleteArgs),
}

/// Run the clusterbuilder command.
pub fn run<W: Write>(args: ClusterBuilderArgs, writer: W) -> Result<()> {
	match args.command {
		ClusterBuilderCommands::Create(args) => create::run(args, writer),
		ClusterBuilderCommands::Patch(args) => patch::run(args, writer),
		ClusterBuilderCommands::Save(args) => save::run(args, writer),
		ClusterBuilderCommands::Status(args) => status::run(args, writer),
		ClusterBuilderCommands::List(args) => list::run(args, writer),
		ClusterBuilderCommands::Delete(args) => delete::run(args, writer),
	}
}

/// Fold the provided overrides into a cluster builder spec, leaving absent
/// fields untouched. The tag stays derived from the default repository.
fn apply_overrides(
	spec: &mut ClusterBuilderSpec,
	stack: Option<&str>,
	store: Option<&str>,
	order: Option<Vec<OrderEntry>>,
) {
	if let Some(stack) = stack {
		spec.stack = TypedReference::new("ClusterStack", stack);
	}
	if let Some(store) = store {
		spec.store = TypedReference::new("ClusterStore", store);
	}
	if let Some(order) = order.filter(|o| !o.is_empty()) {
		spec.order = order;
	}
}
