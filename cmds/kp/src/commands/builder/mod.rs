//! Builder command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kpack_model::{BuilderSpec, OrderEntry, TypedReference};

pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
pub mod save;
pub mod status;

#[derive(Args)]
pub struct BuilderArgs {
	#[command(subcommand)]
	pub command: BuilderCommands,
}

#[derive(Subcommand)]
pub enum BuilderCommands {
	/// Create a builder from a stack, store and buildpack order
	Create(create::CreateArgs),

	/// Update the configuration of a builder
	Patch(patch::PatchArgs),

	/// Create or update a builder
	Save(save::SaveArgs),

	/// Display builder status
	Status(status::StatusArgs),

	/// List builders in a namespace
	List(list::ListArgs),

	/// Delete a builder
	Delete(delete::DeleteArgs),
}

/// Run the builder command.
pub fn run<W: Write>(args: BuilderArgs, writer: W) -> Result<()> {
	match args.command {
		BuilderCommands::Create(args) => create::run(args, writer),
		BuilderCommands::Patch(args) => patch::run(args, writer),
		BuilderCommands::Save(args) => save::run(args, writer),
		BuilderCommands::Status(args) => status::run(args, writer),
		BuilderCommands::List(args) => list::run(args, writer),
		BuilderCommands::Delete(args) => delete::run(args, writer),
	}
}

/// Fold the provided overrides into a builder spec, leaving absent fields
/// untouched.
fn apply_overrides(
	spec: &mut BuilderSpec,
	tag: Option<&str>,
	stack: Option<&str>,
	store: Option<&str>,
	order: Option<Vec<OrderEntry>>,
) {
	if let Some(tag) = tag {
		spec.tag = tag.to_owned();
	}
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
