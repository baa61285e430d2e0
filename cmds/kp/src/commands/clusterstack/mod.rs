//! ClusterStack command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kpack_model::{ClusterStackSpec, StackImage};

pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
pub mod save;
pub mod status;

#[derive(Args)]
pub struct ClusterStackArgs {
	#[command(subcommand)]
	pub command: ClusterStackCommands,
}

#[derive(Subcommand)]
pub enum ClusterStackCommands {
	/// Create a cluster stack from build and run images
	Create(create::CreateArgs),

	/// Update the images of a cluster stack
	Patch(patch::PatchArgs),

	/// Create or update a cluster stack
	Save(save::SaveArgs),

	/// Display cluster stack status
	Status(status::StatusArgs),

	/// List cluster stacks
	List(list::ListArgs),

	/// Delete a cluster stack
	Delete(delete::DeleteArgs),
}

/// Run the clusterstack command.
pub fn run<W: Write>(args: ClusterStackArgs, writer: W) -> Result<()> {
	match args.command {
		ClusterStackCommands::Create(args) => create::run(args, writer),
		ClusterStackCommands::Patch(args) => patch::run(args, writer),
		ClusterStackCommands::Save(args) => save::run(args, writer),
		ClusterStackCommands::Status(args) => status::run(args, writer),
		ClusterStackCommands::List(args) => list::run(args, writer),
		ClusterStackCommands::Delete(args) => delete::run(args, writer),
	}
}

/// Fold the provided image overrides into a stack spec, leaving absent
/// fields untouched.
fn apply_overrides(
	spec: &mut ClusterStackSpec,
	build_image: Option<&str>,
	run_image: Option<&str>,
	stack_id: Option<&str>,
) {
	if let Some(image) = build_image {
		spec.build_image = StackImage::new(image);
	}
	if let Some(image) = run_image {
		spec.run_image = StackImage::new(image);
	}
	if let Some(id) = stack_id {
		spec.id = Some(id.to_owned());
	}
}
