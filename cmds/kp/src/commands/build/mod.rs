//! Build command handlers. Builds are created by the controller, so the CLI
//! only reads them back.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kpack_model::{Build, ConditionStatus, KpackResource, BUILD_IMAGE_LABEL};

pub mod list;
pub mod status;

#[derive(Args)]
pub struct BuildArgs {
	#[command(subcommand)]
	pub command: BuildCommands,
}

#[derive(Subcommand)]
pub enum BuildCommands {
	/// List builds, newest last
	List(list::ListArgs),

	/// Display the status of an image's build
	Status(status::StatusArgs),
}

/// Run the build command.
pub fn run<W: Write>(args: BuildArgs, writer: W) -> Result<()> {
	match args.command {
		BuildCommands::List(args) => list::run(args, writer),
		BuildCommands::Status(args) => status::run(args, writer),
	}
}

/// Build phase as shown to the user. A build settles on success or failure
/// and reports as in-flight until then.
fn status_text(build: &Build) -> &'static str {
	match build.ready_condition().map(|c| c.status) {
		Some(ConditionStatus::True) => "SUCCESS",
		Some(ConditionStatus::False) => "FAILURE",
		_ => "BUILDING",
	}
}

/// Owning image, from the controller-applied label.
fn image_label(build: &Build) -> &str {
	build
		.metadata
		.labels
		.as_ref()
		.and_then(|l| l.get(BUILD_IMAGE_LABEL))
		.map(String::as_str)
		.unwrap_or("")
}

/// Order builds by owning image, then by ordinal.
fn sort_builds(builds: &mut [Build]) {
	builds.sort_by(|a, b| {
		image_label(a)
			.cmp(image_label(b))
			.then(a.build_number().cmp(&b.build_number()))
	});
}
