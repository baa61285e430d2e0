//! Image command handlers.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use kpack_model::{Blob, EnvVar, Git, ImageBuild, Registry, SourceConfig};

pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
pub mod save;
pub mod status;
pub mod trigger;

#[derive(Args)]
pub struct ImageArgs {
	#[command(subcommand)]
	pub command: ImageCommands,
}

#[derive(Subcommand)]
pub enum ImageCommands {
	/// Create an image from a source and builder
	Create(create::CreateArgs),

	/// Update the configuration of an image
	Patch(patch::PatchArgs),

	/// Create or update an image
	Save(save::SaveArgs),

	/// Display image status
	Status(status::StatusArgs),

	/// List images in a namespace
	List(list::ListArgs),

	/// Request a new build of an image
	Trigger(trigger::TriggerArgs),

	/// Delete an image
	Delete(delete::DeleteArgs),
}

/// Run the image command.
pub fn run<W: Write>(args: ImageArgs, writer: W) -> Result<()> {
	match args.command {
		ImageCommands::Create(args) => create::run(args, writer),
		ImageCommands::Patch(args) => patch::run(args, writer),
		ImageCommands::Save(args) => save::run(args, writer),
		ImageCommands::Status(args) => status::run(args, writer),
		ImageCommands::List(args) => list::run(args, writer),
		ImageCommands::Trigger(args) => trigger::run(args, writer),
		ImageCommands::Delete(args) => delete::run(args, writer),
	}
}

/// Source location flags shared by create, patch and save. At most one of
/// `--git`, `--blob` and `--registry-image` is accepted; create marks the
/// group required.
#[derive(Args, Debug, Default)]
pub struct SourceFlags {
	/// Git repository url to build from
	#[arg(long, group = "source")]
	pub git: Option<String>,

	/// Git revision, branch or tag to build, defaults to main
	#[arg(long, conflicts_with_all = ["blob", "registry_image"])]
	pub git_revision: Option<String>,

	/// Source archive url to build from
	#[arg(long, group = "source")]
	pub blob: Option<String>,

	/// Container image to use as the source
	#[arg(long, group = "source")]
	pub registry_image: Option<String>,

	/// Directory within the source to build
	#[arg(long)]
	pub sub_path: Option<String>,
}

impl SourceFlags {
	/// Fold the provided flags into a source config. A new location replaces
	/// the previous source type; `--git-revision` alone updates an existing
	/// git source.
	pub fn apply(&self, source: &mut SourceConfig) -> Result<()> {
		if let Some(url) = &self.git {
			match source.git.as_mut() {
				Some(git) => {
					git.url = url.clone();
					if let Some(revision) = &self.git_revision {
						git.revision = revision.clone();
					}
				}
				None => {
					source.git = Some(Git {
						url: url.clone(),
						revision: self
							.git_revision
							.clone()
							.unwrap_or_else(|| "main".to_string()),
					});
					source.blob = None;
					source.registry = None;
				}
			}
		} else if let Some(url) = &self.blob {
			source.git = None;
			source.blob = Some(Blob { url: url.clone() });
			source.registry = None;
		} else if let Some(image) = &self.registry_image {
			source.git = None;
			source.blob = None;
			source.registry = Some(Registry {
				image: image.clone(),
			});
		} else if let Some(revision) = &self.git_revision {
			let Some(git) = source.git.as_mut() else {
				anyhow::bail!("--git-revision is only valid for images built from a git source");
			};
			git.revision = revision.clone();
		}

		if let Some(sub_path) = &self.sub_path {
			source.sub_path = Some(sub_path.clone());
		}
		Ok(())
	}
}

/// Builder selection flags shared by create, patch and save.
#[derive(Args, Debug, Default)]
pub struct BuilderFlags {
	/// Namespaced builder to build with
	#[arg(long, conflicts_with = "cluster_builder")]
	pub builder: Option<String>,

	/// Cluster builder to build with, defaults to "default"
	#[arg(long)]
	pub cluster_builder: Option<String>,
}

impl BuilderFlags {
	pub fn provided(&self) -> bool {
		self.builder.is_some() || self.cluster_builder.is_some()
	}
}

/// Merge `--env` updates and `--delete-env` removals into the build env.
fn update_env(build: &mut Option<ImageBuild>, set: &[EnvVar], delete: &[String]) -> Result<()> {
	let env = &mut build.get_or_insert_with(ImageBuild::default).env;

	for var in set {
		match env.iter_mut().find(|e| e.name == var.name) {
			Some(existing) => existing.value = var.value.clone(),
			None => env.push(var.clone()),
		}
	}
	for name in delete {
		let before = env.len();
		env.retain(|e| &e.name != name);
		if env.len() == before {
			anyhow::bail!("env var {name:?} is not set on the image");
		}
	}

	if env.is_empty() {
		*build = None;
	}
	Ok(())
}
