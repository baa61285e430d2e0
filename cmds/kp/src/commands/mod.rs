//! Command surface of the kp binary.

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

pub mod build;
pub mod builder;
pub mod buildpack;
pub mod clusterbuilder;
pub mod clusterbuildpack;
pub mod clusterstack;
pub mod clusterstore;
pub mod completion;
pub mod config;
pub mod image;
pub mod import;
pub mod secret;
pub mod util;
pub mod version;

#[derive(Parser)]
#[command(name = "kp")]
#[command(about = "Interact with the kpack build service", long_about = None)]
#[command(version = env!("KP_VERSION"))]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, global = true)]
	pub log_level: Option<Level>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Manage images
	Image(image::ImageArgs),

	/// View image builds
	Build(build::BuildArgs),

	/// Manage builders
	Builder(builder::BuilderArgs),

	/// Manage cluster builders
	Clusterbuilder(clusterbuilder::ClusterBuilderArgs),

	/// View buildpacks
	Buildpack(buildpack::BuildpackArgs),

	/// View cluster buildpacks
	Clusterbuildpack(clusterbuildpack::ClusterBuildpackArgs),

	/// Manage cluster stacks
	Clusterstack(clusterstack::ClusterStackArgs),

	/// Manage cluster stores
	Clusterstore(clusterstore::ClusterStoreArgs),

	/// Manage registry and git credentials
	Secret(secret::SecretArgs),

	/// Show or set build-service settings
	Config(config::ConfigArgs),

	/// Import cluster dependencies from a descriptor
	Import(import::ImportArgs),

	/// Generate a shell completion script
	Completion(completion::CompletionArgs),

	/// Print the kp version
	Version(version::VersionArgs),
}

/// Dispatch a parsed command to its handler.
pub fn run<W: Write>(command: Commands, writer: W) -> Result<()> {
	match command {
		Commands::Image(args) => image::run(args, writer),
		Commands::Build(args) => build::run(args, writer),
		Commands::Builder(args) => builder::run(args, writer),
		Commands::Clusterbuilder(args) => clusterbuilder::run(args, writer),
		Commands::Buildpack(args) => buildpack::run(args, writer),
		Commands::Clusterbuildpack(args) => clusterbuildpack::run(args, writer),
		Commands::Clusterstack(args) => clusterstack::run(args, writer),
		Commands::Clusterstore(args) => clusterstore::run(args, writer),
		Commands::Secret(args) => secret::run(args, writer),
		Commands::Config(args) => config::run(args, writer),
		Commands::Import(args) => import::run(args, writer),
		Commands::Completion(args) => completion::run(args, writer),
		Commands::Version(args) => version::run(args, writer),
	}
}
