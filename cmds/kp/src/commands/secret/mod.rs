//! Secret command handlers.
//!
//! kp manages registry and git credentials through the `default` service
//! account of the target namespace: created secrets are linked into it and
//! recorded in its managed-secret annotation.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};

pub mod create;
pub mod delete;
pub mod list;

/// Service account kp links managed secrets into.
pub(crate) const SERVICE_ACCOUNT: &str = "default";

#[derive(Args)]
pub struct SecretArgs {
	#[command(subcommand)]
	pub command: SecretCommands,
}

#[derive(Subcommand)]
pub enum SecretCommands {
	/// Create a registry or git credential secret
	Create(create::CreateArgs),

	/// List the secrets managed by kp
	List(list::ListArgs),

	/// Delete a secret managed by kp
	Delete(delete::DeleteArgs),
}

/// Run the secret command.
pub fn run<W: Write>(args: SecretArgs, writer: W) -> Result<()> {
	match args.command {
		SecretCommands::Create(args) => create::run(args, writer),
		SecretCommands::List(args) => list::run(args, writer),
		SecretCommands::Delete(args) => delete::run(args, writer),
	}
}
