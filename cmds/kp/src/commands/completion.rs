//! Completion command handler.

use std::io::Write;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::Shell;

#[derive(Args)]
pub struct CompletionArgs {
	/// Shell to generate a completion script for
	#[arg(value_enum)]
	pub shell: Shell,
}

/// Run the completion command.
pub fn run<W: Write>(args: CompletionArgs, mut writer: W) -> Result<()> {
	let mut command = super::Cli::command();
	clap_complete::generate(args.shell, &mut command, "kp", &mut writer);
	Ok(())
}
