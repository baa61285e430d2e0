//! Version command handler.

use std::io::Write;

use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {}

/// Run the version command.
pub fn run<W: Write>(_args: VersionArgs, mut writer: W) -> Result<()> {
	writeln!(writer, "{}", env!("KP_VERSION"))?;
	Ok(())
}
