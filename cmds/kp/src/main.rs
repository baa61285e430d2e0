use anyhow::Result;
use clap::Parser;
use kp::{
	commands::{self, util::BrokenPipeGuard, Cli},
	telemetry,
};

#[cfg(all(
	target_os = "linux",
	feature = "mimalloc",
	not(feature = "system-alloc")
))]
#[global_allocator]
static GLOBAL: mimallocator::Mimalloc = mimallocator::Mimalloc;

fn main() -> Result<()> {
	let cli = Cli::parse();
	telemetry::init(cli.log_level);

	let stdout = BrokenPipeGuard::new(std::io::stdout());
	commands::run(cli.command, stdout)
}
