//! Command output formatting: tables, status blocks and manifest dumps.
//!
//! Every command writes through an injected `Write` so tests can capture
//! output. Columns are aligned with tabwriter.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use tabwriter::TabWriter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
	#[error("writing command output")]
	Write(#[from] std::io::Error),

	#[error("rendering yaml output")]
	Yaml(#[from] serde_yaml::Error),

	#[error("rendering json output")]
	Json(#[from] serde_json::Error),
}

/// Formats accepted by `-o/--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	Yaml,
	Json,
}

/// Dump a manifest in the requested format.
pub fn print_object<W: Write, T: Serialize>(
	writer: &mut W,
	format: OutputFormat,
	object: &T,
) -> Result<(), OutputError> {
	match format {
		OutputFormat::Yaml => {
			let yaml = serde_yaml::to_string(object)?;
			write!(writer, "{yaml}")?;
		}
		OutputFormat::Json => {
			let json = serde_json::to_string_pretty(object)?;
			writeln!(writer, "{json}")?;
		}
	}
	Ok(())
}

/// Result line every mutating command ends with.
pub fn write_result<W: Write>(
	writer: &mut W,
	kind: &str,
	name: &str,
	verb: &str,
	dry_run: bool,
) -> Result<(), OutputError> {
	let suffix = if dry_run { " (dry run)" } else { "" };
	writeln!(writer, "{kind} {name:?} {verb}{suffix}")?;
	Ok(())
}

/// Column-aligned listing with an uppercase header row.
pub struct TableWriter<W: Write> {
	tw: TabWriter<W>,
}

impl<W: Write> TableWriter<W> {
	pub fn new(writer: W, headers: &[&str]) -> Result<Self, OutputError> {
		let mut tw = TabWriter::new(writer);
		writeln!(tw, "{}", headers.join("\t"))?;
		Ok(Self { tw })
	}

	pub fn row(&mut self, cells: &[&str]) -> Result<(), OutputError> {
		writeln!(self.tw, "{}", cells.join("\t"))?;
		Ok(())
	}

	/// Align and emit the buffered table.
	pub fn finish(mut self) -> Result<(), OutputError> {
		self.tw.flush()?;
		Ok(())
	}
}

/// Aligned `Key:  Value` block used by status commands.
pub struct StatusWriter<W: Write> {
	tw: TabWriter<W>,
}

impl<W: Write> StatusWriter<W> {
	pub fn new(writer: W) -> Self {
		Self {
			tw: TabWriter::new(writer),
		}
	}

	pub fn field(&mut self, key: &str, value: &str) -> Result<(), OutputError> {
		writeln!(self.tw, "{key}:\t{value}")?;
		Ok(())
	}

	pub fn optional_field(&mut self, key: &str, value: Option<&str>) -> Result<(), OutputError> {
		if let Some(value) = value.filter(|v| !v.is_empty()) {
			self.field(key, value)?;
		}
		Ok(())
	}

	pub fn blank(&mut self) -> Result<(), OutputError> {
		writeln!(self.tw)?;
		Ok(())
	}

	pub fn finish(mut self) -> Result<(), OutputError> {
		self.tw.flush()?;
		Ok(())
	}
}
