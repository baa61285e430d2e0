//! Shared plumbing for command handlers.

use std::io::{self, ErrorKind, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Args;
use kpack_model::{
	BuildpackRef, ConditionStatus, EnvVar, KpackResource, OrderEntry, TypedReference,
};

use crate::{
	k8s::client::ClusterConnection,
	output::{self, OutputFormat},
};

/// Build the runtime commands block their async path on.
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()
		.context("creating tokio runtime")?;
	Ok(runtime.block_on(future))
}

/// Use the provided connection or establish one from the kubeconfig.
pub async fn connect_or(
	connection: Option<ClusterConnection>,
	namespace: Option<&str>,
) -> Result<ClusterConnection> {
	match connection {
		Some(connection) => Ok(connection),
		None => ClusterConnection::connect(namespace)
			.await
			.context("connecting to Kubernetes cluster"),
	}
}

/// Namespace selection shared by namespaced commands.
#[derive(Args, Debug, Default)]
pub struct NamespaceFlag {
	/// Kubernetes namespace, defaults to the current context namespace
	#[arg(short = 'n', long)]
	pub namespace: Option<String>,
}

/// Flags shared by mutating commands.
#[derive(Args, Debug, Default)]
pub struct SubmitFlags {
	/// Only validate the change server side, do not persist it
	#[arg(long)]
	pub dry_run: bool,

	/// Print the resource instead of the result message
	#[arg(short = 'o', long, value_enum)]
	pub output: Option<OutputFormat>,
}

/// Emit the standard mutation result: the resource when `-o` is set, the
/// one-line confirmation otherwise.
pub fn report<W: Write, T: serde::Serialize>(
	writer: &mut W,
	flags: &SubmitFlags,
	kind: &str,
	name: &str,
	verb: &str,
	resource: &T,
) -> Result<()> {
	match flags.output {
		Some(format) => output::print_object(writer, format, resource)?,
		None => output::write_result(writer, kind, name, verb, flags.dry_run)?,
	}
	Ok(())
}

/// Ask for y/N confirmation on stderr.
pub fn confirm(prompt: &str) -> Result<bool> {
	if !io::stdin().is_terminal() {
		anyhow::bail!(
			"cannot prompt for confirmation in non-interactive mode. \
			 Use --force to skip confirmation."
		);
	}

	eprint!("{prompt} [y/N]: ");
	io::stderr().flush()?;

	let mut input = String::new();
	io::stdin().read_line(&mut input)?;

	let input = input.trim().to_lowercase();
	Ok(input == "y" || input == "yes")
}

/// Read a credential from the environment, prompting when unset.
pub fn env_or_prompt(env_var: &str, prompt: &str) -> Result<String> {
	match std::env::var(env_var) {
		Ok(value) => Ok(value),
		Err(_) => inquire::Password::new(prompt)
			.without_confirmation()
			.prompt()
			.with_context(|| format!("reading credential (set {env_var} to skip the prompt)")),
	}
}

/// Parse repeated `key=value` pairs into build environment variables.
pub fn parse_env_pairs(pairs: &[String]) -> Result<Vec<EnvVar>> {
	pairs
		.iter()
		.map(|pair| {
			let (key, value) = pair
				.split_once('=')
				.with_context(|| format!("env var {pair:?} is not in key=value form"))?;
			Ok(EnvVar::new(key, value))
		})
		.collect()
}

/// Each `--buildpack` value becomes its own detection group. `id@version`
/// pins the buildpack version and commas separate multiple entries.
pub fn parse_buildpack_refs(buildpacks: &[String]) -> Vec<OrderEntry> {
	buildpacks
		.iter()
		.flat_map(|value| value.split(','))
		.filter(|entry| !entry.is_empty())
		.map(|entry| match entry.split_once('@') {
			Some((id, version)) => OrderEntry {
				group: vec![BuildpackRef {
					id: id.to_string(),
					version: Some(version.to_string()),
					optional: None,
				}],
			},
			None => OrderEntry::single(entry),
		})
		.collect()
}

/// Read a builder order from a yaml file holding a list of detection groups.
pub fn read_order_file(path: &str) -> Result<Vec<OrderEntry>> {
	let contents =
		std::fs::read_to_string(path).with_context(|| format!("reading order file {path}"))?;
	serde_yaml::from_str(&contents).with_context(|| format!("parsing order file {path}"))
}

/// Builder order from either `--order` or repeated `--buildpack`.
pub fn resolve_order(order_file: Option<&str>, buildpacks: &[String]) -> Result<Vec<OrderEntry>> {
	match order_file {
		Some(path) => read_order_file(path),
		None => Ok(parse_buildpack_refs(buildpacks)),
	}
}

/// Builder reference from `--builder`/`--cluster-builder`, defaulting to the
/// cluster builder named `default`.
pub fn builder_reference(builder: Option<&str>, cluster_builder: Option<&str>) -> TypedReference {
	match (builder, cluster_builder) {
		(Some(name), _) => TypedReference::new("Builder", name),
		(None, Some(name)) => TypedReference::new("ClusterBuilder", name),
		(None, None) => TypedReference::new("ClusterBuilder", "default"),
	}
}

/// Status line phrase plus failure detail for a resource's ready condition.
pub fn ready_summary<K: KpackResource>(resource: &K) -> (&'static str, Option<String>) {
	match resource.ready_condition() {
		Some(c) if c.status == ConditionStatus::True => ("Ready", None),
		Some(c) if c.status == ConditionStatus::False => {
			("Not Ready", c.message.clone().or_else(|| c.reason.clone()))
		}
		_ => ("Unknown", None),
	}
}

/// A writer wrapper that silently handles broken pipe errors.
///
/// When the underlying writer returns a broken pipe error (EPIPE), this wrapper
/// converts it to a successful write. This allows commands to exit cleanly when
/// output is piped to a process that closes early (e.g., `kp image list | head -1`).
pub struct BrokenPipeGuard<W> {
	inner: W,
}

impl<W> BrokenPipeGuard<W> {
	pub fn new(inner: W) -> Self {
		Self { inner }
	}
}

impl<W: Write> Write for BrokenPipeGuard<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		match self.inner.write(buf) {
			Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(buf.len()),
			other => other,
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		match self.inner.flush() {
			Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write as _;

	use indoc::indoc;

	use super::*;

	#[test]
	fn env_pairs_parse_into_build_env() {
		let env = parse_env_pairs(&["BP_JVM_VERSION=17".to_string(), "DEBUG=".to_string()])
			.unwrap();

		assert_eq!(env[0], EnvVar::new("BP_JVM_VERSION", "17"));
		assert_eq!(env[1], EnvVar::new("DEBUG", ""));
	}

	#[test]
	fn env_pair_without_equals_errors() {
		let err = parse_env_pairs(&["BP_JVM_VERSION".to_string()]).unwrap_err();
		assert!(err.to_string().contains("key=value"));
	}

	#[test]
	fn buildpack_refs_split_pins_and_commas() {
		let order = parse_buildpack_refs(&[
			"paketo-buildpacks/java@5.9.1".to_string(),
			"paketo-buildpacks/go,paketo-buildpacks/node".to_string(),
		]);

		assert_eq!(order.len(), 3);
		assert_eq!(order[0].group[0].id, "paketo-buildpacks/java");
		assert_eq!(order[0].group[0].version.as_deref(), Some("5.9.1"));
		assert_eq!(order[1].group[0].id, "paketo-buildpacks/go");
		assert_eq!(order[2].group[0].version, None);
	}

	#[test]
	fn order_file_overrides_buildpacks() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(
			indoc! {r"
				- group:
				  - id: paketo-buildpacks/java
				    version: 5.9.1
			"}
			.as_bytes(),
		)
		.unwrap();

		let order = resolve_order(
			Some(file.path().to_str().unwrap()),
			&["ignored".to_string()],
		)
		.unwrap();

		assert_eq!(order.len(), 1);
		assert_eq!(order[0].group[0].id, "paketo-buildpacks/java");
	}

	#[test]
	fn missing_order_file_errors() {
		let err = read_order_file("/does/not/exist.yaml").unwrap_err();
		assert!(err.to_string().contains("reading order file"));
	}

	#[test]
	fn builder_reference_defaults_to_default_cluster_builder() {
		assert_eq!(
			builder_reference(None, None),
			TypedReference::new("ClusterBuilder", "default")
		);
		assert_eq!(
			builder_reference(Some("my-builder"), None),
			TypedReference::new("Builder", "my-builder")
		);
		assert_eq!(
			builder_reference(None, Some("base")),
			TypedReference::new("ClusterBuilder", "base")
		);
	}
}
