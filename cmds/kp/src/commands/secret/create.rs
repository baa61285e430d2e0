//! Secret create subcommand handler.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use k8s_openapi::api::core::v1::{Secret, ServiceAccount};
use kube::api::{Api, PostParams};
use tracing::instrument;

use crate::{
	commands::util::{self, NamespaceFlag, SubmitFlags},
	k8s::{client::ClusterConnection, patch::submit_merge_patch},
	secrets::{
		self, SecretFlavor, DOCKERHUB_PASSWORD_ENV, DOCKERHUB_SERVER, GCR_SERVER,
		GCR_SERVICE_ACCOUNT_PATH_ENV, GCR_USERNAME, GIT_PASSWORD_ENV, GIT_SSH_KEY_PATH_ENV,
		REGISTRY_PASSWORD_ENV,
	},
};

#[derive(Args)]
#[command(group = ArgGroup::new("flavor").required(true).args(["dockerhub", "gcr", "registry", "git_url"]))]
pub struct CreateArgs {
	/// Secret name
	pub name: String,

	/// Docker Hub id; the password comes from DOCKERHUB_PASSWORD or a prompt
	#[arg(long)]
	pub dockerhub: Option<String>,

	/// Path to a GCR service account json, or GCR_SERVICE_ACCOUNT_PATH
	/// when given without a value
	#[arg(long, num_args = 0..=1, default_missing_value = "")]
	pub gcr: Option<String>,

	/// Registry server; the password comes from REGISTRY_PASSWORD or a prompt
	#[arg(long, requires = "registry_user")]
	pub registry: Option<String>,

	/// Registry username
	#[arg(long, requires = "registry")]
	pub registry_user: Option<String>,

	/// Git repository url the credential applies to
	#[arg(long)]
	pub git_url: Option<String>,

	/// Git username; the password comes from GIT_PASSWORD or a prompt
	#[arg(long, requires = "git_url", conflicts_with = "git_ssh_key")]
	pub git_user: Option<String>,

	/// Path to a git SSH private key, or GIT_SSH_KEY_PATH when given
	/// without a value
	#[arg(long, requires = "git_url", num_args = 0..=1, default_missing_value = "")]
	pub git_ssh_key: Option<String>,

	#[command(flatten)]
	pub namespace: NamespaceFlag,

	#[command(flatten)]
	pub submit: SubmitFlags,
}

impl CreateArgs {
	/// Resolve the credential flavor, reading environment variables, key
	/// files and prompts as needed.
	fn flavor(&self) -> Result<SecretFlavor> {
		if let Some(username) = &self.dockerhub {
			return Ok(SecretFlavor::Registry {
				server: DOCKERHUB_SERVER.to_string(),
				username: username.clone(),
				password: util::env_or_prompt(DOCKERHUB_PASSWORD_ENV, "dockerhub password")?,
			});
		}
		if let Some(path) = &self.gcr {
			let path = path_or_env(path, GCR_SERVICE_ACCOUNT_PATH_ENV)
				.context("--gcr needs a service account path")?;
			let key = std::fs::read_to_string(&path)
				.with_context(|| format!("reading GCR service account {path:?}"))?;
			return Ok(SecretFlavor::Registry {
				server: GCR_SERVER.to_string(),
				username: GCR_USERNAME.to_string(),
				password: key,
			});
		}
		if let Some(server) = &self.registry {
			let username = self
				.registry_user
				.clone()
				.context("--registry-user is required with --registry")?;
			return Ok(SecretFlavor::Registry {
				server: server.clone(),
				username,
				password: util::env_or_prompt(REGISTRY_PASSWORD_ENV, "registry password")?,
			});
		}

		let url = self
			.git_url
			.clone()
			.context("--dockerhub, --gcr, --registry or --git-url is required")?;
		if let Some(username) = &self.git_user {
			return Ok(SecretFlavor::GitBasic {
				url,
				username: username.clone(),
				password: util::env_or_prompt(GIT_PASSWORD_ENV, "git password")?,
			});
		}
		if let Some(path) = &self.git_ssh_key {
			let path = path_or_env(path, GIT_SSH_KEY_PATH_ENV)
				.context("--git-ssh-key needs a private key path")?;
			let private_key = std::fs::read_to_string(&path)
				.with_context(|| format!("reading SSH private key {path:?}"))?;
			return Ok(SecretFlavor::GitSsh { url, private_key });
		}
		anyhow::bail!("--git-user or --git-ssh-key is required with --git-url")
	}
}

/// A path flag value, or its environment fallback when the flag was given
/// without a value.
fn path_or_env(value: &str, env_var: &str) -> Result<String> {
	if !value.is_empty() {
		return Ok(value.to_string());
	}
	std::env::var(env_var).with_context(|| format!("{env_var} is not set"))
}

/// Run the secret create subcommand.
pub fn run<W: Write>(args: CreateArgs, writer: W) -> Result<()> {
	let flavor = args.flavor()?;
	util::block_on(run_async(args, flavor, None, writer))?
}

/// Async implementation of secret create. Credentials are resolved by the
/// caller so prompting happens outside the runtime.
#[instrument(skip_all, fields(name = %args.name))]
pub async fn run_async<W: Write>(
	args: CreateArgs,
	flavor: SecretFlavor,
	connection: Option<ClusterConnection>,
	mut writer: W,
) -> Result<()> {
	let connection = util::connect_or(connection, args.namespace.namespace.as_deref()).await?;
	let secret_api: Api<Secret> = connection.namespaced_api();
	let sa_api: Api<ServiceAccount> = connection.namespaced_api();

	let secret = secrets::make_secret(&args.name, connection.namespace(), &flavor);
	let params = PostParams {
		dry_run: args.submit.dry_run,
		..PostParams::default()
	};
	let created = secret_api
		.create(&params, &secret)
		.await
		.with_context(|| format!("creating Secret {:?}", args.name))?;

	let current = sa_api
		.get(super::SERVICE_ACCOUNT)
		.await
		.with_context(|| format!("getting ServiceAccount {:?}", super::SERVICE_ACCOUNT))?;
	let desired = secrets::attach_secret(&current, &args.name, flavor.target(), flavor.is_registry())?;
	submit_merge_patch(
		&sa_api,
		super::SERVICE_ACCOUNT,
		&current,
		&desired,
		args.submit.dry_run,
	)
	.await
	.with_context(|| format!("patching ServiceAccount {:?}", super::SERVICE_ACCOUNT))?;

	util::report(
		&mut writer,
		&args.submit,
		"Secret",
		&args.name,
		"created",
		&created,
	)
}
