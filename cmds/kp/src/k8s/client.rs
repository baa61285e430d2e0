//! Kubernetes cluster connection management.

use std::time::Duration;

use k8s_openapi::apimachinery::pkg::version::Info;
use kube::{
	api::Api,
	config::{KubeConfigOptions, Kubeconfig, KubeconfigError},
	core::{ClusterResourceScope, NamespaceResourceScope},
	Client, Config, Resource,
};
use thiserror::Error;
use tracing::instrument;

/// Default timeout for Kubernetes API requests.
const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when connecting to a Kubernetes cluster.
#[derive(Debug, Error)]
pub enum ConnectionError {
	#[error(transparent)]
	Kubeconfig(#[from] KubeconfigError),

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

/// Represents a connection to a Kubernetes cluster.
///
/// Wraps the kube client together with the resolved namespace: the current
/// context's namespace unless overridden by `--namespace`.
#[derive(Clone)]
pub struct ClusterConnection {
	client: Client,
	server_version: Info,
	namespace: String,
	/// Context name the connection was built from.
	cluster_identifier: String,
}

impl std::fmt::Debug for ClusterConnection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ClusterConnection")
			.field("cluster_identifier", &self.cluster_identifier)
			.field("namespace", &self.namespace)
			.field("server_version", &self.server_version)
			.finish_non_exhaustive()
	}
}

impl ClusterConnection {
	/// Connect using `$KUBECONFIG`/the default kubeconfig and its current
	/// context.
	#[instrument(skip_all)]
	pub async fn connect(namespace: Option<&str>) -> Result<Self, ConnectionError> {
		let kubeconfig = Kubeconfig::read()?;
		Self::from_kubeconfig(kubeconfig, namespace).await
	}

	/// Connect using a provided kubeconfig.
	#[instrument(skip_all)]
	pub async fn from_kubeconfig(
		kubeconfig: Kubeconfig,
		namespace: Option<&str>,
	) -> Result<Self, ConnectionError> {
		let context_name = kubeconfig.current_context.clone().unwrap_or_default();

		let mut config =
			Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
		config.read_timeout = Some(DEFAULT_API_TIMEOUT);

		let client = Client::try_from(config)?;
		let namespace = namespace
			.map(str::to_string)
			.unwrap_or_else(|| client.default_namespace().to_string());

		// Fetch server version early so connection problems surface before
		// any command logic runs
		let server_version = client.apiserver_version().await?;

		tracing::debug!(
			context = %context_name,
			namespace = %namespace,
			server_version = %format!("{}.{}", server_version.major, server_version.minor),
			"connected to cluster"
		);

		Ok(Self {
			client,
			server_version,
			namespace,
			cluster_identifier: format!("context:{context_name}"),
		})
	}

	/// Get a reference to the underlying kube client.
	pub fn client(&self) -> &Client {
		&self.client
	}

	/// Get the server version.
	pub fn server_version(&self) -> &Info {
		&self.server_version
	}

	/// Namespace namespaced commands operate in.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Get the cluster identifier (context name).
	pub fn cluster_identifier(&self) -> &str {
		&self.cluster_identifier
	}

	/// Typed API handle scoped to the connection namespace.
	pub fn namespaced_api<K>(&self) -> Api<K>
	where
		K: Resource<Scope = NamespaceResourceScope>,
		K::DynamicType: Default,
	{
		Api::namespaced(self.client.clone(), &self.namespace)
	}

	/// Typed API handle for cluster-scoped resources.
	pub fn cluster_api<K>(&self) -> Api<K>
	where
		K: Resource<Scope = ClusterResourceScope>,
		K::DynamicType: Default,
	{
		Api::all(self.client.clone())
	}
}
