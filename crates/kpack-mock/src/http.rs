//! HTTP mock API server built on wiremock.
//!
//! The server speaks enough of the Kubernetes REST conventions for a typed
//! kube client: GET single/list/watch, POST, PATCH (RFC 7386 merge) and
//! DELETE, with dry-run, field selector and label selector handling.

use std::{
	collections::HashMap,
	sync::{Arc, RwLock},
};

use bon::Builder;
use kube::config::{
	AuthInfo, Cluster, Context, Kubeconfig, NamedAuthInfo, NamedCluster, NamedContext,
};
use tracing::{debug, trace};
use wiremock::{
	matchers::{method, path, path_regex},
	Mock, MockServer, Request, ResponseTemplate,
};

use super::{catalog::ResourceCatalog, helpers::merge_json};

/// Shared mutable resource state, keyed by `(collection path, name)`.
pub type SharedResources = Arc<RwLock<HashMap<(String, String), serde_json::Value>>>;

/// A mock API server preloaded with manifests.
#[derive(Builder)]
pub struct KpackMockServer {
	/// Raw manifests to serve. API paths are derived from apiVersion/kind
	/// using the resource catalog.
	#[builder(default)]
	resources: Vec<serde_json::Value>,
}

/// A running mock server instance.
pub struct RunningKpackMockServer {
	server: MockServer,
	resources: SharedResources,
}

impl KpackMockServer {
	pub async fn start(self) -> RunningKpackMockServer {
		let server = MockServer::start().await;
		let catalog = ResourceCatalog::default();

		debug!(uri = %server.uri(), "started mock API server");

		let mut resources: HashMap<(String, String), serde_json::Value> = HashMap::new();
		for manifest in self.resources {
			if let Some((api_path, name)) = catalog.api_path_for(&manifest) {
				trace!(api_path = %api_path, name = %name, "registered resource");
				resources.insert((api_path, name), manifest);
			}
		}

		let ns_key = ("/api/v1/namespaces".to_string(), "default".to_string());
		resources.entry(ns_key).or_insert_with(|| {
			serde_json::json!({
				"apiVersion": "v1",
				"kind": "Namespace",
				"metadata": {"name": "default"}
			})
		});

		let shared_resources = Arc::new(RwLock::new(resources));

		mount_version(&server).await;
		mount_resources(&server, &shared_resources).await;

		RunningKpackMockServer {
			server,
			resources: shared_resources,
		}
	}
}

impl RunningKpackMockServer {
	pub fn uri(&self) -> String {
		self.server.uri()
	}

	/// Look up a stored resource, e.g. to assert on what the CLI persisted.
	pub fn resource(&self, api_path: &str, name: &str) -> Option<serde_json::Value> {
		self.resources
			.read()
			.unwrap()
			.get(&(api_path.to_string(), name.to_string()))
			.cloned()
	}

	/// Handle to the shared state for tests that mutate resources mid-flight.
	pub fn resources(&self) -> SharedResources {
		Arc::clone(&self.resources)
	}

	/// Create a Kubeconfig pointing to this mock server.
	pub fn kubeconfig(&self) -> Kubeconfig {
		self.kubeconfig_with_context("mock-context")
	}

	pub fn kubeconfig_with_context(&self, context_name: &str) -> Kubeconfig {
		let cluster_name = "mock-cluster";
		let user_name = "mock-user";

		Kubeconfig {
			clusters: vec![NamedCluster {
				name: cluster_name.to_string(),
				cluster: Some(Cluster {
					server: Some(self.uri()),
					insecure_skip_tls_verify: Some(true),
					..Default::default()
				}),
			}],
			contexts: vec![NamedContext {
				name: context_name.to_string(),
				context: Some(Context {
					cluster: cluster_name.to_string(),
					user: Some(user_name.to_string()),
					namespace: Some("default".to_string()),
					..Default::default()
				}),
			}],
			auth_infos: vec![NamedAuthInfo {
				name: user_name.to_string(),
				auth_info: Some(AuthInfo::default()),
			}],
			current_context: Some(context_name.to_string()),
			..Default::default()
		}
	}
}

async fn mount_version(server: &MockServer) {
	Mock::given(method("GET"))
		.and(path("/version"))
		.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
			"major": "1",
			"minor": "31",
			"gitVersion": "v1.31.0",
			"gitCommit": "fake",
			"gitTreeState": "clean",
			"buildDate": "2024-01-01T00:00:00Z",
			"goVersion": "go1.22.0",
			"compiler": "gc",
			"platform": "linux/amd64"
		})))
		.mount(server)
		.await;
}

async fn mount_resources(server: &MockServer, resources: &SharedResources) {
	let patch_resources = Arc::clone(resources);
	let post_resources = Arc::clone(resources);
	let get_resources = Arc::clone(resources);
	let delete_resources = Arc::clone(resources);
	let plurals = ResourceCatalog::default().plurals();

	// PATCH - RFC 7386 merge into the existing resource, persisted unless
	// the request carries dryRun
	Mock::given(method("PATCH"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let path_str = req.url.path();
			let is_dry_run = req.url.query().unwrap_or("").contains("dryRun");

			let (api_path, name) = parse_resource_path(path_str);

			let patch: serde_json::Value =
				serde_json::from_slice(&req.body).unwrap_or(serde_json::Value::Null);

			let merged = {
				let resources = patch_resources.read().unwrap();
				match resources.get(&(api_path.clone(), name.clone())) {
					Some(existing) => merge_json(existing.clone(), patch),
					None => {
						return not_found_response();
					}
				}
			};

			if !is_dry_run {
				let mut resources = patch_resources.write().unwrap();
				resources.insert((api_path, name), merged.clone());
			}

			ResponseTemplate::new(200).set_body_json(merged)
		})
		.mount(server)
		.await;

	// POST - persist unless dryRun, conflict when the name is taken
	Mock::given(method("POST"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let api_path = req.url.path().to_string();
			let is_dry_run = req.url.query().unwrap_or("").contains("dryRun");

			let body: serde_json::Value =
				serde_json::from_slice(&req.body).unwrap_or(serde_json::Value::Null);
			let name = body
				.pointer("/metadata/name")
				.and_then(|v| v.as_str())
				.unwrap_or("")
				.to_string();

			let mut resources = post_resources.write().unwrap();
			if resources.contains_key(&(api_path.clone(), name.clone())) {
				return ResponseTemplate::new(409).set_body_json(serde_json::json!({
					"kind": "Status",
					"apiVersion": "v1",
					"metadata": {},
					"status": "Failure",
					"message": format!("{name:?} already exists"),
					"reason": "AlreadyExists",
					"code": 409
				}));
			}
			if !is_dry_run && !name.is_empty() {
				resources.insert((api_path, name), body.clone());
			}

			ResponseTemplate::new(201).set_body_json(body)
		})
		.mount(server)
		.await;

	// DELETE - remove and echo the deleted resource, unless dryRun
	Mock::given(method("DELETE"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let (api_path, name) = parse_resource_path(req.url.path());
			let is_dry_run = req.url.query().unwrap_or("").contains("dryRun");

			let mut resources = delete_resources.write().unwrap();
			if is_dry_run {
				return match resources.get(&(api_path, name)) {
					Some(existing) => ResponseTemplate::new(200).set_body_json(existing.clone()),
					None => not_found_response(),
				};
			}
			match resources.remove(&(api_path, name)) {
				Some(deleted) => ResponseTemplate::new(200).set_body_json(deleted),
				None => not_found_response(),
			}
		})
		.mount(server)
		.await;

	// GET - single resource, list or watch, honoring field/label selectors.
	// A path whose second-to-last segment is a known plural names a single
	// resource; everything else is a collection.
	Mock::given(method("GET"))
		.and(path_regex(r"^/api(s)?/.*"))
		.respond_with(move |req: &Request| {
			let path_str = req.url.path();
			let resources = get_resources.read().unwrap();

			let (api_path, name) = parse_resource_path(path_str);
			let is_named = api_path
				.rsplit('/')
				.next()
				.is_some_and(|segment| plurals.contains(segment));
			if is_named {
				return match resources.get(&(api_path.clone(), name.clone())) {
					Some(resource) => {
						ResponseTemplate::new(200).set_body_json(resource.clone())
					}
					None => not_found_response(),
				};
			}

			let name_selector = selector_value(req, "fieldSelector")
				.and_then(|s| s.strip_prefix("metadata.name=").map(str::to_string));
			let label_selector = selector_value(req, "labelSelector")
				.and_then(|s| s.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())));

			let items: Vec<_> = resources
				.iter()
				.filter(|((res_api_path, res_name), manifest)| {
					res_api_path == path_str
						&& name_selector.as_ref().is_none_or(|n| n == res_name)
						&& label_selector
							.as_ref()
							.is_none_or(|(k, v)| manifest_label(manifest, k) == Some(v.as_str()))
				})
				.map(|(_, v)| v.clone())
				.collect();

			let is_watch = req
				.url
				.query_pairs()
				.any(|(k, v)| k == "watch" && v == "true");
			if is_watch {
				let mut body = Vec::new();
				for item in &items {
					let event = serde_json::json!({"type": "ADDED", "object": item});
					body.extend_from_slice(&serde_json::to_vec(&event).unwrap());
					body.push(b'\n');
				}
				return ResponseTemplate::new(200).set_body_raw(body, "application/json");
			}

			ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"kind": "List",
				"apiVersion": "v1",
				"metadata": {"resourceVersion": "1"},
				"items": items
			}))
		})
		.mount(server)
		.await;
}

fn not_found_response() -> ResponseTemplate {
	ResponseTemplate::new(404).set_body_json(serde_json::json!({
		"kind": "Status",
		"apiVersion": "v1",
		"metadata": {},
		"status": "Failure",
		"message": "not found",
		"reason": "NotFound",
		"code": 404
	}))
}

fn selector_value(req: &Request, key: &str) -> Option<String> {
	req.url
		.query_pairs()
		.find(|(k, _)| k == key)
		.map(|(_, v)| v.into_owned())
}

fn manifest_label<'m>(manifest: &'m serde_json::Value, key: &str) -> Option<&'m str> {
	manifest
		.pointer("/metadata/labels")?
		.get(key)?
		.as_str()
}

/// Split a resource URL into `(collection path, resource name)`.
///
/// `/apis/kpack.io/v1alpha2/namespaces/default/images/my-image` becomes
/// (`/apis/kpack.io/v1alpha2/namespaces/default/images`, `my-image`).
fn parse_resource_path(path: &str) -> (String, String) {
	let path = path.trim_end_matches('/');
	if let Some(last_slash) = path.rfind('/') {
		let api_path = &path[..last_slash];
		let name = &path[last_slash + 1..];
		(api_path.to_string(), name.to_string())
	} else {
		(path.to_string(), String::new())
	}
}
