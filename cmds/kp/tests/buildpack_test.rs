//! Integration tests for the buildpack and clusterbuildpack commands using
//! the mock API server.

use kp::{
	commands::{buildpack, clusterbuildpack, util::NamespaceFlag},
	k8s::client::ClusterConnection,
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

/// A ready buildpack whose buildpackage the controller has unpacked.
fn seeded_buildpack() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "kpack.io/v1alpha2",
		"kind": "Buildpack",
		"metadata": {"name": "java", "namespace": "default"},
		"spec": {"image": "registry.example.com/buildpacks/java@sha256:feed"},
		"status": {
			"conditions": [{"type": "Ready", "status": "True"}],
			"buildpacks": [
				{
					"id": "paketo-buildpacks/java",
					"version": "5.9.1",
					"homepage": "https://github.com/paketo-buildpacks/java"
				},
				{"id": "paketo-buildpacks/maven", "version": "6.2.0"}
			]
		}
	})
}

fn seeded_cluster_buildpack() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "kpack.io/v1alpha2",
		"kind": "ClusterBuildpack",
		"metadata": {"name": "nodejs"},
		"spec": {"image": "registry.example.com/buildpacks/nodejs@sha256:beef"},
		"status": {
			"conditions": [{"type": "Ready", "status": "True"}],
			"buildpacks": [{"id": "paketo-buildpacks/node-engine", "version": "3.1.0"}]
		}
	})
}

#[tokio::test]
async fn status_shows_the_contained_buildpacks() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_buildpack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	buildpack::status::run_async(
		buildpack::status::StatusArgs {
			name: "java".to_string(),
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Ready"));
	assert!(output.contains("registry.example.com/buildpacks/java@sha256:feed"));
	assert!(output.contains("BUILDPACK ID"));
	assert!(output.contains("paketo-buildpacks/java"));
	assert!(output.contains("5.9.1"));
	assert!(output.contains("paketo-buildpacks/maven"));
}

#[tokio::test]
async fn list_shows_buildpacks_in_the_namespace() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_buildpack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	buildpack::list::run_async(
		buildpack::list::ListArgs {
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("NAME"));
	assert!(output.contains("java"));
	assert!(output.contains("True"));
	assert!(output.contains("registry.example.com/buildpacks/java@sha256:feed"));
}

#[tokio::test]
async fn list_without_buildpacks_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = buildpack::list::run_async(
		buildpack::list::ListArgs {
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.to_string(), "no buildpacks found in \"default\" namespace");
}

#[tokio::test]
async fn cluster_buildpack_status_shows_the_image() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_cluster_buildpack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	clusterbuildpack::status::run_async(
		clusterbuildpack::status::StatusArgs {
			name: "nodejs".to_string(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Ready"));
	assert!(output.contains("registry.example.com/buildpacks/nodejs@sha256:beef"));
	assert!(output.contains("paketo-buildpacks/node-engine"));
}

#[tokio::test]
async fn cluster_buildpack_list_without_items_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = clusterbuildpack::list::run_async(
		clusterbuildpack::list::ListArgs {},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.to_string(), "no clusterbuildpacks found");
}
