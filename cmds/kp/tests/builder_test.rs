//! Integration tests for the builder commands using the mock API server.

use kp::{
	commands::{
		builder::{create, delete, list, patch, save, status},
		util::{NamespaceFlag, SubmitFlags},
	},
	k8s::client::ClusterConnection,
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};

const BUILDERS_PATH: &str = "/apis/kpack.io/v1alpha2/namespaces/default/builders";

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

/// A ready builder with one java buildpack group, reconciled by the controller.
fn seeded_builder() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "kpack.io/v1alpha2",
		"kind": "Builder",
		"metadata": {"name": "my-builder", "namespace": "default"},
		"spec": {
			"tag": "registry.example.com/builders/my-builder",
			"stack": {"kind": "ClusterStack", "name": "base"},
			"store": {"kind": "ClusterStore", "name": "default"},
			"order": [{"group": [{"id": "paketo-buildpacks/java", "version": "5.9.1"}]}]
		},
		"status": {
			"conditions": [{"type": "Ready", "status": "True"}],
			"latestImage": "registry.example.com/builders/my-builder@sha256:beef",
			"stack": {
				"id": "io.buildpacks.stacks.jammy",
				"runImage": "registry.example.com/stacks/run@sha256:0123"
			},
			"builderMetadata": [{
				"id": "paketo-buildpacks/java",
				"version": "5.9.1",
				"homepage": "https://github.com/paketo-buildpacks/java"
			}],
			"order": [{"group": [{"id": "paketo-buildpacks/java", "version": "5.9.1"}]}]
		}
	})
}

#[tokio::test]
async fn create_persists_the_builder() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	create::run_async(
		create::CreateArgs {
			name: "my-builder".to_string(),
			tag: "registry.example.com/builders/my-builder".to_string(),
			stack: "base".to_string(),
			store: "default".to_string(),
			order: None,
			buildpacks: vec!["paketo-buildpacks/java@5.9.1".to_string()],
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" created\n"
	);

	let stored = server.resource(BUILDERS_PATH, "my-builder").unwrap();
	assert_eq!(stored["spec"]["tag"], "registry.example.com/builders/my-builder");
	assert_eq!(stored["spec"]["stack"]["kind"], "ClusterStack");
	assert_eq!(stored["spec"]["stack"]["name"], "base");
	assert_eq!(stored["spec"]["store"]["name"], "default");
	assert_eq!(stored["spec"]["order"][0]["group"][0]["id"], "paketo-buildpacks/java");
	assert_eq!(stored["spec"]["order"][0]["group"][0]["version"], "5.9.1");
}

#[tokio::test]
async fn patch_updates_the_tag() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_builder()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	patch::run_async(
		patch::PatchArgs {
			name: "my-builder".to_string(),
			tag: Some("registry.example.com/builders/java".to_string()),
			stack: None,
			store: None,
			order: None,
			buildpacks: Vec::new(),
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" updated\n"
	);
	let stored = server.resource(BUILDERS_PATH, "my-builder").unwrap();
	assert_eq!(stored["spec"]["tag"], "registry.example.com/builders/java");
	// untouched fields survive the merge patch
	assert_eq!(stored["spec"]["stack"]["name"], "base");
	assert_eq!(stored["spec"]["order"][0]["group"][0]["id"], "paketo-buildpacks/java");
}

#[tokio::test]
async fn patch_without_changes_reports_unchanged() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_builder()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	patch::run_async(
		patch::PatchArgs {
			name: "my-builder".to_string(),
			tag: None,
			stack: None,
			store: None,
			order: None,
			buildpacks: Vec::new(),
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" unchanged\n"
	);
}

#[tokio::test]
async fn save_requires_a_tag_for_a_new_builder() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = save::run_async(
		save::SaveArgs {
			name: "my-builder".to_string(),
			tag: None,
			stack: None,
			store: None,
			order: None,
			buildpacks: vec!["paketo-buildpacks/java".to_string()],
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.to_string(), "--tag is required when creating a Builder");
}

#[tokio::test]
async fn save_requires_an_order_for_a_new_builder() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = save::run_async(
		save::SaveArgs {
			name: "my-builder".to_string(),
			tag: Some("registry.example.com/builders/my-builder".to_string()),
			stack: None,
			store: None,
			order: None,
			buildpacks: Vec::new(),
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(
		err.to_string(),
		"--order or --buildpack is required when creating a Builder"
	);
}

#[tokio::test]
async fn save_creates_then_patches() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	save::run_async(
		save::SaveArgs {
			name: "my-builder".to_string(),
			tag: Some("registry.example.com/builders/my-builder".to_string()),
			stack: None,
			store: None,
			order: None,
			buildpacks: vec!["paketo-buildpacks/java".to_string()],
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection.clone()),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" created\n"
	);

	// the create falls back to the default stack and store
	let stored = server.resource(BUILDERS_PATH, "my-builder").unwrap();
	assert_eq!(stored["spec"]["stack"]["name"], "default");
	assert_eq!(stored["spec"]["store"]["name"], "default");

	let mut output = Vec::new();
	save::run_async(
		save::SaveArgs {
			name: "my-builder".to_string(),
			tag: None,
			stack: Some("base".to_string()),
			store: None,
			order: None,
			buildpacks: Vec::new(),
			namespace: NamespaceFlag::default(),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" updated\n"
	);
	let stored = server.resource(BUILDERS_PATH, "my-builder").unwrap();
	assert_eq!(stored["spec"]["stack"]["name"], "base");
}

#[tokio::test]
async fn status_shows_the_detection_order() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_builder()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	status::run_async(
		status::StatusArgs {
			name: "my-builder".to_string(),
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Ready"));
	assert!(output.contains("registry.example.com/builders/my-builder@sha256:beef"));
	assert!(output.contains("io.buildpacks.stacks.jammy"));
	assert!(output.contains("BUILDPACK ID"));
	assert!(output.contains("https://github.com/paketo-buildpacks/java"));
	assert!(output.contains("DETECTION ORDER"));
	assert!(output.contains("Group #1"));
	assert!(output.contains("  paketo-buildpacks/java@5.9.1"));
}

#[tokio::test]
async fn list_shows_builders_in_the_namespace() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_builder()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	list::run_async(
		list::ListArgs {
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("NAME"));
	assert!(output.contains("my-builder"));
	assert!(output.contains("True"));
	assert!(output.contains("registry.example.com/builders/my-builder@sha256:beef"));
}

#[tokio::test]
async fn list_without_builders_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = list::run_async(
		list::ListArgs {
			namespace: NamespaceFlag::default(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.to_string(), "no builders found in \"default\" namespace");
}

#[tokio::test]
async fn delete_removes_the_builder() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_builder()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	delete::run_async(
		delete::DeleteArgs {
			name: "my-builder".to_string(),
			namespace: NamespaceFlag::default(),
			dry_run: false,
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Builder \"my-builder\" deleted\n"
	);
	assert_eq!(server.resource(BUILDERS_PATH, "my-builder"), None);
}
