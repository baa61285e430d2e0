//! Integration tests for the clusterstack commands using the mock API server.

use kp::{
	commands::{
		clusterstack::{create, delete, list, patch, save, status},
		util::SubmitFlags,
	},
	k8s::client::ClusterConnection,
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};

const STACKS_PATH: &str = "/apis/kpack.io/v1alpha2/clusterstacks";

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

/// A ready stack whose images the controller has pinned by digest.
fn seeded_stack() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "kpack.io/v1alpha2",
		"kind": "ClusterStack",
		"metadata": {"name": "base"},
		"spec": {
			"id": "io.buildpacks.stacks.jammy",
			"buildImage": {"image": "paketobuildpacks/build-jammy-base"},
			"runImage": {"image": "paketobuildpacks/run-jammy-base"}
		},
		"status": {
			"conditions": [{"type": "Ready", "status": "True"}],
			"id": "io.buildpacks.stacks.jammy",
			"buildImage": {"latestImage": "paketobuildpacks/build-jammy-base@sha256:b111"},
			"runImage": {"latestImage": "paketobuildpacks/run-jammy-base@sha256:r222"}
		}
	})
}

#[tokio::test]
async fn create_persists_the_stack() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	create::run_async(
		create::CreateArgs {
			name: "base".to_string(),
			build_image: "paketobuildpacks/build-jammy-base".to_string(),
			run_image: "paketobuildpacks/run-jammy-base".to_string(),
			stack_id: Some("io.buildpacks.stacks.jammy".to_string()),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" created\n");

	let stored = server.resource(STACKS_PATH, "base").unwrap();
	assert_eq!(stored["spec"]["id"], "io.buildpacks.stacks.jammy");
	assert_eq!(stored["spec"]["buildImage"]["image"], "paketobuildpacks/build-jammy-base");
	assert_eq!(stored["spec"]["runImage"]["image"], "paketobuildpacks/run-jammy-base");
}

#[tokio::test]
async fn patch_updates_the_run_image() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_stack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	patch::run_async(
		patch::PatchArgs {
			name: "base".to_string(),
			build_image: None,
			run_image: Some("paketobuildpacks/run-jammy-base:1.2".to_string()),
			stack_id: None,
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" updated\n");
	let stored = server.resource(STACKS_PATH, "base").unwrap();
	assert_eq!(stored["spec"]["runImage"]["image"], "paketobuildpacks/run-jammy-base:1.2");
	// untouched fields survive the merge patch
	assert_eq!(stored["spec"]["buildImage"]["image"], "paketobuildpacks/build-jammy-base");
}

#[tokio::test]
async fn patch_without_changes_reports_unchanged() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_stack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	patch::run_async(
		patch::PatchArgs {
			name: "base".to_string(),
			build_image: None,
			run_image: None,
			stack_id: None,
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" unchanged\n");
}

#[tokio::test]
async fn save_requires_both_images_for_a_new_stack() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = save::run_async(
		save::SaveArgs {
			name: "base".to_string(),
			build_image: Some("paketobuildpacks/build-jammy-base".to_string()),
			run_image: None,
			stack_id: None,
			submit: SubmitFlags::default(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(
		err.to_string(),
		"--build-image and --run-image are required when creating a ClusterStack"
	);
}

#[tokio::test]
async fn save_creates_then_patches() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	save::run_async(
		save::SaveArgs {
			name: "base".to_string(),
			build_image: Some("paketobuildpacks/build-jammy-base".to_string()),
			run_image: Some("paketobuildpacks/run-jammy-base".to_string()),
			stack_id: None,
			submit: SubmitFlags::default(),
		},
		Some(connection.clone()),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" created\n");

	let mut output = Vec::new();
	save::run_async(
		save::SaveArgs {
			name: "base".to_string(),
			build_image: None,
			run_image: None,
			stack_id: Some("io.buildpacks.stacks.jammy".to_string()),
			submit: SubmitFlags::default(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" updated\n");

	let stored = server.resource(STACKS_PATH, "base").unwrap();
	assert_eq!(stored["spec"]["id"], "io.buildpacks.stacks.jammy");
}

#[tokio::test]
async fn status_prefers_the_resolved_images() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_stack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	status::run_async(
		status::StatusArgs {
			name: "base".to_string(),
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("Ready"));
	assert!(output.contains("io.buildpacks.stacks.jammy"));
	assert!(output.contains("paketobuildpacks/build-jammy-base@sha256:b111"));
	assert!(output.contains("paketobuildpacks/run-jammy-base@sha256:r222"));
}

#[tokio::test]
async fn list_shows_the_stacks() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_stack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	list::run_async(list::ListArgs {}, Some(connection), &mut output)
		.await
		.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("NAME"));
	assert!(output.contains("base"));
	assert!(output.contains("True"));
	assert!(output.contains("io.buildpacks.stacks.jammy"));
}

#[tokio::test]
async fn list_without_stacks_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = list::run_async(list::ListArgs {}, Some(connection), Vec::new())
		.await
		.unwrap_err();

	assert_eq!(err.to_string(), "no clusterstacks found");
}

#[tokio::test]
async fn delete_removes_the_stack() {
	let server = KpackMockServer::builder()
		.resources(vec![seeded_stack()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	delete::run_async(
		delete::DeleteArgs {
			name: "base".to_string(),
			dry_run: false,
		},
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "ClusterStack \"base\" deleted\n");
	assert_eq!(server.resource(STACKS_PATH, "base"), None);
}
