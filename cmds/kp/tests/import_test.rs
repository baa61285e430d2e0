//! Integration tests for the import command using the mock API server.

use std::io::Write as _;

use indoc::{formatdoc, indoc};
use kp::{
	commands::{
		import::{run_async, ImportArgs},
		util::SubmitFlags,
	},
	k8s::client::ClusterConnection,
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};
use tempfile::NamedTempFile;

const STORES_PATH: &str = "/apis/kpack.io/v1alpha2/clusterstores";
const STACKS_PATH: &str = "/apis/kpack.io/v1alpha2/clusterstacks";
const BUILDERS_PATH: &str = "/apis/kpack.io/v1alpha2/clusterbuilders";
const KPACK_CONFIGMAPS_PATH: &str = "/api/v1/namespaces/kpack/configmaps";

const DIGEST: &str = "sha256:1f3bdd55bdfb1d58bae1327a7b3eb4e0a2a5b0b2ba7a5ccc6e8ed9e8b62cca59";

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

fn kp_config() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "ConfigMap",
		"metadata": {"name": "kp-config", "namespace": "kpack"},
		"data": {"default.repository": "registry.example.com/kpack"}
	})
}

fn lifecycle_config() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "ConfigMap",
		"metadata": {"name": "lifecycle-image", "namespace": "kpack"},
		"data": {"image": "registry.example.com/lifecycle:0.16"}
	})
}

/// Write a v1 descriptor to disk: one store, one stack, one builder, all
/// three also the defaults, plus a lifecycle image.
fn descriptor_file() -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	file.write_all(
		formatdoc! {r#"
			apiVersion: kp.kpack.io/v1
			kind: DependencyDescriptor
			defaultClusterStack: base
			defaultClusterBuilder: base
			lifecycle:
			  image: registry.example.com/lifecycle:0.17
			clusterStores:
			- name: default
			  sources:
			  - image: registry.example.com/paketo/java@{DIGEST}
			clusterStacks:
			- name: base
			  buildImage:
			    image: registry.example.com/build:jammy
			  runImage:
			    image: registry.example.com/run:jammy
			clusterBuilders:
			- name: base
			  clusterStack: base
			  clusterStore: default
			  order:
			  - group:
			    - id: paketo-buildpacks/java
		"#}
		.as_bytes(),
	)
	.unwrap();
	file
}

fn args(file: &NamedTempFile, show_changes: bool, dry_run: bool) -> ImportArgs {
	ImportArgs {
		filename: file.path().to_str().unwrap().to_string(),
		show_changes,
		submit: SubmitFlags {
			dry_run,
			output: None,
		},
	}
}

#[tokio::test]
async fn import_creates_descriptor_resources_and_default_copies() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(), lifecycle_config()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	let mut output = Vec::new();
	run_async(args(&file, false, false), Some(connection), &mut output)
		.await
		.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		indoc! {r#"
			ClusterStore "default" created
			ClusterStack "base" created
			ClusterStack "default" created
			ClusterBuilder "base" created
			ClusterBuilder "default" created
			ConfigMap "lifecycle-image" updated
		"#}
	);

	let store = server.resource(STORES_PATH, "default").unwrap();
	assert_eq!(
		store["spec"]["sources"][0]["image"],
		format!("registry.example.com/paketo/java@{DIGEST}").as_str()
	);

	// the default stack is a copy of the one the descriptor names
	let stack = server.resource(STACKS_PATH, "default").unwrap();
	assert_eq!(stack["spec"]["buildImage"]["image"], "registry.example.com/build:jammy");

	// builder tags derive from the configured default repository
	let builder = server.resource(BUILDERS_PATH, "base").unwrap();
	assert_eq!(
		builder["spec"]["tag"],
		"registry.example.com/kpack:clusterbuilder-base"
	);
	let default_builder = server.resource(BUILDERS_PATH, "default").unwrap();
	assert_eq!(
		default_builder["spec"]["tag"],
		"registry.example.com/kpack:clusterbuilder-default"
	);
	assert_eq!(default_builder["spec"]["stack"]["name"], "base");

	let lifecycle = server.resource(KPACK_CONFIGMAPS_PATH, "lifecycle-image").unwrap();
	assert_eq!(lifecycle["data"]["image"], "registry.example.com/lifecycle:0.17");
}

#[tokio::test]
async fn import_twice_reports_everything_unchanged() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(), lifecycle_config()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	run_async(args(&file, false, false), Some(connection.clone()), Vec::new())
		.await
		.unwrap();

	let mut output = Vec::new();
	run_async(args(&file, false, false), Some(connection), &mut output)
		.await
		.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		indoc! {r#"
			ClusterStore "default" unchanged
			ClusterStack "base" unchanged
			ClusterStack "default" unchanged
			ClusterBuilder "base" unchanged
			ClusterBuilder "default" unchanged
			ConfigMap "lifecycle-image" unchanged
		"#}
	);
}

#[tokio::test]
async fn import_dry_run_persists_nothing() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(), lifecycle_config()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	let mut output = Vec::new();
	run_async(args(&file, false, true), Some(connection), &mut output)
		.await
		.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("ClusterStore \"default\" created (dry run)"));
	assert_eq!(server.resource(STORES_PATH, "default"), None);
	assert_eq!(server.resource(STACKS_PATH, "base"), None);
	assert_eq!(server.resource(BUILDERS_PATH, "base"), None);
	let lifecycle = server.resource(KPACK_CONFIGMAPS_PATH, "lifecycle-image").unwrap();
	assert_eq!(lifecycle["data"]["image"], "registry.example.com/lifecycle:0.16");
}

#[tokio::test]
async fn show_changes_prints_the_plan() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(), lifecycle_config()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	let mut output = Vec::new();
	run_async(args(&file, true, true), Some(connection), &mut output)
		.await
		.unwrap();

	let output = String::from_utf8(output).unwrap();
	assert!(output.contains("KIND"));
	assert!(output.contains("CHANGE"));
	assert!(output.contains("create"));
}

#[tokio::test]
async fn import_without_lifecycle_configmap_fails() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	let err = run_async(args(&file, false, false), Some(connection), Vec::new())
		.await
		.unwrap_err();

	assert!(format!("{err:#}").contains("is kpack installed?"));
	// planning failed before anything was written
	assert_eq!(server.resource(STORES_PATH, "default"), None);
}

#[tokio::test]
async fn import_without_default_repository_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;
	let file = descriptor_file();

	let err = run_async(args(&file, false, false), Some(connection), Vec::new())
		.await
		.unwrap_err();

	assert_eq!(
		err.to_string(),
		"failed to get default repository: use \"kp config default-repository\" to set it"
	);
}

#[tokio::test]
async fn import_with_unreadable_descriptor_fails() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let args = ImportArgs {
		filename: "/does/not/exist.yaml".to_string(),
		show_changes: false,
		submit: SubmitFlags::default(),
	};
	let err = run_async(args, Some(connection), Vec::new()).await.unwrap_err();

	assert!(err.to_string().contains("reading descriptor"));
}
