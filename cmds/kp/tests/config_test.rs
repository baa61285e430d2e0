//! Integration tests for the config commands using the mock API server.

use kp::{
	commands::config::{default_repository, default_service_account},
	k8s::client::ClusterConnection,
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};

const KPACK_CONFIGMAPS_PATH: &str = "/api/v1/namespaces/kpack/configmaps";

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

fn kp_config(data: serde_json::Value) -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "ConfigMap",
		"metadata": {"name": "kp-config", "namespace": "kpack"},
		"data": data
	})
}

#[tokio::test]
async fn set_repository_creates_the_config_and_get_reads_it_back() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	default_repository::run_async(
		default_repository::DefaultRepositoryArgs {
			value: Some("registry.example.com/kpack".to_string()),
		},
		Some(connection.clone()),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(
		String::from_utf8(output).unwrap(),
		"default repository set to \"registry.example.com/kpack\"\n"
	);

	let config = server.resource(KPACK_CONFIGMAPS_PATH, "kp-config").unwrap();
	assert_eq!(config["data"]["default.repository"], "registry.example.com/kpack");

	let mut output = Vec::new();
	default_repository::run_async(
		default_repository::DefaultRepositoryArgs { value: None },
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(String::from_utf8(output).unwrap(), "registry.example.com/kpack\n");
}

#[tokio::test]
async fn get_repository_without_config_fails_with_guidance() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let err = default_repository::run_async(
		default_repository::DefaultRepositoryArgs { value: None },
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(
		err.to_string(),
		"failed to get default repository: use \"kp config default-repository\" to set it"
	);
}

#[tokio::test]
async fn get_repository_reads_the_legacy_key() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(serde_json::json!({
			"canonical.repository": "registry.example.com/legacy"
		}))])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	default_repository::run_async(
		default_repository::DefaultRepositoryArgs { value: None },
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "registry.example.com/legacy\n");
}

#[tokio::test]
async fn set_service_account_patches_the_existing_config() {
	let server = KpackMockServer::builder()
		.resources(vec![kp_config(serde_json::json!({
			"default.repository": "registry.example.com/kpack"
		}))])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	default_service_account::run_async(
		default_service_account::DefaultServiceAccountArgs {
			value: Some("build-sa".to_string()),
		},
		Some(connection.clone()),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(
		String::from_utf8(output).unwrap(),
		"default service account set to \"build-sa\"\n"
	);

	// both settings live in the same ConfigMap
	let config = server.resource(KPACK_CONFIGMAPS_PATH, "kp-config").unwrap();
	assert_eq!(config["data"]["default.repository"], "registry.example.com/kpack");
	assert_eq!(config["data"]["default.serviceaccount"], "build-sa");

	let mut output = Vec::new();
	default_service_account::run_async(
		default_service_account::DefaultServiceAccountArgs { value: None },
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();
	assert_eq!(String::from_utf8(output).unwrap(), "build-sa\n");
}

#[tokio::test]
async fn get_service_account_falls_back_to_default() {
	let server = KpackMockServer::builder().build().start().await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	default_service_account::run_async(
		default_service_account::DefaultServiceAccountArgs { value: None },
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(String::from_utf8(output).unwrap(), "default\n");
}
