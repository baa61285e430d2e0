//! Integration tests for the secret commands using the mock API server.
//!
//! Credential flavors are constructed directly so no environment variables
//! or prompts are involved.

use kp::{
	commands::{
		secret::{create, delete, list},
		util::{NamespaceFlag, SubmitFlags},
	},
	k8s::client::ClusterConnection,
	secrets::{SecretFlavor, DOCKERHUB_SERVER, MANAGED_SECRET_ANNOTATION},
};
use kpack_mock::{KpackMockServer, RunningKpackMockServer};

const SECRETS_PATH: &str = "/api/v1/namespaces/default/secrets";
const SERVICE_ACCOUNTS_PATH: &str = "/api/v1/namespaces/default/serviceaccounts";

async fn connect(server: &RunningKpackMockServer) -> ClusterConnection {
	ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection")
}

fn default_service_account() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "ServiceAccount",
		"metadata": {"name": "default", "namespace": "default"}
	})
}

/// A service account already holding one kp-managed registry secret.
fn service_account_with_managed_secret() -> serde_json::Value {
	let managed = serde_json::json!({"dockerhub-creds": DOCKERHUB_SERVER}).to_string();
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "ServiceAccount",
		"metadata": {
			"name": "default",
			"namespace": "default",
			"annotations": {MANAGED_SECRET_ANNOTATION: managed}
		},
		"secrets": [{"name": "dockerhub-creds"}],
		"imagePullSecrets": [{"name": "dockerhub-creds"}]
	})
}

fn dockerhub_secret() -> serde_json::Value {
	serde_json::json!({
		"apiVersion": "v1",
		"kind": "Secret",
		"metadata": {"name": "dockerhub-creds", "namespace": "default"},
		"type": "kubernetes.io/dockerconfigjson"
	})
}

fn create_args(name: &str, dry_run: bool) -> create::CreateArgs {
	create::CreateArgs {
		name: name.to_string(),
		dockerhub: None,
		gcr: None,
		registry: None,
		registry_user: None,
		git_url: None,
		git_user: None,
		git_ssh_key: None,
		namespace: NamespaceFlag::default(),
		submit: SubmitFlags {
			dry_run,
			output: None,
		},
	}
}

fn registry_flavor() -> SecretFlavor {
	SecretFlavor::Registry {
		server: DOCKERHUB_SERVER.to_string(),
		username: "buildservice".to_string(),
		password: "hunter2".to_string(),
	}
}

#[tokio::test]
async fn create_links_the_secret_into_the_service_account() {
	let server = KpackMockServer::builder()
		.resources(vec![default_service_account()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	create::run_async(
		create_args("dockerhub-creds", false),
		registry_flavor(),
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Secret \"dockerhub-creds\" created\n"
	);

	let secret = server.resource(SECRETS_PATH, "dockerhub-creds").unwrap();
	assert_eq!(secret["type"], "kubernetes.io/dockerconfigjson");
	let config: serde_json::Value =
		serde_json::from_str(secret["stringData"][".dockerconfigjson"].as_str().unwrap()).unwrap();
	assert_eq!(config["auths"][DOCKERHUB_SERVER]["username"], "buildservice");

	// registry secrets are linked as both secret and image pull secret
	let sa = server.resource(SERVICE_ACCOUNTS_PATH, "default").unwrap();
	assert_eq!(sa["secrets"][0]["name"], "dockerhub-creds");
	assert_eq!(sa["imagePullSecrets"][0]["name"], "dockerhub-creds");
	let managed: serde_json::Value = serde_json::from_str(
		sa["metadata"]["annotations"][MANAGED_SECRET_ANNOTATION]
			.as_str()
			.unwrap(),
	)
	.unwrap();
	assert_eq!(managed["dockerhub-creds"], DOCKERHUB_SERVER);
}

#[tokio::test]
async fn create_git_credential_is_not_an_image_pull_secret() {
	let server = KpackMockServer::builder()
		.resources(vec![default_service_account()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	create::run_async(
		create_args("git-creds", false),
		SecretFlavor::GitBasic {
			url: "https://github.example.com".to_string(),
			username: "bot".to_string(),
			password: "token".to_string(),
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap();

	let secret = server.resource(SECRETS_PATH, "git-creds").unwrap();
	assert_eq!(secret["type"], "kubernetes.io/basic-auth");
	assert_eq!(secret["metadata"]["annotations"]["kpack.io/git"], "https://github.example.com");

	let sa = server.resource(SERVICE_ACCOUNTS_PATH, "default").unwrap();
	assert_eq!(sa["secrets"][0]["name"], "git-creds");
	assert!(sa.get("imagePullSecrets").is_none());
}

#[tokio::test]
async fn create_dry_run_persists_nothing() {
	let server = KpackMockServer::builder()
		.resources(vec![default_service_account()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	create::run_async(
		create_args("dockerhub-creds", true),
		registry_flavor(),
		Some(connection),
		&mut output,
	)
	.await
	.unwrap();

	assert_eq!(
		String::from_utf8(output).unwrap(),
		"Secret \"dockerhub-creds\" created (dry run)\n"
	);
	assert_eq!(server.resource(SECRETS_PATH, "dockerhub-creds"), None);
	let sa = server.resource(SERVICE_ACCOUNTS_PATH, "default").unwrap();
	assert!(sa["metadata"].get("annotations").is_none());
}

#[tokio::test]
async fn delete_detaches_and_removes_the_secret() {
	let server = KpackMockServer::builder()
		.resources(vec![service_account_with_managed_secret(), dockerhub_secret()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let mut output = Vec::new();
	delete::run_async(
		delete::DeleteArgs {
			name: "dockerhub-creds".to_string(),
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
		"Secret \"dockerhub-creds\" deleted\n"
	);
	assert_eq!(server.resource(SECRETS_PATH, "dockerhub-creds"), None);

	let sa = server.resource(SERVICE_ACCOUNTS_PATH, "default").unwrap();
	assert_eq!(sa["secrets"], serde_json::json!([]));
	assert_eq!(sa["imagePullSecrets"], serde_json::json!([]));
	assert!(sa["metadata"]["annotations"].get(MANAGED_SECRET_ANNOTATION).is_none());
}

#[tokio::test]
async fn delete_refuses_secrets_kp_does_not_manage() {
	let server = KpackMockServer::builder()
		.resources(vec![default_service_account(), dockerhub_secret()])
		.build()
		.start()
		.await;
	let connection = connect(&server).await;

	let err = delete::run_async(
		delete::DeleteArgs {
			name: "dockerhub-creds".to_string(),
			namespace: NamespaceFlag::default(),
			dry_run: false,
		},
		Some(connection),
		Vec::new(),
	)
	.await
	.unwrap_err();

	assert_eq!(err.to_string(), "secret \"dockerhub-creds\" is not managed by kp");
	// the secret itself was left alone
	assert!(server.resource(SECRETS_PATH, "dockerhub-creds").is_some());
}

#[tokio::test]
async fn list_shows_managed_secrets_and_targets() {
	let server = KpackMockServer::builder()
		.resources(vec![service_account_with_managed_secret()])
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
	assert!(output.contains("TARGET"));
	assert!(output.contains("dockerhub-creds"));
	assert!(output.contains(DOCKERHUB_SERVER));
}

#[tokio::test]
async fn list_without_managed_secrets_fails() {
	let server = KpackMockServer::builder()
		.resources(vec![default_service_account()])
		.build()
		.start()
		.await;
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

	assert_eq!(err.to_string(), "no secrets found in \"default\" namespace");
}
