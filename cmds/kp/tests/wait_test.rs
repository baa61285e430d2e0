//! Integration tests for the readiness waiter using the mock API server.

use std::time::Duration;

use assert_matches::assert_matches;
use kp::k8s::{
	client::ClusterConnection,
	wait::{wait_for_ready, WaitError},
};
use kpack_mock::KpackMockServer;
use kpack_model::Image;
use kube::api::Api;

fn image_with_ready(status: &str, message: Option<&str>) -> serde_json::Value {
	let mut condition = serde_json::json!({"type": "Ready", "status": status});
	if let Some(message) = message {
		condition["message"] = serde_json::Value::String(message.to_string());
	}
	serde_json::json!({
		"apiVersion": "kpack.io/v1alpha2",
		"kind": "Image",
		"metadata": {"name": "my-image", "namespace": "default"},
		"spec": {
			"tag": "registry.example.com/apps/my-image",
			"builder": {"kind": "ClusterBuilder", "name": "default"},
			"source": {"git": {"url": "https://example.com/app.git", "revision": "main"}}
		},
		"status": {"conditions": [condition]}
	})
}

#[tokio::test]
async fn wait_returns_the_ready_resource() {
	let server = KpackMockServer::builder()
		.resources(vec![image_with_ready("True", None)])
		.build()
		.start()
		.await;
	let connection = ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection");
	let api: Api<Image> = connection.namespaced_api();

	let image = api.get("my-image").await.unwrap();
	let settled = wait_for_ready(&api, &image, Duration::from_secs(10))
		.await
		.unwrap();

	assert_eq!(settled.metadata.name.as_deref(), Some("my-image"));
}

#[tokio::test]
async fn wait_surfaces_the_failure_message() {
	let server = KpackMockServer::builder()
		.resources(vec![image_with_ready("False", Some("build failed"))])
		.build()
		.start()
		.await;
	let connection = ClusterConnection::from_kubeconfig(server.kubeconfig(), None)
		.await
		.expect("failed to create connection");
	let api: Api<Image> = connection.namespaced_api();

	let image = api.get("my-image").await.unwrap();
	let err = wait_for_ready(&api, &image, Duration::from_secs(10))
		.await
		.unwrap_err();

	assert_matches!(err, WaitError::NotReady { message, .. } if message == "build failed");
}
