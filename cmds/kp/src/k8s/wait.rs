//! Readiness waiter over the watch API.
//!
//! A resource is settled once its `Ready` condition is reported for the
//! generation that was just submitted: `True` succeeds, `False` fails with
//! the condition message, anything else keeps watching.

use std::{fmt::Debug, time::Duration};

use kube::{api::Api, runtime::wait::await_condition, Resource, ResourceExt};
use kpack_model::{ConditionStatus, KpackResource};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

/// How long `--wait` watches before giving up.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum WaitError {
	#[error("{kind} {name:?} did not become ready within {}s", timeout.as_secs())]
	TimedOut {
		kind: String,
		name: String,
		timeout: Duration,
	},

	#[error("{kind} {name:?} failed to become ready: {message}")]
	NotReady {
		kind: String,
		name: String,
		message: String,
	},

	#[error("{kind} {name:?} was deleted while waiting")]
	Deleted { kind: String, name: String },

	#[error(transparent)]
	Watch(#[from] kube::runtime::wait::Error),
}

/// Watch `resource` until its `Ready` condition settles for the submitted
/// generation, or `timeout` elapses.
#[instrument(skip_all, fields(name = %resource.name_any()))]
pub async fn wait_for_ready<K>(api: &Api<K>, resource: &K, timeout: Duration) -> Result<K, WaitError>
where
	K: Resource<DynamicType = ()> + KpackResource + Clone + DeserializeOwned + Debug + Send + 'static,
{
	let kind = K::kind(&()).to_string();
	let name = resource.name_any();
	let submitted_generation = resource.meta().generation;

	let settled = move |obj: Option<&K>| {
		obj.is_some_and(|k| {
			let caught_up = match (k.observed_generation(), submitted_generation) {
				(Some(observed), Some(submitted)) => observed >= submitted,
				// Controllers that have not reported a generation yet are
				// judged on the condition alone
				_ => true,
			};
			caught_up
				&& k.ready_condition()
					.is_some_and(|c| c.status != ConditionStatus::Unknown)
		})
	};

	let outcome = tokio::time::timeout(timeout, await_condition(api.clone(), &name, settled))
		.await
		.map_err(|_| WaitError::TimedOut {
			kind: kind.clone(),
			name: name.clone(),
			timeout,
		})??;

	let settled_resource = outcome.ok_or_else(|| WaitError::Deleted {
		kind: kind.clone(),
		name: name.clone(),
	})?;

	match settled_resource.ready_condition() {
		Some(c) if c.status == ConditionStatus::True => Ok(settled_resource),
		Some(c) => Err(WaitError::NotReady {
			kind,
			name,
			message: c
				.message
				.clone()
				.filter(|m| !m.is_empty())
				.unwrap_or_else(|| "no failure message reported".to_string()),
		}),
		None => Err(WaitError::NotReady {
			kind,
			name,
			message: "ready condition disappeared".to_string(),
		}),
	}
}
