//! Descriptor import: plan against live cluster state, then apply.
//!
//! Importing is two-phase so `--show-changes` and `--dry-run` can present
//! the exact operations before anything is written. The plan fetches every
//! referenced resource once; execution replays it in dependency order
//! (stores, stacks, builders, lifecycle).

use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{Api, PostParams};
use kpack_model::{
	ClusterBuilder, ClusterBuilderSpec, ClusterStack, ClusterStackSpec, ClusterStore,
	ServiceAccountRef, StackImage, TypedReference,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{
	descriptor::{BuilderSource, Descriptor, StackSource},
	k8s::{
		client::ClusterConnection,
		config::{
			default_builder_tag, KPACK_NAMESPACE, LIFECYCLE_CONFIG_NAME, LIFECYCLE_IMAGE_KEY,
		},
		patch::{merge_patch, submit_merge_patch, PatchError},
	},
	store::{self, StoreError},
};

#[derive(Debug, Error)]
pub enum ImportError {
	#[error(
		"ConfigMap {LIFECYCLE_CONFIG_NAME:?} not found in namespace {KPACK_NAMESPACE:?}, is kpack installed?"
	)]
	LifecycleConfigMissing,

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error(transparent)]
	Patch(#[from] PatchError),

	#[error(transparent)]
	Kube(#[from] kube::Error),
}

/// One planned operation for a single resource.
#[derive(Debug, Clone)]
pub struct PlannedItem<K> {
	pub name: String,
	pub desired: K,
	pub change: PlannedChange<K>,
}

#[derive(Debug, Clone)]
pub enum PlannedChange<K> {
	Create,
	Update { current: K },
	Unchanged,
}

impl<K> PlannedChange<K> {
	pub fn describe(&self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Update { .. } => "update",
			Self::Unchanged => "unchanged",
		}
	}

	pub fn is_change(&self) -> bool {
		!matches!(self, Self::Unchanged)
	}
}

/// Everything an import run will do, in application order.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
	pub stores: Vec<PlannedItem<ClusterStore>>,
	pub stacks: Vec<PlannedItem<ClusterStack>>,
	pub builders: Vec<PlannedItem<ClusterBuilder>>,
	pub lifecycle: Option<PlannedItem<ConfigMap>>,
}

impl ImportPlan {
	pub fn has_changes(&self) -> bool {
		self.stores.iter().any(|i| i.change.is_change())
			|| self.stacks.iter().any(|i| i.change.is_change())
			|| self.builders.iter().any(|i| i.change.is_change())
			|| self
				.lifecycle
				.as_ref()
				.is_some_and(|i| i.change.is_change())
	}
}

/// Compare a validated descriptor against the cluster and decide, per
/// resource, whether it needs creating, patching or nothing at all.
#[instrument(skip_all)]
pub async fn plan(
	connection: &ClusterConnection,
	descriptor: &Descriptor,
	repository: &str,
) -> Result<ImportPlan, ImportError> {
	let service_account_ref = descriptor
		.service_account_ref
		.clone()
		.unwrap_or_else(|| ServiceAccountRef {
			name: "default".to_string(),
			namespace: KPACK_NAMESPACE.to_string(),
		});

	let store_api: Api<ClusterStore> = connection.cluster_api();
	let mut stores = Vec::new();
	for source in &descriptor.cluster_stores {
		let buildpackages: Vec<String> =
			source.sources.iter().map(|s| s.image.clone()).collect();
		let item = match store_api.get_opt(&source.name).await? {
			None => {
				let mut desired = store::new_store(&source.name, &buildpackages)?;
				desired.spec.service_account_ref = Some(service_account_ref.clone());
				PlannedItem {
					name: source.name.clone(),
					desired,
					change: PlannedChange::Create,
				}
			}
			Some(current) => {
				let outcome = store::add_sources(&current, &buildpackages)?;
				let change = if outcome.changed() {
					PlannedChange::Update { current }
				} else {
					PlannedChange::Unchanged
				};
				PlannedItem {
					name: source.name.clone(),
					desired: outcome.store,
					change,
				}
			}
		};
		stores.push(item);
	}

	let stack_api: Api<ClusterStack> = connection.cluster_api();
	let mut stacks = Vec::new();
	for source in &descriptor.cluster_stacks {
		stacks.push(plan_stack(&stack_api, &source.name, source).await?);
	}
	// the default stack is materialized as a copy named "default"
	if let Some(default_name) = &descriptor.default_cluster_stack {
		if let Some(source) = descriptor.stack(default_name).filter(|_| default_name != "default")
		{
			stacks.push(plan_stack(&stack_api, "default", source).await?);
		}
	}

	let builder_api: Api<ClusterBuilder> = connection.cluster_api();
	let mut builders = Vec::new();
	for source in &descriptor.cluster_builders {
		builders.push(
			plan_builder(
				&builder_api,
				&source.name,
				source,
				repository,
				&service_account_ref,
			)
			.await?,
		);
	}
	if let Some(default_name) = &descriptor.default_cluster_builder {
		if let Some(source) = descriptor
			.builder(default_name)
			.filter(|_| default_name != "default")
		{
			builders.push(
				plan_builder(&builder_api, "default", source, repository, &service_account_ref)
					.await?,
			);
		}
	}

	let lifecycle = match &descriptor.lifecycle {
		None => None,
		Some(image) => {
			let api: Api<ConfigMap> =
				Api::namespaced(connection.client().clone(), KPACK_NAMESPACE);
			let current = api
				.get_opt(LIFECYCLE_CONFIG_NAME)
				.await?
				.ok_or(ImportError::LifecycleConfigMissing)?;

			let mut desired = current.clone();
			desired
				.data
				.get_or_insert_with(Default::default)
				.insert(LIFECYCLE_IMAGE_KEY.to_string(), image.image.clone());

			Some(PlannedItem {
				name: LIFECYCLE_CONFIG_NAME.to_string(),
				change: diff_change(&current, &desired)?.with_current(current),
				desired,
			})
		}
	};

	Ok(ImportPlan {
		stores,
		stacks,
		builders,
		lifecycle,
	})
}

async fn plan_stack(
	api: &Api<ClusterStack>,
	name: &str,
	source: &StackSource,
) -> Result<PlannedItem<ClusterStack>, ImportError> {
	let build_image = StackImage::new(&source.build_image.image);
	let run_image = StackImage::new(&source.run_image.image);

	Ok(match api.get_opt(name).await? {
		None => PlannedItem {
			name: name.to_string(),
			desired: ClusterStack::new(
				name,
				ClusterStackSpec {
					id: None,
					build_image,
					run_image,
				},
			),
			change: PlannedChange::Create,
		},
		Some(current) => {
			// keep the resolved id, only the images come from the descriptor
			let mut desired = current.clone();
			desired.spec.build_image = build_image;
			desired.spec.run_image = run_image;
			PlannedItem {
				name: name.to_string(),
				change: diff_change(&current, &desired)?.with_current(current),
				desired,
			}
		}
	})
}

async fn plan_builder(
	api: &Api<ClusterBuilder>,
	name: &str,
	source: &BuilderSource,
	repository: &str,
	service_account_ref: &ServiceAccountRef,
) -> Result<PlannedItem<ClusterBuilder>, ImportError> {
	let spec = ClusterBuilderSpec {
		tag: default_builder_tag(repository, name),
		stack: TypedReference::new("ClusterStack", &source.cluster_stack),
		store: TypedReference::new("ClusterStore", &source.cluster_store),
		order: source.order.clone(),
		service_account_ref: Some(service_account_ref.clone()),
	};

	Ok(match api.get_opt(name).await? {
		None => PlannedItem {
			name: name.to_string(),
			desired: ClusterBuilder::new(name, spec),
			change: PlannedChange::Create,
		},
		Some(current) => {
			let mut desired = current.clone();
			desired.spec = spec;
			PlannedItem {
				name: name.to_string(),
				change: diff_change(&current, &desired)?.with_current(current),
				desired,
			}
		}
	})
}

/// Unit marker returned by [`diff_change`], upgraded to a real
/// [`PlannedChange`] once the caller hands over the current object.
enum Diff {
	Update,
	Unchanged,
}

impl Diff {
	fn with_current<K>(self, current: K) -> PlannedChange<K> {
		match self {
			Self::Update => PlannedChange::Update { current },
			Self::Unchanged => PlannedChange::Unchanged,
		}
	}
}

fn diff_change<K: Serialize>(current: &K, desired: &K) -> Result<Diff, PatchError> {
	let current = serde_json::to_value(current).map_err(PatchError::Serialize)?;
	let desired = serde_json::to_value(desired).map_err(PatchError::Serialize)?;
	Ok(match merge_patch(&current, &desired) {
		Some(_) => Diff::Update,
		None => Diff::Unchanged,
	})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedAction {
	Created,
	Patched,
	Unchanged,
}

impl AppliedAction {
	pub fn verb(self) -> &'static str {
		match self {
			Self::Created => "created",
			Self::Patched => "updated",
			Self::Unchanged => "unchanged",
		}
	}
}

/// Record of one applied plan item, for result reporting.
#[derive(Debug)]
pub struct AppliedChange {
	pub kind: &'static str,
	pub name: String,
	pub action: AppliedAction,
}

/// Apply a plan in dependency order. With `dry_run` every request still goes
/// to the API server for validation but nothing is persisted.
#[instrument(skip_all, fields(dry_run))]
pub async fn execute(
	connection: &ClusterConnection,
	plan: &ImportPlan,
	dry_run: bool,
) -> Result<Vec<AppliedChange>, ImportError> {
	let mut applied = Vec::new();

	apply_items(
		&connection.cluster_api::<ClusterStore>(),
		&plan.stores,
		"ClusterStore",
		dry_run,
		&mut applied,
	)
	.await?;
	apply_items(
		&connection.cluster_api::<ClusterStack>(),
		&plan.stacks,
		"ClusterStack",
		dry_run,
		&mut applied,
	)
	.await?;
	apply_items(
		&connection.cluster_api::<ClusterBuilder>(),
		&plan.builders,
		"ClusterBuilder",
		dry_run,
		&mut applied,
	)
	.await?;

	if let Some(item) = &plan.lifecycle {
		let api: Api<ConfigMap> = Api::namespaced(connection.client().clone(), KPACK_NAMESPACE);
		apply_items(&api, std::slice::from_ref(item), "ConfigMap", dry_run, &mut applied).await?;
	}

	Ok(applied)
}

async fn apply_items<K>(
	api: &Api<K>,
	items: &[PlannedItem<K>],
	kind: &'static str,
	dry_run: bool,
	applied: &mut Vec<AppliedChange>,
) -> Result<(), ImportError>
where
	K: kube::Resource<DynamicType = ()>
		+ Clone
		+ Serialize
		+ DeserializeOwned
		+ std::fmt::Debug,
{
	for item in items {
		let action = match &item.change {
			PlannedChange::Create => {
				let params = PostParams {
					dry_run,
					..PostParams::default()
				};
				api.create(&params, &item.desired).await?;
				AppliedAction::Created
			}
			PlannedChange::Update { current } => {
				match submit_merge_patch(api, &item.name, current, &item.desired, dry_run).await? {
					Some(_) => AppliedAction::Patched,
					None => AppliedAction::Unchanged,
				}
			}
			PlannedChange::Unchanged => AppliedAction::Unchanged,
		};
		applied.push(AppliedChange {
			kind,
			name: item.name.clone(),
			action,
		});
	}
	Ok(())
}
