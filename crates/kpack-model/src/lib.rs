//! Typed models for the kpack build-service custom resources.
//!
//! Every resource lives in the `kpack.io/v1alpha2` API group and carries the
//! knative-style status duck (`observedGeneration` plus a list of
//! [`Condition`]s), exposed uniformly through [`KpackResource`] so callers can
//! wait on readiness without knowing the concrete kind.

mod build;
mod builder;
mod buildpack;
mod condition;
mod image;
mod references;
mod stack;
mod store;

pub use build::{Build, BuildBuilderSpec, BuildSpec, BuildStatus, BuildpackMetadata};
pub use builder::{
	Builder, BuilderSpec, BuilderStack, BuilderStatus, BuildpackRef, ClusterBuilder,
	ClusterBuilderSpec, OrderEntry,
};
pub use buildpack::{
	Buildpack, BuildpackSpec, BuildpackStatus, ClusterBuildpack, ClusterBuildpackSpec,
	ResolvedBuildpack,
};
pub use condition::{Condition, ConditionStatus, KpackResource, CONDITION_READY};
pub use image::{
	Blob, Git, Image, ImageBuild, ImageSpec, ImageStatus, Registry, SourceConfig,
};
pub use references::{EnvVar, ServiceAccountRef, TypedReference};
pub use stack::{ClusterStack, ClusterStackSpec, ClusterStackStatus, StackImage, StackStatusImage};
pub use store::{Buildpackage, ClusterStore, ClusterStoreSpec, ClusterStoreStatus, StoreImage};

/// API group shared by every kpack resource.
pub const KPACK_GROUP: &str = "kpack.io";
/// API version the CLI reads and writes.
pub const KPACK_VERSION: &str = "v1alpha2";

/// Label on a `Build` naming the owning `Image`.
pub const BUILD_IMAGE_LABEL: &str = "image.kpack.io/image";
/// Annotation on a `Build` carrying its ordinal within the owning image.
pub const BUILD_NUMBER_ANNOTATION: &str = "image.kpack.io/buildNumber";
/// Annotation on a `Build` recording why it ran (COMMIT, CONFIG, TRIGGER, ...).
pub const BUILD_REASON_ANNOTATION: &str = "image.kpack.io/reason";
/// Annotation patched onto an `Image` to force a fresh build.
pub const BUILD_NEEDED_ANNOTATION: &str = "image.kpack.io/additionalBuildNeeded";
