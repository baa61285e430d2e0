//! Image reference parsing.
//!
//! Buildpackage identity is the digest, so every reference handed to the
//! store and import paths must be fully digested; the controller, not the
//! CLI, resolves tags for everything else.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Lazy-compiled digest pattern.
static DIGEST_PATTERN: OnceLock<Regex> = OnceLock::new();

fn digest_pattern() -> &'static Regex {
	DIGEST_PATTERN
		.get_or_init(|| Regex::new(r"^sha256:[0-9a-fA-F]{64}$").expect("digest pattern compiles"))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
	#[error("buildpackage reference {0:?} must include a digest (repo/name@sha256:...)")]
	MissingDigest(String),

	#[error("buildpackage reference {0:?} has a malformed digest")]
	InvalidDigest(String),
}

/// Extract the digest from a reference like `repo/name@sha256:abcd...`.
pub fn digest(reference: &str) -> Result<&str, ReferenceError> {
	let (_, digest) = reference
		.split_once('@')
		.ok_or_else(|| ReferenceError::MissingDigest(reference.to_string()))?;

	if !digest_pattern().is_match(digest) {
		return Err(ReferenceError::InvalidDigest(reference.to_string()));
	}

	Ok(digest)
}

/// Digest of a reference when it carries one, for comparisons against
/// references that may predate digest validation.
pub fn digest_opt(reference: &str) -> Option<&str> {
	digest(reference).ok()
}
