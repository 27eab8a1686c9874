//! Slug allocation for deployment records.
//!
//! The slug namespace is the one shared resource of the pipeline, so the
//! existence check and the reservation have to be a single atomic step:
//! the allocator walks a candidate sequence and lets the store's unique
//! index arbitrate, retrying on a slug collision instead of checking first.

use crate::models::Deployment;
use crate::services::error::DeployError;
use crate::services::store::{DeploymentStore, StoreError, UniqueKey};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9-]").unwrap();
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]").unwrap();
}

const FALLBACK_BASE: &str = "portfolio";

/// Lowercase and strip everything outside `[a-z0-9-]`.
pub fn normalize(requested: &str) -> String {
    NON_SLUG.replace_all(&requested.to_lowercase(), "").to_string()
}

/// Base slug derived from the owner's handle; alphanumerics only.
pub fn base_from_handle(handle: &str) -> String {
    let base = NON_ALNUM.replace_all(&handle.to_lowercase(), "").to_string();
    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base
    }
}

/// Candidate sequence: the normalized requested name (if any), then the
/// handle-derived base, then `base1`, `base2`, ...
fn candidates(requested: Option<&str>, handle: &str) -> impl Iterator<Item = String> {
    let requested = requested
        .map(normalize)
        .filter(|slug| !slug.is_empty());
    let base = base_from_handle(handle);
    let suffixed = {
        let base = base.clone();
        (1u32..).map(move |n| format!("{}{}", base, n))
    };
    requested
        .into_iter()
        .chain(std::iter::once(base))
        .chain(suffixed)
}

/// Reserve a globally unique slug for `deployment` and persist it at
/// `pending` in one step. Two racing allocations for the same base can
/// never both win: the loser's insert hits the unique index and advances
/// to the next candidate.
pub async fn allocate(
    store: &dyn DeploymentStore,
    mut deployment: Deployment,
    requested: Option<&str>,
    handle: &str,
    max_attempts: u32,
) -> Result<Deployment, DeployError> {
    for candidate in candidates(requested, handle).take(max_attempts as usize) {
        deployment.slug = candidate;
        match store.insert(deployment.clone()).await {
            Ok(inserted) => return Ok(inserted),
            Err(StoreError::Unique(UniqueKey::Slug)) => continue,
            Err(StoreError::Unique(UniqueKey::CustomDomain)) => {
                return Err(DeployError::DuplicateDomain)
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(DeployError::AllocationExhausted(max_attempts))
}
