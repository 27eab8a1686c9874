use crate::services::publisher::PublishError;
use crate::services::store::StoreError;
use thiserror::Error;

/// Failures surfaced by the deployment pipeline.
///
/// Validation and authorization failures are returned synchronously to the
/// caller of create/update/delete. Build-phase failures never travel back
/// through the original request; they land in the record as
/// `status = failed` plus a `build_log` entry.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid request: {0}")]
    Validation(String),

    /// Unifies "no such record" and "not yours" so the API never leaks
    /// whether a foreign deployment exists.
    #[error("deployment not found")]
    NotFoundOrForbidden,

    #[error("user already has an active portfolio deployment")]
    DuplicateDeployment,

    #[error("custom domain is already taken")]
    DuplicateDomain,

    #[error("template not found or inactive")]
    TemplateNotFound,

    #[error("no free slug found within {0} attempts")]
    AllocationExhausted(u32),

    #[error("a build is already in progress for this deployment")]
    BuildInProgress,

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("storage failure: {0}")]
    Store(String),
}

impl From<StoreError> for DeployError {
    fn from(err: StoreError) -> Self {
        DeployError::Store(err.to_string())
    }
}
