use crate::services::store::ContentPatch;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Body of `POST /deployment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentForm {
    /// Preferred slug; normalized and fell back on when taken.
    #[validate(max_length = 63)]
    pub requested_slug: Option<String>,
    #[validate(max_length = 253)]
    pub custom_domain: Option<String>,
    #[validate(max_length = 160)]
    pub title: Option<String>,
    #[validate(max_length = 2000)]
    pub description: Option<String>,
    #[validate(max_length = 160)]
    pub meta_title: Option<String>,
    #[validate(max_length = 500)]
    pub meta_description: Option<String>,
    #[validate(max_length = 500)]
    pub meta_keywords: Option<String>,
    pub custom_css: Option<String>,
    pub custom_js: Option<String>,
    pub analytics_id: Option<String>,
    pub is_public: Option<bool>,
    pub password_protected: bool,
    pub password: Option<String>,
    pub allow_multiple: bool,
}

/// Body of `PUT /deployment/{id}`; only `Some` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentUpdateForm {
    #[validate(max_length = 160)]
    pub title: Option<String>,
    #[validate(max_length = 2000)]
    pub description: Option<String>,
    #[validate(max_length = 160)]
    pub meta_title: Option<String>,
    #[validate(max_length = 500)]
    pub meta_description: Option<String>,
    #[validate(max_length = 500)]
    pub meta_keywords: Option<String>,
    pub custom_css: Option<String>,
    pub custom_js: Option<String>,
    pub analytics_id: Option<String>,
    pub is_public: Option<bool>,
    pub password_protected: Option<bool>,
    pub password: Option<String>,
}

impl From<DeploymentUpdateForm> for ContentPatch {
    fn from(form: DeploymentUpdateForm) -> Self {
        ContentPatch {
            title: form.title,
            description: form.description,
            meta_title: form.meta_title,
            meta_description: form.meta_description,
            meta_keywords: form.meta_keywords,
            custom_css: form.custom_css,
            custom_js: form.custom_js,
            analytics_id: form.analytics_id,
            is_public: form.is_public,
            password_protected: form.password_protected,
            password: form.password,
        }
    }
}
