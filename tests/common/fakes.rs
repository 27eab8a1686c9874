//! In-memory collaborators for driving the deployment pipeline without
//! postgres or a publishing platform behind it.

use async_trait::async_trait;
use chrono::Utc;
use foliohost::configuration::DeploymentSettings;
use foliohost::models::{Deployment, DeploymentStatus, Template, User};
use foliohost::services::store::{
    BuildOutcome, DeploymentStore, ProfileProvider, StoreError, TemplateStore, UniqueKey,
};
use foliohost::services::{PublishError, PublishMeta, Publisher};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

pub fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        email_confirmed: true,
    }
}

pub fn other_user() -> User {
    User {
        id: "user-2".to_string(),
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        email: "john@example.com".to_string(),
        email_confirmed: true,
    }
}

pub fn deployment_settings() -> DeploymentSettings {
    DeploymentSettings {
        base_domain: "folio.test".to_string(),
        publish_url: "http://127.0.0.1:0".to_string(),
        publish_timeout_seconds: 1,
        max_slug_attempts: 10_000,
    }
}

pub fn sample_template(id: i32) -> Template {
    Template {
        id,
        name: format!("Template {}", id),
        description: None,
        category: Some("minimal".to_string()),
        html_content: "<html><head><title>{{name}}</title></head>\
             <body><h1>{{name}}</h1><p>{{profession}}</p></body></html>"
            .to_string(),
        css_content: None,
        js_content: None,
        preview_image_url: None,
        is_premium: false,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<HashMap<Uuid, Deployment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Deployment> {
        self.records.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl DeploymentStore for InMemoryStore {
    async fn insert(&self, deployment: Deployment) -> Result<Deployment, StoreError> {
        let mut records = self.records.lock().unwrap();
        if records.values().any(|d| d.slug == deployment.slug) {
            return Err(StoreError::Unique(UniqueKey::Slug));
        }
        if deployment.custom_domain.is_some()
            && records
                .values()
                .any(|d| d.custom_domain == deployment.custom_domain)
        {
            return Err(StoreError::Unique(UniqueKey::CustomDomain));
        }
        records.insert(deployment.id, deployment.clone());
        Ok(deployment)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Deployment>, StoreError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn fetch_by_host(&self, host: &str) -> Result<Option<Deployment>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|d| d.is_active && (d.slug == host || d.custom_domain.as_deref() == Some(host)))
            .cloned())
    }

    async fn fetch_active_by_owner(&self, user_id: &str) -> Result<Vec<Deployment>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.user_id == user_id && d.is_active)
            .cloned()
            .collect())
    }

    async fn update_content(&self, deployment: &Deployment) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(&deployment.id) {
            Some(record) => {
                *record = deployment.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn try_transition(
        &self,
        id: Uuid,
        from: &[DeploymentStatus],
        to: DeploymentStatus,
    ) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = match records.get_mut(&id) {
            Some(record) => record,
            None => return Ok(false),
        };
        if !from.contains(&record.status) {
            return Ok(false);
        }
        record.status = to;
        if to == DeploymentStatus::Building {
            record.last_build_time = Some(Utc::now());
        }
        record.last_updated = Utc::now();
        Ok(true)
    }

    async fn finish_build(&self, id: Uuid, outcome: BuildOutcome) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = match records.get_mut(&id) {
            Some(record) => record,
            None => return Ok(false),
        };
        if record.status != DeploymentStatus::Deploying {
            return Ok(false);
        }
        record.status = DeploymentStatus::Deployed;
        record.public_url = Some(outcome.public_url);
        record.build_log = Some(outcome.build_log);
        record.deployed_at = Some(outcome.deployed_at);
        record.build_version += 1;
        record.last_updated = Utc::now();
        Ok(true)
    }

    async fn mark_failed(&self, id: Uuid, build_log: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&id) {
            if matches!(
                record.status,
                DeploymentStatus::Pending
                    | DeploymentStatus::Building
                    | DeploymentStatus::Deploying
                    | DeploymentStatus::Updating
            ) {
                record.status = DeploymentStatus::Failed;
                record.build_log = Some(build_log.to_string());
                record.last_updated = Utc::now();
            }
        }
        Ok(())
    }

    async fn disable(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&id) {
            record.is_active = false;
            record.status = DeploymentStatus::Disabled;
            record.last_updated = Utc::now();
        }
        Ok(())
    }

    async fn bump_view(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&id) {
            record.view_count += 1;
            record.last_viewed = Some(Utc::now());
        }
        Ok(())
    }
}

pub struct InMemoryTemplates {
    templates: Vec<Template>,
}

impl InMemoryTemplates {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplates {
    async fn get_active(&self, template_id: i32) -> Result<Option<Template>, StoreError> {
        Ok(self
            .templates
            .iter()
            .find(|t| t.id == template_id && t.is_active)
            .cloned())
    }
}

pub struct StaticProfile(pub Value);

#[async_trait]
impl ProfileProvider for StaticProfile {
    async fn get_context(&self, _user_id: &str) -> Result<Value, StoreError> {
        Ok(self.0.clone())
    }
}

/// Publisher that always succeeds and remembers every document it was given.
#[derive(Default)]
pub struct OkPublisher {
    pub published: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Publisher for OkPublisher {
    async fn publish(&self, document: &str, meta: &PublishMeta) -> Result<String, PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((meta.slug.clone(), document.to_string()));
        Ok(format!("https://{}.folio.test", meta.slug))
    }
}

pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _document: &str, _meta: &PublishMeta) -> Result<String, PublishError> {
        Err(PublishError("platform returned 502".to_string()))
    }
}

/// Publisher that succeeds on the first call and hangs on every call after
/// it, for exercising rebuild failures against an already published site.
#[derive(Default)]
pub struct FlakyPublisher {
    calls: Mutex<u32>,
}

#[async_trait]
impl Publisher for FlakyPublisher {
    async fn publish(&self, _document: &str, meta: &PublishMeta) -> Result<String, PublishError> {
        let first = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls == 1
        };
        if !first {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(format!("https://{}.folio.test", meta.slug))
    }
}

/// Publisher that sleeps past any reasonable timeout before answering.
pub struct SlowPublisher {
    pub delay: Duration,
}

#[async_trait]
impl Publisher for SlowPublisher {
    async fn publish(&self, _document: &str, meta: &PublishMeta) -> Result<String, PublishError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("https://{}.folio.test", meta.slug))
    }
}
