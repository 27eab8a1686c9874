//! The deployment state machine.
//!
//! One `Deployer` owns the full lifecycle of portfolio deployments:
//!
//! ```text
//! pending    --(build starts)-->     building
//! building   --(render done)-->      deploying
//! deploying  --(publish ok)-->       deployed
//! deployed   --(owner update)-->     updating --> building --> ...
//! failed     --(owner update)-->     updating            (retry)
//! any        --(owner delete)-->     disabled
//! ```
//!
//! Failures in the build phase land in the record (`failed` + build log);
//! they are never thrown back through the request that scheduled the build.
//! The status column doubles as the per-deployment build lock: every
//! transition is a compare-and-swap, so a record disabled mid-build simply
//! makes the remaining transitions no-ops.

use crate::configuration::DeploymentSettings;
use crate::forms::{DeploymentForm, DeploymentUpdateForm};
use crate::models::{ActivityKind, Deployment, DeploymentStatus, Template, User};
use crate::services::activity::ActivityRecorder;
use crate::services::context;
use crate::services::error::DeployError;
use crate::services::publisher::{PublishError, PublishMeta, Publisher};
use crate::services::renderer::{Customizations, Renderer};
use crate::services::slug;
use crate::services::store::{
    BuildOutcome, ContentPatch, DeploymentStore, ProfileProvider, TemplateStore,
};
use chrono::Utc;
use serde_valid::Validate;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct Deployer {
    store: Arc<dyn DeploymentStore>,
    templates: Arc<dyn TemplateStore>,
    profiles: Arc<dyn ProfileProvider>,
    publisher: Arc<dyn Publisher>,
    activity: Arc<dyn ActivityRecorder>,
    renderer: Renderer,
    publish_timeout: Duration,
    max_slug_attempts: u32,
}

impl Deployer {
    pub fn new(
        store: Arc<dyn DeploymentStore>,
        templates: Arc<dyn TemplateStore>,
        profiles: Arc<dyn ProfileProvider>,
        publisher: Arc<dyn Publisher>,
        activity: Arc<dyn ActivityRecorder>,
        settings: &DeploymentSettings,
    ) -> Self {
        Self {
            store,
            templates,
            profiles,
            publisher,
            activity,
            renderer: Renderer::new(),
            publish_timeout: Duration::from_secs(settings.publish_timeout_seconds),
            max_slug_attempts: settings.max_slug_attempts,
        }
    }

    /// Validate the request, reserve a slug and persist the record at
    /// `pending`, then schedule the build. Returns immediately; the caller
    /// polls the record for progress.
    #[tracing::instrument(name = "Create deployment.", skip(self, form))]
    pub async fn create(
        &self,
        user: &User,
        template_id: i32,
        form: DeploymentForm,
    ) -> Result<Deployment, DeployError> {
        form.validate()
            .map_err(|err| DeployError::Validation(err.to_string()))?;
        if form.password_protected && form.password.as_deref().map_or(true, str::is_empty) {
            return Err(DeployError::Validation(
                "password is required when passwordProtected is set".to_string(),
            ));
        }

        let template = self
            .templates
            .get_active(template_id)
            .await?
            .ok_or(DeployError::TemplateNotFound)?;

        let existing = self.store.fetch_active_by_owner(&user.id).await?;
        if !existing.is_empty() && !form.allow_multiple {
            return Err(DeployError::DuplicateDeployment);
        }

        let seed = self.seed_record(user, &template, &form);
        let deployment = slug::allocate(
            self.store.as_ref(),
            seed,
            form.requested_slug.as_deref(),
            &user.handle(),
            self.max_slug_attempts,
        )
        .await?;

        self.activity.record(
            Some(&user.id),
            ActivityKind::TemplateSelection,
            &format!("Selected template: {}", template.name),
            "template",
            &template.id.to_string(),
        );

        self.schedule_build(deployment.id);
        Ok(deployment)
    }

    fn seed_record(&self, user: &User, template: &Template, form: &DeploymentForm) -> Deployment {
        let title = form
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| user.full_name());
        let mut deployment = Deployment::new(user.id.clone(), template.id, title);
        deployment.custom_domain = form.custom_domain.clone().filter(|d| !d.trim().is_empty());
        deployment.description = form.description.clone();
        deployment.meta_title = form.meta_title.clone();
        deployment.meta_description = form.meta_description.clone();
        deployment.meta_keywords = form.meta_keywords.clone();
        deployment.custom_css = form.custom_css.clone();
        deployment.custom_js = form.custom_js.clone();
        deployment.analytics_id = form.analytics_id.clone();
        deployment.is_public = form.is_public.unwrap_or(true);
        deployment.password_protected = form.password_protected;
        deployment.password = form.password.clone();
        deployment
    }

    fn schedule_build(&self, id: Uuid) {
        let deployer = self.clone();
        tokio::spawn(async move {
            if let Err(err) = deployer.run_build(id).await {
                tracing::error!(deployment_id = %id, "Build could not start: {}", err);
            }
        });
    }

    /// Drive one build through `building -> deploying -> deployed`.
    ///
    /// Entering while another build holds the soft lock yields
    /// `BuildInProgress`. Every failure inside the pipeline is folded into
    /// the record; the returned status is the terminal state reached.
    #[tracing::instrument(name = "Run deployment build.", skip(self))]
    pub async fn run_build(&self, id: Uuid) -> Result<DeploymentStatus, DeployError> {
        let entered = self
            .store
            .try_transition(
                id,
                &[DeploymentStatus::Pending, DeploymentStatus::Updating],
                DeploymentStatus::Building,
            )
            .await?;
        if !entered {
            return Err(DeployError::BuildInProgress);
        }

        let deployment = self
            .store
            .fetch(id)
            .await?
            .ok_or(DeployError::NotFoundOrForbidden)?;

        match self.build_inner(&deployment).await {
            Ok(Some(outcome)) => {
                let finished = self.store.finish_build(id, outcome.clone()).await?;
                if !finished {
                    // Disabled while publishing; leave the record alone.
                    tracing::info!(deployment_id = %id, "Build finished against a disabled record, dropping result");
                    return Ok(DeploymentStatus::Disabled);
                }
                self.activity.record(
                    Some(&deployment.user_id),
                    ActivityKind::PortfolioDeployment,
                    &format!("Portfolio deployed successfully to: {}", outcome.public_url),
                    "deployment",
                    &id.to_string(),
                );
                Ok(DeploymentStatus::Deployed)
            }
            Ok(None) => Ok(DeploymentStatus::Disabled),
            Err(err) => {
                let log = format!("Deployment failed: {}", err);
                if let Err(store_err) = self.store.mark_failed(id, &log).await {
                    tracing::error!(deployment_id = %id, "Could not record build failure: {}", store_err);
                }
                self.activity.record(
                    Some(&deployment.user_id),
                    ActivityKind::Error,
                    &log,
                    "deployment",
                    &id.to_string(),
                );
                Ok(DeploymentStatus::Failed)
            }
        }
    }

    /// Render and publish. `Ok(None)` means the record was disabled while
    /// the build was in flight and the result must be dropped.
    async fn build_inner(
        &self,
        deployment: &Deployment,
    ) -> Result<Option<BuildOutcome>, DeployError> {
        let template = self
            .templates
            .get_active(deployment.template_id)
            .await?
            .ok_or(DeployError::TemplateNotFound)?;

        let rendered = self.render_document(&template, deployment).await?;

        let mut build_log = String::from("Deployment successful");
        if let Some(reason) = &rendered.degraded {
            build_log = format!("Deployment successful (render degraded to fallback: {})", reason);
            tracing::warn!(deployment_id = %deployment.id, "Render degraded: {}", reason);
        }

        let advanced = self
            .store
            .try_transition(
                deployment.id,
                &[DeploymentStatus::Building],
                DeploymentStatus::Deploying,
            )
            .await?;
        if !advanced {
            return Ok(None);
        }

        let meta = PublishMeta {
            deployment_id: deployment.id,
            slug: deployment.slug.clone(),
            custom_domain: deployment.custom_domain.clone(),
        };
        let public_url = tokio::time::timeout(
            self.publish_timeout,
            self.publisher.publish(&rendered.html, &meta),
        )
        .await
        .map_err(|_| {
            PublishError(format!(
                "publish timed out after {}s",
                self.publish_timeout.as_secs()
            ))
        })??;

        Ok(Some(BuildOutcome {
            public_url,
            build_log,
            deployed_at: Utc::now(),
        }))
    }

    async fn render_document(
        &self,
        template: &Template,
        deployment: &Deployment,
    ) -> Result<crate::services::renderer::Rendered, DeployError> {
        let mut ctx = self.profiles.get_context(&deployment.user_id).await?;
        context::merge_deployment(&mut ctx, deployment);
        let customizations = Customizations {
            custom_css: deployment.custom_css.as_deref(),
            custom_js: deployment.custom_js.as_deref(),
            analytics_id: deployment.analytics_id.as_deref(),
        };
        Ok(self
            .renderer
            .render(&template.html_content, &ctx, &customizations))
    }

    /// Apply the non-null fields of `form` and re-enter the pipeline.
    /// Rebuilds always re-render from the template and the current profile.
    #[tracing::instrument(name = "Update deployment.", skip(self, form))]
    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        form: DeploymentUpdateForm,
    ) -> Result<Deployment, DeployError> {
        form.validate()
            .map_err(|err| DeployError::Validation(err.to_string()))?;

        let mut deployment = self.fetch_owned(user, id).await?;

        let entered = self
            .store
            .try_transition(
                id,
                &[
                    DeploymentStatus::Deployed,
                    DeploymentStatus::Failed,
                    DeploymentStatus::Pending,
                ],
                DeploymentStatus::Updating,
            )
            .await?;
        if !entered {
            return Err(DeployError::BuildInProgress);
        }

        let patch: ContentPatch = form.into();
        patch.apply(&mut deployment);
        deployment.status = DeploymentStatus::Updating;
        self.store.update_content(&deployment).await?;

        self.activity.record(
            Some(&user.id),
            ActivityKind::PortfolioUpdate,
            "Updated portfolio deployment",
            "deployment",
            &id.to_string(),
        );

        self.schedule_build(id);
        Ok(deployment)
    }

    /// Soft delete. Idempotent: disabling an already disabled record is a
    /// success no-op.
    #[tracing::instrument(name = "Delete deployment.", skip(self))]
    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), DeployError> {
        let deployment = self.fetch_owned_any(user, id).await?;
        if !deployment.is_active {
            return Ok(());
        }

        self.store.disable(id).await?;
        self.activity.record(
            Some(&user.id),
            ActivityKind::PortfolioDelete,
            "Deleted portfolio deployment",
            "deployment",
            &id.to_string(),
        );
        Ok(())
    }

    pub async fn list_active(&self, user: &User) -> Result<Vec<Deployment>, DeployError> {
        Ok(self.store.fetch_active_by_owner(&user.id).await?)
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Deployment, DeployError> {
        self.fetch_owned_any(user, id).await
    }

    /// Resolve a public request by slug or custom domain and render the
    /// live document. Counts the view as a side effect, best-effort.
    #[tracing::instrument(name = "Resolve public portfolio.", skip(self, password))]
    pub async fn resolve_public(
        &self,
        host: &str,
        password: Option<&str>,
    ) -> Result<String, DeployError> {
        // A failed rebuild must not take a previously working site down, so
        // a record at `failed` that has deployed before keeps serving.
        let deployment = self
            .store
            .fetch_by_host(host)
            .await?
            .filter(|d| {
                d.is_active
                    && d.is_public
                    && (d.status == DeploymentStatus::Deployed || d.public_url.is_some())
            })
            .ok_or(DeployError::NotFoundOrForbidden)?;

        if deployment.password_protected
            && password != deployment.password.as_deref()
        {
            return Err(DeployError::Validation("password required".to_string()));
        }

        let template = self
            .templates
            .get_active(deployment.template_id)
            .await?
            .ok_or(DeployError::TemplateNotFound)?;
        let rendered = self.render_document(&template, &deployment).await?;

        let deployer = self.clone();
        let id = deployment.id;
        tokio::spawn(async move { deployer.record_view(id).await });

        Ok(rendered.html)
    }

    /// Best-effort view counting; failures are logged and swallowed so the
    /// public render path can never be taken down by the counter.
    pub async fn record_view(&self, id: Uuid) {
        if let Err(err) = self.store.bump_view(id).await {
            tracing::warn!(deployment_id = %id, "View count update failed: {}", err);
        }
    }

    /// Owner-scoped fetch over active records only.
    async fn fetch_owned(&self, user: &User, id: Uuid) -> Result<Deployment, DeployError> {
        let deployment = self.fetch_owned_any(user, id).await?;
        if !deployment.is_active {
            return Err(DeployError::NotFoundOrForbidden);
        }
        Ok(deployment)
    }

    /// Owner-scoped fetch that still returns disabled records (delete is
    /// idempotent and needs to see them).
    async fn fetch_owned_any(&self, user: &User, id: Uuid) -> Result<Deployment, DeployError> {
        self.store
            .fetch(id)
            .await?
            .filter(|d| d.user_id == user.id)
            .ok_or(DeployError::NotFoundOrForbidden)
    }
}
