use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::error_response;
use crate::services::{DeployError, Deployer};
use actix_web::{get, http::header::ContentType, web, web::Data, HttpResponse, Result};
use serde_derive::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PublicQuery {
    pub password: Option<String>,
}

/// Serves the live portfolio by slug or custom domain. Password-protected
/// sites expect the password as a query parameter and answer 401 without it.
#[tracing::instrument(name = "Serve public portfolio.", skip(deployer, query))]
#[get("/{slug}")]
pub async fn item(
    path: web::Path<(String,)>,
    query: web::Query<PublicQuery>,
    deployer: Data<Deployer>,
) -> Result<HttpResponse> {
    let slug = path.into_inner().0;
    deployer
        .resolve_public(&slug, query.password.as_deref())
        .await
        .map(|html| {
            HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(html)
        })
        .map_err(|err| match err {
            DeployError::Validation(msg) => {
                JsonResponse::<models::Deployment>::unauthorized(msg)
            }
            other => error_response(other),
        })
}
