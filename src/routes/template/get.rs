use crate::db;
use crate::helpers::JsonResponse;
use crate::models;
use actix_web::{get, web, web::Data, Responder, Result};
use sqlx::PgPool;

/// Template listing is anonymous; the gallery is shown before login.
#[tracing::instrument(name = "List templates.", skip(pg_pool))]
#[get("")]
pub async fn list(pg_pool: Data<PgPool>) -> Result<impl Responder> {
    db::template::fetch_all_active(pg_pool.get_ref())
        .await
        .map(|templates| JsonResponse::build().set_list(templates).ok("OK"))
        .map_err(|_| JsonResponse::<models::Template>::internal_server_error("Internal Server Error"))
}

#[tracing::instrument(name = "Get template.", skip(pg_pool))]
#[get("/{id}")]
pub async fn item(path: web::Path<(i32,)>, pg_pool: Data<PgPool>) -> Result<impl Responder> {
    let id = path.into_inner().0;
    db::template::fetch_active(pg_pool.get_ref(), id)
        .await
        .map_err(|_| JsonResponse::<models::Template>::internal_server_error("Internal Server Error"))
        .and_then(|template| match template {
            Some(template) => Ok(JsonResponse::build().set_item(template).ok("OK")),
            None => Err(JsonResponse::<models::Template>::not_found("Template not found")),
        })
}
