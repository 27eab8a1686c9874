use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::error_response;
use crate::services::Deployer;
use actix_web::{get, web, web::Data, Responder, Result};
use std::sync::Arc;
use uuid::Uuid;

#[tracing::instrument(name = "List deployments.", skip(deployer))]
#[get("")]
pub async fn list(
    user: web::ReqData<Arc<models::User>>,
    deployer: Data<Deployer>,
) -> Result<impl Responder> {
    deployer
        .list_active(&user)
        .await
        .map(|deployments| JsonResponse::build().set_list(deployments).ok("OK"))
        .map_err(error_response)
}

#[tracing::instrument(name = "Get deployment.", skip(deployer))]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(Uuid,)>,
    user: web::ReqData<Arc<models::User>>,
    deployer: Data<Deployer>,
) -> Result<impl Responder> {
    let id = path.into_inner().0;
    deployer
        .get(&user, id)
        .await
        .map(|deployment| JsonResponse::build().set_item(deployment).ok("OK"))
        .map_err(error_response)
}
