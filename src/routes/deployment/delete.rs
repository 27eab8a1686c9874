use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::error_response;
use crate::services::Deployer;
use actix_web::{delete, web, web::Data, Responder, Result};
use std::sync::Arc;
use uuid::Uuid;

#[tracing::instrument(name = "Delete deployment.", skip(deployer))]
#[delete("/{id}")]
pub async fn item(
    path: web::Path<(Uuid,)>,
    user: web::ReqData<Arc<models::User>>,
    deployer: Data<Deployer>,
) -> Result<impl Responder> {
    let id = path.into_inner().0;
    deployer
        .delete(&user, id)
        .await
        .map(|()| JsonResponse::<models::Deployment>::build().set_id(id).ok("Deleted"))
        .map_err(error_response)
}
