use crate::forms;
use crate::helpers::JsonResponse;
use crate::models;
use crate::routes::error_response;
use crate::services::Deployer;
use actix_web::{
    post, web,
    web::{Bytes, Data},
    Error, Responder, Result,
};
use serde_valid::Validate;
use std::str;
use std::sync::Arc;

#[tracing::instrument(name = "Deploy portfolio.", skip(deployer))]
#[post("/{template_id}")]
pub async fn item(
    path: web::Path<(i32,)>,
    body: Bytes,
    user: web::ReqData<Arc<models::User>>,
    deployer: Data<Deployer>,
) -> Result<impl Responder> {
    let template_id = path.into_inner().0;
    let form = body_into_form(body).await?;

    deployer
        .create(&user, template_id, form)
        .await
        .map(|deployment| {
            JsonResponse::build()
                .set_id(deployment.id)
                .set_item(deployment)
                .ok("Deployment started")
        })
        .map_err(error_response)
}

async fn body_into_form(body: Bytes) -> Result<forms::DeploymentForm, Error> {
    let body_str = str::from_utf8(&body)
        .map_err(|err| JsonResponse::<forms::DeploymentForm>::internal_server_error(err))?;
    let deserializer = &mut serde_json::Deserializer::from_str(body_str);
    serde_path_to_error::deserialize(deserializer)
        .map_err(|err| {
            let msg = format!("{}:{:?}", err.path(), err);
            JsonResponse::<forms::DeploymentForm>::bad_request(msg)
        })
        .and_then(|form: forms::DeploymentForm| {
            if let Err(errors) = form.validate() {
                let err_msg = format!("Invalid data received {:?}", errors.to_string());
                tracing::debug!(err_msg);
                return Err(JsonResponse::<models::Deployment>::build()
                    .form_error(errors.to_string()));
            }
            Ok(form)
        })
}
