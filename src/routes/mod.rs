pub mod deployment;
pub mod health_check;
pub mod public;
pub mod template;

use crate::helpers::JsonResponse;
use crate::models;
use crate::services::DeployError;
use actix_web::Error;

/// Single mapping from deployer failures to the API envelope; every
/// deployment route funnels its errors through here.
pub(crate) fn error_response(err: DeployError) -> Error {
    type Response = JsonResponse<models::Deployment>;
    match err {
        DeployError::Validation(msg) => Response::bad_request(msg),
        DeployError::NotFoundOrForbidden => Response::not_found("Deployment not found"),
        DeployError::DuplicateDeployment => {
            Response::conflict("User already has an active deployment")
        }
        DeployError::DuplicateDomain => Response::conflict("Custom domain is already taken"),
        DeployError::TemplateNotFound => Response::not_found("Template not found"),
        DeployError::AllocationExhausted(_) => {
            Response::internal_server_error("Could not allocate a unique subdomain")
        }
        DeployError::BuildInProgress => Response::conflict("A build is already in progress"),
        DeployError::Publish(err) => Response::internal_server_error(err.to_string()),
        DeployError::Store(_) => Response::internal_server_error("Internal Server Error"),
    }
}
