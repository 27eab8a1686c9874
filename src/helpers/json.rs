use actix_web::error::{
    ErrorBadRequest, ErrorConflict, ErrorInternalServerError, ErrorNotFound,
    ErrorUnauthorized, ErrorUnprocessableEntity,
};
use actix_web::{web, Error};
use serde_derive::Serialize;

/// Uniform JSON envelope for every API endpoint. Success goes out through
/// `ok`, failures are converted into actix errors carrying the same shape.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) code: u32,
    pub(crate) id: Option<String>,
    pub(crate) item: Option<T>,
    pub(crate) list: Option<Vec<T>>,
}

#[derive(Default)]
pub struct JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    id: Option<String>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            id: None,
            item: None,
            list: None,
        }
    }

    pub fn internal_server_error(msg: impl ToString) -> Error {
        Self::build().internal_server_error(msg)
    }

    pub fn bad_request(msg: impl ToString) -> Error {
        Self::build().bad_request(msg)
    }

    pub fn unauthorized(msg: impl ToString) -> Error {
        Self::build().unauthorized(msg)
    }

    pub fn not_found(msg: impl ToString) -> Error {
        Self::build().not_found(msg)
    }

    pub fn conflict(msg: impl ToString) -> Error {
        Self::build().conflict(msg)
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn into_response(self, status: &str, msg: impl ToString, code: u32) -> JsonResponse<T> {
        let msg = msg.to_string();
        let message = if msg.trim().is_empty() {
            status.to_string()
        } else {
            msg
        };
        JsonResponse {
            status: status.to_string(),
            message,
            code,
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    fn error_payload(self, status: &str, msg: impl ToString, code: u32) -> String {
        let response = self.into_response(status, msg, code);
        serde_json::to_string(&response)
            .unwrap_or_else(|_| format!(r#"{{"status":"Error","code":{}}}"#, code))
    }

    pub fn ok(self, msg: impl ToString) -> web::Json<JsonResponse<T>> {
        web::Json(self.into_response("OK", msg, 200))
    }

    pub fn bad_request(self, msg: impl ToString) -> Error {
        ErrorBadRequest(self.error_payload("Error", msg, 400))
    }

    pub fn form_error(self, msg: impl ToString) -> Error {
        ErrorUnprocessableEntity(self.error_payload("Error", msg, 422))
    }

    pub fn unauthorized(self, msg: impl ToString) -> Error {
        ErrorUnauthorized(self.error_payload("Error", msg, 401))
    }

    pub fn not_found(self, msg: impl ToString) -> Error {
        ErrorNotFound(self.error_payload("Error", msg, 404))
    }

    pub fn conflict(self, msg: impl ToString) -> Error {
        ErrorConflict(self.error_payload("Error", msg, 409))
    }

    pub fn internal_server_error(self, msg: impl ToString) -> Error {
        ErrorInternalServerError(self.error_payload("Error", msg, 500))
    }
}
