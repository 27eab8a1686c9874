mod getheader;
mod manager;
mod manager_middleware;
pub mod method;

pub use getheader::get_header;
pub use manager::*;
pub use manager_middleware::*;

use crate::forms;
use crate::models;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

/// Resolve a bearer token against the auth service and map the payload into
/// our own user model.
pub async fn fetch_user(auth_url: &str, token: &str) -> Result<models::User, String> {
    let client = reqwest::Client::new();
    let resp = client
        .get(auth_url)
        .bearer_auth(token)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|_err| "no resp from auth server".to_string())?;

    if !resp.status().is_success() {
        return Err("401 Unauthorized".to_string());
    }

    resp.json::<forms::UserForm>()
        .await
        .map_err(|_err| "can't parse the response body".to_string())?
        .try_into()
}
