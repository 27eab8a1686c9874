use crate::configuration::Settings;
use crate::middleware::authentication::{fetch_user, get_header};
use actix_web::dev::ServiceRequest;
use actix_web::{web, HttpMessage};
use std::sync::Arc;

#[tracing::instrument(name = "Authenticate. Authorization header", skip(req))]
pub async fn try_bearer(req: &mut ServiceRequest) -> Result<bool, String> {
    let authorization = match get_header::<String>(req, "authorization")? {
        Some(value) => value,
        None => return Ok(false),
    };

    let token = match authorization.strip_prefix("Bearer ") {
        Some(token) => token.trim().to_string(),
        None => return Ok(false),
    };

    let settings = req
        .app_data::<web::Data<Settings>>()
        .ok_or_else(|| "app settings are not configured".to_string())?;

    let user = fetch_user(settings.auth_url.as_str(), &token).await?;
    if req.extensions_mut().insert(Arc::new(user)).is_some() {
        return Err("user already logged".to_string());
    }

    Ok(true)
}
