use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use registry::AppRegistry;
use shared::error::AppError;

/// Marker extractor for admin routes. Accepts requests whose
/// `Authorization: Bearer <token>` header carries the configured admin
/// token; everything else is rejected with 401.
pub struct AdminUser;

#[async_trait]
impl FromRequestParts<AppRegistry> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::UnauthenticatedError)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::UnauthenticatedError)?;
        if token != registry.admin_token() {
            return Err(AppError::UnauthenticatedError);
        }
        Ok(Self)
    }
}
