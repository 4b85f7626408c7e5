//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{AppState, routes::analytics::ApiError};
use salesdesk_shared::{AppError, Claims, JwtError, Role, types::CompanyId};

/// Cookie consulted when no Authorization header is sent.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Finds the access token in the Authorization header, then in the cookie.
fn find_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the token from the Authorization header or the access cookie
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = find_token(request.headers()) else {
        return unauthorized("Authorization header with Bearer token is required").into_response();
    };

    match state.jwt_service.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("Token has expired").into_response(),
        Err(_) => unauthorized("Invalid or malformed token").into_response(),
    }
}

fn unauthorized(message: &str) -> ApiError {
    ApiError(AppError::Unauthorized(message.to_string()))
}

/// Extractor for authenticated user claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the company the token is scoped to.
    #[must_use]
    pub const fn company_id(&self) -> Uuid {
        self.0.company_id()
    }

    /// Returns the user's role, if it is one we know.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.0.role()
    }

    /// Returns the inner claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.0
    }

    /// Checks that this user may read the sales analytics of `company_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for another company's data or for a role
    /// without analytics access.
    pub fn require_sales_access(&self, company_id: Uuid) -> Result<CompanyId, AppError> {
        if self.company_id() != company_id {
            return Err(AppError::Forbidden(
                "You do not have access to this company".to_string(),
            ));
        }

        match self.role() {
            Some(role) if role.can_view_sales_analytics() => Ok(CompanyId::from_uuid(company_id)),
            _ => Err(AppError::Forbidden(format!(
                "Role '{}' cannot view sales analytics",
                self.0.role
            ))),
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| unauthorized("Authentication required"))
    }
}
