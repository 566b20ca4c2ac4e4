//! JWT Extractors
//!
//! Custom extractors for automatically validating JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// JWT Auth Extractor
///
/// Use this extractor in protected handlers to automatically validate JWT
/// and extract CurrentUser
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => {
                JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
            }
            None => {
                security_log!(WARN, "auth_missing", uri = ?parts.uri);
                return Err(AppError::Unauthorized);
            }
        };

        // Validate token
        let jwt_service = state.get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::from(claims);

                // Store in extensions for potential reuse
                parts.extensions.insert(user.clone());

                Ok(user)
            }
            Err(e) => {
                security_log!(WARN, "auth_failed", error = %e, uri = ?parts.uri);

                match e {
                    crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                    _ => Err(AppError::InvalidToken),
                }
            }
        }
    }
}

/// Optional auth extractor for guest-capable routes
///
/// 心愿单等路由允许游客访问：有合法令牌时返回 Some(user)，
/// 无令牌时返回 None (游客身份由 X-Guest-ID 头解析)。
/// 携带非法令牌仍然报错，避免静默降级为游客。
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(MaybeUser(Some(user.clone())));
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header {
            None => Ok(MaybeUser(None)),
            Some(header) => {
                let token =
                    JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?;
                let claims = state
                    .get_jwt_service()
                    .validate_token(token)
                    .map_err(|e| match e {
                        crate::auth::JwtError::ExpiredToken => AppError::TokenExpired,
                        _ => AppError::InvalidToken,
                    })?;
                let user = CurrentUser::from(claims);
                parts.extensions.insert(user.clone());
                Ok(MaybeUser(Some(user)))
            }
        }
    }
}
