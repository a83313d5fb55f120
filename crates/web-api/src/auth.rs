//! 请求身份提取
//!
//! 会话认证由外部网关负责，这里只信任它注入的 `x-user-id` 头。

use axum::{extract::FromRequestParts, http::request::Parts};
use domain::UserId;
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// 当前请求的已认证用户
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing x-user-id header"))?;

        let id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::unauthorized("invalid x-user-id header"))?;

        Ok(Self(UserId::from(id)))
    }
}
