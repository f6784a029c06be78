use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::AppError;

// header lookups are case-insensitive
const OPEN_ID_HEADER: &str = "openid";

#[derive(Deserialize)]
struct OpenIdQuery {
    #[serde(rename = "openId")]
    open_id: Option<String>,
}

/// The caller's openid, from the `openId` header or else the `openId` query parameter.
#[derive(Debug, Clone)]
pub struct OpenId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for OpenId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(OPEN_ID_HEADER)
            .map(|value| value.to_str().map(str::to_owned))
            .transpose()
            .map_err(|_| AppError::bad_request("openId header is not valid text"))?;

        let open_id = match header {
            Some(open_id) => Some(open_id),
            None => Query::<OpenIdQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(query)| query.open_id),
        };

        match open_id.map(|id| id.trim().to_owned()) {
            Some(open_id) if !open_id.is_empty() => Ok(OpenId(open_id)),
            _ => Err(AppError::bad_request("openId is required")),
        }
    }
}
