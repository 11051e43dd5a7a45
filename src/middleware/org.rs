// src/middleware/org.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::common::error::ApiError;

pub const ORG_ID_HEADER: &str = "x-org-id";

/// Org em que a requisição atua, lido do cabeçalho `x-org-id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext(pub String);

impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ORG_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| OrgContext(value.to_string()))
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "INVALID_INPUT",
                    "Invalid input",
                    "orgId is required",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<OrgContext, ApiError> {
        let (mut parts, _) = request.into_parts();
        OrgContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_the_org_header() {
        let request = Request::builder().header(ORG_ID_HEADER, "ORG-0").body(()).unwrap();
        assert_eq!(extract(request).await.unwrap(), OrgContext("ORG-0".into()));
    }

    #[tokio::test]
    async fn missing_or_blank_header_is_a_bad_request() {
        let missing = extract(Request::builder().body(()).unwrap()).await.unwrap_err();
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.message, "orgId is required");

        let blank = Request::builder().header(ORG_ID_HEADER, "  ").body(()).unwrap();
        assert_eq!(extract(blank).await.unwrap_err().status, StatusCode::BAD_REQUEST);
    }
}
