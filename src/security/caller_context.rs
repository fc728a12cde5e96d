use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::header::AUTHORIZATION;
use http::request::Parts;
use http::HeaderMap;

const BEARER_PREFIX: &str = "Bearer ";

/// What the inbound request being served tells us about its caller.
///
/// Handlers pass it to [`ServiceClient::client_with_bearer_token`] so the
/// caller's own bearer token is forwarded downstream. Background work that is
/// not serving a request passes `None` and gets the system token instead.
///
/// [`ServiceClient::client_with_bearer_token`]: crate::security::ServiceClient::client_with_bearer_token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    authorization: Option<String>,
}

impl CallerContext {
    pub fn new(authorization: Option<String>) -> Self {
        Self { authorization }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Self { authorization }
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Token of an `Authorization: Bearer <token>` header, taken verbatim.
    pub fn bearer_token(&self) -> Option<&str> {
        let authorization = self.authorization.as_deref()?;
        let scheme = authorization.get(..BEARER_PREFIX.len())?;
        if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
            return None;
        }
        Some(&authorization[BEARER_PREFIX.len()..]).filter(|token| !token.is_empty())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bearer_token_is_taken_verbatim() {
        let ctx = CallerContext::new(Some("Bearer eyJ.payload.sig".into()));
        assert_eq!(ctx.bearer_token(), Some("eyJ.payload.sig"));

        let ctx = CallerContext::new(Some("bearer abc".into()));
        assert_eq!(ctx.bearer_token(), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(CallerContext::new(Some("Basic aWFtOnNlY3JldA==".into())).bearer_token(), None);
        assert_eq!(CallerContext::new(Some("Bearer ".into())).bearer_token(), None);
        assert_eq!(CallerContext::new(Some("Bear".into())).bearer_token(), None);
        assert_eq!(CallerContext::default().bearer_token(), None);
    }

    #[test]
    fn context_from_headers_keeps_raw_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic Zm9vOmJhcg==".parse().unwrap());
        let ctx = CallerContext::from_headers(&headers);
        assert_eq!(ctx.authorization(), Some("Basic Zm9vOmJhcg=="));
        assert_eq!(ctx.bearer_token(), None);

        assert_eq!(CallerContext::from_headers(&HeaderMap::new()).authorization(), None);
    }
}
