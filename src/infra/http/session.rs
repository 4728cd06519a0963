//! Resolves the caller identity from the session cookie or a bearer token.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use tracing::debug;

use crate::application::auth::{CallerContext, SessionTokens};

pub const SESSION_COOKIE: &str = "postdesk_session";

/// Extractor wrapping the [`CallerContext`] for the current request.
///
/// Never rejects: a missing or forged token simply yields an anonymous caller,
/// and the admin gate decides what that caller may do.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
    Arc<SessionTokens>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<SessionTokens>::from_ref(state);
        Ok(Caller(resolve_caller(&parts.headers, &tokens)))
    }
}

pub(crate) fn resolve_caller(headers: &HeaderMap, tokens: &SessionTokens) -> CallerContext {
    let Some(token) = presented_token(headers) else {
        return CallerContext::anonymous();
    };

    match tokens.verify(&token) {
        Some(email) => CallerContext::signed_in(email),
        None => {
            debug!(
                target = "postdesk::http::session",
                "ignoring session token with a bad signature"
            );
            CallerContext::anonymous()
        }
    }
}

fn presented_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}
