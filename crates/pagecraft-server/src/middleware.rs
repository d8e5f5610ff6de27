//! Request middleware and extractors.
//!
//! [`session_middleware`] gates owner routes: it resolves the session token
//! from `Authorization: Bearer` or the `pagecraft_session` cookie and injects
//! the resulting [`OwnerId`] into request extensions. [`ClientIp`] recovers the
//! visitor address for analytics hashing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use pagecraft_core::OwnerId;

use crate::error::AppError;
use crate::sessions::SESSION_COOKIE;
use crate::state::AppState;

/// Pull the session token from the request, header first.
fn session_token(req: &Request, jar: &CookieJar) -> Result<Option<String>, AppError> {
    if let Some(header) = req.headers().get(axum::http::header::AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid Authorization header".to_owned()))?;
        let token = value.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Authorization header must use Bearer scheme".to_owned())
        })?;
        return Ok(Some(token.trim().to_owned()));
    }
    Ok(jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()))
}

/// Axum middleware that authenticates owner requests.
///
/// Injects [`OwnerId`] into request extensions on success.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] if no token is present or the token is
/// unknown.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(&req, &jar)? else {
        return Err(AppError::Unauthorized(
            "missing session: send Authorization: Bearer <token> or the pagecraft_session cookie"
                .to_owned(),
        ));
    };

    let owner: OwnerId = state.sessions.authenticate(&token).ok_or_else(|| {
        tracing::debug!("rejected unknown session token");
        AppError::Unauthorized("invalid or expired session".to_owned())
    })?;

    req.extensions_mut().insert(owner);
    Ok(next.run(req).await)
}

/// The visitor's address as reported by a proxy or the TCP connection.
///
/// Checks `X-Forwarded-For` (first hop), then `X-Real-IP`, then the socket
/// peer address. `None` when none is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded.or_else(|| header("x-real-ip")) {
            return Ok(Self(Some(ip.to_owned())));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        Ok(Self(peer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn client_ip(req: HttpRequest<()>) -> Option<String> {
        let (mut parts, ()) = req.into_parts();
        ClientIp::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn forwarded_for_first_hop() {
        let req = HttpRequest::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("x-real-ip", "10.0.0.2")
            .body(())
            .unwrap();
        assert_eq!(client_ip(req).await.as_deref(), Some("203.0.113.9"));
    }

    #[tokio::test]
    async fn real_ip_fallback() {
        let req = HttpRequest::builder()
            .header("x-real-ip", "198.51.100.3")
            .body(())
            .unwrap();
        assert_eq!(client_ip(req).await.as_deref(), Some("198.51.100.3"));
    }

    #[tokio::test]
    async fn connect_info_fallback() {
        let mut req = HttpRequest::builder().body(()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4321))));
        assert_eq!(client_ip(req).await.as_deref(), Some("192.0.2.1"));
    }

    #[tokio::test]
    async fn nothing_known() {
        let req = HttpRequest::builder().body(()).unwrap();
        assert_eq!(client_ip(req).await, None);
    }
}
