//! Request-side auth plumbing: the session cookie, the admin API extractor
//! and the navigation gate in front of the admin pages.

use crate::{
    errors::AppError,
    models::admin::Claims,
    services::auth_service::{AuthService, TOKEN_TTL_SECS},
};
use axum::{
    extract::{ConnectInfo, FromRef, FromRequestParts, OriginalUri, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::{convert::Infallible, net::SocketAddr};
use tracing::debug;

pub const AUTH_COOKIE: &str = "auth-token";

pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Pages reachable without a session.
const PUBLIC_ADMIN_PAGES: [&str; 2] = ["login", "migrate"];

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        AUTH_COOKIE, token, TOKEN_TTL_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", AUTH_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// The session token from the cookie, or from an `Authorization: Bearer` header.
pub fn request_token(headers: &HeaderMap) -> Option<&str> {
    cookie_value(headers, AUTH_COOKIE).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Claims of the authenticated administrator. Extracting it rejects the
/// request with a JSON 401 when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AdminClaims(pub Claims);

impl<S> FromRequestParts<S> for AdminClaims
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthService::from_ref(state);
        let claims = auth.authenticate(request_token(&parts.headers))?;
        Ok(AdminClaims(claims))
    }
}

/// Redirect unauthenticated navigations under `/admin` to the login page.
pub async fn admin_page_gate(
    State(auth): State<AuthService>,
    request: Request,
    next: Next,
) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if is_public_admin_page(&path) || auth.authenticate(request_token(request.headers())).is_ok() {
        return next.run(request).await;
    }

    debug!(%path, "redirecting unauthenticated admin navigation");
    Redirect::to(ADMIN_LOGIN_PATH).into_response()
}

/// `/admin/login`, `/admin/login.html`, `/admin/login/` and
/// `/admin/login/index.html` all count as the login page.
fn is_public_admin_page(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("/admin/") else {
        return false;
    };
    let page = rest.trim_end_matches('/');
    let page = page
        .strip_suffix("/index.html")
        .or_else(|| page.strip_suffix(".html"))
        .unwrap_or(page);
    PUBLIC_ADMIN_PAGES.contains(&page)
}

/// Client address: the first `X-Forwarded-For` entry, else the socket peer,
/// else `unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientIp(ip))
    }
}
