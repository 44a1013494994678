//! Session gate for protected routes

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::InvalidHeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{TypedHeader, headers::Cookie};
use tracing::error;
use uuid::Uuid;

use crate::{config::AppConfig, models::Session, state::AppState, views};

/// Outcome of the session gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The session is bound to this user
    Admit(Uuid),
    /// No bound session; the caller must redirect to the login page
    Deny,
}

/// Decide whether a request carrying `session` may reach a protected route
pub fn authorize(session: Option<&Session>) -> GateDecision {
    match session {
        Some(session) if !session.user_id.is_nil() => GateDecision::Admit(session.user_id),
        _ => GateDecision::Deny,
    }
}

/// User admitted by the gate, available to handlers as a request extension
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

/// Read the session identifier from the request cookies
pub fn session_id(cookies: Option<&Cookie>, cookie_name: &str) -> Option<String> {
    cookies
        .and_then(|c| c.get(cookie_name))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value handing a session to the client
pub fn session_cookie(
    config: &AppConfig,
    session_id: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure_flag = if config.secure_cookies { " Secure;" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly;{} SameSite=Lax; Path=/; Max-Age={}",
        config.session_cookie, session_id, secure_flag, config.session_ttl_seconds
    ))
}

/// `Set-Cookie` value removing the session cookie
pub fn clear_session_cookie(config: &AppConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let secure_flag = if config.secure_cookies { " Secure;" } else { "" };
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
        config.session_cookie, secure_flag
    ))
}

/// Admit requests with a live session, redirect everything else to `/login`
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Option<TypedHeader<Cookie>>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = match session_id(cookies.as_deref(), &state.config.session_cookie) {
        Some(id) => match state.auth.current_session(&id).await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                return views::page_response(
                    status,
                    state.views.error_page(status, "Internal server error"),
                );
            }
        },
        None => None,
    };

    match authorize(session.as_ref()) {
        GateDecision::Admit(user_id) => {
            req.extensions_mut().insert(CurrentUser { user_id });
            next.run(req).await
        }
        GateDecision::Deny => Redirect::to("/login").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use axum_extra::headers::HeaderMapExt;

    #[test]
    fn test_authorize() {
        let session = Session::new(Uuid::new_v4());
        assert_eq!(
            authorize(Some(&session)),
            GateDecision::Admit(session.user_id)
        );
        assert_eq!(authorize(None), GateDecision::Deny);

        let unbound = Session::new(Uuid::nil());
        assert_eq!(authorize(Some(&unbound)), GateDecision::Deny);
    }

    #[test]
    fn test_session_id_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; inventory_sid=abc123"),
        );
        let cookies: Option<Cookie> = headers.typed_get();

        assert_eq!(
            session_id(cookies.as_ref(), "inventory_sid").as_deref(),
            Some("abc123")
        );
        assert_eq!(session_id(cookies.as_ref(), "other"), None);
        assert_eq!(session_id(None, "inventory_sid"), None);
    }

    #[test]
    fn test_cookie_values() {
        let config = AppConfig {
            secure_cookies: true,
            session_ttl_seconds: 60,
            ..Default::default()
        };

        let set = session_cookie(&config, "abc").unwrap();
        assert_eq!(
            set.to_str().unwrap(),
            "inventory_sid=abc; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=60"
        );

        let clear = clear_session_cookie(&AppConfig::default()).unwrap();
        assert_eq!(
            clear.to_str().unwrap(),
            "inventory_sid=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"
        );
    }
}
