use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::cookie::extract_session_id;
use super::error::AppError;
use super::routes::AppState;
use crate::crypto::PasswordHasher;
use crate::session::{Session, SessionRepository};
use crate::{AuthError, UserRepository};

/// A valid, unexpired session resolved from the request's session cookie.
///
/// As a plain extractor it rejects with 401 when the cookie is missing or the
/// session is unknown or expired. As `Option<AuthenticatedSession>` it yields
/// `None` in those cases instead.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

impl AuthenticatedSession {
    pub fn nickname(&self) -> &str {
        &self.0.nickname
    }
}

async fn resolve<U, S, H>(
    parts: &Parts,
    state: &AppState<U, S, H>,
) -> Result<Option<AuthenticatedSession>, AppError>
where
    S: SessionRepository + Clone,
{
    let Some(session_id) = extract_session_id(&parts.headers) else {
        return Ok(None);
    };

    let session = state.sessions.validate(&session_id).await?;
    Ok(session.map(AuthenticatedSession))
}

impl<U, S, H> FromRequestParts<AppState<U, S, H>> for AuthenticatedSession
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, S, H>,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .ok_or(AppError(AuthError::Unauthorized))
    }
}

impl<U, S, H> OptionalFromRequestParts<AppState<U, S, H>> for AuthenticatedSession
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, S, H>,
    ) -> Result<Option<Self>, Self::Rejection> {
        resolve(parts, state).await
    }
}

/// Records activity for the request's session before the handler runs.
///
/// This is the only place HTTP traffic reaches
/// [`SessionManager::touch`](crate::SessionManager::touch), and therefore what
/// keeps [`PresenceTracker`](crate::PresenceTracker) accurate. Requests
/// without a session cookie pass through untouched. A failed touch is logged
/// and does not fail the request.
pub async fn track_activity<U, S, H>(
    State(state): State<AppState<U, S, H>>,
    request: Request,
    next: Next,
) -> Response
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    if let Some(session_id) = extract_session_id(request.headers()) {
        if let Err(e) = state.sessions.touch(&session_id).await {
            log::warn!(target: "forum_auth", "msg=\"activity not recorded\", error=\"{e}\"");
        }
    }

    next.run(request).await
}
