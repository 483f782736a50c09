//! HTTP handlers for the forum auth endpoints.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::cookie::{attach_session_cookie, clear_session_cookie, extract_session_id};
use super::error::AppError;
use super::form::FormFields;
use super::middleware::AuthenticatedSession;
use super::routes::AppState;
use crate::UserRepository;
use crate::actions::{LoginAction, SignupAction};
use crate::api::{
    AuthStatusResponse, LoginRequest, LoginResponse, MessageResponse, SignupRequest, UserResponse,
};
use crate::crypto::PasswordHasher;
use crate::session::SessionRepository;

/// Register a new user.
///
/// POST /signup
pub async fn signup<U, S, H>(
    State(state): State<AppState<U, S, H>>,
    FormFields(body): FormFields<SignupRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    let action = SignupAction::new(state.user_repo, state.hasher);
    let user = action.execute(&body.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Verify credentials and start a session.
///
/// POST /login
pub async fn login<U, S, H>(
    State(state): State<AppState<U, S, H>>,
    FormFields(body): FormFields<LoginRequest>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    let identifier = body.identifier()?;

    let action = LoginAction::new(state.user_repo, state.sessions, state.hasher);
    let (user, session) = action.execute(&identifier, &body.password).await?;

    let mut headers = HeaderMap::new();
    attach_session_cookie(&mut headers, &session.id, &state.config)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            user_id: user.id,
            nickname: user.nickname,
        }),
    ))
}

/// Report whether the request carries a valid session.
///
/// GET /api/check-auth
pub async fn check_auth<U, S, H>(
    State(_state): State<AppState<U, S, H>>,
    session: Option<AuthenticatedSession>,
) -> impl IntoResponse
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    match session {
        Some(AuthenticatedSession(session)) => (
            StatusCode::OK,
            Json(AuthStatusResponse {
                authenticated: true,
                user_id: Some(session.user_id),
                nickname: Some(session.nickname),
            }),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(AuthStatusResponse::anonymous())),
    }
}

/// Revoke the session named by the cookie, if any, and clear the cookie.
///
/// POST /api/logout
pub async fn logout<U, S, H>(
    State(state): State<AppState<U, S, H>>,
    request_headers: HeaderMap,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    if let Some(session_id) = extract_session_id(&request_headers) {
        state.sessions.revoke(&session_id).await?;
    }

    let mut headers = HeaderMap::new();
    clear_session_cookie(&mut headers, &state.config)?;

    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponse {
            message: "Logged out".to_owned(),
        }),
    ))
}

/// Nicknames active within the presence window.
///
/// GET /api/online-users
pub async fn online_users<U, S, H>(
    State(state): State<AppState<U, S, H>>,
) -> Result<Json<Vec<String>>, AppError>
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    let online = state.presence().online_users().await?;
    Ok(Json(online))
}
