use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use super::handlers;
use super::middleware::track_activity;
use crate::crypto::PasswordHasher;
use crate::session::{SessionConfig, SessionManager, SessionRepository};
use crate::{PresenceTracker, UserRepository};

#[derive(Clone)]
pub struct AppState<U, S, H> {
    pub user_repo: U,
    pub sessions: SessionManager<S>,
    pub hasher: H,
    pub config: SessionConfig,
}

impl<U, S, H> AppState<U, S, H>
where
    S: SessionRepository + Clone,
{
    pub fn new(user_repo: U, session_repo: S, hasher: H, config: SessionConfig) -> Self {
        Self {
            user_repo,
            sessions: SessionManager::new(session_repo, &config),
            hasher,
            config,
        }
    }

    pub fn presence(&self) -> PresenceTracker<S> {
        PresenceTracker::new(self.sessions.repository().clone(), self.config.presence_window)
    }
}

/// The forum's auth endpoints, without activity tracking or state.
///
/// Merge extra routes into this before handing it to [`forum_app`] or
/// layering [`track_activity`] yourself.
pub fn forum_routes<U, S, H>() -> Router<AppState<U, S, H>>
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    Router::new()
        .route("/signup", post(handlers::signup::<U, S, H>))
        .route("/login", post(handlers::login::<U, S, H>))
        .route("/api/check-auth", get(handlers::check_auth::<U, S, H>))
        .route("/api/logout", post(handlers::logout::<U, S, H>))
        .route("/api/online-users", get(handlers::online_users::<U, S, H>))
}

/// [`forum_routes`] with [`track_activity`] on every route and `state` bound.
pub fn forum_app<U, S, H>(state: AppState<U, S, H>) -> Router
where
    U: UserRepository + Clone + 'static,
    S: SessionRepository + Clone + 'static,
    H: PasswordHasher,
{
    forum_routes()
        .layer(from_fn_with_state(state.clone(), track_activity::<U, S, H>))
        .with_state(state)
}
