mod cookie;
mod error;
mod form;
mod handlers;
mod middleware;
mod routes;

pub use cookie::{attach_session_cookie, clear_session_cookie, extract_session_id};
pub use error::AppError;
pub use form::FormFields;
pub use middleware::{AuthenticatedSession, track_activity};
pub use routes::{AppState, forum_app, forum_routes};
