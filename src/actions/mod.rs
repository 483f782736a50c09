mod login;
mod prune_expired;
mod signup;
mod verify_credentials;

pub use login::LoginAction;
pub use prune_expired::PruneExpiredSessionsAction;
pub use signup::SignupAction;
pub use verify_credentials::VerifyCredentialsAction;
