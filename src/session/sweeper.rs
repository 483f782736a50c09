use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::SessionRepository;
use crate::actions::PruneExpiredSessionsAction;

/// Spawns a task that deletes expired sessions every `every`.
///
/// The first sweep runs immediately. Failures are logged and the loop keeps
/// going. Abort the returned handle to stop it.
pub fn spawn_session_sweeper<S>(repository: S, every: Duration) -> JoinHandle<()>
where
    S: SessionRepository + 'static,
{
    tokio::spawn(async move {
        let action = PruneExpiredSessionsAction::new(repository);
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = action.execute().await {
                log::error!(target: "forum_auth", "msg=\"session sweep failed\", error=\"{e}\"");
            }
        }
    })
}
