//! Client-side cache of the rule list, plus the periodic refresh that keeps
//! a live view current. List failures are swallowed (logged, empty list) so
//! a flaky backend or an expired session never takes the surrounding view
//! down with it.

use std::sync::Arc;
use std::time::Duration;

use hivemon_common::rule::AlertRecord;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::ApiClient;
use crate::error::ApiError;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub struct AlertRegistry {
    api: ApiClient,
    rules: Vec<AlertRecord>,
}

impl AlertRegistry {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            rules: Vec::new(),
        }
    }

    pub fn rules(&self) -> &[AlertRecord] {
        &self.rules
    }

    /// Re-fetches the full rule list. On any failure the cache is presented
    /// empty; the error goes to the log and nowhere else.
    pub async fn refresh(&mut self) {
        match self.api.list_alerts().await {
            Ok(rules) => self.rules = rules,
            Err(e) => {
                if e.is_auth() {
                    tracing::debug!(error = %e, "alert list unavailable without a session");
                } else {
                    tracing::warn!(error = %e, "alert list refresh failed");
                }
                self.rules.clear();
            }
        }
    }

    /// Deletes a rule and re-fetches. Operator confirmation happens at the
    /// calling boundary before this is invoked. On failure the cached list
    /// is left as it was.
    pub async fn remove(&mut self, rule_id: &str) -> Result<(), ApiError> {
        self.api.delete_alert(rule_id).await?;
        self.refresh().await;
        Ok(())
    }

    /// Requests a reset and re-fetches for the authoritative status. The
    /// triggered flag is never flipped locally. On failure the cached
    /// status is left as it was.
    pub async fn reset(&mut self, rule_id: &str) -> Result<(), ApiError> {
        self.api.reset_alert(rule_id).await?;
        self.refresh().await;
        Ok(())
    }
}

/// Handle to a running refresh task. Aborting tears the timer down: the
/// task dies at its next await point, and a fetch in flight for a torn-down
/// view is dropped before its result is applied.
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Re-runs `refresh` on a fixed interval while the owning view is live.
/// The first tick fires one full interval after spawn; callers wanting an
/// immediate fill do their own initial `refresh`.
pub fn spawn_refresh(registry: Arc<Mutex<AlertRegistry>>, interval: Duration) -> RefreshHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await; // the immediate first tick
        loop {
            ticker.tick().await;
            registry.lock().await.refresh().await;
        }
    });
    RefreshHandle { handle }
}
