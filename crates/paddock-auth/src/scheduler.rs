//! Cron scheduler for the recurring membership refresh.
//!
//! A background task wakes on a fixed check interval, evaluates the
//! configured cron expression, and fires a refresh when a scheduled time
//! has been crossed since the last firing. Each firing is dispatched
//! fire-and-forget; the cache's atomic publish tolerates a firing that
//! overlaps a still-running refresh.

use std::sync::Arc;
use std::time::Duration;

use croner::Cron;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use crate::cache::MembershipCache;
use crate::error::{AuthError, AuthResult};

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cron expression for the membership refresh.
    pub cron_expression: String,

    /// How often to check whether the schedule is due (in seconds).
    /// Default: 60 seconds (check every minute)
    pub check_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: "0 * * * *".to_string(),
            check_interval_secs: 60,
        }
    }
}

/// Recurring trigger that refreshes the membership cache on a cron schedule.
pub struct RefreshScheduler {
    cache: Arc<MembershipCache>,
    config: SchedulerConfig,
    /// When the schedule last fired, if it has.
    last_run: Option<OffsetDateTime>,
}

impl RefreshScheduler {
    /// Creates a new refresh scheduler.
    #[must_use]
    pub fn new(cache: Arc<MembershipCache>, config: SchedulerConfig) -> Self {
        Self {
            cache,
            config,
            last_run: None,
        }
    }

    /// Starts the scheduler in a background task.
    ///
    /// Returns a shutdown sender that can be used to stop the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Schedule`] if the configured cron expression
    /// does not parse; nothing is spawned in that case.
    pub fn start(mut self) -> AuthResult<watch::Sender<bool>> {
        let cron = Cron::new(&self.config.cron_expression)
            .parse()
            .map_err(|e| AuthError::Schedule {
                expression: self.config.cron_expression.clone(),
                message: e.to_string(),
            })?;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            info!(
                schedule = %self.config.cron_expression,
                check_interval_secs = self.config.check_interval_secs,
                "Membership refresh scheduler started"
            );

            let mut ticker = interval(Duration::from_secs(self.config.check_interval_secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick(&cron);
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("Membership refresh scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        });

        Ok(shutdown_tx)
    }

    /// Fires a refresh if the schedule is due.
    fn tick(&mut self, cron: &Cron) {
        let now = OffsetDateTime::now_utc();
        if self.should_run(cron, now) {
            debug!(schedule = %self.config.cron_expression, "Firing scheduled membership refresh");
            self.last_run = Some(now);
            Arc::clone(&self.cache).refresh_in_background();
        }
    }

    /// Checks whether a scheduled time has been crossed since the last run.
    fn should_run(&self, cron: &Cron, now: OffsetDateTime) -> bool {
        // Convert time to chrono for croner compatibility
        let now_chrono = chrono::DateTime::from_timestamp(now.unix_timestamp(), 0)
            .unwrap_or_else(chrono::Utc::now);

        // Look back far enough to find the most recent scheduled time.
        let check_window = chrono::Duration::seconds(self.config.check_interval_secs as i64 * 2);
        let past_time = now_chrono - check_window;

        let due = match cron.find_next_occurrence(&past_time, false) {
            Ok(due) => due,
            Err(_) => return false,
        };

        let window_secs = self.config.check_interval_secs as i64;
        let now_ts = now_chrono.timestamp();
        let due_ts = due.timestamp();

        // The next occurrence may still be ahead of us.
        if due_ts > now_ts {
            return false;
        }

        match self.last_run {
            // Never fired: run only if the scheduled time is recent.
            None => (now_ts - due_ts).abs() < window_secs,
            // Fired before: the scheduled time must be new and recent.
            Some(last_run) => {
                due_ts > last_run.unix_timestamp() && (now_ts - due_ts).abs() < window_secs
            }
        }
    }
}
