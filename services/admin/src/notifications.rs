//! Transient notifications
//!
//! Every staff session owns a [`NotificationQueue`]: a small ordered queue
//! of timed entries. Entries expire after a fixed lifetime; reads never
//! return expired entries and a scheduled job sweeps them out.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};
use uuid::Uuid;

use crate::session::SessionManager;

/// Maximum number of queued notifications; the oldest is evicted first
pub const QUEUE_CAPACITY: usize = 16;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Bounded queue of expiring notifications, oldest first
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    entries: VecDeque<Notification>,
    ttl: Duration,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: VecDeque::with_capacity(QUEUE_CAPACITY),
            ttl,
        }
    }

    /// Queue a message and return the stored entry
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Notification {
        if self.entries.len() == QUEUE_CAPACITY {
            self.entries.pop_front();
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.entries.push_back(notification.clone());
        notification
    }

    /// Unexpired entries, oldest first
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notification> {
        self.entries
            .iter()
            .filter(|n| !n.is_expired(now))
            .cloned()
            .collect()
    }

    /// Remove one entry; `false` if it was not queued
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    /// Drop expired entries and return how many were removed
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|n| !n.is_expired(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Start the job that sweeps expired notifications from every session
pub async fn start_sweeper(
    sessions: SessionManager,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule, move |_, _| {
        let sessions = sessions.clone();
        Box::pin(async move {
            let removed = sessions.sweep_expired(Utc::now()).await;
            if removed > 0 {
                info!("Swept {} expired notifications", removed);
            }
        })
    })
    .map_err(|e| {
        error!("Invalid notification sweep schedule {}: {}", schedule, e);
        e
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Started notification sweeper with schedule: {}", schedule);
    Ok(scheduler)
}
