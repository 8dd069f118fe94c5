//! Staff sessions held in memory

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::models::{AuthSession, AuthUser, Product, SiteSettings};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::PanelTab;
use crate::notifications::{Notification, NotificationKind, NotificationQueue};

/// Application state of one signed-in staff member
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub tab: PanelTab,
    /// Last successfully loaded product list
    pub products: Vec<Product>,
    /// Loaded settings row; blank with no id until a load succeeds
    pub settings: SiteSettings,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
    pub panel: PanelState,
    pub notifications: NotificationQueue,
}

/// Session manager keyed by user id; the latest sign-in of a user wins
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    notification_ttl: Duration,
}

impl SessionManager {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            notification_ttl,
        }
    }

    /// Create a session for a successful sign-in
    pub async fn create_session(&self, auth: &AuthSession) {
        info!("Creating session for user: {}", auth.user.id);

        let session = Session {
            user: auth.user.clone(),
            access_token: auth.access_token.clone(),
            refresh_token: auth.refresh_token.clone(),
            panel: PanelState::default(),
            notifications: NotificationQueue::new(self.notification_ttl),
        };
        self.sessions.write().await.insert(auth.user.id, session);
    }

    /// The user behind `access_token`, if it is the token of their live session
    pub async fn current_user(&self, user_id: Uuid, access_token: &str) -> Option<AuthUser> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .filter(|session| session.access_token == access_token)
            .map(|session| session.user.clone())
    }

    /// Drop a session; `false` if none existed
    pub async fn delete_session(&self, user_id: Uuid) -> bool {
        info!("Deleting session for user: {}", user_id);
        self.sessions.write().await.remove(&user_id).is_some()
    }

    /// Queue a notification for a user
    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        message: &str,
    ) -> Option<Notification> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&user_id)?;
        Some(session.notifications.push(kind, message, Utc::now()))
    }

    /// Active notifications of a user, oldest first
    pub async fn notifications(&self, user_id: Uuid) -> Vec<Notification> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .map(|session| session.notifications.active(Utc::now()))
            .unwrap_or_default()
    }

    pub async fn dismiss(&self, user_id: Uuid, notification_id: Uuid) -> bool {
        self.sessions
            .write()
            .await
            .get_mut(&user_id)
            .is_some_and(|session| session.notifications.dismiss(notification_id))
    }

    /// Remove expired notifications from every session
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        self.sessions
            .write()
            .await
            .values_mut()
            .map(|session| session.notifications.sweep(now))
            .sum()
    }

    pub async fn panel(&self, user_id: Uuid) -> Option<PanelState> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .map(|session| session.panel.clone())
    }

    pub async fn set_tab(&self, user_id: Uuid, tab: PanelTab) {
        if let Some(session) = self.sessions.write().await.get_mut(&user_id) {
            session.panel.tab = tab;
        }
    }

    pub async fn products(&self, user_id: Uuid) -> Vec<Product> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .map(|session| session.panel.products.clone())
            .unwrap_or_default()
    }

    pub async fn set_products(&self, user_id: Uuid, products: Vec<Product>) {
        if let Some(session) = self.sessions.write().await.get_mut(&user_id) {
            session.panel.products = products;
        }
    }

    pub async fn settings(&self, user_id: Uuid) -> SiteSettings {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .map(|session| session.panel.settings.clone())
            .unwrap_or_default()
    }

    pub async fn set_settings(&self, user_id: Uuid, settings: SiteSettings) {
        if let Some(session) = self.sessions.write().await.get_mut(&user_id) {
            session.panel.settings = settings;
        }
    }
}
