//! Session-scoped coordinator.
//!
//! The [`Coordinator`] owns the normalized team cache, the busy-tracker,
//! and every intent handler. One coordinator exists per signed-in session;
//! the reconciler flag and badge baselines live on it rather than in
//! module state so independent sessions (and tests) do not interfere.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use huddle_client::{ChatService, ServiceError, TeamService};
use huddle_core::{TeamStore, Teamname, WaitingTracker};
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    dispatch::LatestTracker,
    effects::{ConversationDirectory, ErrorSink, Navigator, SmsComposer},
};

/// Handles to the remote services.
pub struct Services {
    /// Team service handle.
    pub teams: Arc<dyn TeamService>,
    /// Chat service handle.
    pub chat: Arc<dyn ChatService>,
}

/// Handles to the application seams the handlers drive.
pub struct Effects {
    /// Navigation effects.
    pub navigator: Arc<dyn Navigator>,
    /// Platform SMS composer.
    pub sms: Arc<dyn SmsComposer>,
    /// Aggregated error reporting.
    pub errors: Arc<dyn ErrorSink>,
    /// Chat conversation lookups.
    pub conversations: Arc<dyn ConversationDirectory>,
}

/// Session context the handlers consult.
#[derive(Debug, Clone)]
pub struct Session {
    /// The signed-in username.
    pub username: String,
    /// Whether the session is authenticated. Badge digestion makes no
    /// remote calls while signed out.
    pub logged_in: bool,
    /// Whether the app runs on the mobile surface (affects the tab chosen
    /// after team creation).
    pub mobile: bool,
}

/// Owner of cached team state and every intent handler.
pub struct Coordinator {
    pub(crate) services: Services,
    pub(crate) effects: Effects,
    pub(crate) store: RwLock<TeamStore>,
    pub(crate) waiting: WaitingTracker,
    pub(crate) latest: LatestTracker,
    pub(crate) session: RwLock<Session>,
    pub(crate) on_teams_tab: AtomicBool,
}

impl Coordinator {
    /// New coordinator with an empty cache.
    pub fn new(services: Services, effects: Effects, session: Session) -> Self {
        Self {
            services,
            effects,
            store: RwLock::new(TeamStore::new()),
            waiting: WaitingTracker::new(),
            latest: LatestTracker::default(),
            session: RwLock::new(session),
            on_teams_tab: AtomicBool::new(false),
        }
    }

    /// Read access to the cached team state.
    pub async fn store(&self) -> RwLockReadGuard<'_, TeamStore> {
        self.store.read().await
    }

    /// The busy-tracker, for UI waiting queries.
    pub fn waiting(&self) -> &WaitingTracker {
        &self.waiting
    }

    /// Whether the teams section is currently observed.
    pub fn on_teams_tab(&self) -> bool {
        self.on_teams_tab.load(Ordering::SeqCst)
    }

    /// Update the session's authentication state.
    pub async fn set_logged_in(&self, logged_in: bool) {
        self.session.write().await.logged_in = logged_in;
    }

    pub(crate) async fn username(&self) -> String {
        self.session.read().await.username.clone()
    }

    /// Re-fetch one team's details, logging instead of propagating failure.
    /// Mutation handlers call this unconditionally after their remote work.
    pub(crate) async fn refresh_details(&self, name: &Teamname) {
        if let Err(err) = self.get_details(name).await {
            tracing::warn!(team = %name, %err, "details refresh failed");
        }
    }

    /// Re-fetch one team's channel list, logging instead of propagating
    /// failure.
    pub(crate) async fn refresh_channels(&self, name: &Teamname) {
        if let Err(err) = self.get_channels(name).await {
            tracing::warn!(team = %name, %err, "channel refresh failed");
        }
    }

    /// Report a batch's collected failures through the global sink, if any.
    pub(crate) fn report_failures(&self, failures: Vec<ServiceError>) {
        if !failures.is_empty() {
            self.effects.errors.report(&failures);
        }
    }
}
