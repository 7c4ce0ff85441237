//! Notification reconciliation.
//!
//! Push events and badge state arrive regardless of what the user is
//! looking at. Refreshes are gated on the coordinator's teams-tab flag:
//! when the section is not observed, events are acknowledged without
//! remote calls and the next visit to the tab reloads naturally.

use std::{
    collections::BTreeSet,
    sync::atomic::Ordering,
};

use futures::future;
use huddle_client::{BadgeCategory, TeamPushEvent};
use huddle_core::Teamname;

use crate::{coordinator::Coordinator, effects::Tab, error::IntentError};

impl Coordinator {
    /// Digest a push notification from the team service.
    pub async fn handle_push(&self, event: TeamPushEvent) {
        match event {
            TeamPushEvent::ChangedByName { name, implicit_team } => {
                if implicit_team {
                    return;
                }
                self.reload_if_observed(Some(name)).await;
            },
            // By-id notifications carry nothing this cache is keyed on;
            // the by-name notification for the same change covers it.
            TeamPushEvent::ChangedById => {},
            TeamPushEvent::Deleted | TeamPushEvent::MemberExit => {
                self.reload_if_observed(None).await;
            },
        }
    }

    async fn reload_if_observed(&self, name: Option<Teamname>) {
        if !self.on_teams_tab() {
            return;
        }
        if let Err(err) = self.get_teams().await {
            tracing::warn!(%err, "team list reload after notification failed");
        }
        if let Some(name) = name {
            self.refresh_details(&name).await;
        }
    }

    /// Record a switch between top-level surfaces.
    ///
    /// Entering the teams tab marks it observed. Leaving it (having been
    /// on it) dismisses the two team badge categories server-side, once.
    pub async fn handle_tab_switch(&self, tab: Tab) {
        if tab == Tab::Teams {
            self.on_teams_tab.store(true, Ordering::SeqCst);
            return;
        }
        if self.on_teams_tab.swap(false, Ordering::SeqCst) {
            for category in [BadgeCategory::NewlyAddedToTeam, BadgeCategory::RequestAccess] {
                if let Err(err) =
                    self.services.teams.dismiss_notification_category(category).await
                {
                    tracing::warn!(%category, %err, "badge dismissal failed");
                }
            }
        }
    }

    /// Digest a new-teams/new-requests badge push.
    ///
    /// Signed out: no calls, baselines untouched. Observing the teams tab:
    /// a changed, non-empty new-team set triggers a team-list refresh, and
    /// each request team not in the previous baseline gets a details
    /// refresh. The baselines are then replaced (not accumulated) so the
    /// next push compares against the latest server state.
    pub(crate) async fn badge_app_for_teams(
        &self,
        new_team_names: Vec<Teamname>,
        new_team_access_requests: Vec<Teamname>,
    ) -> Result<(), IntentError> {
        if !self.session.read().await.logged_in {
            // Don't make any calls we don't have permission to.
            return Ok(());
        }

        let new_teams: BTreeSet<Teamname> = new_team_names.into_iter().collect();
        let new_requests = new_team_access_requests;

        if self.on_teams_tab() && (!new_teams.is_empty() || !new_requests.is_empty()) {
            let (existing_teams, existing_requests) = {
                let store = self.store.read().await;
                (store.new_teams().clone(), store.new_team_requests().to_vec())
            };

            if new_teams != existing_teams && !new_teams.is_empty() {
                if let Err(err) = self.get_teams().await {
                    tracing::warn!(%err, "team list reload after badge failed");
                }
            }

            let existing_set: BTreeSet<Teamname> = existing_requests.into_iter().collect();
            let to_load: Vec<&Teamname> = new_requests
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|team| !existing_set.contains(*team))
                .collect();
            let reloads = to_load.into_iter().map(|team| self.get_details(team));
            for result in future::join_all(reloads).await {
                if let Err(err) = result {
                    tracing::warn!(%err, "details reload after badge failed");
                }
            }
        }

        let mut store = self.store.write().await;
        store.set_new_teams(new_teams);
        store.set_new_team_requests(new_requests);
        Ok(())
    }
}
