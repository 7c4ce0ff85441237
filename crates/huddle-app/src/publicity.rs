//! Publicity and open-team settings handlers.

use futures::future::{self, BoxFuture};
use huddle_client::{ServiceError, ShowcaseUpdate};
use huddle_core::{TeamJoinSettings, TeamRole, Teamname, WaitingKey};

use crate::{
    coordinator::Coordinator, error::IntentError, intent::DesiredPublicity,
};

impl Coordinator {
    /// Set a team open or closed with a default join role, then re-fetch
    /// details.
    pub(crate) async fn change_open_team_setting(
        &self,
        name: &Teamname,
        convert_to_open: bool,
        default_role: TeamRole,
    ) -> Result<(), IntentError> {
        let settings = TeamJoinSettings { open: convert_to_open, join_as: default_role };
        self.services.teams.set_team_settings(name, settings).await?;
        self.refresh_details(name).await;
        Ok(())
    }

    /// Apply the publicity form.
    ///
    /// Each of the four settings is diffed against the cached value and
    /// produces a remote call only when it actually changed; unchanged
    /// submissions make no calls at all. The changed-setting calls run in
    /// parallel with per-call failure isolation, failures are reported
    /// together, and a details refresh follows the batch.
    pub(crate) async fn set_publicity(
        &self,
        name: &Teamname,
        desired: &DesiredPublicity,
    ) -> Result<(), IntentError> {
        let (current_settings, current_publicity) = {
            let store = self.store.read().await;
            (store.team_settings(name), store.publicity(name))
        };

        let teams = &self.services.teams;
        let mut calls: Vec<BoxFuture<'_, Result<(), ServiceError>>> = Vec::new();

        if current_settings.open != desired.open_team
            || (desired.open_team && current_settings.join_as != desired.open_team_role)
        {
            let settings =
                TeamJoinSettings { open: desired.open_team, join_as: desired.open_team_role };
            calls.push(Box::pin(async move {
                teams.set_team_settings(name, settings).await
            }));
        }
        if current_publicity.any_member_showcase != desired.any_member_showcase {
            let update = ShowcaseUpdate {
                any_member_showcase: Some(desired.any_member_showcase),
                ..ShowcaseUpdate::default()
            };
            calls.push(Box::pin(async move { teams.set_showcase(name, update).await }));
        }
        if current_publicity.member != desired.member_showcase {
            let is_showcased = desired.member_showcase;
            calls.push(Box::pin(async move {
                teams.set_member_showcase(name, is_showcased).await
            }));
        }
        if current_publicity.team != desired.team_showcase {
            let update = ShowcaseUpdate {
                is_showcased: Some(desired.team_showcase),
                ..ShowcaseUpdate::default()
            };
            calls.push(Box::pin(async move { teams.set_showcase(name, update).await }));
        }

        let waiting = self.waiting.begin(WaitingKey::set_publicity(name));
        let results = future::join_all(calls).await;
        self.report_failures(results.into_iter().filter_map(Result::err).collect());
        drop(waiting);

        self.refresh_details(name).await;
        Ok(())
    }
}
