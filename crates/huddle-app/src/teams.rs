//! Team lifecycle and membership handlers.
//!
//! Each handler is a short-lived coordination routine: validate, call the
//! remote service, fold results into the store, clear loading state on
//! every exit path. Mutation handlers never patch membership or invite
//! state locally; they re-fetch details from the source of truth.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use futures::future;
use huddle_client::{
    InviteCategory, RemovalTarget, SeitanLabel, ServiceError, ShowcaseUpdate, TeamDetails,
};
use huddle_core::{
    ConversationId, InviteAddress, InviteInfo, MemberInfo, PublicitySettings, RequestInfo,
    TeamJoinSettings, TeamRole, Teamname, WaitingKey,
};

use crate::{
    coordinator::Coordinator,
    effects::{Dialog, Tab},
    error::IntentError,
    sms::generate_sms_body,
};

impl Coordinator {
    /// Create a team. On success the creation dialog is dismissed and the
    /// UI moves to the chat root (mobile) or teams root (desktop); on
    /// failure the error is recorded for inline display. The pending flag
    /// clears last on every path.
    pub(crate) async fn create_new_team(&self, name: &Teamname) -> Result<(), IntentError> {
        {
            let mut store = self.store.write().await;
            store.set_team_creation_error(String::new());
            store.set_team_creation_pending(true);
        }

        match self.services.teams.create_team(name, true).await {
            Ok(_) => {
                self.effects.navigator.dismiss(Dialog::CreateTeam);
                let mobile = self.session.read().await.mobile;
                self.effects
                    .navigator
                    .navigate_to_tab(if mobile { Tab::Chat } else { Tab::Teams });
            },
            Err(err) => {
                self.store.write().await.set_team_creation_error(err.to_string());
            },
        }

        self.store.write().await.set_team_creation_pending(false);
        Ok(())
    }

    /// Create a team from a conversation's participants.
    ///
    /// Participants come from the established conversation when it exists,
    /// otherwise from a pending conversation under the same id; when
    /// neither yields participants no remote call is made. Everyone except
    /// a creator the service already added is then added: the creator as
    /// admin, all others as writer. Success clears the active conversation
    /// so the UI transitions out of chat.
    pub(crate) async fn create_new_team_from_conversation(
        &self,
        conversation: &ConversationId,
        name: &Teamname,
    ) -> Result<(), IntentError> {
        let participants = self
            .effects
            .conversations
            .participants(conversation)
            .or_else(|| self.effects.conversations.pending_participants(conversation));
        let Some(participants) = participants else {
            return Ok(());
        };

        let me = self.username().await;
        {
            let mut store = self.store.write().await;
            store.set_team_creation_error(String::new());
            store.set_team_creation_pending(true);
        }

        let outcome: Result<(), ServiceError> = async {
            let created = self.services.teams.create_team(name, true).await?;
            for username in &participants {
                if created.creator_added && *username == me {
                    continue;
                }
                let role = if *username == me { TeamRole::Admin } else { TeamRole::Writer };
                self.services.teams.add_member(name, username, role, true).await?;
            }
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => self.effects.navigator.select_conversation(None),
            Err(err) => {
                self.store.write().await.set_team_creation_error(err.to_string());
            },
        }

        self.store.write().await.set_team_creation_pending(false);
        Ok(())
    }

    /// Redeem an invite token or request access to a named team.
    pub(crate) async fn join_team(&self, token_or_name: &str) -> Result<(), IntentError> {
        {
            let mut store = self.store.write().await;
            store.set_team_join_error(String::new());
            store.set_team_join_success(false, None);
        }

        match self.services.teams.accept_invite_or_request_access(token_or_name).await {
            Ok(acceptance) => {
                let team =
                    acceptance.was_team_name.then(|| Teamname::new(token_or_name));
                self.store.write().await.set_team_join_success(true, team);
            },
            Err(err) => {
                self.store.write().await.set_team_join_error(err.to_string());
            },
        }
        Ok(())
    }

    /// Leave a team (non-permanent: the user may rejoin an open team).
    pub(crate) async fn leave_team(&self, name: &Teamname) -> Result<(), IntentError> {
        self.services.teams.leave_team(name, false).await?;
        Ok(())
    }

    /// Refresh the aggregate team list.
    pub(crate) async fn get_teams(&self) -> Result<(), IntentError> {
        let username = self.username().await;
        self.store.write().await.set_loaded(false);

        let outcome = match self.services.teams.list_teams(&username).await {
            Ok(teams) => {
                let mut names = BTreeSet::new();
                let mut counts = HashMap::new();
                let mut roles = HashMap::new();
                for team in teams {
                    names.insert(team.fq_name.clone());
                    counts.insert(team.fq_name.clone(), team.member_count);
                    roles.insert(team.fq_name, team.role);
                }
                self.store.write().await.replace_team_list(names, counts, roles);
                Ok(())
            },
            Err(err) => Err(err.into()),
        };

        self.store.write().await.set_loaded(true);
        outcome
    }

    /// Refresh one team's full details: metadata, implicit admins, join
    /// requests, and publicity.
    pub(crate) async fn get_details(&self, name: &Teamname) -> Result<(), IntentError> {
        let _waiting = self.waiting.begin(WaitingKey::get_details(name));
        self.store.write().await.set_team_loading(name, true);

        let outcome = self.fetch_details(name).await;

        self.store.write().await.set_team_loading(name, false);
        outcome
    }

    async fn fetch_details(&self, name: &Teamname) -> Result<(), IntentError> {
        let TeamDetails { members, settings, annotated_active_invites } =
            self.services.teams.get_team_details(name, false).await?;

        // The service's "none" join role is never surfaced to the UI.
        let settings = TeamJoinSettings {
            open: settings.open,
            join_as: settings.join_as.unwrap_or(TeamRole::Reader),
        };

        let implicit_admins: BTreeSet<String> = self
            .services
            .teams
            .list_implicit_admins(name)
            .await?
            .into_iter()
            .map(|admin| admin.username)
            .collect();

        // Requests come back for every team at once; group per team. The
        // sets order requests by username, keeping the UI deterministic.
        let mut requests_by_team: BTreeMap<Teamname, BTreeSet<RequestInfo>> = BTreeMap::new();
        for request in self.services.teams.list_join_requests().await? {
            requests_by_team
                .entry(request.team_name)
                .or_default()
                .insert(RequestInfo::new(request.username));
        }

        let mut member_map = BTreeMap::new();
        for (role, bucket) in [
            (TeamRole::Owner, members.owners),
            (TeamRole::Admin, members.admins),
            (TeamRole::Writer, members.writers),
            (TeamRole::Reader, members.readers),
        ] {
            for record in bucket {
                member_map.insert(
                    record.username.clone(),
                    MemberInfo { username: record.username, role, active: record.active },
                );
            }
        }

        let invites: BTreeSet<InviteInfo> = annotated_active_invites
            .into_iter()
            .map(|invite| {
                let address = match invite.category {
                    InviteCategory::Email => InviteAddress::Email(invite.name),
                    InviteCategory::Seitan => InviteAddress::Seitan(invite.name),
                    InviteCategory::Sbs { service } => {
                        InviteAddress::Sbs(format!("{}@{service}", invite.name))
                    },
                };
                InviteInfo { id: invite.id, role: invite.role, address }
            })
            .collect();

        let showcase = self.services.teams.get_showcase(name).await?;
        let publicity = PublicitySettings {
            any_member_showcase: showcase.team_showcase.any_member_showcase,
            description: showcase.team_showcase.description,
            member: showcase.is_member_showcased,
            team: showcase.team_showcase.is_showcased,
        };

        // One write lock: all puts land together, none are interdependent.
        let mut store = self.store.write().await;
        store.set_members(name.clone(), member_map);
        store.set_implicit_admins(name.clone(), implicit_admins);
        if !requests_by_team.contains_key(name) {
            // A clean refresh with no requests invalidates any stale ones.
            store.set_requests(name.clone(), BTreeSet::new());
        }
        for (team, requests) in requests_by_team {
            store.set_requests(team, requests);
        }
        store.set_team_settings(name.clone(), settings);
        store.set_invites(name.clone(), invites);
        store.set_publicity(name.clone(), publicity);
        Ok(())
    }

    /// Add one member by username or email, then re-fetch details.
    pub(crate) async fn add_to_team(
        &self,
        name: &Teamname,
        user: &str,
        role: TeamRole,
        notify_chat: bool,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_team_loading(name, true);
        let result = self.services.teams.add_member(name, user, role, notify_chat).await;
        self.refresh_details(name).await;
        result.map_err(Into::into)
    }

    /// Add a batch of members in parallel, tolerating per-call failure;
    /// failures are reported together and the details refresh always runs.
    pub(crate) async fn add_people_to_team(
        &self,
        name: &Teamname,
        users: &[String],
        role: TeamRole,
        notify_chat: bool,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_team_loading(name, true);

        let calls = users
            .iter()
            .map(|user| self.services.teams.add_member(name, user, role, notify_chat));
        let results = future::join_all(calls).await;
        self.report_failures(results.into_iter().filter_map(Result::err).collect());

        self.refresh_details(name).await;
        Ok(())
    }

    /// Invite a batch of email addresses, bracketed by the per-batch
    /// loading-invites flag.
    pub(crate) async fn invite_by_email(
        &self,
        name: &Teamname,
        invitees: &[String],
        role: TeamRole,
    ) -> Result<(), IntentError> {
        let batch_key = invitees.join(",");
        {
            let mut store = self.store.write().await;
            store.set_team_loading(name, true);
            store.set_invite_loading(name, &batch_key, true);
        }

        let result = self.services.teams.add_emails_bulk(name, invitees, role).await;

        self.refresh_details(name).await;
        self.store.write().await.set_invite_loading(name, &batch_key, false);
        result.map_err(Into::into)
    }

    /// Change an existing member's role, then re-fetch details.
    pub(crate) async fn edit_membership(
        &self,
        name: &Teamname,
        username: &str,
        role: TeamRole,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_team_loading(name, true);
        let result = self.services.teams.edit_member(name, username, role).await;
        self.refresh_details(name).await;
        result.map_err(Into::into)
    }

    /// Change the team's public description, then re-fetch details.
    pub(crate) async fn edit_description(
        &self,
        name: &Teamname,
        description: &str,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_team_loading(name, true);
        let update =
            ShowcaseUpdate { description: Some(description.to_owned()), ..ShowcaseUpdate::default() };
        let result = self.services.teams.set_showcase(name, update).await;
        self.refresh_details(name).await;
        result.map_err(Into::into)
    }

    /// Remove a member or cancel a pending invite.
    ///
    /// Supplying more than one identity (or none) is a caller contract
    /// violation: the handler fails before any remote call and disturbs no
    /// loading state.
    pub(crate) async fn remove_member_or_pending_invite(
        &self,
        name: &Teamname,
        username: Option<String>,
        email: Option<String>,
        invite_id: Option<String>,
    ) -> Result<(), IntentError> {
        let supplied =
            usize::from(username.is_some()) + usize::from(email.is_some())
                + usize::from(invite_id.is_some());
        if supplied > 1 {
            return Err(IntentError::Contract(
                "supplied more than one form of identification for removal",
            ));
        }
        let target = username
            .map(RemovalTarget::Username)
            .or_else(|| email.map(RemovalTarget::Email))
            .or_else(|| invite_id.map(RemovalTarget::InviteId))
            .ok_or_else(|| IntentError::Contract("no identification supplied for removal"))?;

        let flag_key = target.value().to_owned();
        {
            let mut store = self.store.write().await;
            store.set_team_loading(name, true);
            store.set_invite_loading(name, &flag_key, true);
        }

        let result = self.services.teams.remove_member(name, target).await;

        self.refresh_details(name).await;
        self.store.write().await.set_invite_loading(name, &flag_key, false);
        result.map_err(Into::into)
    }

    /// Mint a single-use token, hand the invite text to the SMS composer,
    /// and re-fetch details.
    ///
    /// Composer failure is logged and dropped: it cannot affect the
    /// already-created invite.
    pub(crate) async fn invite_to_team_by_phone(
        &self,
        name: &Teamname,
        role: TeamRole,
        phone_number: &str,
        full_name: &str,
    ) -> Result<(), IntentError> {
        let label = SeitanLabel {
            full_name: full_name.to_owned(),
            phone_number: phone_number.to_owned(),
        };
        let seitan = self.services.teams.create_seitan_token(name, role, label).await?;

        let body = generate_sms_body(name, &seitan);
        if let Err(err) = self.effects.sms.compose(&[phone_number.to_owned()], &body) {
            tracing::warn!(%err, "error sending SMS");
        }

        self.refresh_details(name).await;
        Ok(())
    }

    /// Ignore a pending join request, then re-fetch details.
    pub(crate) async fn ignore_request(
        &self,
        name: &Teamname,
        username: &str,
    ) -> Result<(), IntentError> {
        self.store.write().await.set_team_loading(name, true);
        let result = self.services.teams.ignore_request(name, username).await;
        self.refresh_details(name).await;
        result.map_err(Into::into)
    }

    /// Refresh the set of teams the user has requested access to.
    pub(crate) async fn check_requested_access(&self) -> Result<(), IntentError> {
        let rows = self.services.teams.list_my_access_requests().await?;
        let teams: BTreeSet<Teamname> =
            rows.into_iter().map(|row| Teamname::new(row.parts.join("."))).collect();
        self.store.write().await.set_access_requests_pending(teams);
        Ok(())
    }
}
