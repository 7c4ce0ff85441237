//! In-memory service doubles and a harness builder shared by the
//! integration tests.
//!
//! The fakes record every call as a `op:args` string so tests can assert
//! exactly which remote operations an intent produced, and in what number.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use huddle_app::{
    ComposeError, ConversationDirectory, Coordinator, Dialog, Effects, ErrorSink, Navigator,
    Services, Session, SmsComposer, Tab,
};
use huddle_client::{
    AccessRequest, AnnotatedTeam, BadgeCategory, ChatService, Conversation, CreateTeamResult,
    ImplicitAdmin, JoinAcceptance, JoinRequest, MembersByRole, RemovalTarget, SeitanLabel,
    ServiceError, ShowcaseUpdate, TeamAndMemberShowcase, TeamDetails, TeamService, TopicType,
    WireTeamSettings,
};
use huddle_core::{ConversationId, TeamJoinSettings, TeamRole, Teamname};
use tokio::sync::oneshot;

/// Teamname shorthand.
pub fn team(name: &str) -> Teamname {
    Teamname::new(name)
}

/// Conversation listing entry shorthand.
pub fn conversation(id: &str, channelname: &str, participants: &[&str]) -> Conversation {
    Conversation {
        conv_id: ConversationId::from(id),
        channelname: channelname.to_owned(),
        headline: String::new(),
        participants: participants.iter().map(|&p| p.to_owned()).collect(),
    }
}

/// Empty details result with the given settings.
pub fn details(members: MembersByRole, open: bool, join_as: Option<TeamRole>) -> TeamDetails {
    TeamDetails {
        members,
        settings: WireTeamSettings { open, join_as },
        annotated_active_invites: Vec::new(),
    }
}

/// Recording team service double.
pub struct FakeTeams {
    calls: Mutex<Vec<String>>,
    fail: Mutex<HashSet<String>>,
    pub details: Mutex<HashMap<Teamname, TeamDetails>>,
    pub requests: Mutex<Vec<JoinRequest>>,
    pub implicit_admins: Mutex<Vec<ImplicitAdmin>>,
    pub showcase: Mutex<TeamAndMemberShowcase>,
    pub teams: Mutex<Vec<AnnotatedTeam>>,
    pub access_requests: Mutex<Vec<AccessRequest>>,
    pub creator_added: AtomicBool,
    pub was_team_name: AtomicBool,
    pub seitan: Mutex<String>,
    details_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeTeams {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(HashSet::new()),
            details: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            implicit_admins: Mutex::new(Vec::new()),
            showcase: Mutex::new(TeamAndMemberShowcase::default()),
            teams: Mutex::new(Vec::new()),
            access_requests: Mutex::new(Vec::new()),
            creator_added: AtomicBool::new(false),
            was_team_name: AtomicBool::new(false),
            seitan: Mutex::new("ABCDEFGHIJKLMNOPQR".to_owned()),
            details_gate: Mutex::new(None),
        })
    }

    /// Make the named operation fail with a canned description.
    pub fn fail_on(&self, op: &str) {
        self.fail.lock().unwrap().insert(op.to_owned());
    }

    /// Hold the next `get_team_details` call until the returned sender
    /// fires.
    pub fn gate_details(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.details_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn set_details(&self, name: &Teamname, value: TeamDetails) {
        self.details.lock().unwrap().insert(name.clone(), value);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose `op` segment matches exactly.
    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.split(':').next() == Some(op))
            .count()
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn check(&self, op: &str) -> Result<(), ServiceError> {
        if self.fail.lock().unwrap().contains(op) {
            Err(ServiceError::new(format!("{op} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TeamService for FakeTeams {
    async fn create_team(
        &self,
        name: &Teamname,
        _notify_chat: bool,
    ) -> Result<CreateTeamResult, ServiceError> {
        self.record(format!("create_team:{name}"));
        self.check("create_team")?;
        Ok(CreateTeamResult { creator_added: self.creator_added.load(Ordering::SeqCst) })
    }

    async fn add_member(
        &self,
        team: &Teamname,
        user: &str,
        role: TeamRole,
        _notify_chat: bool,
    ) -> Result<(), ServiceError> {
        self.record(format!("add_member:{team}:{user}:{role}"));
        if self.fail.lock().unwrap().contains(&format!("add_member:{user}")) {
            return Err(ServiceError::new(format!("cannot add {user}")));
        }
        self.check("add_member")
    }

    async fn add_emails_bulk(
        &self,
        team: &Teamname,
        emails: &[String],
        role: TeamRole,
    ) -> Result<(), ServiceError> {
        self.record(format!("add_emails_bulk:{team}:{}:{role}", emails.join(",")));
        self.check("add_emails_bulk")
    }

    async fn edit_member(
        &self,
        team: &Teamname,
        username: &str,
        role: TeamRole,
    ) -> Result<(), ServiceError> {
        self.record(format!("edit_member:{team}:{username}:{role}"));
        self.check("edit_member")
    }

    async fn remove_member(
        &self,
        team: &Teamname,
        target: RemovalTarget,
    ) -> Result<(), ServiceError> {
        self.record(format!("remove_member:{team}:{}", target.value()));
        self.check("remove_member")
    }

    async fn accept_invite_or_request_access(
        &self,
        token_or_name: &str,
    ) -> Result<JoinAcceptance, ServiceError> {
        self.record(format!("accept_invite_or_request_access:{token_or_name}"));
        self.check("accept_invite_or_request_access")?;
        Ok(JoinAcceptance { was_team_name: self.was_team_name.load(Ordering::SeqCst) })
    }

    async fn leave_team(&self, name: &Teamname, permanent: bool) -> Result<(), ServiceError> {
        self.record(format!("leave_team:{name}:{permanent}"));
        self.check("leave_team")
    }

    async fn get_team_details(
        &self,
        name: &Teamname,
        _force_repoll: bool,
    ) -> Result<TeamDetails, ServiceError> {
        self.record(format!("get_team_details:{name}"));
        let gate = self.details_gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.check("get_team_details")?;
        let canned = self.details.lock().unwrap().get(name).cloned();
        Ok(canned.unwrap_or_else(|| details(MembersByRole::default(), false, None)))
    }

    async fn list_implicit_admins(
        &self,
        team: &Teamname,
    ) -> Result<Vec<ImplicitAdmin>, ServiceError> {
        self.record(format!("list_implicit_admins:{team}"));
        self.check("list_implicit_admins")?;
        Ok(self.implicit_admins.lock().unwrap().clone())
    }

    async fn list_join_requests(&self) -> Result<Vec<JoinRequest>, ServiceError> {
        self.record("list_join_requests".to_owned());
        self.check("list_join_requests")?;
        Ok(self.requests.lock().unwrap().clone())
    }

    async fn get_showcase(
        &self,
        team: &Teamname,
    ) -> Result<TeamAndMemberShowcase, ServiceError> {
        self.record(format!("get_showcase:{team}"));
        self.check("get_showcase")?;
        Ok(self.showcase.lock().unwrap().clone())
    }

    async fn set_showcase(
        &self,
        team: &Teamname,
        update: ShowcaseUpdate,
    ) -> Result<(), ServiceError> {
        self.record(format!(
            "set_showcase:{team}:{:?}:{:?}:{:?}",
            update.description, update.any_member_showcase, update.is_showcased
        ));
        self.check("set_showcase")
    }

    async fn set_member_showcase(
        &self,
        team: &Teamname,
        is_showcased: bool,
    ) -> Result<(), ServiceError> {
        self.record(format!("set_member_showcase:{team}:{is_showcased}"));
        self.check("set_member_showcase")
    }

    async fn set_team_settings(
        &self,
        team: &Teamname,
        settings: TeamJoinSettings,
    ) -> Result<(), ServiceError> {
        self.record(format!("set_team_settings:{team}:{}:{}", settings.open, settings.join_as));
        self.check("set_team_settings")
    }

    async fn create_seitan_token(
        &self,
        team: &Teamname,
        role: TeamRole,
        label: SeitanLabel,
    ) -> Result<String, ServiceError> {
        self.record(format!("create_seitan_token:{team}:{role}:{}", label.phone_number));
        self.check("create_seitan_token")?;
        Ok(self.seitan.lock().unwrap().clone())
    }

    async fn list_teams(
        &self,
        user_assertion: &str,
    ) -> Result<Vec<AnnotatedTeam>, ServiceError> {
        self.record(format!("list_teams:{user_assertion}"));
        self.check("list_teams")?;
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn list_my_access_requests(&self) -> Result<Vec<AccessRequest>, ServiceError> {
        self.record("list_my_access_requests".to_owned());
        self.check("list_my_access_requests")?;
        Ok(self.access_requests.lock().unwrap().clone())
    }

    async fn ignore_request(
        &self,
        team: &Teamname,
        username: &str,
    ) -> Result<(), ServiceError> {
        self.record(format!("ignore_request:{team}:{username}"));
        self.check("ignore_request")
    }

    async fn dismiss_notification_category(
        &self,
        category: BadgeCategory,
    ) -> Result<(), ServiceError> {
        self.record(format!("dismiss_notification_category:{category}"));
        self.check("dismiss_notification_category")
    }
}

/// Recording chat service double.
pub struct FakeChat {
    calls: Mutex<Vec<String>>,
    fail: Mutex<HashSet<String>>,
    pub conversations: Mutex<HashMap<Teamname, Vec<Conversation>>>,
    pub new_conv_id: Mutex<String>,
    headline_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeChat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(HashSet::new()),
            conversations: Mutex::new(HashMap::new()),
            new_conv_id: Mutex::new("conv-new".to_owned()),
            headline_gate: Mutex::new(None),
        })
    }

    pub fn fail_on(&self, op: &str) {
        self.fail.lock().unwrap().insert(op.to_owned());
    }

    /// Hold the next `post_headline` call until the returned sender fires.
    pub fn gate_headline(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.headline_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn set_conversations(&self, name: &Teamname, convs: Vec<Conversation>) {
        self.conversations.lock().unwrap().insert(name.clone(), convs);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.split(':').next() == Some(op))
            .count()
    }

    fn record(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn check(&self, op: &str) -> Result<(), ServiceError> {
        if self.fail.lock().unwrap().contains(op) {
            Err(ServiceError::new(format!("{op} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatService for FakeChat {
    async fn list_team_conversations(
        &self,
        team: &Teamname,
        _topic: TopicType,
    ) -> Result<Vec<Conversation>, ServiceError> {
        self.record(format!("list_team_conversations:{team}"));
        self.check("list_team_conversations")?;
        Ok(self.conversations.lock().unwrap().get(team).cloned().unwrap_or_default())
    }

    async fn join_conversation_by_id(
        &self,
        conversation: &ConversationId,
    ) -> Result<(), ServiceError> {
        self.record(format!("join_conversation_by_id:{conversation}"));
        self.check("join_conversation_by_id")
    }

    async fn join_conversation_by_name(
        &self,
        team: &Teamname,
        channelname: &str,
    ) -> Result<(), ServiceError> {
        self.record(format!("join_conversation_by_name:{team}:{channelname}"));
        self.check("join_conversation_by_name")
    }

    async fn leave_conversation(
        &self,
        conversation: &ConversationId,
    ) -> Result<(), ServiceError> {
        self.record(format!("leave_conversation:{conversation}"));
        self.check("leave_conversation")
    }

    async fn new_conversation(
        &self,
        team: &Teamname,
        channelname: &str,
    ) -> Result<ConversationId, ServiceError> {
        self.record(format!("new_conversation:{team}:{channelname}"));
        self.check("new_conversation")?;
        Ok(ConversationId::new(self.new_conv_id.lock().unwrap().clone()))
    }

    async fn post_headline(
        &self,
        conversation: &ConversationId,
        team: &Teamname,
        headline: &str,
    ) -> Result<(), ServiceError> {
        self.record(format!("post_headline:{conversation}:{team}:{headline}"));
        let gate = self.headline_gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        self.check("post_headline")
    }

    async fn post_metadata(
        &self,
        conversation: &ConversationId,
        team: &Teamname,
        channelname: &str,
    ) -> Result<(), ServiceError> {
        self.record(format!("post_metadata:{conversation}:{team}:{channelname}"));
        self.check("post_metadata")
    }

    async fn delete_conversation(
        &self,
        conversation: &ConversationId,
        channelname: &str,
        confirmed: bool,
    ) -> Result<(), ServiceError> {
        self.record(format!("delete_conversation:{conversation}:{channelname}:{confirmed}"));
        self.check("delete_conversation")
    }
}

/// Recorded navigation effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Dismissed(Dialog),
    SwitchedTab(Tab),
    SelectedConversation(Option<ConversationId>),
}

/// Navigator double that records every effect.
#[derive(Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavEvent>>,
}

impl RecordingNavigator {
    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn dismiss(&self, dialog: Dialog) {
        self.events.lock().unwrap().push(NavEvent::Dismissed(dialog));
    }

    fn navigate_to_tab(&self, tab: Tab) {
        self.events.lock().unwrap().push(NavEvent::SwitchedTab(tab));
    }

    fn select_conversation(&self, conversation: Option<&ConversationId>) {
        self.events
            .lock()
            .unwrap()
            .push(NavEvent::SelectedConversation(conversation.cloned()));
    }
}

/// SMS composer double.
#[derive(Default)]
pub struct FakeSms {
    pub sent: Mutex<Vec<(Vec<String>, String)>>,
    pub fail: AtomicBool,
}

impl SmsComposer for FakeSms {
    fn compose(&self, recipients: &[String], body: &str) -> Result<(), ComposeError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ComposeError("composer unavailable".to_owned()));
        }
        self.sent.lock().unwrap().push((recipients.to_vec(), body.to_owned()));
        Ok(())
    }
}

/// Error sink double recording each aggregated batch.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<ServiceError>>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<Vec<ServiceError>> {
        self.batches.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, failures: &[ServiceError]) {
        self.batches.lock().unwrap().push(failures.to_vec());
    }
}

/// Conversation directory double with established and pending entries.
#[derive(Default)]
pub struct FakeDirectory {
    pub established: Mutex<HashMap<ConversationId, Vec<String>>>,
    pub pending: Mutex<HashMap<ConversationId, Vec<String>>>,
}

impl FakeDirectory {
    pub fn add_established(&self, conversation: &str, participants: &[&str]) {
        self.established.lock().unwrap().insert(
            ConversationId::from(conversation),
            participants.iter().map(|&p| p.to_owned()).collect(),
        );
    }

    pub fn add_pending(&self, conversation: &str, participants: &[&str]) {
        self.pending.lock().unwrap().insert(
            ConversationId::from(conversation),
            participants.iter().map(|&p| p.to_owned()).collect(),
        );
    }
}

impl ConversationDirectory for FakeDirectory {
    fn participants(&self, conversation: &ConversationId) -> Option<Vec<String>> {
        self.established.lock().unwrap().get(conversation).cloned()
    }

    fn pending_participants(&self, conversation: &ConversationId) -> Option<Vec<String>> {
        self.pending.lock().unwrap().get(conversation).cloned()
    }
}

/// Fully wired coordinator plus handles to every double.
pub struct Harness {
    pub coordinator: Arc<Coordinator>,
    pub teams: Arc<FakeTeams>,
    pub chat: Arc<FakeChat>,
    pub navigator: Arc<RecordingNavigator>,
    pub sms: Arc<FakeSms>,
    pub errors: Arc<RecordingSink>,
    pub directory: Arc<FakeDirectory>,
}

/// Harness signed in as `alice` on desktop.
pub fn harness() -> Harness {
    harness_with(Session { username: "alice".to_owned(), logged_in: true, mobile: false })
}

/// Harness with an explicit session.
pub fn harness_with(session: Session) -> Harness {
    let teams = FakeTeams::new();
    let chat = FakeChat::new();
    let navigator = Arc::new(RecordingNavigator::default());
    let sms = Arc::new(FakeSms::default());
    let errors = Arc::new(RecordingSink::default());
    let directory = Arc::new(FakeDirectory::default());

    let teams_svc: Arc<dyn TeamService> = teams.clone();
    let chat_svc: Arc<dyn ChatService> = chat.clone();
    let navigator_eff: Arc<dyn Navigator> = navigator.clone();
    let sms_eff: Arc<dyn SmsComposer> = sms.clone();
    let errors_eff: Arc<dyn ErrorSink> = errors.clone();
    let conversations_eff: Arc<dyn ConversationDirectory> = directory.clone();

    let services: Services = Services { teams: teams_svc, chat: chat_svc };
    let effects = Effects {
        navigator: navigator_eff,
        sms: sms_eff,
        errors: errors_eff,
        conversations: conversations_eff,
    };
    let coordinator = Arc::new(Coordinator::new(services, effects, session));

    Harness { coordinator, teams, chat, navigator, sms, errors, directory }
}
