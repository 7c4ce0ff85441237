//! Refcounted busy-tracking for in-flight operations.
//!
//! Every handler that performs remote work acquires a [`WaitingGuard`] before
//! its first call; dropping the guard releases the count on every exit path,
//! success or failure. Keys are composite (`operation:entity`) so distinct
//! operations, or the same operation on distinct entities, never contend.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::types::{ConversationId, Teamname};

/// Composite key identifying one logical in-flight operation instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaitingKey(String);

impl WaitingKey {
    /// Key for a details fetch of one team.
    pub fn get_details(team: &Teamname) -> Self {
        Self(format!("getDetails:{team}"))
    }

    /// Key for a channel-list fetch of one team.
    pub fn get_channels(team: &Teamname) -> Self {
        Self(format!("getChannels:{team}"))
    }

    /// Key for a bulk channel-membership save on one team.
    pub fn save_channels(team: &Teamname) -> Self {
        Self(format!("saveChannel:{team}"))
    }

    /// Key for a publicity-settings update on one team.
    pub fn set_publicity(team: &Teamname) -> Self {
        Self(format!("setPublicity:{team}"))
    }

    /// Key for a topic update on one conversation.
    pub fn update_topic(conversation: &ConversationId) -> Self {
        Self(format!("updateTopic:{conversation}"))
    }

    /// Key for a channel rename on one conversation.
    pub fn update_channel_name(conversation: &ConversationId) -> Self {
        Self(format!("updateChannelName:{conversation}"))
    }

    /// The composite string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaitingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared counter map of in-flight operations.
///
/// Counts never go negative and return to zero once every guard referencing
/// a key has dropped. Cloning shares the underlying counters.
#[derive(Debug, Clone, Default)]
pub struct WaitingTracker {
    counts: Arc<Mutex<HashMap<WaitingKey, u32>>>,
}

impl WaitingTracker {
    /// New tracker with no in-flight operations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one operation in flight; the returned guard releases it on drop.
    pub fn begin(&self, key: WaitingKey) -> WaitingGuard {
        *self.lock().entry(key.clone()).or_insert(0) += 1;
        WaitingGuard { counts: Arc::clone(&self.counts), key }
    }

    /// In-flight count for a key.
    pub fn count(&self, key: &WaitingKey) -> u32 {
        self.lock().get(key).copied().unwrap_or(0)
    }

    /// Whether any operation is in flight for a key.
    pub fn is_waiting(&self, key: &WaitingKey) -> bool {
        self.count(key) > 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WaitingKey, u32>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII release for one in-flight operation.
#[derive(Debug)]
pub struct WaitingGuard {
    counts: Arc<Mutex<HashMap<WaitingKey, u32>>>,
    key: WaitingKey,
}

impl Drop for WaitingGuard {
    fn drop(&mut self) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        match counts.get_mut(&self.key) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                counts.remove(&self.key);
            },
            None => {
                tracing::warn!(key = %self.key, "waiting release without matching acquire");
            },
        }
    }
}
