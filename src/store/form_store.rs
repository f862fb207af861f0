//! Form store: the single owner of wizard state.
//!
//! Every mutation is a [`FormAction`] applied through the pure transition
//! function, then persisted under one storage key, then broadcast to
//! subscribers. The write lock is held for the whole sequence, so readers
//! never observe a half-applied transition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::wizard::model::storage_keys;
use crate::wizard::{CompletedSteps, FormAction, FormState, PersonalInfo, Preferences, StepId};

use super::traits::KeyValueStore;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// On-disk envelope around the state.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSnapshot {
    state: FormState,
    version: u32,
}

/// Observable, persisted wizard state.
pub struct FormStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    state: RwLock<FormState>,
    tx: broadcast::Sender<FormState>,
}

impl FormStore {
    /// Open the store under the default namespace key.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Arc<Self> {
        Self::load_with_key(storage, storage_keys::FORM_STATE).await
    }

    /// Open the store under `key`, restoring any persisted state.
    ///
    /// Missing or undecodable content yields the default empty state.
    pub async fn load_with_key(storage: Arc<dyn KeyValueStore>, key: &str) -> Arc<Self> {
        let initial = read_state(storage.as_ref(), key).await.unwrap_or_default();
        info!(
            backend = storage.name(),
            key,
            personal_info = initial.completed_steps.personal_info,
            preferences = initial.completed_steps.preferences,
            review = initial.completed_steps.review,
            "Form store loaded"
        );
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            storage,
            key: key.to_string(),
            state: RwLock::new(initial),
            tx,
        })
    }

    /// Subscribe to state changes. Each change sends the new snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<FormState> {
        self.tx.subscribe()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.read().await.clone()
    }

    pub async fn personal_info(&self) -> Option<PersonalInfo> {
        self.state.read().await.personal_info.clone()
    }

    pub async fn preferences(&self) -> Option<Preferences> {
        self.state.read().await.preferences.clone()
    }

    pub async fn completed_steps(&self) -> CompletedSteps {
        self.state.read().await.completed_steps
    }

    /// Replace the stored personal info.
    pub async fn set_personal_info(&self, data: PersonalInfo) {
        self.accept(FormAction::SetPersonalInfo(data)).await;
    }

    /// Replace the stored preferences.
    pub async fn set_preferences(&self, data: Preferences) {
        self.accept(FormAction::SetPreferences(data)).await;
    }

    /// Set the completion flag of `step`, leaving the others untouched.
    pub async fn set_step_completed(&self, step: StepId) -> Result<(), StoreError> {
        self.dispatch(FormAction::MarkCompleted(step)).await.map(|_| ())
    }

    /// Store personal info and mark its step completed as one transition.
    pub async fn complete_personal_info(&self, data: PersonalInfo) {
        self.accept(FormAction::CommitPersonalInfo(data)).await;
    }

    /// Store preferences and mark its step completed as one transition.
    pub async fn complete_preferences(&self, data: Preferences) {
        self.accept(FormAction::CommitPreferences(data)).await;
    }

    /// Clear all data and completion flags.
    pub async fn reset(&self) {
        self.accept(FormAction::Reset).await;
    }

    /// Re-read the persisted entry, replacing in-memory state if it differs.
    ///
    /// This is how a write made by another instance sharing the same
    /// storage becomes visible. Returns whether the state changed.
    pub async fn reload(&self) -> bool {
        let mut state = self.state.write().await;
        let loaded = read_state(self.storage.as_ref(), &self.key)
            .await
            .unwrap_or_default();
        if *state == loaded {
            return false;
        }
        *state = loaded.clone();
        drop(state);
        info!(key = %self.key, "Form state reloaded from storage");
        let _ = self.tx.send(loaded);
        true
    }

    /// Apply an action that cannot fail.
    async fn accept(&self, action: FormAction) {
        if let Err(e) = self.dispatch(action).await {
            // Only MarkCompleted can be rejected.
            warn!("Unexpected form transition rejection: {e}");
        }
    }

    /// Apply `action`, persist the result, and notify subscribers.
    async fn dispatch(&self, action: FormAction) -> Result<FormState, StoreError> {
        let name = action.name();
        let mut state = self.state.write().await;
        let next = match state.apply(action) {
            Ok(next) => next,
            Err(e) => {
                warn!(action = name, "Form transition rejected: {e}");
                return Err(e);
            }
        };

        self.persist(&next).await;

        let changed = *state != next;
        *state = next.clone();
        drop(state);

        debug!(action = name, changed, "Form transition applied");
        if changed {
            // Ok if nobody is listening.
            let _ = self.tx.send(next.clone());
        }
        Ok(next)
    }

    /// Write `state` to storage, removing the entry when `state` is empty.
    /// Failures are logged, not returned.
    async fn persist(&self, state: &FormState) {
        if *state == FormState::default() {
            if let Err(e) = self.storage.delete(&self.key).await {
                warn!("Failed to remove form state: {}", e);
            }
            return;
        }
        let value = match encode(state) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to serialize form state: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &value).await {
            warn!("Failed to persist form state: {}", e);
        }
    }
}

/// Serialize `state` in the persisted envelope.
pub fn encode(state: &FormState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedSnapshot {
        state: state.clone(),
        version: storage_keys::SNAPSHOT_VERSION,
    })
}

/// Decode a persisted envelope.
///
/// Returns `None` for content that is not a snapshot of the current
/// version. Data that fails its step's validation is dropped, and
/// completion flags without backing data are cleared.
pub fn decode(raw: &str) -> Option<FormState> {
    let snapshot: PersistedSnapshot = match serde_json::from_str(raw) {
        Ok(s) => s,
        Err(e) => {
            warn!("Discarding undecodable form snapshot: {}", e);
            return None;
        }
    };
    if snapshot.version != storage_keys::SNAPSHOT_VERSION {
        warn!(
            found = snapshot.version,
            expected = storage_keys::SNAPSHOT_VERSION,
            "Discarding form snapshot with unsupported version"
        );
        return None;
    }
    let mut state = snapshot.state;
    let cleared = state.normalize();
    if !cleared.is_empty() {
        warn!(?cleared, "Cleared completion flags without valid data");
    }
    Some(state)
}

async fn read_state(storage: &dyn KeyValueStore, key: &str) -> Option<FormState> {
    match storage.get(key).await {
        Ok(Some(raw)) => decode(&raw),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read form state, starting empty: {}", e);
            None
        }
    }
}
