//! Controller for `/coffee-store/{id}`.
//!
//! On mount the page resolves which record to show, stores it on the server,
//! and then polls the server for the live vote count until unmounted.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use nextcoffee_core::StoreRecord;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::context::{ApplicationState, StoreContext};
use crate::poll::{PollLoop, SequenceGate};
use crate::view::{DetailView, DETAIL_ERROR_MESSAGE};

/// Where the displayed record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No page props and the session has no store list yet.
    Unresolved,
    ResolvedFromProps,
    ResolvedFromState,
    /// The session list is loaded but has no such id. Terminal.
    NotFound,
}

/// Pick the record for `id` from navigation props or the session list.
#[must_use]
pub fn resolve_record(
    id: &str,
    props: Option<&StoreRecord>,
    stores: &[StoreRecord],
) -> (Resolution, Option<StoreRecord>) {
    if let Some(props) = props.filter(|p| !p.is_empty()) {
        return (Resolution::ResolvedFromProps, Some(props.clone()));
    }
    if stores.is_empty() {
        return (Resolution::Unresolved, None);
    }
    match stores.iter().find(|s| s.id == id) {
        Some(found) => (Resolution::ResolvedFromState, Some(found.clone())),
        None => (Resolution::NotFound, None),
    }
}

#[derive(Debug)]
struct DetailState {
    resolution: Resolution,
    record: Option<StoreRecord>,
    voting: i64,
    error: String,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<DetailState>,
    gate: Arc<SequenceGate>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, DetailState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct DetailController {
    api: ApiClient,
    ctx: StoreContext,
    id: String,
    poll_interval: Duration,
    shared: Arc<Shared>,
    poll: Option<PollLoop>,
}

impl DetailController {
    #[must_use]
    pub fn new(api: ApiClient, ctx: StoreContext, id: &str, poll_interval: Duration) -> Self {
        Self {
            api,
            ctx,
            id: id.to_owned(),
            poll_interval,
            shared: Arc::new(Shared {
                state: Mutex::new(DetailState {
                    resolution: Resolution::Unresolved,
                    record: None,
                    voting: 0,
                    error: String::new(),
                }),
                gate: Arc::new(SequenceGate::new()),
            }),
            poll: None,
        }
    }

    /// Load page props, resolve the record, store it, and start polling.
    pub async fn mount(&mut self) {
        let props = match self.api.coffee_store_props(&self.id).await {
            Ok(props) => props,
            Err(e) => {
                tracing::warn!(error = %e, id = %self.id, "failed to load coffee store page props");
                None
            }
        };

        let state = self.ctx.state();
        let (resolution, record) = resolve_record(&self.id, props.as_ref(), state.coffee_stores());
        self.apply_resolution(resolution, record).await;
        self.start_polling();
    }

    /// Re-run resolution after the session store list changed. Only an
    /// unresolved page reacts.
    pub async fn observe_context(&self, state: &ApplicationState) {
        if self.resolution() != Resolution::Unresolved {
            return;
        }
        let (resolution, record) = resolve_record(&self.id, None, state.coffee_stores());
        self.apply_resolution(resolution, record).await;
    }

    /// Feed the latest dispatch seen on `changes` into [`Self::observe_context`].
    ///
    /// Returns `false` without doing anything when nothing was dispatched
    /// since the receiver was last marked seen.
    pub async fn sync_context(&self, changes: &mut watch::Receiver<ApplicationState>) -> bool {
        if !changes.has_changed().unwrap_or(false) {
            return false;
        }
        let state = changes.borrow_and_update().clone();
        self.observe_context(&state).await;
        true
    }

    /// Vote for the store. On success the displayed count goes up by one
    /// straight away; returns whether the server counted the vote.
    pub async fn upvote(&self) -> bool {
        match self.api.favourite_coffee_store(&self.id).await {
            Ok(Some(_)) => {
                self.shared.lock().voting += 1;
                true
            }
            Ok(None) => {
                tracing::debug!(id = %self.id, "upvote ignored: store not stored yet");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, id = %self.id, "Error upvoting coffee shop");
                false
            }
        }
    }

    /// Stop polling. A poll response still in flight is discarded.
    pub fn unmount(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.stop();
        }
        self.shared.gate.close();
    }

    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.shared.lock().resolution
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poll.as_ref().is_some_and(|p| !p.is_stopped())
    }

    #[must_use]
    pub fn view(&self) -> DetailView {
        let state = self.shared.lock();
        let record = match state.resolution {
            Resolution::NotFound => None,
            _ => state.record.as_ref(),
        };
        DetailView::build(record, state.voting, &state.error)
    }

    async fn apply_resolution(&self, resolution: Resolution, record: Option<StoreRecord>) {
        {
            let mut state = self.shared.lock();
            state.resolution = resolution;
            if let Some(record) = &record {
                state.voting = record.voting;
                state.record = Some(record.clone());
            }
        }

        if let Some(record) = record {
            if let Err(e) = self.api.create_coffee_store(&record).await {
                tracing::error!(error = %e, id = %record.id, "Error creating coffee shop");
            }
        }
    }

    fn start_polling(&mut self) {
        if self.poll.is_some() {
            return;
        }
        let api = self.api.clone();
        let id = self.id.clone();
        let shared = Arc::clone(&self.shared);
        let gate = Arc::clone(&self.shared.gate);

        self.poll = Some(PollLoop::spawn(self.poll_interval, gate, move || {
            let api = api.clone();
            let id = id.clone();
            let shared = Arc::clone(&shared);
            async move { poll_once(&api, &id, &shared).await }
        }));
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn poll_once(api: &ApiClient, id: &str, shared: &Shared) {
    let sequence = shared.gate.issue();
    let result = api.coffee_store_by_id(id).await;
    if !shared.gate.accept(sequence) {
        return;
    }

    let mut state = shared.lock();
    match result {
        Ok(Some(record)) => {
            state.voting = record.voting;
            state.record = Some(record);
            state.error.clear();
        }
        Ok(None) => state.error.clear(),
        Err(e) => {
            tracing::warn!(error = %e, id, "coffee store poll failed");
            DETAIL_ERROR_MESSAGE.clone_into(&mut state.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: &str) -> StoreRecord {
        StoreRecord {
            id: id.to_string(),
            name: format!("Store {id}"),
            ..StoreRecord::default()
        }
    }

    #[test]
    fn props_win_over_session_list() {
        let props = store("a");
        let (resolution, record) = resolve_record("a", Some(&props), &[store("b")]);
        assert_eq!(resolution, Resolution::ResolvedFromProps);
        assert_eq!(record.map(|r| r.id), Some("a".to_owned()));
    }

    #[test]
    fn empty_props_fall_back_to_session_list() {
        let empty = StoreRecord::default();
        let (resolution, record) = resolve_record("b", Some(&empty), &[store("a"), store("b")]);
        assert_eq!(resolution, Resolution::ResolvedFromState);
        assert_eq!(record.map(|r| r.name), Some("Store b".to_owned()));
    }

    #[test]
    fn no_match_in_loaded_list_is_not_found() {
        let (resolution, record) = resolve_record("zzz", None, &[store("a")]);
        assert_eq!(resolution, Resolution::NotFound);
        assert!(record.is_none());
    }

    #[test]
    fn empty_list_and_props_stay_unresolved() {
        let (resolution, record) = resolve_record("a", None, &[]);
        assert_eq!(resolution, Resolution::Unresolved);
        assert!(record.is_none());
    }
}
