use crate::api::ApiErrorKind;
use crate::notes::PinMutation;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Coordinates every cache-mutating operation: the authoritative reload,
/// deletes, and optimistic pin toggles. All notes-cache writes flow
/// through here or through the identity switches in the auth pages, so
/// interleavings are limited to the suspension points of each request.
#[derive(Clone)]
pub(crate) struct NotesController {
    app_state: AppContext,
}

impl NotesController {
    pub fn new(app_state: AppContext) -> Self {
        Self { app_state }
    }

    fn is_auth_failure(kind: &ApiErrorKind) -> bool {
        matches!(kind, ApiErrorKind::Unauthorized | ApiErrorKind::AuthRequired)
    }

    /// Token expired or missing: sign out and restart at the login page.
    fn handle_unauthorized(&self) {
        let state = &self.app_state.0;
        let mut api_client = state.api_client.get_untracked();
        api_client.logout();
        state.api_client.set(api_client);
        state.current_user.set(None);
        self.invalidate();
        let _ = window().location().set_href("/login");
    }

    /// Fetch-all with stale-response protection: each request is tagged,
    /// and a response whose tag is no longer current is discarded so a
    /// slow old fetch can never clobber a newer one. The cache is
    /// replaced atomically on success and left untouched on any failure.
    pub fn load(&self, force: bool) {
        let state = &self.app_state.0;

        if !force && state.notes_loading.get_untracked() {
            return;
        }

        let req_id = state.notes_request_id.get_untracked().saturating_add(1);
        state.notes_request_id.set(req_id);

        state.notes_loading.set(true);
        state.notes_error.set(None);

        let api_client = state.api_client.get_untracked();
        let s = self.clone();
        spawn_local(async move {
            let result = api_client.get_notes().await;
            let state = &s.app_state.0;

            // Ignore stale responses.
            if state.notes_request_id.get_untracked() != req_id {
                leptos::logging::log!("discarding stale notes response (request {req_id})");
                return;
            }

            match result {
                Ok(notes) => state.notes.update(|cache| cache.replace_all(notes)),
                Err(e) if Self::is_auth_failure(&e.kind) => {
                    s.handle_unauthorized();
                    return;
                }
                Err(e) => state.notes_error.set(Some(e)),
            }
            state.notes_loading.set(false);
        });
    }

    /// Authenticated delete. On success the entry leaves the cache
    /// immediately and a reload reconciles; on failure the cache is left
    /// untouched and the error is surfaced.
    pub fn delete(&self, id: String) {
        // The id must reference a note we currently believe exists.
        if !self.app_state.0.notes.get_untracked().contains(&id) {
            return;
        }

        let api_client = self.app_state.0.api_client.get_untracked();
        let s = self.clone();
        spawn_local(async move {
            let state = &s.app_state.0;
            match api_client.delete_note(&id).await {
                Ok(()) => {
                    state.notes.update(|cache| {
                        cache.remove(&id);
                    });
                    state.action_error.set(None);
                    s.load(true);
                }
                Err(e) if Self::is_auth_failure(&e.kind) => s.handle_unauthorized(),
                Err(e) => state.action_error.set(Some(e)),
            }
        });
    }

    /// Optimistic pin toggle: optimistic -> confirmed | rolled-back, with
    /// the pre-image captured by `PinMutation`. Confirmation hands
    /// authority to a full reload; failure restores exactly the captured
    /// value. Overlapping toggles on one id are last-write-wins locally
    /// and the reload reconciles.
    pub fn set_pinned(&self, id: &str, pinned: bool) {
        let state = &self.app_state.0;

        let Some(mutation) = state
            .notes
            .try_update(|cache| PinMutation::begin(cache, id, pinned))
            .flatten()
        else {
            return;
        };

        let api_client = state.api_client.get_untracked();
        let s = self.clone();
        spawn_local(async move {
            let state = &s.app_state.0;
            let result = api_client.set_note_pinned(mutation.id(), pinned).await;
            match result {
                Ok(_updated) => {
                    mutation.confirm();
                    state.action_error.set(None);
                    s.load(true);
                }
                Err(e) if Self::is_auth_failure(&e.kind) => {
                    state.notes.update(|cache| mutation.roll_back(cache));
                    s.handle_unauthorized();
                }
                Err(e) => {
                    state.notes.update(|cache| mutation.roll_back(cache));
                    state.action_error.set(Some(e));
                }
            }
        });
    }

    /// Identity switched (login/logout/account change): drop everything
    /// the previous account could see and orphan any in-flight fetch.
    pub fn invalidate(&self) {
        let state = &self.app_state.0;
        state
            .notes_request_id
            .update(|id| *id = id.saturating_add(1));
        state.notes.update(|cache| cache.clear());
        state.notes_loading.set(false);
        state.notes_error.set(None);
        state.action_error.set(None);
    }
}
