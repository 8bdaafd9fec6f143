pub(crate) mod notes;

use crate::api::{ApiClient, ApiError};
use crate::models::AccountInfo;
use crate::notes::{CategoryFilter, NoteStore};
use crate::storage::load_user_from_storage;
use leptos::prelude::*;

pub(crate) use notes::NotesController;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Notes cache for the signed-in account. Held as one owned value so
    /// reloads swap it atomically.
    pub notes: RwSignal<NoteStore>,
    pub notes_loading: RwSignal<bool>,
    /// Load failures: the list itself could not be (re)fetched.
    pub notes_error: RwSignal<Option<ApiError>>,

    /// Fetch guard: responses tagged with an older id are discarded.
    pub notes_request_id: RwSignal<u64>,

    /// Delete/pin failures. Kept apart from `notes_error` so a failed
    /// action never masquerades as an empty or errored list.
    pub action_error: RwSignal<Option<ApiError>>,

    /// Dashboard view selectors.
    pub selected_category: RwSignal<CategoryFilter>,
    pub search_query: RwSignal<String>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let stored_user = load_user_from_storage();

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            notes: RwSignal::new(NoteStore::new()),
            notes_loading: RwSignal::new(false),
            notes_error: RwSignal::new(None),
            notes_request_id: RwSignal::new(0),
            action_error: RwSignal::new(None),
            selected_category: RwSignal::new(CategoryFilter::All),
            search_query: RwSignal::new(String::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
