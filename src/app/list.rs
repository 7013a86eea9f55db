//! List controller: the client-side view of the record collection.
//!
//! Holds the fetched records plus search, pagination, selection and expansion
//! state. The visible page is always derived via [`crate::search`]. Writes are
//! built here as [`Mutation`]s, sent elsewhere, and handed back to
//! [`ListController::finish_write`], which reloads on success so the list
//! reflects the server rather than the local draft.
//!
//! Reloads are split into [`ListController::begin_reload`] and
//! [`ListController::finish_reload`] so the UI loop can run the request on a
//! background task. Each reload gets a generation number and only the latest
//! generation is applied.

use tracing::{debug, info, warn};

use crate::api::UsersApi;
use crate::error::ApiError;
use crate::model::{Record, RecordFields, RecordId};
use crate::search::{filter_records, page_slice, total_pages};

pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const LOAD_FALLBACK: &str = "Error loading users";
pub const SAVE_FALLBACK: &str = "An error occurred while saving";
pub const DELETE_FALLBACK: &str = "Could not delete the user";

/// A write against the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create(RecordFields),
    Update(RecordId, RecordFields),
    Remove(RecordId),
}

impl Mutation {
    /// Send this write through `api`.
    pub async fn send(&self, api: &dyn UsersApi) -> Result<(), ApiError> {
        match self {
            Mutation::Create(fields) => api.create(fields).await.map(|_| ()),
            Mutation::Update(id, fields) => api.update(*id, fields).await.map(|_| ()),
            Mutation::Remove(id) => api.remove(*id).await,
        }
    }

    /// Message shown when the write fails without a message of its own.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Mutation::Create(_) | Mutation::Update(..) => SAVE_FALLBACK,
            Mutation::Remove(_) => DELETE_FALLBACK,
        }
    }
}

/// The user's answer to a delete prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

#[derive(Clone, Debug)]
pub struct ListController {
    records: Vec<Record>,
    search_query: String,
    page: usize,
    page_size: usize,
    selected: usize,
    expanded_id: Option<RecordId>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListController {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            search_query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            selected: 0,
            expanded_id: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn expanded_id(&self) -> Option<RecordId> {
        self.expanded_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records matching the current search.
    pub fn filtered(&self) -> Vec<&Record> {
        filter_records(&self.records, &self.search_query)
    }

    pub fn result_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.result_count(), self.page_size)
    }

    /// The current page of the filtered records.
    pub fn paged(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        page_slice(&filtered, self.page, self.page_size).to_vec()
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.paged().get(self.selected).copied()
    }

    /// Mark a reload as started and return its generation.
    pub fn begin_reload(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        debug!(generation = self.generation, "list: reload started");
        self.generation
    }

    /// Apply the result of reload `generation`. Returns `false` when a newer
    /// reload has started since, in which case nothing changes.
    pub fn finish_reload(
        &mut self,
        generation: u64,
        result: Result<Vec<Record>, ApiError>,
    ) -> bool {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "list: stale reload discarded");
            return false;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                info!(count = records.len(), "list: records loaded");
                self.records = records;
                self.page = 1;
                self.error = None;
                let expanded_gone = self
                    .expanded_id
                    .is_some_and(|id| !self.records.iter().any(|r| r.id == Some(id)));
                if expanded_gone {
                    self.expanded_id = None;
                }
                self.clamp_selection();
            }
            Err(e) => {
                warn!(error = %e, "list: reload failed");
                self.error = Some(e.user_message(LOAD_FALLBACK));
            }
        }
        true
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.page = 1;
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.paged().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Expand `id`'s detail panel, or collapse it if it is already open.
    pub fn toggle_expand(&mut self, id: RecordId) {
        self.expanded_id = if self.expanded_id == Some(id) { None } else { Some(id) };
    }

    /// A write creating a record from `fields`.
    pub fn create(&self, fields: RecordFields) -> Mutation {
        Mutation::Create(fields)
    }

    /// A write replacing the editable fields of `id`.
    pub fn update(&self, id: RecordId, fields: RecordFields) -> Mutation {
        Mutation::Update(id, fields)
    }

    /// A delete of `id`, only once the user has accepted the prompt.
    pub fn remove(&self, id: RecordId, confirmation: Confirmation) -> Option<Mutation> {
        match confirmation {
            Confirmation::Accepted => Some(Mutation::Remove(id)),
            Confirmation::Declined => {
                debug!(id, "list: delete declined");
                None
            }
        }
    }

    /// Apply the result of a write. Success starts a reload and returns its
    /// generation for the caller to fetch. Failure leaves the records as they
    /// were and returns the message to show.
    pub fn finish_write(
        &mut self,
        mutation: &Mutation,
        result: Result<(), ApiError>,
    ) -> Result<u64, String> {
        match result {
            Ok(()) => {
                info!(?mutation, "list: write applied");
                Ok(self.begin_reload())
            }
            Err(e) => {
                warn!(error = %e, ?mutation, "list: write failed");
                Err(e.user_message(mutation.failure_fallback()))
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.paged().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
