//! Invoice Board
//!
//! State behind the invoice list screen. Each slice is owned here and the
//! displayed rows are recomputed from them after every change, so the list,
//! search results, sort and editor can never disagree.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::warn;

use crate::{
    api::{ApiError, InvoicesApi},
    editor::{Editor, EditorMode},
    models::{Invoice, InvoicePage, ListQuery},
    notices::Notices,
    sort::{SortColumn, SortState},
    validation,
};

/// Page size the board requests.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// The page last loaded from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Invoices on the page, in server order.
    pub invoices: Vec<Invoice>,
    /// One-based page number.
    pub current_page: u64,
    /// Last page number.
    pub last_page: u64,
    /// Invoices across all pages.
    pub total: u64,
    /// Page size requested.
    pub per_page: u64,
}

impl ListState {
    fn empty(per_page: u64) -> Self {
        Self {
            invoices: Vec::new(),
            current_page: 1,
            last_page: 1,
            total: 0,
            per_page,
        }
    }

    fn replace_page(&mut self, page: InvoicePage) {
        self.invoices = page.data;
        self.current_page = page.current_page;
        self.last_page = page.last_page;
        self.total = page.total;
        self.per_page = page.per_page;
    }
}

/// Search box state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// What is in the search box.
    pub input: String,

    /// The submitted term, `None` while not searching.
    pub term: Option<String>,

    /// Results for `term`.
    pub results: Vec<Invoice>,
}

impl SearchState {
    /// Whether a search has been submitted.
    pub fn is_active(&self) -> bool {
        self.term.is_some()
    }
}

/// Rows to display: the search results while a search is active, otherwise
/// the current page, with the active sort applied.
pub fn derive_view(list: &ListState, search: &SearchState, sort: &SortState) -> Vec<Invoice> {
    let mut view = if search.is_active() {
        search.results.clone()
    } else {
        list.invoices.clone()
    };

    sort.apply(&mut view);

    view
}

fn save_failure(error: &ApiError) -> String {
    match error {
        ApiError::NotFound => "This invoice no longer exists.".to_string(),
        ApiError::Conflict => {
            "This invoice was changed by someone else. Reload it and try again.".to_string()
        }
        ApiError::Server { message, .. } => message.clone(),
        ApiError::Validation(_) | ApiError::Transport(_) => {
            "Failed to save invoice. Please try again.".to_string()
        }
    }
}

/// State of the invoice list screen.
pub struct InvoiceBoard {
    api: Arc<dyn InvoicesApi>,
    list: ListState,
    search: SearchState,
    sort: SortState,
    editor: Option<Editor>,
    notices: Notices,
    pending_delete: Option<i64>,
    view: Vec<Invoice>,
}

impl std::fmt::Debug for InvoiceBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceBoard")
            .field("list", &self.list)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .field("pending_delete", &self.pending_delete)
            .finish_non_exhaustive()
    }
}

impl InvoiceBoard {
    /// Board with [`DEFAULT_PER_PAGE`] rows per page; nothing is loaded yet.
    pub fn new(api: Arc<dyn InvoicesApi>) -> Self {
        Self::with_per_page(api, DEFAULT_PER_PAGE)
    }

    /// Board requesting `per_page` rows per page.
    pub fn with_per_page(api: Arc<dyn InvoicesApi>, per_page: u64) -> Self {
        Self {
            api,
            list: ListState::empty(per_page),
            search: SearchState::default(),
            sort: SortState::default(),
            editor: None,
            notices: Notices::default(),
            pending_delete: None,
            view: Vec::new(),
        }
    }

    /// The committed page.
    pub fn list(&self) -> &ListState {
        &self.list
    }

    /// Search input and results.
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Active sort.
    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// The open editor, if any.
    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    /// The open editor, for edits to its draft.
    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        self.editor.as_mut()
    }

    /// Banners.
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Banners, to dismiss or expire them.
    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Invoice awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Rows to display.
    pub fn view(&self) -> &[Invoice] {
        &self.view
    }

    fn refresh_view(&mut self) {
        self.view = derive_view(&self.list, &self.search, &self.sort);
    }

    /// Load `page` from the server, replacing the current page.
    pub async fn load_page(&mut self, page: u64) {
        self.notices.dismiss_error();

        match self
            .api
            .list_invoices(ListQuery::page(page, self.list.per_page))
            .await
        {
            Ok(loaded) => {
                self.list.replace_page(loaded);
                self.refresh_view();
            }
            Err(error) => {
                warn!(%error, page, "failed to load invoices");

                self.notices
                    .set_error("Failed to load invoices. Please try again.");
            }
        }
    }

    /// Returns `false` without a request when `page` is out of range.
    pub async fn go_to_page(&mut self, page: u64) -> bool {
        if page < 1 || page > self.list.last_page {
            return false;
        }

        self.load_page(page).await;

        true
    }

    /// Typing only updates the input; nothing is sent until submit.
    pub fn set_search_input(&mut self, input: impl Into<String>) {
        self.search.input = input.into();
    }

    /// Search for the trimmed input. A blank input clears the search.
    pub async fn submit_search(&mut self) {
        let term = self.search.input.trim().to_string();

        if term.is_empty() {
            self.search.term = None;
            self.search.results.clear();
            self.refresh_view();

            return;
        }

        self.search.term = Some(term);
        self.run_search().await;
    }

    /// Leave search and show the committed page again.
    pub fn clear_search(&mut self) {
        self.search = SearchState::default();
        self.refresh_view();
    }

    async fn run_search(&mut self) {
        let Some(term) = self.search.term.clone() else {
            return;
        };

        match self.api.search_invoices(term).await {
            Ok(results) => {
                self.search.results = results;
                self.refresh_view();
            }
            Err(error) => {
                warn!(%error, "failed to search invoices");

                self.notices
                    .set_error("Failed to search invoices. Please try again.");
            }
        }
    }

    /// Sort by `column`, flipping direction when it is already active.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.toggle(column);
        self.refresh_view();
    }

    fn find(&self, id: i64) -> Option<&Invoice> {
        self.view.iter().find(|invoice| invoice.id == id)
    }

    /// Returns `false` when `id` is not on screen.
    pub fn open_view(&mut self, id: i64) -> bool {
        self.open(EditorMode::View, id)
    }

    /// Returns `false` when `id` is not on screen.
    pub fn open_edit(&mut self, id: i64) -> bool {
        self.open(EditorMode::Edit, id)
    }

    fn open(&mut self, mode: EditorMode, id: i64) -> bool {
        let Some(editor) = self.find(id).map(|invoice| Editor::open(mode, invoice)) else {
            return false;
        };

        self.notices.clear();
        self.editor = Some(editor);

        true
    }

    /// Close the editor, discarding the draft.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validate and send the edit buffer. Returns `true` once the server has
    /// accepted it and the editor has closed.
    pub async fn save(&mut self) -> bool {
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };

        if editor.mode() != EditorMode::Edit {
            return false;
        }

        let id = editor.original().id;
        let version = Some(editor.original().version);

        let payload = match validation::validate(editor.draft(), version) {
            Ok(payload) => payload,
            Err(errors) => {
                editor.set_errors(errors);
                return false;
            }
        };

        self.notices.dismiss_error();

        match self.api.update_invoice(id, payload).await {
            Ok(updated) => {
                if let Some(slot) = self.list.invoices.iter_mut().find(|invoice| invoice.id == id)
                {
                    *slot = updated;
                }

                self.editor = None;
                self.notices
                    .show_success("Invoice updated successfully!", Timestamp::now());

                if self.search.is_active() {
                    self.run_search().await;
                }

                self.refresh_view();

                true
            }
            Err(ApiError::Validation(errors)) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_errors(errors.rephrase_duplicate_number());
                }

                false
            }
            Err(error) => {
                warn!(%error, invoice_id = id, "failed to save invoice");

                self.notices.set_error(save_failure(&error));

                false
            }
        }
    }

    /// First half of a delete; nothing is sent until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    /// Drop the pending delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the invoice awaiting confirmation. The confirmation is used up
    /// on the first call, so a repeated confirm sends nothing.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };

        let number = self
            .find(id)
            .or_else(|| self.list.invoices.iter().find(|invoice| invoice.id == id))
            .map_or_else(|| id.to_string(), |invoice| invoice.number.clone());

        self.notices.clear();

        if let Err(error) = self.api.delete_invoice(id).await {
            warn!(%error, invoice_id = id, "failed to delete invoice");

            self.notices
                .set_error("Failed to delete invoice. Please try again.");

            return false;
        }

        self.list.invoices.retain(|invoice| invoice.id != id);
        self.list.total = self.list.total.saturating_sub(1);
        self.notices.show_success(
            format!("Invoice {number} has been deleted successfully."),
            Timestamp::now(),
        );

        if self.search.is_active() {
            self.run_search().await;
        } else if self.list.invoices.is_empty() && self.list.current_page > 1 {
            self.load_page(self.list.current_page - 1).await;
        }

        self.refresh_view();

        true
    }
}
