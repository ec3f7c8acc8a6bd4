//! Client-side state and the pure reducer that evolves it.
//!
//! # Design
//! Every mutation of `TodoState` goes through `reduce`, a pure
//! `(state, action) -> state` transition over the closed `TodoAction` set.
//! The store decides *when* to dispatch; the reducer decides *what* each
//! action does to the cache. Nothing here performs I/O.

use serde::Serialize;

use crate::error::ErrorKind;
use crate::types::{Filters, FiltersPatch, Pagination, Todo, TodoId, TodoPage};

/// Snapshot the UI renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// Cached collection in server order, unique by id.
    pub todos: Vec<Todo>,
    /// A request is in flight.
    pub loading: bool,
    /// Message of the last failure, for the ambient error banner.
    pub error: Option<String>,
    /// Category of the last failure. Set and cleared together with `error`.
    pub error_kind: Option<ErrorKind>,
    /// A pull-to-refresh is in flight. Only ever true while `loading` is.
    pub refreshing: bool,
    /// Paging info of the last successful list fetch.
    pub pagination: Option<Pagination>,
    pub filters: Filters,
}

impl Default for TodoState {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            loading: false,
            error: None,
            error_kind: None,
            refreshing: false,
            pagination: None,
            filters: Filters::default(),
        }
    }
}

impl TodoState {
    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Whether the server reported pages after the current one.
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .map(|p| p.page < p.total_pages)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    /// A list fetch begins. Clears the previous error.
    FetchStarted { refreshing: bool },
    /// A list fetch succeeded: the page and the filters that produced it
    /// replace the cached ones wholesale.
    FetchSucceeded { page: TodoPage, filters: Filters },
    /// A create, update or delete begins.
    RequestStarted,
    /// Any operation failed.
    RequestFailed { kind: ErrorKind, message: String },
    /// The in-flight request settled, whatever its outcome.
    RequestSettled,
    /// A newly created todo goes to the front.
    TodoAdded(Todo),
    /// Replace the cached todo with the same id, in place.
    TodoReplaced(Todo),
    TodoRemoved(TodoId),
    FiltersChanged(FiltersPatch),
    ErrorCleared,
}

pub fn reduce(state: &mut TodoState, action: TodoAction) {
    match action {
        TodoAction::FetchStarted { refreshing } => {
            state.loading = true;
            state.refreshing = state.refreshing || refreshing;
            state.error = None;
            state.error_kind = None;
        }
        TodoAction::FetchSucceeded { page, filters } => {
            state.todos = page.data;
            state.pagination = Some(page.pagination);
            state.filters = filters;
            state.error = None;
            state.error_kind = None;
        }
        TodoAction::RequestStarted => {
            state.loading = true;
        }
        TodoAction::RequestFailed { kind, message } => {
            state.error = Some(message);
            state.error_kind = Some(kind);
        }
        TodoAction::RequestSettled => {
            state.loading = false;
            state.refreshing = false;
        }
        TodoAction::TodoAdded(todo) => {
            state.todos.retain(|t| t.id != todo.id);
            state.todos.insert(0, todo);
        }
        TodoAction::TodoReplaced(todo) => {
            if let Some(slot) = state.todos.iter_mut().find(|t| t.id == todo.id) {
                *slot = todo;
            }
        }
        TodoAction::TodoRemoved(id) => {
            state.todos.retain(|t| t.id != id);
        }
        TodoAction::FiltersChanged(patch) => {
            state.filters = state.filters.merge(&patch);
        }
        TodoAction::ErrorCleared => {
            state.error = None;
            state.error_kind = None;
        }
    }
}
