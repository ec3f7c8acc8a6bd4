//! The state container: single owner of `TodoState`.
//!
//! # Design
//! - State lives in a `tokio::sync::watch` channel. `snapshot` clones the
//!   current value; `subscribe` hands the UI a receiver that wakes on every
//!   commit.
//! - Each operation performs at most one `TodoApi` call and commits its
//!   outcome as one batch of reducer actions, so subscribers never see a
//!   half-applied result.
//! - Overlapping calls are not deduplicated or cancelled. Whichever response
//!   settles last wins.
//! - `toggle_completed` applies its change before the network call and
//!   restores the pre-toggle todo if the call fails. On success the server's
//!   echo is not merged back; the next list fetch reconciles.

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::state::{reduce, TodoAction, TodoState};
use crate::types::{CreateTodo, FiltersPatch, Todo, TodoId, UpdateTodo};

/// Recorded when an optimistic toggle has to be reverted.
pub const TOGGLE_FAILED_MESSAGE: &str = "Failed to toggle todo";

pub struct TodoStore<A> {
    api: A,
    state: watch::Sender<TodoState>,
}

impl<A: TodoApi> TodoStore<A> {
    pub fn new(api: A) -> Self {
        Self::with_state(api, TodoState::default())
    }

    pub fn with_state(api: A, initial: TodoState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { api, state }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    fn commit<I>(&self, actions: I)
    where
        I: IntoIterator<Item = TodoAction>,
    {
        self.state.send_modify(|state| {
            for action in actions {
                reduce(state, action);
            }
        });
    }

    /// Fetch a page with `overrides` merged onto the active filters. The
    /// merged filters become active only if the fetch succeeds.
    pub async fn list(&self, overrides: Option<FiltersPatch>) -> Result<(), ApiError> {
        self.fetch(overrides, false).await
    }

    /// `list` with the active filters, flagged as a pull-to-refresh.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.fetch(None, true).await
    }

    async fn fetch(&self, overrides: Option<FiltersPatch>, refreshing: bool) -> Result<(), ApiError> {
        let filters = {
            let state = self.state.borrow();
            match &overrides {
                Some(patch) => state.filters.merge(patch),
                None => state.filters.clone(),
            }
        };
        self.commit([TodoAction::FetchStarted { refreshing }]);

        match self.api.list(&filters).await {
            Ok(page) => {
                debug!(
                    count = page.data.len(),
                    page = page.pagination.page,
                    total = page.pagination.total,
                    "fetched todos"
                );
                self.commit([
                    TodoAction::FetchSucceeded { page, filters },
                    TodoAction::RequestSettled,
                ]);
                Ok(())
            }
            Err(err) => {
                warn!(error = ?err, "failed to fetch todos");
                self.commit([failed(&err), TodoAction::RequestSettled]);
                Err(err)
            }
        }
    }

    /// Read-through fetch of one todo. The cached collection is untouched
    /// either way; a failure is recorded and returned.
    pub async fn get(&self, id: TodoId) -> Result<Todo, ApiError> {
        self.api.get(id).await.map_err(|err| {
            warn!(id, error = ?err, "failed to fetch todo");
            self.commit([failed(&err)]);
            err
        })
    }

    pub async fn create(&self, input: CreateTodo) -> Result<Todo, ApiError> {
        self.commit([TodoAction::RequestStarted]);
        match self.api.create(&input).await {
            Ok(todo) => {
                debug!(id = todo.id, "created todo");
                self.commit([TodoAction::TodoAdded(todo.clone()), TodoAction::RequestSettled]);
                Ok(todo)
            }
            Err(err) => {
                warn!(error = ?err, "failed to create todo");
                self.commit([failed(&err), TodoAction::RequestSettled]);
                Err(err)
            }
        }
    }

    pub async fn update(&self, id: TodoId, fields: UpdateTodo) -> Result<Todo, ApiError> {
        self.commit([TodoAction::RequestStarted]);
        match self.api.update(id, &fields).await {
            Ok(todo) => {
                debug!(id, "updated todo");
                self.commit([TodoAction::TodoReplaced(todo.clone()), TodoAction::RequestSettled]);
                Ok(todo)
            }
            Err(err) => {
                warn!(id, error = ?err, "failed to update todo");
                self.commit([failed(&err), TodoAction::RequestSettled]);
                Err(err)
            }
        }
    }

    /// Remove a todo once the server confirms. Nothing is removed speculatively.
    pub async fn delete(&self, id: TodoId) -> Result<(), ApiError> {
        self.commit([TodoAction::RequestStarted]);
        match self.api.delete(id).await {
            Ok(()) => {
                debug!(id, "deleted todo");
                self.commit([TodoAction::TodoRemoved(id), TodoAction::RequestSettled]);
                Ok(())
            }
            Err(err) => {
                warn!(id, error = ?err, "failed to delete todo");
                self.commit([failed(&err), TodoAction::RequestSettled]);
                Err(err)
            }
        }
    }

    /// Flip `completed` optimistically. Unknown ids are a no-op without a
    /// network call. On failure the pre-toggle todo is restored and
    /// `TOGGLE_FAILED_MESSAGE` recorded; the error is still returned.
    pub async fn toggle_completed(&self, id: TodoId) -> Result<(), ApiError> {
        let original = {
            let state = self.state.borrow();
            state.todo(id).cloned()
        };
        let Some(original) = original else {
            debug!(id, "toggle ignored, todo not cached");
            return Ok(());
        };

        let flipped = Todo {
            completed: !original.completed,
            ..original.clone()
        };
        let patch = UpdateTodo::completed(flipped.completed);
        self.commit([TodoAction::TodoReplaced(flipped)]);

        match self.api.update(id, &patch).await {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(id, error = ?err, "toggle failed, reverting");
                self.commit([
                    TodoAction::TodoReplaced(original),
                    TodoAction::RequestFailed {
                        kind: err.kind(),
                        message: TOGGLE_FAILED_MESSAGE.to_string(),
                    },
                ]);
                Err(err)
            }
        }
    }

    /// Merge into the active filters without fetching. A patch that would
    /// leave the filters unusable is rejected and nothing changes.
    pub fn set_filters(&self, patch: FiltersPatch) -> Result<(), ApiError> {
        self.state.borrow().filters.merge(&patch).validate()?;
        self.commit([TodoAction::FiltersChanged(patch)]);
        Ok(())
    }

    pub fn clear_error(&self) {
        self.commit([TodoAction::ErrorCleared]);
    }
}

fn failed(err: &ApiError) -> TodoAction {
    TodoAction::RequestFailed {
        kind: err.kind(),
        message: err.to_string(),
    }
}
