//! Client-side state synchronization for the remote todo service.
//!
//! # Overview
//! The UI issues intents to a `TodoStore`, which validates them, performs
//! at most one call against the remote resource through `TodoApi`, and
//! reconciles the result into the cached `TodoState` the UI renders from.
//!
//! # Design
//! - `TodoClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Transport` performs the I/O; `ReqwestTransport` is the production one.
//! - `HttpTodoApi` glues the two behind the `TodoApi` seam the store uses.
//! - `reduce` is the only code that mutates `TodoState`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use api::{HttpTodoApi, TodoApi};
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{reduce, TodoAction, TodoState};
pub use store::{TodoStore, TOGGLE_FAILED_MESSAGE};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CreateTodo, Filters, FiltersPatch, Pagination, SortField, SortOrder, Todo, TodoId, TodoPage,
    UpdateTodo,
};
