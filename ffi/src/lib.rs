//! C-ABI wrapper around the `todo-sync` store.
//!
//! # Overview
//! Lets a native mobile UI (Swift, Kotlin via JNI, anything with a C FFI)
//! drive the todo store: issue the list/create/update/delete/toggle intents
//! and read the state snapshot it renders from.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The store handle owns a current-thread tokio runtime; each call blocks
//!   the calling thread until the operation settles. Hosts call from a
//!   background thread and re-render from `todo_store_snapshot`.
//! - Operations return a single `FfiTodoResult` envelope with `FfiDataTag`
//!   + `void* data`. The snapshot is handed out as a JSON C string.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use todo_sync::{ApiError, ClientConfig, CreateTodo, FiltersPatch, HttpTodoApi, TodoStore, UpdateTodo};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy a caller-owned C string. Null maps to `None`; invalid UTF-8 is
/// replaced rather than rejected.
fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

fn build_store(config: &ClientConfig) -> Result<FfiTodoStore, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    let api = HttpTodoApi::from_config(config).map_err(|e| e.to_string())?;
    Ok(FfiTodoStore {
        runtime,
        inner: TodoStore::new(api),
    })
}

/// Null-check the handle and run `op` under `catch_unwind`.
fn with_store<F>(store: *const FfiTodoStore, name: &str, op: F) -> *mut FfiTodoResult
where
    F: FnOnce(&FfiTodoStore) -> *mut FfiTodoResult,
{
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiTodoResult::null_arg("store");
        }
        op(unsafe { &*store })
    }))
    .unwrap_or_else(|_| FfiTodoResult::panic(&format!("panic in {name}")))
}

fn empty_result(result: Result<(), ApiError>) -> *mut FfiTodoResult {
    match result {
        Ok(()) => FfiTodoResult::ok_empty(),
        Err(e) => FfiTodoResult::from_error(e),
    }
}

fn todo_result(result: Result<todo_sync::Todo, ApiError>) -> *mut FfiTodoResult {
    match result {
        Ok(todo) => FfiTodoResult::ok_todo(todo),
        Err(e) => FfiTodoResult::from_error(e),
    }
}

fn parse_filters(json: *const c_char) -> Result<Option<FiltersPatch>, *mut FfiTodoResult> {
    match read_str(json) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| FfiTodoResult::invalid_arg("filters_json", e)),
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Route `tracing` output to stderr, filtered by `RUST_LOG`.
///
/// Returns false if a global subscriber was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_init_logging() -> bool {
    catch_unwind(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| "todo_sync=info".into()),
            )
            .with_target(false)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

/// Create a store bound to `base_url`.
///
/// A null `base_url` falls back to `TODO_API_BASE_URL` or the built-in
/// default. `timeout_ms` of 0 keeps the configured timeout.
/// Returns null on failure. Free with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_new(base_url: *const c_char, timeout_ms: u64) -> *mut FfiTodoStore {
    catch_unwind(|| {
        let mut config = match read_str(base_url) {
            Some(url) => ClientConfig::new(url),
            None => match ClientConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    warn!(error = %e, "invalid client configuration");
                    return std::ptr::null_mut();
                }
            },
        };
        if timeout_ms > 0 {
            config.timeout = Duration::from_millis(timeout_ms);
        }
        match build_store(&config) {
            Ok(store) => Box::into_raw(Box::new(store)),
            Err(e) => {
                warn!(error = %e, "failed to create store");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `todo_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_free(store: *mut FfiTodoStore) {
    if !store.is_null() {
        // the reqwest client inside is not RefUnwindSafe
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Fetch a page. `filters_json` is an optional camelCase object of filter
/// overrides, e.g. `{"filter":"milk","page":1}`; null keeps the active ones.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_list(
    store: *const FfiTodoStore,
    filters_json: *const c_char,
) -> *mut FfiTodoResult {
    with_store(store, "todo_store_list", |store| {
        let overrides = match parse_filters(filters_json) {
            Ok(overrides) => overrides,
            Err(result) => return result,
        };
        empty_result(store.runtime.block_on(store.inner.list(overrides)))
    })
}

/// Re-fetch with the active filters, flagged as a pull-to-refresh.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_refresh(store: *const FfiTodoStore) -> *mut FfiTodoResult {
    with_store(store, "todo_store_refresh", |store| {
        empty_result(store.runtime.block_on(store.inner.refresh()))
    })
}

/// Fetch one todo without touching the cached list.
///
/// Returns a result with `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_get(store: *const FfiTodoStore, id: u64) -> *mut FfiTodoResult {
    with_store(store, "todo_store_get", |store| {
        todo_result(store.runtime.block_on(store.inner.get(id)))
    })
}

/// Create a todo. `description` may be null.
///
/// Returns a result with `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_create(
    store: *const FfiTodoStore,
    title: *const c_char,
    description: *const c_char,
) -> *mut FfiTodoResult {
    with_store(store, "todo_store_create", |store| {
        let Some(title) = read_str(title) else {
            return FfiTodoResult::null_arg("title");
        };
        let input = CreateTodo {
            title,
            description: read_str(description),
            completed: None,
        };
        todo_result(store.runtime.block_on(store.inner.create(input)))
    })
}

/// Update a todo.
///
/// `title` and `description` may be null (skip update). `completed` uses
/// tri-state: -1 = skip, 0 = false, 1 = true.
/// Returns a result with `data_tag = Todo` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_update(
    store: *const FfiTodoStore,
    id: u64,
    title: *const c_char,
    description: *const c_char,
    completed: i32,
) -> *mut FfiTodoResult {
    with_store(store, "todo_store_update", |store| {
        let completed = match completed {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        };
        let fields = UpdateTodo {
            title: read_str(title),
            description: read_str(description),
            completed,
        };
        todo_result(store.runtime.block_on(store.inner.update(id, fields)))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_store_delete(store: *const FfiTodoStore, id: u64) -> *mut FfiTodoResult {
    with_store(store, "todo_store_delete", |store| {
        empty_result(store.runtime.block_on(store.inner.delete(id)))
    })
}

/// Flip a todo's completion optimistically. Unknown ids succeed as a no-op.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_toggle(store: *const FfiTodoStore, id: u64) -> *mut FfiTodoResult {
    with_store(store, "todo_store_toggle", |store| {
        empty_result(store.runtime.block_on(store.inner.toggle_completed(id)))
    })
}

/// Merge filter overrides without fetching.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_set_filters(
    store: *const FfiTodoStore,
    filters_json: *const c_char,
) -> *mut FfiTodoResult {
    with_store(store, "todo_store_set_filters", |store| {
        match parse_filters(filters_json) {
            Ok(Some(patch)) => empty_result(store.inner.set_filters(patch)),
            Ok(None) => FfiTodoResult::null_arg("filters_json"),
            Err(result) => result,
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_store_clear_error(store: *const FfiTodoStore) -> *mut FfiTodoResult {
    with_store(store, "todo_store_clear_error", |store| {
        store.inner.clear_error();
        FfiTodoResult::ok_empty()
    })
}

/// Serialize the current state as JSON for rendering.
///
/// Returns null if `store` is null. Free with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_snapshot(store: *const FfiTodoStore) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        match serde_json::to_string(&store.inner.snapshot()) {
            Ok(json) => c_string(json),
            Err(e) => {
                warn!(error = %e, "failed to serialize snapshot");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTodoResult` returned by any `todo_store_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::Todo => {
                    let todo = unsafe { Box::from_raw(result.data as *mut FfiTodo) };
                    free_ffi_todo_fields(&todo);
                }
                FfiDataTag::None => {}
            }
        }
    });
}

/// Free the C-string fields of an `FfiTodo` (but not the struct itself).
fn free_ffi_todo_fields(todo: &FfiTodo) {
    for field in [todo.title, todo.description, todo.created_at] {
        if !field.is_null() {
            drop(unsafe { CString::from_raw(field) });
        }
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
