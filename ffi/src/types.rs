//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, null for absent optionals, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todo_sync::{ApiError, ErrorKind, HttpTodoApi, ReqwestTransport, Todo, TodoStore};

/// Opaque handle to a store. C callers receive a pointer to this and pass
/// it back into every FFI function. Calls block on the owned runtime.
pub struct FfiTodoStore {
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) inner: TodoStore<HttpTodoApi<ReqwestTransport>>,
}

/// Error codes returned in `FfiTodoResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Server = 2,
    Network = 3,
    Validation = 4,
    Unknown = 5,
    Panic = 6,
    NullArg = 7,
    InvalidArg = 8,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => FfiErrorCode::NotFound,
            ErrorKind::ServerError => FfiErrorCode::Server,
            ErrorKind::NetworkError => FfiErrorCode::Network,
            ErrorKind::ValidationError => FfiErrorCode::Validation,
            ErrorKind::Unknown => FfiErrorCode::Unknown,
        }
    }
}

/// Tag that tells `todo_free_result` what `FfiTodoResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Todo = 1,
}

/// A single todo item exposed to C. `description` is null when absent;
/// `created_at` is an RFC 3339 string.
#[repr(C)]
pub struct FfiTodo {
    pub id: u64,
    pub title: *mut c_char,
    pub description: *mut c_char,
    pub completed: bool,
    pub created_at: *mut c_char,
}

impl FfiTodo {
    fn from_core(todo: Todo) -> Self {
        FfiTodo {
            id: todo.id,
            title: c_string(todo.title),
            description: todo
                .description
                .map(c_string)
                .unwrap_or(std::ptr::null_mut()),
            completed: todo.completed,
            created_at: c_string(todo.created_at.to_rfc3339()),
        }
    }
}

/// Result envelope for every store operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`), if the operation has one.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiTodoResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        data_tag: FfiDataTag,
        data: *mut std::ffi::c_void,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiTodoResult {
            error_code,
            error_message,
            http_status,
            data_tag,
            data,
        }))
    }

    /// Build a success result carrying a single `FfiTodo`.
    pub(crate) fn ok_todo(todo: Todo) -> *mut Self {
        let ffi_todo = Box::new(FfiTodo::from_core(todo));
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::Todo,
            Box::into_raw(ffi_todo) as *mut std::ffi::c_void,
        )
    }

    /// Build a success result with no data payload (e.g. delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::boxed(
            FfiErrorCode::Ok,
            std::ptr::null_mut(),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        Self::boxed(
            err.kind().into(),
            c_string(err.to_string()),
            err.status().unwrap_or(0),
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for an argument that could not be decoded.
    pub(crate) fn invalid_arg(name: &str, reason: impl std::fmt::Display) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidArg, format!("invalid argument {name}: {reason}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(code: FfiErrorCode, message: String) -> *mut Self {
        Self::boxed(
            code,
            c_string(message),
            0,
            FfiDataTag::None,
            std::ptr::null_mut(),
        )
    }
}

/// Move a Rust string into a heap C string owned by the caller. Interior
/// NUL bytes are dropped rather than failing the whole call.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let mut bytes: Vec<u8> = s.into().into_bytes();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}
