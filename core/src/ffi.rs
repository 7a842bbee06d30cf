//! C ABI for embedding the engine in a host UI
//!
//! The host owns input capture and drawing. It creates an editor handle,
//! pushes intents as JSON, and pulls snapshots or scenes back as JSON
//! buffers that must be released with [`tanner_free`].

use crate::config::EditorConfig;
use crate::coords::Scale;
use crate::error::GraphError;
use crate::interaction::{Intent, Outcome};
use crate::shared::SharedEditor;
use std::os::raw::c_int;

/// Error codes returned to FFI callers
pub const ERR_SUCCESS: c_int = 0;
pub const ERR_NULL_HANDLE: c_int = 1;
pub const ERR_PARSE_ERROR: c_int = 2;
pub const ERR_INVARIANT: c_int = 3;
pub const ERR_SERIALIZATION: c_int = 4;
/// Error returned when input is too large for safety
pub const ERR_TOO_LARGE: c_int = 6;
pub const ERR_INTERNAL: c_int = 99;

/// Outcome codes written by [`tanner_dispatch`]
pub const OUTCOME_RECORDED: c_int = 1;
pub const OUTCOME_UPDATED: c_int = 2;
pub const OUTCOME_IGNORED: c_int = 3;

const MAX_INPUT_LEN: usize = 10 * 1024 * 1024; // 10 MB

fn error_code(err: &GraphError) -> c_int {
    match err {
        GraphError::MalformedSnapshot(_) => ERR_PARSE_ERROR,
        GraphError::Serialize(_) => ERR_SERIALIZATION,
        _ => ERR_INVARIANT,
    }
}

fn outcome_code(outcome: Outcome) -> c_int {
    match outcome {
        Outcome::Recorded => OUTCOME_RECORDED,
        Outcome::Updated => OUTCOME_UPDATED,
        Outcome::Ignored(_) => OUTCOME_IGNORED,
    }
}

/// Borrow the input buffer, validating pointer and length
unsafe fn input<'a>(in_ptr: *const u8, in_len: usize) -> Result<&'a [u8], c_int> {
    if in_len > MAX_INPUT_LEN {
        return Err(ERR_TOO_LARGE);
    }
    if in_len == 0 {
        return Ok(&[]);
    }
    if in_ptr.is_null() {
        return Err(ERR_PARSE_ERROR);
    }
    Ok(std::slice::from_raw_parts(in_ptr, in_len))
}

/// Copy `data` into a `malloc`ed buffer handed to the caller
unsafe fn emit(data: &[u8], out_ptr: *mut *mut u8, out_len: *mut usize) -> c_int {
    if out_ptr.is_null() || out_len.is_null() {
        return ERR_INTERNAL;
    }

    let len = data.len();
    let ptr = libc::malloc(len.max(1)) as *mut u8;
    if ptr.is_null() {
        return ERR_INTERNAL;
    }
    std::ptr::copy_nonoverlapping(data.as_ptr(), ptr, len);

    *out_ptr = ptr;
    *out_len = len;
    ERR_SUCCESS
}

/// Create an editor session.
///
/// A `scale` of zero selects the default scale.
#[no_mangle]
pub extern "C" fn tanner_editor_new(scale: u32) -> *mut SharedEditor {
    let config = EditorConfig::default().with_scale(Scale::new(scale).unwrap_or_default());
    Box::into_raw(Box::new(SharedEditor::new(&config)))
}

/// Destroy an editor session
///
/// # Safety
/// `editor` must come from [`tanner_editor_new`] and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn tanner_editor_free(editor: *mut SharedEditor) {
    if !editor.is_null() {
        drop(Box::from_raw(editor));
    }
}

/// Apply one intent given as JSON
///
/// # Returns
/// * `ERR_SUCCESS` with `*outcome` set to an `OUTCOME_*` code
/// * Error code (>0) on failure; an invariant violation aborts the intent
///
/// # Safety
/// Caller must:
/// - Pass a live handle from [`tanner_editor_new`]
/// - Ensure `in_ptr` points to at least `in_len` bytes
/// - Pass a writable `outcome`
#[no_mangle]
pub unsafe extern "C" fn tanner_dispatch(
    editor: *const SharedEditor,
    in_ptr: *const u8,
    in_len: usize,
    outcome: *mut c_int,
) -> c_int {
    let Some(editor) = editor.as_ref() else {
        return ERR_NULL_HANDLE;
    };
    if outcome.is_null() {
        return ERR_INTERNAL;
    }
    let bytes = match input(in_ptr, in_len) {
        Ok(bytes) => bytes,
        Err(code) => return code,
    };
    let intent: Intent = match serde_json::from_slice(bytes) {
        Ok(intent) => intent,
        Err(_) => return ERR_PARSE_ERROR,
    };

    match editor.dispatch(intent) {
        Ok(result) => {
            *outcome = outcome_code(result);
            ERR_SUCCESS
        }
        Err(err) => error_code(&err),
    }
}

/// Replace the graph with a snapshot given as JSON
///
/// # Safety
/// Same requirements as [`tanner_dispatch`].
#[no_mangle]
pub unsafe extern "C" fn tanner_load(
    editor: *const SharedEditor,
    in_ptr: *const u8,
    in_len: usize,
) -> c_int {
    let Some(editor) = editor.as_ref() else {
        return ERR_NULL_HANDLE;
    };
    let bytes = match input(in_ptr, in_len) {
        Ok(bytes) => bytes,
        Err(code) => return code,
    };
    let Ok(json) = std::str::from_utf8(bytes) else {
        return ERR_PARSE_ERROR;
    };

    match editor.load(json) {
        Ok(()) => ERR_SUCCESS,
        Err(err) => error_code(&err),
    }
}

/// Write the normalized snapshot JSON into a new buffer
///
/// # Safety
/// Caller must call [`tanner_free`] on `*out_ptr` when done.
#[no_mangle]
pub unsafe extern "C" fn tanner_export(
    editor: *const SharedEditor,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> c_int {
    let Some(editor) = editor.as_ref() else {
        return ERR_NULL_HANDLE;
    };
    match editor.to_json() {
        Ok(json) => emit(json.as_bytes(), out_ptr, out_len),
        Err(err) => error_code(&err),
    }
}

/// Write the render scene JSON into a new buffer
///
/// # Safety
/// Caller must call [`tanner_free`] on `*out_ptr` when done.
#[no_mangle]
pub unsafe extern "C" fn tanner_scene(
    editor: *const SharedEditor,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> c_int {
    let Some(editor) = editor.as_ref() else {
        return ERR_NULL_HANDLE;
    };
    match serde_json::to_vec(&editor.scene()) {
        Ok(json) => emit(&json, out_ptr, out_len),
        Err(_) => ERR_SERIALIZATION,
    }
}

/// Free memory allocated by [`tanner_export`] or [`tanner_scene`]
///
/// # Safety
/// Must only be called once per buffer.
/// Pointer must not be used after calling this function.
#[no_mangle]
pub unsafe extern "C" fn tanner_free(ptr: *mut u8, _len: usize) {
    if !ptr.is_null() {
        libc::free(ptr as *mut libc::c_void);
    }
}
