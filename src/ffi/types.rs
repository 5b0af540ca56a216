//! FFI type definitions and handle types

use std::ffi::c_void;

use crate::error::SharebufError;

/// Opaque handle to a buffer held by the registry
pub type SharebufBufferHandle = *mut c_void;

/// Error codes for C API
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharebufErrorCode {
    Success = 0,
    InvalidParameter = 1,
    OutOfMemory = 2,
    SizeMismatch = 3,
    AlignmentError = 4,
    TypeMismatch = 5,
    HandleNotFound = 6,
    UnknownError = 99,
}

impl From<SharebufError> for SharebufErrorCode {
    fn from(error: SharebufError) -> Self {
        match error {
            SharebufError::InvalidParameter { .. } => SharebufErrorCode::InvalidParameter,
            SharebufError::SizeMismatch { .. } => SharebufErrorCode::SizeMismatch,
            SharebufError::Alignment { .. } => SharebufErrorCode::AlignmentError,
            SharebufError::TypeMismatch { .. } => SharebufErrorCode::TypeMismatch,
            SharebufError::HandleNotFound { .. } => SharebufErrorCode::HandleNotFound,
        }
    }
}

/// Buffer information structure (C-compatible)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SharebufBufferInfo {
    /// Number of elements
    pub len: usize,
    /// Total payload size in bytes
    pub byte_len: usize,
    /// Size of one element in bytes
    pub element_size: usize,
    /// Whether the buffer is in the null state
    pub is_null: bool,
    /// Whether the handle is a non-owning view
    pub is_view: bool,
    /// Owning handles sharing the storage (0 for null buffers and views)
    pub ref_count: usize,
}

/// A detached raw block handed across the C boundary by a release call.
///
/// Free it with the matching `sharebuf_<type>_raw_free` entry point.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SharebufRawParts {
    /// Pointer to the first element, null if nothing was detached
    pub ptr: *mut c_void,
    /// Number of elements
    pub len: usize,
    /// Allocated capacity in elements
    pub capacity: usize,
}

impl SharebufRawParts {
    pub(crate) fn empty() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }
}

/// Handle registry statistics (C-compatible)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SharebufRegistryStats {
    /// Buffers stored since startup
    pub buffers_created: u64,
    /// Buffers destroyed since startup
    pub buffers_destroyed: u64,
    /// Currently live buffers
    pub live: usize,
    /// Peak number of simultaneously live buffers
    pub peak_live: usize,
}
