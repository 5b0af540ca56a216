//! C Foreign Function Interface (FFI) for host-language binding layers
//!
//! This module provides a C-compatible API over the shared buffer core.
//! Buffers are held in a global registry behind opaque handles; the binding
//! layer is responsible for calling a destroy entry point exactly once per
//! handle, and for freeing released raw blocks with the matching raw-free
//! entry point.

pub mod buffers;
pub mod types;
pub mod utils;
pub mod version;

// Re-export commonly used types and functions
pub use types::{
    SharebufBufferHandle, SharebufBufferInfo, SharebufErrorCode, SharebufRawParts,
    SharebufRegistryStats,
};

pub use utils::{sharebuf_free_string, AnyBuffer, HandleRegistry, HANDLE_REGISTRY};

// Type-agnostic buffer API
pub use buffers::{
    sharebuf_buffer_destroy, sharebuf_buffer_info, sharebuf_buffer_is_null, sharebuf_buffer_len,
    sharebuf_buffer_swap, sharebuf_registry_live_count, sharebuf_registry_stats,
};

// Per-element-type API (byte buffers; the other element types follow the
// same naming scheme)
pub use buffers::{
    sharebuf_u8_clone, sharebuf_u8_create, sharebuf_u8_data, sharebuf_u8_deep_clone,
    sharebuf_u8_from_data, sharebuf_u8_raw_free, sharebuf_u8_release, sharebuf_u8_wrap,
};

// Version API
pub use version::{
    sharebuf_version_major, sharebuf_version_minor, sharebuf_version_patch,
    sharebuf_version_string,
};
