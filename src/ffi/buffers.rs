//! FFI functions for buffer lifecycle and data access
//!
//! Entry points come in two layers: type-agnostic functions that work on
//! any handle (destroy, info, swap, registry stats) and per-element-type
//! sets generated by `sharebuf_typed_api!` for the interchange element
//! types a binding layer marshals.

use crate::buffer::SharedBuffer;

use super::types::{
    SharebufBufferHandle, SharebufBufferInfo, SharebufErrorCode, SharebufRawParts,
    SharebufRegistryStats,
};
use super::utils::{AnyBuffer, HANDLE_REGISTRY};

/// Destroy a buffer handle, dropping its share of the storage.
///
/// Safe to call exactly once per handle; a second call reports
/// `HandleNotFound` and frees nothing.
#[no_mangle]
pub extern "C" fn sharebuf_buffer_destroy(handle: SharebufBufferHandle) -> SharebufErrorCode {
    if handle.is_null() {
        return SharebufErrorCode::InvalidParameter;
    }

    let mut registry = HANDLE_REGISTRY.lock().unwrap();
    match registry.remove(handle as usize) {
        Some(_) => SharebufErrorCode::Success,
        None => SharebufErrorCode::HandleNotFound,
    }
}

/// Get buffer information
#[no_mangle]
pub extern "C" fn sharebuf_buffer_info(
    handle: SharebufBufferHandle,
    info: *mut SharebufBufferInfo,
) -> SharebufErrorCode {
    if handle.is_null() || info.is_null() {
        return SharebufErrorCode::InvalidParameter;
    }

    let registry = HANDLE_REGISTRY.lock().unwrap();
    let buffer = match registry.get(handle as usize) {
        Some(buffer) => buffer,
        None => return SharebufErrorCode::HandleNotFound,
    };

    unsafe {
        (*info).len = buffer.len();
        (*info).byte_len = buffer.byte_len();
        (*info).element_size = buffer.kind().size_of();
        (*info).is_null = buffer.is_null();
        (*info).is_view = buffer.is_view();
        (*info).ref_count = buffer.ref_count();
    }

    SharebufErrorCode::Success
}

/// Get the element count of a buffer (0 for unknown handles)
#[no_mangle]
pub extern "C" fn sharebuf_buffer_len(handle: SharebufBufferHandle) -> usize {
    if handle.is_null() {
        return 0;
    }
    let registry = HANDLE_REGISTRY.lock().unwrap();
    registry
        .get(handle as usize)
        .map(AnyBuffer::len)
        .unwrap_or(0)
}

/// Whether a buffer is in the null state (true for unknown handles)
#[no_mangle]
pub extern "C" fn sharebuf_buffer_is_null(handle: SharebufBufferHandle) -> bool {
    if handle.is_null() {
        return true;
    }
    let registry = HANDLE_REGISTRY.lock().unwrap();
    registry
        .get(handle as usize)
        .map(AnyBuffer::is_null)
        .unwrap_or(true)
}

/// Exchange storage between two buffers of the same element type in
/// constant time. Swapping a handle with itself is a no-op.
#[no_mangle]
pub extern "C" fn sharebuf_buffer_swap(
    first: SharebufBufferHandle,
    second: SharebufBufferHandle,
) -> SharebufErrorCode {
    if first.is_null() || second.is_null() {
        return SharebufErrorCode::InvalidParameter;
    }

    let first_id = first as usize;
    let second_id = second as usize;
    if first_id == second_id {
        return SharebufErrorCode::Success;
    }

    let mut registry = HANDLE_REGISTRY.lock().unwrap();
    // Take one side out so both can be borrowed mutably.
    let mut taken = match registry.buffers.remove(&first_id) {
        Some(buffer) => buffer,
        None => return SharebufErrorCode::HandleNotFound,
    };

    let result = match registry.buffers.get_mut(&second_id) {
        Some(other) => match taken.try_swap(other) {
            Ok(()) => SharebufErrorCode::Success,
            Err(e) => e.into(),
        },
        None => SharebufErrorCode::HandleNotFound,
    };

    registry.buffers.insert(first_id, taken);
    result
}

/// Get handle registry statistics
#[no_mangle]
pub extern "C" fn sharebuf_registry_stats(
    stats: *mut SharebufRegistryStats,
) -> SharebufErrorCode {
    if stats.is_null() {
        return SharebufErrorCode::InvalidParameter;
    }

    let registry = HANDLE_REGISTRY.lock().unwrap();
    unsafe {
        *stats = registry.stats();
    }
    SharebufErrorCode::Success
}

/// Number of currently live buffer handles
#[no_mangle]
pub extern "C" fn sharebuf_registry_live_count() -> usize {
    HANDLE_REGISTRY.lock().unwrap().live_count()
}

macro_rules! sharebuf_typed_api {
    ($ty:ty, $variant:ident,
     $create:ident, $wrap:ident, $from_data:ident,
     $clone:ident, $deep_clone:ident, $data:ident,
     $release:ident, $raw_free:ident) => {
        /// Create an empty buffer in the null state
        #[no_mangle]
        pub extern "C" fn $create(out: *mut SharebufBufferHandle) -> SharebufErrorCode {
            if out.is_null() {
                return SharebufErrorCode::InvalidParameter;
            }
            let mut registry = HANDLE_REGISTRY.lock().unwrap();
            let id = registry.store(AnyBuffer::$variant(SharedBuffer::new()));
            unsafe {
                *out = id as SharebufBufferHandle;
            }
            SharebufErrorCode::Success
        }

        /// Wrap caller-owned memory as a non-owning view. The memory must
        /// stay valid and unmoved for the lifetime of the handle and of
        /// every handle cloned from it.
        #[no_mangle]
        pub extern "C" fn $wrap(
            data: *mut $ty,
            len: usize,
            out: *mut SharebufBufferHandle,
        ) -> SharebufErrorCode {
            if out.is_null() || (data.is_null() && len > 0) {
                return SharebufErrorCode::InvalidParameter;
            }
            // Checked above, so the non-null precondition holds.
            let buffer = unsafe { SharedBuffer::from_raw_parts(data, len) };
            let mut registry = HANDLE_REGISTRY.lock().unwrap();
            let id = registry.store(AnyBuffer::$variant(buffer));
            unsafe {
                *out = id as SharebufBufferHandle;
            }
            SharebufErrorCode::Success
        }

        /// Create an owning buffer by copying caller memory
        #[no_mangle]
        pub extern "C" fn $from_data(
            data: *const $ty,
            len: usize,
            out: *mut SharebufBufferHandle,
        ) -> SharebufErrorCode {
            if out.is_null() || (data.is_null() && len > 0) {
                return SharebufErrorCode::InvalidParameter;
            }
            let buffer = if len == 0 {
                SharedBuffer::new()
            } else {
                let elements = unsafe { std::slice::from_raw_parts(data, len) };
                SharedBuffer::from_slice(elements)
            };
            let mut registry = HANDLE_REGISTRY.lock().unwrap();
            let id = registry.store(AnyBuffer::$variant(buffer));
            unsafe {
                *out = id as SharebufBufferHandle;
            }
            SharebufErrorCode::Success
        }

        /// Clone a handle, sharing the storage (reference count increment)
        #[no_mangle]
        pub extern "C" fn $clone(
            handle: SharebufBufferHandle,
            out: *mut SharebufBufferHandle,
        ) -> SharebufErrorCode {
            typed_copy_impl!($ty, $variant, handle, out, clone)
        }

        /// Copy a buffer into new independently-owned storage
        #[no_mangle]
        pub extern "C" fn $deep_clone(
            handle: SharebufBufferHandle,
            out: *mut SharebufBufferHandle,
        ) -> SharebufErrorCode {
            typed_copy_impl!($ty, $variant, handle, out, deep_clone)
        }

        /// Get the data pointer, uniquifying shared storage first.
        /// Returns null for null buffers, unknown handles, and handles of
        /// a different element type.
        #[no_mangle]
        pub extern "C" fn $data(handle: SharebufBufferHandle) -> *mut $ty {
            if handle.is_null() {
                return std::ptr::null_mut();
            }
            let mut registry = HANDLE_REGISTRY.lock().unwrap();
            match registry.get_mut(handle as usize) {
                Some(AnyBuffer::$variant(buffer)) => buffer.as_mut_ptr(),
                _ => std::ptr::null_mut(),
            }
        }

        /// Detach ownership of the storage to the caller. The handle keeps
        /// a non-owning view; the caller frees the block with the matching
        /// raw-free entry point. Yields an empty block for null buffers
        /// and views.
        #[no_mangle]
        pub extern "C" fn $release(
            handle: SharebufBufferHandle,
            out: *mut SharebufRawParts,
        ) -> SharebufErrorCode {
            if handle.is_null() || out.is_null() {
                return SharebufErrorCode::InvalidParameter;
            }
            let mut registry = HANDLE_REGISTRY.lock().unwrap();
            let buffer = match registry.get_mut(handle as usize) {
                Some(AnyBuffer::$variant(buffer)) => buffer,
                Some(_) => return SharebufErrorCode::TypeMismatch,
                None => return SharebufErrorCode::HandleNotFound,
            };

            let parts = match buffer.release() {
                Some(parts) => {
                    let (ptr, len, capacity) = parts.into_raw();
                    SharebufRawParts {
                        ptr: ptr as *mut std::ffi::c_void,
                        len,
                        capacity,
                    }
                }
                None => SharebufRawParts::empty(),
            };

            unsafe {
                *out = parts;
            }
            SharebufErrorCode::Success
        }

        /// Free a block previously detached by the release entry point.
        /// Passing a null pointer is a no-op.
        #[no_mangle]
        pub extern "C" fn $raw_free(ptr: *mut $ty, len: usize, capacity: usize) {
            if !ptr.is_null() {
                unsafe {
                    let _ = Vec::from_raw_parts(ptr, len, capacity);
                }
            }
        }
    };
}

macro_rules! typed_copy_impl {
    ($ty:ty, $variant:ident, $handle:expr, $out:expr, $method:ident) => {{
        if $handle.is_null() || $out.is_null() {
            return SharebufErrorCode::InvalidParameter;
        }
        let mut registry = HANDLE_REGISTRY.lock().unwrap();
        let copied = match registry.get($handle as usize) {
            Some(AnyBuffer::$variant(buffer)) => buffer.$method(),
            Some(_) => return SharebufErrorCode::TypeMismatch,
            None => return SharebufErrorCode::HandleNotFound,
        };
        let id = registry.store(AnyBuffer::$variant(copied));
        unsafe {
            *$out = id as SharebufBufferHandle;
        }
        SharebufErrorCode::Success
    }};
}

sharebuf_typed_api!(
    u8,
    U8,
    sharebuf_u8_create,
    sharebuf_u8_wrap,
    sharebuf_u8_from_data,
    sharebuf_u8_clone,
    sharebuf_u8_deep_clone,
    sharebuf_u8_data,
    sharebuf_u8_release,
    sharebuf_u8_raw_free
);

sharebuf_typed_api!(
    i32,
    I32,
    sharebuf_i32_create,
    sharebuf_i32_wrap,
    sharebuf_i32_from_data,
    sharebuf_i32_clone,
    sharebuf_i32_deep_clone,
    sharebuf_i32_data,
    sharebuf_i32_release,
    sharebuf_i32_raw_free
);

sharebuf_typed_api!(
    u32,
    U32,
    sharebuf_u32_create,
    sharebuf_u32_wrap,
    sharebuf_u32_from_data,
    sharebuf_u32_clone,
    sharebuf_u32_deep_clone,
    sharebuf_u32_data,
    sharebuf_u32_release,
    sharebuf_u32_raw_free
);

sharebuf_typed_api!(
    f32,
    F32,
    sharebuf_f32_create,
    sharebuf_f32_wrap,
    sharebuf_f32_from_data,
    sharebuf_f32_clone,
    sharebuf_f32_deep_clone,
    sharebuf_f32_data,
    sharebuf_f32_release,
    sharebuf_f32_raw_free
);

sharebuf_typed_api!(
    f64,
    F64,
    sharebuf_f64_create,
    sharebuf_f64_wrap,
    sharebuf_f64_from_data,
    sharebuf_f64_clone,
    sharebuf_f64_deep_clone,
    sharebuf_f64_data,
    sharebuf_f64_release,
    sharebuf_f64_raw_free
);
