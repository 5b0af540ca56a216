//! FFI utilities and handle management

use std::collections::HashMap;
use std::ffi::{c_char, CString};
use std::sync::Mutex;

use crate::buffer::{ElementKind, SharedBuffer};
use crate::error::{Result, SharebufError};

use super::types::SharebufRegistryStats;

// Global handle management
lazy_static::lazy_static! {
    pub static ref HANDLE_REGISTRY: Mutex<HandleRegistry> =
        Mutex::new(HandleRegistry::new());
}

/// A buffer of any supported interchange element type.
#[derive(Debug, Clone)]
pub enum AnyBuffer {
    U8(SharedBuffer<u8>),
    I32(SharedBuffer<i32>),
    U32(SharedBuffer<u32>),
    F32(SharedBuffer<f32>),
    F64(SharedBuffer<f64>),
}

macro_rules! with_buffer {
    ($any:expr, $buf:ident => $body:expr) => {
        match $any {
            AnyBuffer::U8($buf) => $body,
            AnyBuffer::I32($buf) => $body,
            AnyBuffer::U32($buf) => $body,
            AnyBuffer::F32($buf) => $body,
            AnyBuffer::F64($buf) => $body,
        }
    };
}

impl AnyBuffer {
    /// Element kind held by this buffer.
    pub fn kind(&self) -> ElementKind {
        match self {
            AnyBuffer::U8(_) => ElementKind::U8,
            AnyBuffer::I32(_) => ElementKind::I32,
            AnyBuffer::U32(_) => ElementKind::U32,
            AnyBuffer::F32(_) => ElementKind::F32,
            AnyBuffer::F64(_) => ElementKind::F64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        with_buffer!(self, buf => buf.len())
    }

    /// Whether the buffer is in the null state.
    pub fn is_null(&self) -> bool {
        with_buffer!(self, buf => buf.is_null())
    }

    /// Whether the handle is a non-owning view.
    pub fn is_view(&self) -> bool {
        with_buffer!(self, buf => buf.is_view())
    }

    /// Owning handles sharing the storage.
    pub fn ref_count(&self) -> usize {
        with_buffer!(self, buf => buf.strong_count())
    }

    /// Total payload size in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * self.kind().size_of()
    }

    /// Exchange storage with another buffer of the same element kind.
    pub fn try_swap(&mut self, other: &mut AnyBuffer) -> Result<()> {
        match (self, other) {
            (AnyBuffer::U8(a), AnyBuffer::U8(b)) => Ok(a.swap(b)),
            (AnyBuffer::I32(a), AnyBuffer::I32(b)) => Ok(a.swap(b)),
            (AnyBuffer::U32(a), AnyBuffer::U32(b)) => Ok(a.swap(b)),
            (AnyBuffer::F32(a), AnyBuffer::F32(b)) => Ok(a.swap(b)),
            (AnyBuffer::F64(a), AnyBuffer::F64(b)) => Ok(a.swap(b)),
            (a, b) => Err(SharebufError::type_mismatch(
                a.kind().name(),
                b.kind().name(),
            )),
        }
    }
}

/// Registry mapping opaque handles to live buffers.
pub struct HandleRegistry {
    pub buffers: HashMap<usize, AnyBuffer>,
    pub next_id: usize,
    buffers_created: u64,
    buffers_destroyed: u64,
    peak_live: usize,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            next_id: 1,
            buffers_created: 0,
            buffers_destroyed: 0,
            peak_live: 0,
        }
    }

    /// Store a buffer, returning its handle id.
    pub fn store(&mut self, buffer: AnyBuffer) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.buffers.insert(id, buffer);
        self.buffers_created += 1;
        if self.buffers.len() > self.peak_live {
            self.peak_live = self.buffers.len();
        }
        id
    }

    pub fn get(&self, id: usize) -> Option<&AnyBuffer> {
        self.buffers.get(&id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut AnyBuffer> {
        self.buffers.get_mut(&id)
    }

    /// Remove a buffer, dropping this handle's share of the storage.
    pub fn remove(&mut self, id: usize) -> Option<AnyBuffer> {
        let removed = self.buffers.remove(&id);
        if removed.is_some() {
            self.buffers_destroyed += 1;
        }
        removed
    }

    /// Number of currently live buffers.
    pub fn live_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn stats(&self) -> SharebufRegistryStats {
        SharebufRegistryStats {
            buffers_created: self.buffers_created,
            buffers_destroyed: self.buffers_destroyed,
            live: self.buffers.len(),
            peak_live: self.peak_live,
        }
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert Rust String to C string (caller must free with sharebuf_free_string)
pub fn string_to_c_str(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a C string allocated by this library
#[no_mangle]
pub extern "C" fn sharebuf_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = HandleRegistry::new();
        let id = registry.store(AnyBuffer::U8(SharedBuffer::from_vec(vec![1, 2])));
        assert!(id >= 1);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.get(id).unwrap().len(), 2);

        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert_eq!(registry.live_count(), 0);

        let stats = registry.stats();
        assert_eq!(stats.buffers_created, 1);
        assert_eq!(stats.buffers_destroyed, 1);
        assert_eq!(stats.peak_live, 1);
    }

    #[test]
    fn test_try_swap_rejects_kind_mismatch() {
        let mut a = AnyBuffer::U8(SharedBuffer::from_vec(vec![1u8]));
        let mut b = AnyBuffer::F32(SharedBuffer::from_vec(vec![1.0f32]));
        assert!(a.try_swap(&mut b).is_err());
    }
}
