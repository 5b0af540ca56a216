//! Storage states backing shared buffers

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;
use std::sync::Arc;

/// Ownership state of a buffer's backing storage.
///
/// Invariants: an `Owned` vector is never empty, and a `View` always has
/// `len > 0` with a non-null pointer. The zero-length case is always
/// represented as `Empty`.
pub(crate) enum Storage<T> {
    /// Nothing allocated.
    Empty,
    /// Reference-counted block shared among cloned handles.
    Owned(Arc<Vec<T>>),
    /// Borrowed view over storage owned elsewhere; never freed here.
    View { ptr: NonNull<T>, len: usize },
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        match self {
            Storage::Empty => Storage::Empty,
            Storage::Owned(block) => Storage::Owned(Arc::clone(block)),
            Storage::View { ptr, len } => Storage::View {
                ptr: *ptr,
                len: *len,
            },
        }
    }
}

/// A raw heap block detached from a buffer by `release`.
///
/// Whoever holds the parts is responsible for the block: dropping this value
/// leaks the storage (intentionally, since the usual recipient is a foreign
/// allocator that frees it through the C API). Reassemble with
/// [`RawParts::into_vec`] to hand the block back to Rust.
#[must_use = "dropping RawParts leaks the detached block"]
#[derive(Debug)]
pub struct RawParts<T> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
}

impl<T> RawParts<T> {
    /// Detach a non-empty vector into raw parts.
    pub(crate) fn from_vec(vec: Vec<T>) -> Self {
        let mut vec = ManuallyDrop::new(vec);
        // A non-empty Vec always has a non-null data pointer.
        let ptr = unsafe { NonNull::new_unchecked(vec.as_mut_ptr()) };
        Self {
            ptr,
            len: vec.len(),
            capacity: vec.capacity(),
        }
    }

    /// Pointer to the first element of the detached block.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of elements in the block.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity of the block, in elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Decompose into `(ptr, len, capacity)` for transfer across the C
    /// boundary. The block must eventually be reassembled with
    /// [`RawParts::from_raw`] (or the C API's raw-free entry point).
    pub fn into_raw(self) -> (*mut T, usize, usize) {
        (self.ptr.as_ptr(), self.len, self.capacity)
    }

    /// Reassemble parts previously taken apart with [`RawParts::into_raw`].
    ///
    /// # Safety
    ///
    /// `ptr`, `len` and `capacity` must come from exactly one prior
    /// `into_raw` call whose block has not been freed or reassembled since.
    pub unsafe fn from_raw(ptr: *mut T, len: usize, capacity: usize) -> Self {
        debug_assert!(!ptr.is_null());
        Self {
            ptr: NonNull::new_unchecked(ptr),
            len,
            capacity,
        }
    }

    /// Reassemble the block into an owned vector.
    ///
    /// # Safety
    ///
    /// The buffer that released this block retains a non-owning view of it;
    /// that view (and any raw pointers derived from it) must not be used
    /// once the returned vector is dropped or reallocated.
    pub unsafe fn into_vec(self) -> Vec<T> {
        Vec::from_raw_parts(self.ptr.as_ptr(), self.len, self.capacity)
    }
}

impl<T> fmt::Display for RawParts<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawParts({:p}, len={}, cap={})",
            self.ptr.as_ptr(),
            self.len,
            self.capacity
        )
    }
}

unsafe impl<T: Send> Send for RawParts<T> {}
unsafe impl<T: Sync> Sync for RawParts<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_parts_round_trip() {
        let parts = RawParts::from_vec(vec![1u32, 2, 3]);
        assert_eq!(parts.len(), 3);
        assert!(!parts.is_empty());
        assert!(parts.capacity() >= 3);

        let vec = unsafe { parts.into_vec() };
        assert_eq!(vec, vec![1, 2, 3]);
    }

    #[test]
    fn test_raw_parts_through_raw_pieces() {
        let parts = RawParts::from_vec(vec![7u8; 16]);
        let (ptr, len, cap) = parts.into_raw();
        assert!(!ptr.is_null());
        assert_eq!(len, 16);

        let parts = unsafe { RawParts::from_raw(ptr, len, cap) };
        let vec = unsafe { parts.into_vec() };
        assert_eq!(vec.len(), 16);
        assert!(vec.iter().all(|&b| b == 7));
    }
}
