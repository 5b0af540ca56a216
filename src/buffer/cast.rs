//! Checked reinterpretation between byte buffers and typed buffers
//!
//! Archive readers decode record payloads as raw bytes and hand them out as
//! typed arrays; writers go the other way. Both directions validate shape
//! before any pointer is reinterpreted.

use std::ptr;

use crate::error::{Result, SharebufError};

use super::element::Element;
use super::shared::SharedBuffer;
use super::storage::Storage;

impl SharedBuffer<u8> {
    /// Reinterpret a byte buffer as a typed buffer.
    ///
    /// The byte length must be a whole number of elements and, for views,
    /// the start address must satisfy `T`'s alignment. A view is re-viewed
    /// in place; owned bytes are copied into a fresh typed block, since a
    /// `Vec<u8>` allocation cannot be handed to `Vec<T>`'s deallocator.
    /// Null casts to null.
    pub fn cast<T: Element>(self) -> Result<SharedBuffer<T>> {
        let element_size = std::mem::size_of::<T>();
        match self.storage {
            Storage::Empty => Ok(SharedBuffer::new()),
            Storage::View { ptr, len } => {
                if len % element_size != 0 {
                    return Err(SharebufError::size_mismatch(len, element_size));
                }
                let address = ptr.as_ptr() as usize;
                let alignment = std::mem::align_of::<T>();
                if address % alignment != 0 {
                    return Err(SharebufError::alignment(address, alignment));
                }
                Ok(SharedBuffer {
                    storage: Storage::View {
                        ptr: ptr.cast::<T>(),
                        len: len / element_size,
                    },
                })
            }
            Storage::Owned(block) => {
                let byte_len = block.len();
                if byte_len % element_size != 0 {
                    return Err(SharebufError::size_mismatch(byte_len, element_size));
                }
                let len = byte_len / element_size;
                let mut elements: Vec<T> = Vec::with_capacity(len);
                // Element guarantees every bit pattern is a valid T.
                unsafe {
                    ptr::copy_nonoverlapping(
                        block.as_ptr(),
                        elements.as_mut_ptr() as *mut u8,
                        byte_len,
                    );
                    elements.set_len(len);
                }
                Ok(SharedBuffer::from_vec(elements))
            }
        }
    }
}

impl<T: Element> SharedBuffer<T> {
    /// Reinterpret a typed buffer as its raw bytes.
    ///
    /// Infallible: byte alignment is 1 and `Element` types carry no padding.
    /// A view is re-viewed in place; owned elements are copied into a fresh
    /// byte block. Null maps to null.
    pub fn into_bytes(self) -> SharedBuffer<u8> {
        let element_size = std::mem::size_of::<T>();
        match self.storage {
            Storage::Empty => SharedBuffer::new(),
            Storage::View { ptr, len } => SharedBuffer {
                storage: Storage::View {
                    ptr: ptr.cast::<u8>(),
                    len: len * element_size,
                },
            },
            Storage::Owned(block) => {
                let byte_len = block.len() * element_size;
                let bytes = unsafe {
                    std::slice::from_raw_parts(block.as_ptr() as *const u8, byte_len)
                };
                SharedBuffer::from_vec(bytes.to_vec())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_owned_bytes_to_u32() {
        let bytes = SharedBuffer::from_vec(vec![1u8, 0, 0, 0, 2, 0, 0, 0]);
        let words: SharedBuffer<u32> = bytes.cast().unwrap();
        assert_eq!(words.len(), 2);
        if cfg!(target_endian = "little") {
            assert_eq!(words.as_slice(), &[1, 2]);
        }
    }

    #[test]
    fn test_cast_rejects_ragged_length() {
        let bytes = SharedBuffer::from_vec(vec![0u8; 6]);
        let result = bytes.cast::<u32>();
        assert!(matches!(
            result,
            Err(SharebufError::SizeMismatch {
                byte_len: 6,
                element_size: 4
            })
        ));
    }

    #[test]
    fn test_cast_null_is_null() {
        let bytes: SharedBuffer<u8> = SharedBuffer::new();
        let floats: SharedBuffer<f32> = bytes.cast().unwrap();
        assert!(floats.is_null());
    }

    #[test]
    fn test_into_bytes_round_trip() {
        let floats = SharedBuffer::from_vec(vec![1.5f32, -2.5]);
        let bytes = floats.into_bytes();
        assert_eq!(bytes.len(), 8);

        let back: SharedBuffer<f32> = bytes.cast().unwrap();
        assert_eq!(back.as_slice(), &[1.5, -2.5]);
    }

    #[test]
    fn test_into_bytes_null() {
        let empty: SharedBuffer<i64> = SharedBuffer::new();
        assert!(empty.into_bytes().is_null());
    }
}
