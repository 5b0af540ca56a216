//! Integration tests for typed reinterpretation
//!
//! Decoded record payloads arrive as bytes and leave as typed arrays; these
//! tests cover both directions plus the shape and alignment checks.

use sharebuf::{ElementKind, SharebufError, SharedBuffer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_f32_round_trip() {
        let values = vec![0.5f32, -1.25, 3.0];
        let bytes = SharedBuffer::from_vec(values.clone()).into_bytes();
        assert_eq!(bytes.len(), 12);

        let back: SharedBuffer<f32> = bytes.cast().unwrap();
        assert_eq!(back.as_slice(), values.as_slice());
    }

    #[test]
    fn test_cast_rejects_partial_elements() {
        let bytes = SharedBuffer::from_vec(vec![0u8; 7]);
        match bytes.cast::<f64>() {
            Err(SharebufError::SizeMismatch {
                byte_len,
                element_size,
            }) => {
                assert_eq!(byte_len, 7);
                assert_eq!(element_size, 8);
            }
            other => panic!("expected size mismatch, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn test_cast_view_in_place() {
        // An 8-byte aligned backing guarantees the offsets below.
        let mut backing = vec![0u64; 4];
        let base = backing.as_mut_ptr() as *mut u8;

        let view = unsafe { SharedBuffer::from_raw_parts(base, 16) };
        let words: SharedBuffer<u32> = view.cast().unwrap();
        assert!(words.is_view());
        assert_eq!(words.len(), 4);
        assert_eq!(words.as_ptr() as usize, base as usize);
    }

    #[test]
    fn test_cast_view_rejects_misalignment() {
        let mut backing = vec![0u64; 4];
        let base = backing.as_mut_ptr() as *mut u8;

        // Offset by one byte: no longer aligned for u32.
        let view = unsafe { SharedBuffer::from_raw_parts(base.wrapping_add(1), 8) };
        match view.cast::<u32>() {
            Err(SharebufError::Alignment { address, alignment }) => {
                assert_eq!(alignment, std::mem::align_of::<u32>());
                assert_ne!(address % alignment, 0);
            }
            other => panic!("expected alignment error, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn test_cast_owned_copies_into_typed_block() {
        let bytes = SharedBuffer::from_vec(vec![0u8; 16]);
        let byte_ptr = bytes.as_ptr() as usize;

        let doubles: SharedBuffer<f64> = bytes.cast().unwrap();
        assert!(doubles.is_owned());
        assert_eq!(doubles.len(), 2);
        // Fresh typed block, not the byte allocation.
        assert_ne!(doubles.as_ptr() as usize, byte_ptr);
    }

    #[test]
    fn test_null_propagates_both_directions() {
        let null_bytes: SharedBuffer<u8> = SharedBuffer::new();
        assert!(null_bytes.cast::<i32>().unwrap().is_null());

        let null_typed: SharedBuffer<i32> = SharedBuffer::new();
        assert!(null_typed.into_bytes().is_null());
    }

    #[test]
    fn test_descriptor_follows_cast() {
        let bytes = SharedBuffer::from_vec(vec![0u8; 24]);
        let desc = bytes.descriptor();
        assert_eq!(desc.kind, ElementKind::U8);
        assert_eq!(desc.len, 24);

        let floats: SharedBuffer<f32> = bytes.cast().unwrap();
        let desc = floats.descriptor();
        assert_eq!(desc.kind, ElementKind::F32);
        assert_eq!(desc.len, 6);
        assert_eq!(desc.byte_len, 24);
    }

    #[test]
    fn test_into_bytes_view_in_place() {
        let mut backing = vec![1.0f64, 2.0];
        let view = unsafe { SharedBuffer::from_raw_parts(backing.as_mut_ptr(), 2) };
        let base = view.as_ptr() as usize;

        let bytes = view.into_bytes();
        assert!(bytes.is_view());
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes.as_ptr() as usize, base);
    }
}
