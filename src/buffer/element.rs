//! Element type tags for buffers crossing the binding boundary

use serde::{Deserialize, Serialize};

use super::shared::SharedBuffer;

/// Marker for plain-data element types that may cross the C boundary.
///
/// # Safety
///
/// Implementors must be `Copy` types with no padding bytes for which every
/// bit pattern is a valid value. Reinterpretation in [`crate::buffer::cast`]
/// relies on both properties.
pub unsafe trait Element: Copy + Send + Sync + 'static {
    /// The tag describing this element type.
    const KIND: ElementKind;
}

macro_rules! impl_element {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            unsafe impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;
            }
        )*
    };
}

impl_element! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// Tag enumerating the element types carried across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl ElementKind {
    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            ElementKind::U8 | ElementKind::I8 => 1,
            ElementKind::U16 | ElementKind::I16 => 2,
            ElementKind::U32 | ElementKind::I32 | ElementKind::F32 => 4,
            ElementKind::U64 | ElementKind::I64 | ElementKind::F64 => 8,
        }
    }

    /// Alignment requirement of one element in bytes.
    pub fn align_of(&self) -> usize {
        match self {
            ElementKind::U8 | ElementKind::I8 => std::mem::align_of::<u8>(),
            ElementKind::U16 | ElementKind::I16 => std::mem::align_of::<u16>(),
            ElementKind::U32 | ElementKind::I32 => std::mem::align_of::<u32>(),
            ElementKind::F32 => std::mem::align_of::<f32>(),
            ElementKind::U64 | ElementKind::I64 => std::mem::align_of::<u64>(),
            ElementKind::F64 => std::mem::align_of::<f64>(),
        }
    }

    /// Canonical lowercase type name.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::U8 => "u8",
            ElementKind::I8 => "i8",
            ElementKind::U16 => "u16",
            ElementKind::I16 => "i16",
            ElementKind::U32 => "u32",
            ElementKind::I32 => "i32",
            ElementKind::U64 => "u64",
            ElementKind::I64 => "i64",
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
        }
    }
}

/// Shape of a buffer as seen by a binding layer: element kind plus element
/// and byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDescriptor {
    /// Element type carried by the buffer.
    pub kind: ElementKind,
    /// Number of elements.
    pub len: usize,
    /// Total payload size in bytes.
    pub byte_len: usize,
}

impl<T: Element> SharedBuffer<T> {
    /// Describe the buffer's shape for a binding layer.
    pub fn descriptor(&self) -> BufferDescriptor {
        BufferDescriptor {
            kind: T::KIND,
            len: self.len(),
            byte_len: self.len() * std::mem::size_of::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_sizes_match_types() {
        assert_eq!(ElementKind::U8.size_of(), std::mem::size_of::<u8>());
        assert_eq!(ElementKind::I32.size_of(), std::mem::size_of::<i32>());
        assert_eq!(ElementKind::F64.size_of(), std::mem::size_of::<f64>());
        assert_eq!(ElementKind::F32.align_of(), std::mem::align_of::<f32>());
    }

    #[test]
    fn test_descriptor() {
        let buffer = SharedBuffer::from_vec(vec![0.0f32; 6]);
        let desc = buffer.descriptor();
        assert_eq!(desc.kind, ElementKind::F32);
        assert_eq!(desc.len, 6);
        assert_eq!(desc.byte_len, 24);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ElementKind::F32.name(), "f32");
        assert_eq!(ElementKind::U8.name(), "u8");
        assert_eq!(ElementKind::I64.name(), "i64");
    }
}
