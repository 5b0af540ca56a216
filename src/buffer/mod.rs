//! Shared buffer handles and typed reinterpretation
//!
//! This module provides the core interchange primitive: a reference-counted
//! handle to a contiguous typed array that can be passed between a compute
//! core and a host-language binding layer without the receiver needing to
//! know whether it owns the storage.

pub mod cast;
pub mod element;
pub mod shared;
pub mod storage;

// Re-export main types
pub use element::{BufferDescriptor, Element, ElementKind};
pub use shared::SharedBuffer;
pub use storage::RawParts;
