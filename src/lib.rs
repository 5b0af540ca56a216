//! # Sharebuf - Reference-Counted Typed Shared Arrays
//!
//! Sharebuf provides the in-memory interchange primitive used between a
//! native compute core and a host-language binding layer: a typed,
//! reference-counted, copy-on-write array handle with explicit lifetime
//! rules, suitable for zero-copy transfer of decoded record payloads.
//!
//! ## Features
//!
//! - **Two-state handles**: null (nothing allocated) or populated, with
//!   benign accessors in both states
//! - **Reference-counted sharing**: cloning a handle increments an atomic
//!   count; writers uniquify first (copy-on-write)
//! - **Non-owning views**: wrap caller-managed memory without ever freeing it
//! - **Explicit ownership release**: detach the backing block to an external
//!   allocator while the handle keeps a view
//! - **Checked reinterpretation**: byte payloads to typed arrays and back,
//!   with size and alignment validation
//! - **C API**: stable handle-based interface for foreign binding layers
//!
//! ## Ownership model
//!
//! ```text
//! SharedBuffer<T>
//! ├── Empty                null state, frees nothing
//! ├── Owned(Arc<Vec<T>>)   shared among clones, freed on last drop
//! └── View { ptr, len }    borrowed from the caller, never freed here
//! ```
//!
//! `release()` moves a buffer from the owned column to the view column,
//! handing the block to the caller; storage is freed exactly once no matter
//! how handles are cloned, swapped, or dropped.

// Core modules
pub mod buffer;
pub mod error;

#[cfg(feature = "c-api")]
pub mod ffi;

// Main API re-exports
pub use buffer::{BufferDescriptor, Element, ElementKind, RawParts, SharedBuffer};
pub use error::{Result, SharebufError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 2;
pub const VERSION_PATCH: u32 = 1;
