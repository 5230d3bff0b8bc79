//! Object database for Mica.
//!
//! This crate provides content-addressed storage for version-control
//! objects: each object is encoded with a `"<kind> <size>\0"` header,
//! named by the SHA-1 of the encoded bytes, and persisted zlib-compressed
//! under a two-level sharded directory layout.

mod error;
mod object;
mod store;
mod zlib;

pub use error::OdbError;
pub use object::{Object, ObjectId, ObjectKind};
pub use store::ObjectStore;
pub use zlib::{compress, decompress};

/// Result type for object database operations.
pub type Result<T> = std::result::Result<T, OdbError>;
