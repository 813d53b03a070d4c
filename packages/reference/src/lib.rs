//! # Refvoice Reference
//!
//! Admission of reference voices. A voice id is mapped to a file in the
//! references directory, checked for a supported container and a minimum
//! duration, converted to mono float WAV when it is not WAV already, and
//! memoized so that repeat requests skip the filesystem entirely.

pub mod cache;
pub mod library;
pub mod resolver;

pub use cache::ReferenceCache;
pub use library::{LibraryEntry, LibraryReport};
pub use resolver::Resolver;
