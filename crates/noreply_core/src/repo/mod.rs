//! Persistence layer: substrates and the document store built on them.
//!
//! # Responsibility
//! - Isolate raw key-value access and JSON encoding from services.
//!
//! # Invariants
//! - Only `DocumentStore` touches a substrate; services never read or write
//!   substrate keys directly.

pub mod document_store;
pub mod memory_substrate;
pub mod sqlite_substrate;
pub mod substrate;
