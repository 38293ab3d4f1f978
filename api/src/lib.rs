//! Hosts the shared contract for the distributed structured key-value store.
//!
//! This crate defines the wire-level `Value` type and its textual codec, the [`error::ProtocolError`]
//! taxonomy shared by every component that speaks the wire protocol, and the [`store::Store`]
//! interface that every backend (currently just the in-memory trie) must implement.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(missing_docs)]

/// Implements [`error::ProtocolError`], the error type shared by the value codec and the node
/// server's command dispatcher.
pub mod error;

/// Contains [`store::Store`], the interface every backend implementation of the trie store must
/// satisfy.
pub mod store;

/// A reusable conformance test suite for [`store::Store`] implementations.
pub mod store_tests;

/// Contains [`value::Value`] and the textual encode/decode functions used on the wire and in the
/// bulk data file.
pub mod value;
