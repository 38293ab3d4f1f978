//! Hosts backend implementations of [`Store`](kvtrie_api::store::Store).
//!
//! Currently there is a single backend: an in-memory trie keyed by the characters of the
//! top-level key, with nested [`Value`](kvtrie_api::value::Value) objects resolved at read time
//! rather than flattened into the trie itself.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(missing_docs)]

/// Contains [`trie_store::TrieStore`], the in-memory backend.
pub mod trie_store;

#[macro_use]
extern crate kvtrie_api;
