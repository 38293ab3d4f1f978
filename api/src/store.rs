use crate::value::Value;
use async_trait::async_trait;

/// An interface that must be implemented by every backend of the trie store.
///
/// `insert`/`delete` take `&self` rather than `&mut self` so a single `Arc<dyn Store>` can be
/// shared across a node server's (sequential) connection-handling loop without restructuring
/// ownership if that loop is later extended to serve connections concurrently; implementors are
/// responsible for their own interior mutability.
#[async_trait]
pub trait Store: Send + Sync {
	/// Inserts `value` under `key`, overwriting any existing value at that key.
	async fn insert(&self, key: String, value: Value);

	/// Returns the value stored at `key`, or `None` if no record with that top-level key exists.
	async fn search(&self, key: &str) -> Option<Value>;

	/// Removes the record at `key`. Returns `false` if no record existed at `key`.
	async fn delete(&self, key: &str) -> bool;

	/// Resolves a dot-separated path: the first segment is looked up as a top-level key, and each
	/// subsequent segment traverses one level into a nested [`Value::Object`]. Returns `None` if
	/// any segment is missing, or a non-object value is reached before the path is exhausted.
	async fn query_path(&self, path: &str) -> Option<Value>;
}
