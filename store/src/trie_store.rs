use kvtrie_api::store::Store;
use kvtrie_api::value::Value;
use log::{debug, trace};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A single node of the character-keyed trie. A node is a valid end-of-key position exactly when
/// `value` is `Some`; intermediate nodes that exist only to route to a longer key carry `None`.
#[derive(Default)]
struct TrieNode {
	children: HashMap<char, TrieNode>,
	value: Option<Value>,
}

impl TrieNode {
	fn delete_recursive(&mut self, key: &[char], depth: usize) -> bool {
		if depth == key.len() {
			return self.value.take().is_some();
		}

		let ch = key[depth];
		let Some(child) = self.children.get_mut(&ch) else { return false };

		let deleted = child.delete_recursive(key, depth + 1);
		if deleted && child.children.is_empty() && child.value.is_none() {
			self.children.remove(&ch);
		}
		deleted
	}
}

/// An in-memory [`Store`] backed by a trie over the characters of each top-level key.
///
/// Values are never flattened into the trie: a top-level key resolves to one whole [`Value`],
/// and [`Store::query_path`] walks into that value's nested [`Value::Object`] members after the
/// trie lookup, exactly as a single-process implementation would.
pub struct TrieStore {
	root: Mutex<TrieNode>,
}

impl Default for TrieStore {
	fn default() -> Self {
		Self::new()
	}
}

impl TrieStore {
	/// Constructs an empty store.
	pub fn new() -> Self {
		Self { root: Mutex::new(TrieNode::default()) }
	}
}

#[async_trait::async_trait]
impl Store for TrieStore {
	async fn insert(&self, key: String, value: Value) {
		trace!("inserting key {}", key);
		let mut root = self.root.lock().await;
		let mut node = &mut *root;
		for ch in key.chars() {
			node = node.children.entry(ch).or_default();
		}
		node.value = Some(value);
	}

	async fn search(&self, key: &str) -> Option<Value> {
		let root = self.root.lock().await;
		let mut node = &*root;
		for ch in key.chars() {
			node = node.children.get(&ch)?;
		}
		node.value.clone()
	}

	async fn delete(&self, key: &str) -> bool {
		let chars: Vec<char> = key.chars().collect();
		let mut root = self.root.lock().await;
		let deleted = root.delete_recursive(&chars, 0);
		if !deleted {
			debug!("delete requested for key {} with no stored value", key);
		}
		deleted
	}

	async fn query_path(&self, path: &str) -> Option<Value> {
		let mut parts = path.split('.');
		let top_key = parts.next()?;

		let mut current = self.search(top_key).await?;
		for part in parts {
			match current {
				Value::Object(mut members) => current = members.remove(part)?,
				_ => return None,
			}
		}
		Some(current)
	}
}
