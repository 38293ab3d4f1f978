//! A reusable conformance test suite for [`crate::store::Store`] implementations, generalized
//! from the teacher's `define_kv_store_tests!` / `KvStoreTestSuite` pattern.

use crate::store::Store;
use crate::value::Value;
use std::collections::BTreeMap;

/// Defines a `#[tokio::test]` per [`StoreTestSuite`] method against `$store_type`, constructed via
/// `$create_store_expr`.
#[macro_export]
macro_rules! define_store_tests {
	($test_suite_name:ident, $store_type:path, $create_store_expr:expr) => {
		use $crate::store_tests::StoreTestSuite;
		struct $test_suite_name;

		#[async_trait::async_trait]
		impl StoreTestSuite for $test_suite_name {
			type Store = $store_type;

			async fn create_store() -> Self::Store {
				$create_store_expr
			}
		}

		macro_rules! create_test {
			($test_fn:ident) => {
				#[tokio::test]
				async fn $test_fn() {
					$test_suite_name::$test_fn().await;
				}
			};
		}

		create_test!(insert_then_search_returns_value);
		create_test!(search_missing_key_returns_none);
		create_test!(delete_then_search_returns_none);
		create_test!(delete_missing_key_returns_false);
		create_test!(deleting_a_prefix_key_leaves_longer_key_intact);
		create_test!(second_insert_overwrites_first);
		create_test!(query_path_with_no_dot_behaves_like_search);
		create_test!(query_path_traverses_nested_objects);
		create_test!(query_path_missing_segment_returns_none);
		create_test!(query_path_into_scalar_returns_none);
	};
}

/// Exercises the invariants every [`Store`] implementation must satisfy, independent of backend.
#[async_trait::async_trait]
pub trait StoreTestSuite {
	/// The store implementation under test.
	type Store: Store + 'static;

	/// Constructs a fresh, empty store.
	async fn create_store() -> Self::Store;

	/// `insert(k, v); search(k) == v` for all k, v.
	async fn insert_then_search_returns_value() {
		let store = Self::create_store().await;
		store.insert("a".to_string(), Value::Int(5)).await;
		assert_eq!(store.search("a").await, Some(Value::Int(5)));
	}

	/// `search` on a key that was never inserted returns `None`.
	async fn search_missing_key_returns_none() {
		let store = Self::create_store().await;
		assert_eq!(store.search("missing").await, None);
	}

	/// `insert(k, v); delete(k); search(k) == None`.
	async fn delete_then_search_returns_none() {
		let store = Self::create_store().await;
		store.insert("a".to_string(), Value::Int(5)).await;
		assert!(store.delete("a").await);
		assert_eq!(store.search("a").await, None);
	}

	/// `delete` on a key with no stored value returns `false` and mutates nothing.
	async fn delete_missing_key_returns_false() {
		let store = Self::create_store().await;
		assert!(!store.delete("missing").await);
	}

	/// For overlapping keys `k1 = "abc"`, `k2 = "abcdef"`: deleting `k1` leaves `k2` intact,
	/// because deletion only clears a terminal value and prunes only childless nodes.
	async fn deleting_a_prefix_key_leaves_longer_key_intact() {
		let store = Self::create_store().await;
		store.insert("abc".to_string(), Value::Int(1)).await;
		store.insert("abcdef".to_string(), Value::Int(2)).await;

		assert!(store.delete("abc").await);

		assert_eq!(store.search("abc").await, None);
		assert_eq!(store.search("abcdef").await, Some(Value::Int(2)));
	}

	/// A second `insert` for the same key overwrites the first.
	async fn second_insert_overwrites_first() {
		let store = Self::create_store().await;
		store.insert("a".to_string(), Value::Int(1)).await;
		store.insert("a".to_string(), Value::Int(2)).await;
		assert_eq!(store.search("a").await, Some(Value::Int(2)));
	}

	/// `query_path` on a path with no `.` behaves exactly like `search`.
	async fn query_path_with_no_dot_behaves_like_search() {
		let store = Self::create_store().await;
		store.insert("a".to_string(), Value::Int(5)).await;
		assert_eq!(store.query_path("a").await, store.search("a").await);
	}

	/// `query_path("k.a.b")` resolves the `b` child of the `a` child of `search("k")`.
	async fn query_path_traverses_nested_objects() {
		let store = Self::create_store().await;
		let mut y = BTreeMap::new();
		y.insert("z".to_string(), Value::String("hi".to_string()));
		let mut top = BTreeMap::new();
		top.insert("x".to_string(), Value::Int(1));
		top.insert("y".to_string(), Value::Object(y));
		store.insert("p".to_string(), Value::Object(top)).await;

		assert_eq!(store.query_path("p.y.z").await, Some(Value::String("hi".to_string())));
	}

	/// `query_path` returns `None` if any segment is missing.
	async fn query_path_missing_segment_returns_none() {
		let store = Self::create_store().await;
		let mut top = BTreeMap::new();
		top.insert("x".to_string(), Value::Int(1));
		store.insert("p".to_string(), Value::Object(top)).await;

		assert_eq!(store.query_path("p.y.q").await, None);
	}

	/// `query_path` returns `None` if a non-object scalar is reached before the path ends.
	async fn query_path_into_scalar_returns_none() {
		let store = Self::create_store().await;
		let mut top = BTreeMap::new();
		top.insert("x".to_string(), Value::Int(1));
		store.insert("p".to_string(), Value::Object(top)).await;

		assert_eq!(store.query_path("p.x.z").await, None);
	}
}
