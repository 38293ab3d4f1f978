//! Parses a single request line into a [`Command`] and formats the reply that a [`Command`]
//! produces against a [`Store`].

use kvtrie_api::error::ProtocolError;
use kvtrie_api::store::Store;
use kvtrie_api::value::{emit_value, parse_record};

/// One of the four commands a node accepts, already split into its whitespace-separated token and
/// its (still-unparsed) payload.
enum Command<'a> {
	Put(&'a str),
	Get(&'a str),
	Delete(&'a str),
	Query(&'a str),
}

fn parse_command(request: &str) -> Result<Command<'_>, ProtocolError> {
	let request = request.trim();
	let (head, rest) = request.split_once(char::is_whitespace).unwrap_or((request, ""));
	let payload = rest.trim();

	if head.is_empty() {
		return Err(ProtocolError::MissingArgument("".to_string()));
	}
	if payload.is_empty() {
		return Err(ProtocolError::MissingArgument(head.to_string()));
	}

	match head.to_ascii_uppercase().as_str() {
		"PUT" => Ok(Command::Put(payload)),
		"GET" => Ok(Command::Get(payload)),
		"DELETE" => Ok(Command::Delete(payload)),
		"QUERY" => Ok(Command::Query(payload)),
		other => Err(ProtocolError::UnknownCommand(other.to_string())),
	}
}

fn strip_quotes(s: &str) -> &str {
	s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}

/// Parses and executes one request line against `store`, returning the single-line reply text
/// (without a trailing newline).
///
/// This never fails: any [`ProtocolError`] encountered while parsing the command or its payload
/// is mapped to an `ERROR …` reply rather than propagated.
pub(crate) async fn handle_request(request: &str, store: &dyn Store) -> String {
	match parse_command(request) {
		Ok(Command::Put(payload)) => match parse_record(payload) {
			Ok((key, value)) => {
				store.insert(key, value).await;
				"OK".to_string()
			},
			Err(e) => format!("ERROR {}", e),
		},
		Ok(Command::Get(payload)) => {
			let key = strip_quotes(payload.trim());
			match store.search(key).await {
				Some(value) => format!("{} : {}", key, emit_value(&value)),
				None => "NOT FOUND".to_string(),
			}
		},
		Ok(Command::Delete(payload)) => {
			let key = strip_quotes(payload.trim());
			match store.search(key).await {
				None => "NOT FOUND".to_string(),
				Some(_) => {
					if store.delete(key).await {
						"OK".to_string()
					} else {
						"NOT FOUND".to_string()
					}
				},
			}
		},
		Ok(Command::Query(payload)) => {
			let path = payload.trim();
			match store.query_path(path).await {
				Some(value) => format!("{} : {}", path, emit_value(&value)),
				None => "NOT FOUND".to_string(),
			}
		},
		Err(e) => format!("ERROR {}", e),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use kvtrie_store::trie_store::TrieStore;

	#[tokio::test]
	async fn put_then_get_round_trips() {
		let store = TrieStore::new();
		assert_eq!(handle_request("PUT \"a\" : 5", &store).await, "OK");
		assert_eq!(handle_request("GET a", &store).await, "a : 5");
	}

	#[tokio::test]
	async fn get_missing_key_is_not_found() {
		let store = TrieStore::new();
		assert_eq!(handle_request("GET missing", &store).await, "NOT FOUND");
	}

	#[tokio::test]
	async fn delete_missing_key_is_not_found() {
		let store = TrieStore::new();
		assert_eq!(handle_request("DELETE missing", &store).await, "NOT FOUND");
	}

	#[tokio::test]
	async fn delete_present_key_then_get_is_not_found() {
		let store = TrieStore::new();
		handle_request("PUT \"a\" : 5", &store).await;
		assert_eq!(handle_request("DELETE a", &store).await, "OK");
		assert_eq!(handle_request("GET a", &store).await, "NOT FOUND");
	}

	#[tokio::test]
	async fn query_nested_path() {
		let store = TrieStore::new();
		handle_request("PUT \"p\" : { \"x\" : 1 ; \"y\" : { \"z\" : \"hi\" } }", &store).await;
		assert_eq!(handle_request("QUERY p.y.z", &store).await, "p.y.z : \"hi\"");
		assert_eq!(handle_request("QUERY p.y.q", &store).await, "NOT FOUND");
		assert_eq!(handle_request("QUERY p.x.z", &store).await, "NOT FOUND");
	}

	#[tokio::test]
	async fn unknown_command_is_error() {
		let store = TrieStore::new();
		let reply = handle_request("FROB a", &store).await;
		assert!(reply.starts_with("ERROR"));
	}

	#[tokio::test]
	async fn missing_argument_is_error() {
		let store = TrieStore::new();
		let reply = handle_request("PUT", &store).await;
		assert!(reply.starts_with("ERROR"));
	}

	#[tokio::test]
	async fn malformed_put_payload_is_error() {
		let store = TrieStore::new();
		let reply = handle_request("PUT not a valid record", &store).await;
		assert!(reply.starts_with("ERROR"));
	}
}
