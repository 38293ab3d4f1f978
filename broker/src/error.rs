use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

/// Errors raised by broker-level operations, distinct from [`kvtrie_api::error::ProtocolError`]
/// which only covers the record/value grammar.
#[derive(Debug)]
pub enum BrokerError {
	/// A server-list or bulk-data file was malformed or missing.
	ConfigError(String),
	/// Fewer than the replication factor's worth of replicas are currently reachable.
	InsufficientReplicas { needed: usize, available: usize },
	/// Communicating with a specific replica failed (connect, send, or recv error).
	Transport { server: SocketAddr, source: std::io::Error },
	/// A DELETE was refused because not every initially-active replica is still reachable.
	InconsistentDelete,
}

impl Display for BrokerError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			BrokerError::ConfigError(message) => write!(f, "configuration error: {}", message),
			BrokerError::InsufficientReplicas { needed, available } => write!(
				f,
				"insufficient replicas: need {}, only {} reachable",
				needed, available
			),
			BrokerError::Transport { server, source } => {
				write!(f, "error communicating with {}: {}", server, source)
			},
			BrokerError::InconsistentDelete => write!(
				f,
				"cannot guarantee consistent deletion while some initial replicas are down"
			),
		}
	}
}

impl Error for BrokerError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			BrokerError::Transport { source, .. } => Some(source),
			_ => None,
		}
	}
}
