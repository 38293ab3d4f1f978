//! Loads the broker's fixed server list and bulk data file from disk.

use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::BrokerError;

/// Reads `HOST PORT` pairs, one per whitespace-separated line, blank lines ignored.
///
/// A malformed line (not exactly two whitespace-separated fields, or a field that does not
/// resolve to a socket address) is fatal: the whole list is rejected rather than silently
/// dropping a server the operator expected to be included.
pub(crate) fn load_server_list(path: &str) -> Result<Vec<SocketAddr>, BrokerError> {
	let contents = std::fs::read_to_string(path)
		.map_err(|e| BrokerError::ConfigError(format!("server list file not found: {}", e)))?;
	parse_server_list(&contents)
}

fn parse_server_list(contents: &str) -> Result<Vec<SocketAddr>, BrokerError> {
	let mut servers = Vec::new();
	for line in contents.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		let mut fields = line.split_whitespace();
		let (host, port) = match (fields.next(), fields.next(), fields.next()) {
			(Some(host), Some(port), None) => (host, port),
			_ => {
				return Err(BrokerError::ConfigError(format!(
					"invalid server list line, expected 'HOST PORT': {}",
					line
				)))
			},
		};

		let port: u16 = port.parse().map_err(|_| {
			BrokerError::ConfigError(format!("invalid port in server list line: {}", line))
		})?;

		let addr = (host, port)
			.to_socket_addrs()
			.map_err(|e| BrokerError::ConfigError(format!("cannot resolve '{}': {}", host, e)))?
			.next()
			.ok_or_else(|| {
				BrokerError::ConfigError(format!("'{}' resolved to no addresses", host))
			})?;
		servers.push(addr);
	}

	if servers.is_empty() {
		return Err(BrokerError::ConfigError("no servers specified in server file".to_string()));
	}

	Ok(servers)
}

/// Reads one record per non-blank line, in the same textual form as a PUT payload.
pub(crate) fn load_data_file(path: &str) -> Result<Vec<String>, BrokerError> {
	let contents = std::fs::read_to_string(path)
		.map_err(|e| BrokerError::ConfigError(format!("data file not found: {}", e)))?;

	Ok(contents.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect())
}

/// Validates `k` against the number of servers in the list; fatal at startup if violated.
pub(crate) fn validate_replication_factor(k: usize, num_servers: usize) -> Result<(), BrokerError> {
	if k == 0 {
		return Err(BrokerError::ConfigError("replication factor must be positive".to_string()));
	}
	if k > num_servers {
		return Err(BrokerError::ConfigError(format!(
			"replication factor ({}) cannot be greater than number of servers ({})",
			k, num_servers
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_lines_are_ignored() {
		let servers = parse_server_list("127.0.0.1 9000\n\n127.0.0.1 9001\n").unwrap();
		assert_eq!(servers.len(), 2);
	}

	#[test]
	fn malformed_line_is_fatal() {
		let err = parse_server_list("127.0.0.1 9000\nnot-a-valid-line\n").unwrap_err();
		assert!(matches!(err, BrokerError::ConfigError(_)));
	}

	#[test]
	fn missing_port_is_fatal() {
		let err = parse_server_list("127.0.0.1\n").unwrap_err();
		assert!(matches!(err, BrokerError::ConfigError(_)));
	}

	#[test]
	fn non_numeric_port_is_fatal() {
		let err = parse_server_list("127.0.0.1 not-a-port\n").unwrap_err();
		assert!(matches!(err, BrokerError::ConfigError(_)));
	}

	#[test]
	fn empty_file_is_fatal() {
		let err = parse_server_list("\n\n").unwrap_err();
		assert!(matches!(err, BrokerError::ConfigError(_)));
	}

	#[test]
	fn replication_factor_of_zero_is_rejected() {
		assert!(validate_replication_factor(0, 3).is_err());
	}

	#[test]
	fn replication_factor_exceeding_server_count_is_rejected() {
		assert!(validate_replication_factor(4, 3).is_err());
	}

	#[test]
	fn replication_factor_within_bounds_is_accepted() {
		assert!(validate_replication_factor(2, 3).is_ok());
	}
}
