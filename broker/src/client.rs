//! Raw-TCP client calls against a single node: a liveness probe and a full
//! send-command-read-reply round trip, each under its own timeout.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::BrokerError;

const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn to_transport_error(server: SocketAddr, source: std::io::Error) -> BrokerError {
	BrokerError::Transport { server, source }
}

fn timed_out(server: SocketAddr) -> BrokerError {
	BrokerError::Transport {
		server,
		source: std::io::Error::new(std::io::ErrorKind::TimedOut, "operation timed out"),
	}
}

/// Attempts a bare TCP connect to `server`, used only to determine reachability.
pub(crate) async fn probe(server: SocketAddr) -> bool {
	matches!(tokio::time::timeout(LIVENESS_TIMEOUT, TcpStream::connect(server)).await, Ok(Ok(_)))
}

/// Sends `command` to `server` and returns its full reply with the trailing newline trimmed.
///
/// Opens a fresh connection per call, matching the node's one-request-per-connection protocol:
/// writes the command, half-closes the sending side, then reads until the node closes its side.
pub(crate) async fn send_command(server: SocketAddr, command: &str) -> Result<String, BrokerError> {
	match tokio::time::timeout(REQUEST_TIMEOUT, send_command_inner(server, command)).await {
		Ok(result) => result,
		Err(_) => Err(timed_out(server)),
	}
}

async fn send_command_inner(server: SocketAddr, command: &str) -> Result<String, BrokerError> {
	let mut stream =
		TcpStream::connect(server).await.map_err(|e| to_transport_error(server, e))?;

	stream.write_all(command.as_bytes()).await.map_err(|e| to_transport_error(server, e))?;
	stream.shutdown().await.map_err(|e| to_transport_error(server, e))?;

	let mut reply = Vec::new();
	stream.read_to_end(&mut reply).await.map_err(|e| to_transport_error(server, e))?;

	let reply = String::from_utf8_lossy(&reply).trim().to_string();
	Ok(reply)
}
