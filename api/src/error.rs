use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error raised while parsing the wire-level record/value grammar or dispatching a node command.
///
/// Every variant maps directly to a single-line `ERROR <message>` reply on the wire; none of
/// these are meant to tear down a connection handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
	/// The record or value text did not conform to the grammar in the Value Codec section.
	InvalidFormat(String),
	/// The first whitespace-separated token was not one of `PUT`, `GET`, `DELETE`, `QUERY`.
	UnknownCommand(String),
	/// A command was sent with no payload, or less payload than its grammar requires.
	MissingArgument(String),
}

impl Display for ProtocolError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ProtocolError::InvalidFormat(message) => write!(f, "invalid format: {}", message),
			ProtocolError::UnknownCommand(cmd) => write!(f, "unknown command '{}'", cmd),
			ProtocolError::MissingArgument(cmd) => {
				write!(f, "missing argument for command '{}'", cmd)
			},
		}
	}
}

impl Error for ProtocolError {}
