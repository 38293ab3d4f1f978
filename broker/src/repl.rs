//! The broker's line-oriented command interface: `GET key`, `DELETE key`, `QUERY dotted.path`.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::broker::Broker;

/// Reads commands from stdin until EOF or interrupt, dispatching each to `broker`.
pub(crate) async fn run(broker: &Broker) {
	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	println!("\nReady for commands (GET, DELETE, QUERY):");
	loop {
		let line = tokio::select! {
			line = lines.next_line() => line,
			_ = tokio::signal::ctrl_c() => {
				println!("\nShutting down broker...");
				break;
			}
		};

		let line = match line {
			Ok(Some(line)) => line,
			Ok(None) => {
				println!("\nShutting down broker...");
				break;
			},
			Err(e) => {
				eprintln!("Error reading command: {}", e);
				continue;
			},
		};

		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		let (cmd, arg) = match line.split_once(char::is_whitespace) {
			Some((cmd, arg)) if !arg.trim().is_empty() => (cmd, arg.trim()),
			_ => {
				println!("ERROR: Invalid command format. Expected: <COMMAND> <key>");
				continue;
			},
		};

		broker.refresh_active().await;

		match cmd.to_ascii_uppercase().as_str() {
			"GET" => {
				if let Some(result) = broker.get(arg).await {
					println!("{}", result);
				}
			},
			"QUERY" => {
				if let Some(result) = broker.query(arg).await {
					println!("{}", result);
				}
			},
			"DELETE" => match broker.delete(arg).await {
				Ok(true) => println!("Successfully deleted {}", arg),
				Ok(false) => println!("ERROR: key not found"),
				Err(e) => println!("WARNING: {}", e),
			},
			other => {
				println!("ERROR: Unknown command '{}'. Valid commands: GET, DELETE, QUERY", other);
			},
		}
	}
}
