//! Hosts the storage-node server: a single in-memory trie behind a raw-TCP, one-request-per-
//! connection wire protocol.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(missing_docs)]

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::signal::unix::SignalKind;

use kvtrie_api::store::Store;
use kvtrie_store::trie_store::TrieStore;

mod config;
mod protocol;

use config::Configuration;

fn init_logging(level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::new(level.to_string()))
		.init();
}

async fn serve_connection(mut stream: tokio::net::TcpStream, store: Arc<dyn Store>) {
	let mut request = Vec::new();
	if let Err(e) = stream.read_to_end(&mut request).await {
		tracing::warn!("failed to read request: {}", e);
		return;
	}

	let request = match std::str::from_utf8(&request) {
		Ok(s) => s,
		Err(_) => {
			let _ = stream.write_all(b"ERROR request is not valid UTF-8\n").await;
			return;
		},
	};

	let reply = protocol::handle_request(request, store.as_ref()).await;
	if let Err(e) = stream.write_all(format!("{}\n", reply).as_bytes()).await {
		tracing::warn!("failed to write reply: {}", e);
	}
	let _ = stream.shutdown().await;
}

fn main() {
	let args: Vec<String> = std::env::args().collect();
	let config_path = args.get(1).map(String::as_str);

	let Configuration { bind_address, log_level, log_file: _ } =
		match config::load_configuration(config_path) {
			Ok(cfg) => cfg,
			Err(e) => {
				eprintln!("Failed to load configuration: {}", e);
				std::process::exit(1);
			},
		};

	init_logging(&log_level);

	let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
		Ok(runtime) => Arc::new(runtime),
		Err(e) => {
			eprintln!("Failed to set up tokio runtime: {}", e);
			std::process::exit(-1);
		},
	};

	runtime.block_on(async {
		let mut sigterm_stream = match tokio::signal::unix::signal(SignalKind::terminate()) {
			Ok(stream) => stream,
			Err(e) => {
				tracing::error!("Failed to register for SIGTERM stream: {}", e);
				std::process::exit(-1);
			},
		};

		let store: Arc<dyn Store> = Arc::new(TrieStore::new());

		let listener = match TcpListener::bind(&bind_address).await {
			Ok(listener) => listener,
			Err(e) => {
				tracing::error!("Failed to bind {}: {}", bind_address, e);
				std::process::exit(-1);
			},
		};
		tracing::info!("Listening for incoming connections on {}", bind_address);

		loop {
			tokio::select! {
				res = listener.accept() => {
					match res {
						Ok((stream, peer)) => {
							tracing::debug!("accepted connection from {}", peer);
							serve_connection(stream, Arc::clone(&store)).await;
						},
						Err(e) => tracing::warn!("Failed to accept connection: {}", e),
					}
				}
				_ = tokio::signal::ctrl_c() => {
					tracing::info!("Received CTRL-C, shutting down..");
					break;
				}
				_ = sigterm_stream.recv() => {
					tracing::info!("Received SIGTERM, shutting down..");
					break;
				}
			}
		}
	});
}
