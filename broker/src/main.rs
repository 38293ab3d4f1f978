//! Hosts the broker: replicates writes across a fixed set of storage nodes, serves reads from any
//! reachable replica, and deletes from every replica that holds a key.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(missing_docs)]

mod broker;
mod client;
mod error;
mod repl;
mod server_list;

use broker::Broker;

fn init_logging() {
	let filter = std::env::var("KVTRIE_BROKER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::new(filter)).init();
}

fn main() {
	init_logging();

	let args: Vec<String> = std::env::args().collect();
	if args.len() != 4 {
		eprintln!("Usage: {} <server-list-file> <data-file> <replication-factor>", args[0]);
		std::process::exit(1);
	}
	let server_list_path = &args[1];
	let data_file_path = &args[2];
	let k: usize = match args[3].parse() {
		Ok(k) => k,
		Err(_) => {
			eprintln!("Error: replication factor must be a positive integer");
			std::process::exit(1);
		},
	};

	let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
		Ok(runtime) => runtime,
		Err(e) => {
			eprintln!("Failed to set up tokio runtime: {}", e);
			std::process::exit(-1);
		},
	};

	runtime.block_on(async {
		if let Err(e) = run(server_list_path, data_file_path, k).await {
			eprintln!("Error: {}", e);
			std::process::exit(1);
		}
	});
}

async fn run(
	server_list_path: &str, data_file_path: &str, k: usize,
) -> Result<(), Box<dyn std::error::Error>> {
	let servers = server_list::load_server_list(server_list_path)?;
	server_list::validate_replication_factor(k, servers.len())?;

	let broker = Broker::connect(servers, k).await?;

	println!("\nLoading and distributing data...");
	let records = server_list::load_data_file(data_file_path)?;
	for record in &records {
		match broker.put(record).await {
			Ok(outcome) if outcome.successes == outcome.k => {},
			Ok(outcome) => {
				println!(
					"PUT partially replicated: {}/{} servers for record: {}",
					outcome.successes, outcome.k, record
				);
			},
			Err(e) => println!("Warning: {}", e),
		}
	}
	println!("\nData distribution was successfully completed.");

	repl::run(&broker).await;
	Ok(())
}
