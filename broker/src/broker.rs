//! Tracks reachable replicas and implements the k-way replicated PUT, best-effort GET/QUERY, and
//! all-replica DELETE described for the broker.

use std::collections::HashSet;
use std::net::SocketAddr;

use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::client;
use crate::error::BrokerError;

/// Outcome of a PUT: how many of the `k` chosen replicas acknowledged with `OK`.
pub struct PutOutcome {
	/// Number of replicas that replied `OK`.
	pub successes: usize,
	/// Replication factor the PUT targeted.
	pub k: usize,
}

/// The broker's view of the cluster: a fixed candidate set (`initial_servers`), a shrinking subset
/// still believed reachable (`active_servers`), and the replication factor `k`.
pub struct Broker {
	initial_servers: Vec<SocketAddr>,
	active_servers: Mutex<HashSet<SocketAddr>>,
	k: usize,
}

impl Broker {
	/// Probes every candidate in `servers` with a short connect timeout. The ones that answer
	/// become both `initial_servers` and the starting `active_servers`. Fails with
	/// [`BrokerError::InsufficientReplicas`] if fewer than `k` respond.
	pub async fn connect(servers: Vec<SocketAddr>, k: usize) -> Result<Self, BrokerError> {
		let mut active = HashSet::new();
		for &server in &servers {
			if client::probe(server).await {
				tracing::info!("successfully connected to server {}", server);
				active.insert(server);
			} else {
				tracing::warn!("could not connect to server {}", server);
			}
		}

		if active.len() < k {
			return Err(BrokerError::InsufficientReplicas { needed: k, available: active.len() });
		}

		tracing::info!("initial server status: {}/{} active servers", active.len(), servers.len());
		let initial_servers: Vec<SocketAddr> = active.iter().copied().collect();

		Ok(Self { initial_servers, active_servers: Mutex::new(active), k })
	}

	/// Re-probes every address currently in `active_servers`, dropping those that fail. An address
	/// once dropped is never re-admitted even if it becomes reachable again.
	pub async fn refresh_active(&self) {
		let candidates: Vec<SocketAddr> = self.active_servers.lock().await.iter().copied().collect();
		let mut dead = Vec::new();
		for server in candidates {
			if !client::probe(server).await {
				dead.push(server);
			}
		}
		if !dead.is_empty() {
			let mut active = self.active_servers.lock().await;
			for server in dead {
				active.remove(&server);
			}
		}
	}

	/// `true` iff `k` or more of the initially active servers are now unreachable.
	pub async fn k_or_more_down(&self) -> bool {
		let active = self.active_servers.lock().await;
		let down = self.initial_servers.iter().filter(|s| !active.contains(s)).count();
		down >= self.k
	}

	async fn drop_active(&self, server: SocketAddr) {
		self.active_servers.lock().await.remove(&server);
	}

	/// Replicates `record` (a full `"key" : VALUE` payload) to a random `k`-subset of
	/// `initial_servers`. Not rolled back on partial failure; the caller is told how many of the
	/// `k` targets succeeded.
	pub async fn put(&self, record: &str) -> Result<PutOutcome, BrokerError> {
		let active_count = self.active_servers.lock().await.len();
		if active_count < self.k {
			return Err(BrokerError::InsufficientReplicas { needed: self.k, available: active_count });
		}

		let mut rng = rand::thread_rng();
		let targets: Vec<SocketAddr> =
			self.initial_servers.choose_multiple(&mut rng, self.k).copied().collect();

		let command = format!("PUT {}", record);
		let mut successes = 0;
		for server in targets {
			match client::send_command(server, &command).await {
				Ok(reply) if reply == "OK" => successes += 1,
				Ok(reply) => {
					tracing::warn!("server {} returned: {}", server, reply);
				},
				Err(e) => {
					tracing::warn!("{}", e);
					self.drop_active(server).await;
				},
			}
		}

		Ok(PutOutcome { successes, k: self.k })
	}

	/// Shared implementation of GET/QUERY: returns `None` if degraded or if no reachable replica
	/// has a non-`NOT FOUND` answer.
	async fn retrieve(&self, command: &str, arg: &str) -> Option<String> {
		if self.k_or_more_down().await {
			tracing::warn!(
				"cannot guarantee correct output: {} or more initially active servers are down",
				self.k
			);
			return None;
		}

		let key = arg.trim().trim_matches('"');
		let targets: Vec<SocketAddr> = self.active_servers.lock().await.iter().copied().collect();
		let request = format!("{} {}", command, key);

		for server in targets {
			match client::send_command(server, &request).await {
				Ok(reply) if reply != "NOT FOUND" => return Some(reply),
				Ok(_) => continue,
				Err(e) => {
					tracing::warn!("{}", e);
					self.drop_active(server).await;
				},
			}
		}

		Some("NOT FOUND".to_string())
	}

	/// Returns the first non-`NOT FOUND` reply from a reachable replica, or `None` if degraded.
	pub async fn get(&self, key: &str) -> Option<String> {
		self.retrieve("GET", key).await
	}

	/// Returns the first non-`NOT FOUND` reply from a reachable replica, or `None` if degraded.
	pub async fn query(&self, path: &str) -> Option<String> {
		self.retrieve("QUERY", path).await
	}

	/// Deletes `key` from every active replica that holds it. Refuses (returning
	/// [`BrokerError::InconsistentDelete`]) unless every initial replica is currently active.
	pub async fn delete(&self, key: &str) -> Result<bool, BrokerError> {
		let active_count = self.active_servers.lock().await.len();
		if active_count < self.initial_servers.len() {
			return Err(BrokerError::InconsistentDelete);
		}

		let key = key.trim().trim_matches('"');
		let targets: Vec<SocketAddr> = self.active_servers.lock().await.iter().copied().collect();

		let mut holders = Vec::new();
		for server in &targets {
			match client::send_command(*server, &format!("GET {}", key)).await {
				Ok(reply) if reply != "NOT FOUND" => holders.push(*server),
				Ok(_) => continue,
				Err(e) => {
					tracing::warn!("{}", e);
					self.drop_active(*server).await;
				},
			}
		}

		if holders.is_empty() {
			return Ok(false);
		}

		let mut success = true;
		for server in holders {
			match client::send_command(server, &format!("DELETE {}", key)).await {
				Ok(reply) if reply == "OK" => {
					tracing::debug!("server {} delete response: {}", server, reply);
				},
				Ok(reply) => {
					tracing::warn!("server {} delete response: {}", server, reply);
					success = false;
				},
				Err(e) => {
					tracing::warn!("{}", e);
					success = false;
				},
			}
		}

		Ok(success)
	}
}
