use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

const BIND_ADDR_VAR: &str = "KVTRIE_NODE_BIND_ADDRESS";
const LOG_LEVEL_VAR: &str = "KVTRIE_NODE_LOG_LEVEL";
const LOG_FILE_VAR: &str = "KVTRIE_NODE_LOG_FILE";

/// The structure of the toml config file. Any setting specified there can be overridden by the
/// corresponding environment variable.
#[derive(Deserialize, Default)]
struct TomlConfig {
	server_config: Option<ServerConfig>,
	log_config: Option<LogConfig>,
}

#[derive(Deserialize)]
struct ServerConfig {
	bind_address: Option<SocketAddr>,
}

#[derive(Deserialize)]
struct LogConfig {
	level: Option<String>,
	file: Option<PathBuf>,
}

/// The result of reading both the environment variables and the config file.
pub(crate) struct Configuration {
	pub(crate) bind_address: SocketAddr,
	pub(crate) log_level: String,
	pub(crate) log_file: Option<PathBuf>,
}

#[inline]
fn read_env(env_var: &str) -> Result<Option<String>, String> {
	match std::env::var(env_var) {
		Ok(env) => Ok(Some(env)),
		Err(std::env::VarError::NotPresent) => Ok(None),
		Err(e) => Err(format!("Failed to load the {} environment variable: {}", env_var, e)),
	}
}

#[inline]
fn read_config<T: std::fmt::Display>(
	env: Option<T>, config: Option<T>, item: &str, var_name: &str,
) -> Result<T, String> {
	env.or(config).ok_or(format!(
		"{} must be provided in the configuration file or the environment variable {} must be set.",
		item, var_name
	))
}

pub(crate) fn load_configuration(config_file_path: Option<&str>) -> Result<Configuration, String> {
	let TomlConfig { server_config, log_config } = match config_file_path {
		Some(path) => {
			let config_file = std::fs::read_to_string(path)
				.map_err(|e| format!("Failed to read configuration file: {}", e))?;
			toml::from_str(&config_file)
				.map_err(|e| format!("Failed to parse configuration file: {}", e))?
		},
		None => TomlConfig::default(),
	};

	let bind_address_env = read_env(BIND_ADDR_VAR)?
		.map(|addr| {
			addr.parse()
				.map_err(|e| format!("Unable to parse the bind address environment variable: {}", e))
		})
		.transpose()?;
	let bind_address = read_config(
		bind_address_env,
		server_config.and_then(|c| c.bind_address),
		"node bind address",
		BIND_ADDR_VAR,
	)?;

	let log_level_env = read_env(LOG_LEVEL_VAR)?;
	let log_level_config = log_config.as_ref().and_then(|c| c.level.clone());
	let log_level = log_level_env.or(log_level_config).unwrap_or_else(|| "info".to_string());

	let log_file_env: Option<PathBuf> = read_env(LOG_FILE_VAR)?.map(PathBuf::from);
	let log_file_config = log_config.and_then(|c| c.file);
	let log_file = log_file_env.or(log_file_config);

	Ok(Configuration { bind_address, log_level, log_file })
}
