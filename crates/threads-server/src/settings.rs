//! Server configuration, read from `config.toml` and `THREADS_*` variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use threads_service::ServiceConfig;

/// Top-level server configuration.
///
/// Every field has a default, so the server starts without a config file.
/// Nested service settings are overridden from the environment with a
/// double underscore, e.g. `THREADS_SERVICE__DEFAULT_PAGE_SIZE=50`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
  pub service:    ServiceConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       3000,
      store_path: PathBuf::from("~/.local/share/threads/threads.db"),
      service:    ServiceConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Read the TOML file at `path` (optional) with `THREADS_*` variables
  /// layered on top.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::load_from(path, environment())
  }

  fn load_from(path: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// `THREADS_PORT`, `THREADS_STORE_PATH`, `THREADS_SERVICE__DEFAULT_PAGE_SIZE`.
/// One underscore after the prefix, two between nested keys.
fn environment() -> Environment {
  Environment::with_prefix("THREADS")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_sources_yield_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:3000");
    assert_eq!(cfg.service.default_page_size, 20);
    assert_eq!(cfg.service.profile_edit_route, "/profile/edit");
  }

  #[test]
  fn threads_env_vars_override_file_and_defaults() {
    let vars = config::Map::from([
      ("THREADS_PORT".to_owned(), "8080".to_owned()),
      ("THREADS_STORE_PATH".to_owned(), "/srv/threads.db".to_owned()),
      ("THREADS_SERVICE__DEFAULT_PAGE_SIZE".to_owned(), "50".to_owned()),
      ("OTHER_PORT".to_owned(), "9".to_owned()),
    ]);
    let cfg = ServerConfig::load_from(
      Path::new("/nonexistent/threads-config.toml"),
      environment().source(Some(vars)),
    )
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("/srv/threads.db"));
    assert_eq!(cfg.service.default_page_size, 50);
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn toml_overrides_nested_service_settings() {
    let toml = r#"
      port = 8080
      store_path = "/tmp/threads.db"

      [service]
      default_page_size = 5
    "#;
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/threads.db"));
    assert_eq!(cfg.service.default_page_size, 5);
    assert_eq!(cfg.service.profile_edit_route, "/profile/edit");
  }
}
