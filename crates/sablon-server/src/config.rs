use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sablon_store::namespace::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use sablon_store::{DocumentStore, InMemoryDocumentStore, JsonFileDocumentStore, Namespace};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: String,
    pub collection: String,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database: DEFAULT_DATABASE.into(),
            collection: DEFAULT_COLLECTION.into(),
            storage: StorageConfig::default(),
        }
    }
}

/// Which document store backs the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Memory,
    File { root: PathBuf },
}

impl ServerConfig {
    /// Read a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn namespace(&self) -> ServerResult<Namespace> {
        Namespace::new(&self.database, &self.collection)
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Open the configured backend.
    pub fn open_store(&self) -> ServerResult<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match &self.storage {
            StorageConfig::Memory => Arc::new(InMemoryDocumentStore::new()),
            StorageConfig::File { root } => Arc::new(JsonFileDocumentStore::open(root)?),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.database, "sablon_db");
        assert_eq!(c.collection, "sablon_collection");
        assert_eq!(c.storage, StorageConfig::Memory);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c = ServerConfig::from_toml("bind_addr = \"0.0.0.0:9000\"").unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.database, "sablon_db");
    }

    #[test]
    fn file_storage_from_toml() {
        let c = ServerConfig::from_toml(
            "[storage]\nbackend = \"file\"\nroot = \"/var/lib/sablon\"\n",
        )
        .unwrap();
        assert_eq!(
            c.storage,
            StorageConfig::File { root: PathBuf::from("/var/lib/sablon") }
        );
    }

    #[test]
    fn toml_roundtrip() {
        let c = ServerConfig::default();
        let back = ServerConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back.bind_addr, c.bind_addr);
        assert_eq!(back.storage, c.storage);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml("bind_addr = 12"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn bad_namespace_is_config_error() {
        let c = ServerConfig { collection: "a/b".into(), ..Default::default() };
        assert!(matches!(c.namespace(), Err(ServerError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sablon.toml");
        std::fs::write(&path, "database = \"other_db\"\n").unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap().database, "other_db");
    }

    #[test]
    fn open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let c = ServerConfig {
            storage: StorageConfig::File { root: dir.path().join("data") },
            ..Default::default()
        };
        let store = c.open_store().unwrap();
        assert_eq!(store.find_all(&c.namespace().unwrap()).unwrap().count(), 0);
    }
}
