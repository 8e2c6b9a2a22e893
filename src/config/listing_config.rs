use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{event, Level};

use crate::{Error, PagingConfig};

/// Default address the listing server binds to,
///
const DEFAULT_ADDRESS: &'static str = "localhost:5000";

/// Default storage root, same as the distribution filesystem driver,
///
const DEFAULT_STORAGE_ROOT: &'static str = "/var/lib/registry";

/// Config file for the listing server,
///
/// Example:
///
/// ```toml
/// address = "0.0.0.0:5000"
///
/// [storage]
/// root = "/var/lib/registry"
///
/// [paging]
/// default_page_size = 100
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Address to serve the registry api on,
    ///
    pub address: String,
    /// Storage settings,
    ///
    pub storage: StorageConfig,
    /// Pagination settings,
    ///
    pub paging: PagingConfig,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            storage: StorageConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

/// Storage settings,
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory of the filesystem storage driver,
    ///
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
        }
    }
}

impl ListingConfig {
    /// Tries to load config from a toml file,
    ///
    /// Returns an error if the file cannot be read, or the content is invalid
    ///
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        event!(Level::DEBUG, "Loading config from {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        Self::try_load_content(content)
    }

    /// Tries to parse content as a toml config,
    ///
    pub fn try_load_content(content: impl AsRef<str>) -> Result<Self, Error> {
        Ok(toml::from_str(content.as_ref())?)
    }
}
