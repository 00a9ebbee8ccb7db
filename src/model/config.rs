use serde::{Deserialize, Serialize};

/// Configuration from config.toml. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key the task collection is stored under
    #[serde(default = "default_store_key")]
    pub key: String,
    /// Backing file of the key-value store, relative to the data directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            key: default_store_key(),
            file: default_store_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default = "default_id_prefix")]
    pub prefix: String,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            prefix: default_id_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_filename")]
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            filename: default_export_filename(),
        }
    }
}

fn default_store_key() -> String {
    "tasks".to_string()
}

fn default_store_file() -> String {
    "store.json".to_string()
}

fn default_id_prefix() -> String {
    "T".to_string()
}

fn default_export_filename() -> String {
    "myTasks.txt".to_string()
}
