use super::defaults::DefaultsConfig;
use std::path::{Path, PathBuf};

/// Connection settings of the materials database client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub summary_path: String,
    pub entries_path: String,
    pub page_size: usize,
    pub id_chunk_size: usize,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let defaults = DefaultsConfig::default();
        Self {
            base_url: defaults.base_url,
            api_key: None,
            summary_path: defaults.summary_path,
            entries_path: defaults.entries_path,
            page_size: defaults.page_size,
            id_chunk_size: defaults.id_chunk_size,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub work_dir: PathBuf,
    pub api: ApiSettings,
}

impl AppConfig {
    /// Resolves a file name inside the working directory.
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.work_dir.join(name)
    }
}
