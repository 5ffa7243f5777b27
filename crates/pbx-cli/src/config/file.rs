use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileApiConfig {
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
    #[serde(rename = "entries-path")]
    pub entries_path: Option<String>,
    #[serde(rename = "page-size")]
    pub page_size: Option<usize>,
    #[serde(rename = "id-chunk-size")]
    pub id_chunk_size: Option<usize>,
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "work-dir")]
    pub work_dir: Option<PathBuf>,
    pub api: Option<FileApiConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
