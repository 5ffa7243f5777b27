use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{ApiSettings, AppConfig};
use crate::cli::Cli;
use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-user configuration file, used when `--config` is not given.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "pbxscreen", "pbx").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn build_config(cli: &Cli) -> Result<AppConfig> {
    let file_config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file does not exist: {}",
                    path.display()
                )));
            }
            FileConfig::from_file(path)?
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => FileConfig::from_file(&path)?,
            None => FileConfig::default(),
        },
    };
    merge(file_config, cli.work_dir.as_deref(), cli.api_key.as_deref())
}

fn merge(file_config: FileConfig, work_dir: Option<&Path>, api_key: Option<&str>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let api_file = file_config.api.unwrap_or_default();

    let page_size = api_file.page_size.unwrap_or(defaults.page_size);
    let id_chunk_size = api_file.id_chunk_size.unwrap_or(defaults.id_chunk_size);
    if page_size == 0 {
        return Err(CliError::Config("`api.page-size` must be at least 1".to_string()));
    }
    if id_chunk_size == 0 {
        return Err(CliError::Config(
            "`api.id-chunk-size` must be at least 1".to_string(),
        ));
    }

    let config = AppConfig {
        work_dir: work_dir
            .map(Path::to_path_buf)
            .or(file_config.work_dir)
            .unwrap_or(defaults.work_dir),
        api: ApiSettings {
            base_url: api_file.base_url.unwrap_or(defaults.base_url),
            api_key: api_key.map(str::to_string).or(api_file.api_key),
            summary_path: api_file.summary_path.unwrap_or(defaults.summary_path),
            entries_path: api_file.entries_path.unwrap_or(defaults.entries_path),
            page_size,
            id_chunk_size,
            timeout_secs: api_file.timeout_secs.unwrap_or(defaults.timeout_secs),
        },
    };
    debug!(
        "Resolved configuration: work_dir={:?}, base_url={}, api_key set: {}",
        config.work_dir,
        config.api.base_url,
        config.api.api_key.is_some()
    );
    Ok(config)
}
