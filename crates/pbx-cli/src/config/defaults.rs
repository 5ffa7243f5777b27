use std::path::PathBuf;

pub const PROPERTIES_FILE: &str = "precomputed_properties.csv.gz";
pub const COMPOSITIONS_FILE: &str = "compositions.csv.gz";
pub const DOWNLOADS_STEM: &str = "pourbaix_downloads";
pub const ENTRIES_DIR: &str = "pourbaix_entries";
pub const DATA_FILE: &str = "pourbaix_data.csv.gz";
pub const ANNOTATED_FILE: &str = "pourbaix_annotated.csv.gz";
pub const TABLE_EXTENSION: &str = "csv.gz";

#[derive(Debug, Clone)]
pub struct DefaultsConfig {
    pub work_dir: PathBuf,
    pub base_url: String,
    pub summary_path: String,
    pub entries_path: String,
    pub page_size: usize,
    pub id_chunk_size: usize,
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            base_url: "https://api.materialsproject.org".to_string(),
            summary_path: "/materials/summary/".to_string(),
            entries_path: "/materials/core/pourbaix/".to_string(),
            page_size: 1000,
            id_chunk_size: 100,
            timeout_secs: 60,
        }
    }
}
