use super::conditions::ConditionSpec;
use super::sharding::JobShard;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Job index and job count must be given together, or not at all")]
    IncompleteJobSpec,

    #[error("Job count must be at least 1")]
    InvalidJobCount,

    #[error("Job index {index} is out of range for {count} job(s)")]
    JobIndexOutOfRange { index: usize, count: usize },

    #[error(
        "No condition source given: supply a global conditions file, a material conditions file, or both --ph and --voltage"
    )]
    NoConditionSource,

    #[error("Both --ph and --voltage must be given when specifying conditions directly")]
    IncompleteDirectConditions,

    #[error("Invalid {name} value '{value}'")]
    InvalidConditionValue { name: &'static str, value: String },

    #[error("Conditions file '{path}' must have column(s): {}", .missing.join(", "))]
    MissingConditionColumns { path: String, missing: Vec<String> },

    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),

    #[error("Maximum composition size must be between 1 and {max}, got {value}")]
    InvalidMaxSize { value: usize, max: usize },
}

/// Settings of the decomposition stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposeConfig {
    /// Download table listing the entry file of every composition key.
    pub downloads_path: PathBuf,
    /// Directory receiving the data and diagram tables.
    pub output_dir: PathBuf,
    pub shard: Option<JobShard>,
    pub conditions: ConditionSpec,
}

#[derive(Default)]
pub struct DecomposeConfigBuilder {
    downloads_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    shard: Option<JobShard>,
    conditions: Option<ConditionSpec>,
}

impl DecomposeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloads_path(mut self, path: PathBuf) -> Self {
        self.downloads_path = Some(path);
        self
    }
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }
    pub fn shard(mut self, shard: Option<JobShard>) -> Self {
        self.shard = shard;
        self
    }
    pub fn conditions(mut self, conditions: ConditionSpec) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn build(self) -> Result<DecomposeConfig, ConfigError> {
        let conditions = self
            .conditions
            .ok_or(ConfigError::MissingParameter("conditions"))?;
        conditions.validate()?;
        Ok(DecomposeConfig {
            downloads_path: self
                .downloads_path
                .ok_or(ConfigError::MissingParameter("downloads_path"))?,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            shard: self.shard,
            conditions,
        })
    }
}

/// Settings of the annotation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotateConfig {
    pub data_path: PathBuf,
    pub properties_path: PathBuf,
    /// Earlier decomposition table supplying `decomposition_energy_v0`.
    pub baseline_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

#[derive(Default)]
pub struct AnnotateConfigBuilder {
    data_path: Option<PathBuf>,
    properties_path: Option<PathBuf>,
    baseline_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
}

impl AnnotateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_path(mut self, path: PathBuf) -> Self {
        self.data_path = Some(path);
        self
    }
    pub fn properties_path(mut self, path: PathBuf) -> Self {
        self.properties_path = Some(path);
        self
    }
    pub fn baseline_path(mut self, path: Option<PathBuf>) -> Self {
        self.baseline_path = path;
        self
    }
    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }

    pub fn build(self) -> Result<AnnotateConfig, ConfigError> {
        Ok(AnnotateConfig {
            data_path: self
                .data_path
                .ok_or(ConfigError::MissingParameter("data_path"))?,
            properties_path: self
                .properties_path
                .ok_or(ConfigError::MissingParameter("properties_path"))?,
            baseline_path: self.baseline_path,
            output_path: self
                .output_path
                .ok_or(ConfigError::MissingParameter("output_path"))?,
        })
    }
}
