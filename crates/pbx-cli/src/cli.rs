use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "pbxscreen contributors",
    version,
    about = "pbx - high-throughput Pourbaix stability screening against a remote materials database.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file. Defaults to the per-user config file if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the pipeline's tables and entry files
    #[arg(long, global = true, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// API key for the materials database
    #[arg(long, global = true, env = "MP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase verbosity level (--verbose for INFO, twice for DEBUG, three times for TRACE)
    #[arg(long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch summary properties of materials and derive the composition list.
    Properties(PropertiesArgs),
    /// Write every 1- to N-element composition of a list of elements.
    Enumerate(EnumerateArgs),
    /// Download Pourbaix entries for every composition, optionally as one shard of a job array.
    Download(DownloadArgs),
    /// Compute decomposition energies for every downloaded entry.
    Decompose(DecomposeArgs),
    /// Filter redundant rows and join decomposition data with material properties.
    Annotate(AnnotateArgs),
    /// Concatenate shard tables that share a header.
    Merge(MergeArgs),
}

/// Arguments for the `properties` subcommand.
#[derive(Args, Debug)]
pub struct PropertiesArgs {
    /// File with one material id per line; blank lines and '#' comments are ignored.
    /// Without it every material in the database is fetched.
    #[arg(long, value_name = "PATH")]
    pub material_ids: Option<PathBuf>,

    /// Output path for the properties table.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output path for the composition list.
    #[arg(long, value_name = "PATH")]
    pub compositions: Option<PathBuf>,
}

/// Arguments for the `enumerate` subcommand.
#[derive(Args, Debug)]
pub struct EnumerateArgs {
    /// Comma-separated element symbols, e.g. 'Fe,Ni,Co'. Defaults to the built-in candidate list.
    #[arg(short, long, value_name = "SYMBOLS")]
    pub elements: Option<String>,

    /// Largest number of elements in a composition.
    #[arg(long, value_name = "INT", default_value_t = 3)]
    pub max_size: usize,

    /// Output path for the composition list.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `download` subcommand.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Zero-based index of this job.
    #[arg(value_name = "JOB_INDEX")]
    pub job_index: Option<usize>,

    /// Total number of jobs.
    #[arg(value_name = "JOB_COUNT")]
    pub job_count: Option<usize>,

    /// Composition list to download.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// Arguments for the `decompose` subcommand.
#[derive(Args, Debug)]
pub struct DecomposeArgs {
    /// Zero-based index of this job.
    #[arg(short = 'j', long, value_name = "INT")]
    pub job_number: Option<usize>,

    /// Total number of jobs.
    #[arg(short = 'n', long, value_name = "INT")]
    pub njobs: Option<usize>,

    /// CSV file with 'ph' and 'voltage' columns applied to every entry.
    #[arg(short = 'g', long, value_name = "PATH")]
    pub global_conditions: Option<PathBuf>,

    /// CSV file with 'material_id', 'ph' and 'voltage' columns.
    #[arg(short = 'm', long, value_name = "PATH")]
    pub material_conditions: Option<PathBuf>,

    /// Comma-separated pH values, combined with every --voltage value.
    #[arg(short = 'p', long, value_name = "VALUES", allow_hyphen_values = true)]
    pub ph: Option<String>,

    /// Comma-separated potentials in volts, combined with every --ph value.
    #[arg(short = 'v', long, value_name = "VALUES", allow_hyphen_values = true)]
    pub voltage: Option<String>,

    /// Download table to read. Defaults to the merged downloads table in the work directory.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Decomposition data table.
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Material properties table.
    #[arg(long, value_name = "PATH")]
    pub properties: Option<PathBuf>,

    /// Earlier decomposition table whose energies become 'decomposition_energy_v0'.
    #[arg(long, value_name = "PATH")]
    pub baseline: Option<PathBuf>,

    /// Output path for the annotated table.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `merge` subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Output path for the merged table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Tables to concatenate, in order.
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,
}
