use crate::cli::DecomposeArgs;
use crate::commands::progress_handler;
use crate::config::defaults::{DOWNLOADS_STEM, TABLE_EXTENSION};
use crate::config::models::AppConfig;
use crate::error::Result;
use pbxscreen::engine::conditions::ConditionSpec;
use pbxscreen::engine::config::{DecomposeConfig, DecomposeConfigBuilder};
use pbxscreen::engine::progress::ProgressReporter;
use pbxscreen::engine::sharding::JobShard;
use pbxscreen::workflows;
use tracing::info;

pub async fn run(args: DecomposeArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let decompose_config = build_decompose_config(args, config)?;
    info!(
        "Decomposing entries listed in {:?}",
        decompose_config.downloads_path
    );
    std::fs::create_dir_all(&decompose_config.output_dir)?;

    let handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let summary = tokio::task::block_in_place(|| {
        workflows::decompose::run(&decompose_config, &reporter)
    })?;

    println!(
        "Processed {} composition(s) ({} resumed, {} without entries): {} diagram(s), {} new row(s)",
        summary.keys_processed,
        summary.keys_resumed,
        summary.keys_without_entries,
        summary.diagrams_built,
        summary.rows_added
    );
    if summary.entries_without_conditions > 0 {
        println!(
            "Warning: {} entr(y/ies) had no applicable conditions and were skipped.",
            summary.entries_without_conditions
        );
    }
    println!("Data written to {}", summary.data_path.display());
    println!("Diagram timings written to {}", summary.diagrams_path.display());
    Ok(())
}

fn build_decompose_config(args: DecomposeArgs, config: &AppConfig) -> Result<DecomposeConfig> {
    let shard = JobShard::from_options(args.job_number, args.njobs)?;
    let conditions = ConditionSpec {
        global_path: args.global_conditions,
        material_path: args.material_conditions,
        ph: args.ph,
        voltage: args.voltage,
    };
    let downloads_path = args
        .input
        .unwrap_or_else(|| config.path(format!("{}.{}", DOWNLOADS_STEM, TABLE_EXTENSION)));

    let built = DecomposeConfigBuilder::new()
        .downloads_path(downloads_path)
        .output_dir(config.work_dir.clone())
        .shard(shard)
        .conditions(conditions)
        .build()?;
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::ApiSettings;
    use crate::error::CliError;
    use std::path::PathBuf;

    fn app_config() -> AppConfig {
        AppConfig {
            work_dir: PathBuf::from("runs"),
            api: ApiSettings::default(),
        }
    }

    fn args() -> DecomposeArgs {
        DecomposeArgs {
            job_number: None,
            njobs: None,
            global_conditions: None,
            material_conditions: None,
            ph: Some("0,7".to_string()),
            voltage: Some("0".to_string()),
            input: None,
        }
    }

    #[test]
    fn defaults_point_into_work_dir() {
        let built = build_decompose_config(args(), &app_config()).unwrap();
        assert_eq!(
            built.downloads_path,
            PathBuf::from("runs").join("pourbaix_downloads.csv.gz")
        );
        assert_eq!(built.output_dir, PathBuf::from("runs"));
        assert_eq!(built.shard, None);
    }

    #[test]
    fn shard_options_are_validated() {
        let mut half = args();
        half.job_number = Some(1);
        assert!(matches!(
            build_decompose_config(half, &app_config()),
            Err(CliError::Config(_))
        ));

        let mut out_of_range = args();
        out_of_range.job_number = Some(4);
        out_of_range.njobs = Some(4);
        assert!(matches!(
            build_decompose_config(out_of_range, &app_config()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn missing_condition_source_is_rejected() {
        let mut none = args();
        none.ph = None;
        none.voltage = None;
        assert!(matches!(
            build_decompose_config(none, &app_config()),
            Err(CliError::Config(_))
        ));
    }
}
