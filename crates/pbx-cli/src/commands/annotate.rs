use crate::cli::AnnotateArgs;
use crate::commands::{ensure_parent, progress_handler};
use crate::config::defaults::{ANNOTATED_FILE, DATA_FILE, PROPERTIES_FILE};
use crate::config::models::AppConfig;
use crate::error::Result;
use pbxscreen::engine::config::{AnnotateConfig, AnnotateConfigBuilder};
use pbxscreen::engine::progress::ProgressReporter;
use pbxscreen::workflows;
use tracing::info;

pub async fn run(args: AnnotateArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let annotate_config = build_annotate_config(args, config)?;
    info!(
        "Annotating {:?} with properties from {:?}",
        annotate_config.data_path, annotate_config.properties_path
    );
    ensure_parent(&annotate_config.output_path)?;

    let handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let summary = tokio::task::block_in_place(|| {
        workflows::annotate::run(&annotate_config, &reporter)
    })?;

    let redundancy = &summary.redundancy;
    println!(
        "Filtered {} row(s): {} redundant, {} duplicate, {} subsumed by a larger key",
        redundancy.input_rows,
        redundancy.redundant_rows,
        redundancy.duplicate_rows,
        redundancy.subsumed_rows
    );
    if redundancy.residual_duplicates > 0 {
        println!(
            "Warning: {} (entry, condition) pair(s) still appear more than once.",
            redundancy.residual_duplicates
        );
    }
    println!(
        "Dropped {} row(s) without a material id and {} deprecated row(s)",
        summary.join.unmatched_prefix, summary.join.deprecated
    );
    if let Some(matched) = summary.baseline_matched {
        println!("Attached baseline energies to {} row(s)", matched);
    }
    println!(
        "Wrote {} annotated row(s) to {}",
        summary.rows_written,
        annotate_config.output_path.display()
    );
    Ok(())
}

fn build_annotate_config(args: AnnotateArgs, config: &AppConfig) -> Result<AnnotateConfig> {
    let built = AnnotateConfigBuilder::new()
        .data_path(args.data.unwrap_or_else(|| config.path(DATA_FILE)))
        .properties_path(args.properties.unwrap_or_else(|| config.path(PROPERTIES_FILE)))
        .baseline_path(args.baseline)
        .output_path(args.output.unwrap_or_else(|| config.path(ANNOTATED_FILE)))
        .build()?;
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::ApiSettings;
    use std::path::PathBuf;

    #[test]
    fn unset_paths_default_to_work_dir_tables() {
        let config = AppConfig {
            work_dir: PathBuf::from("w"),
            api: ApiSettings::default(),
        };
        let args = AnnotateArgs {
            data: None,
            properties: None,
            baseline: Some(PathBuf::from("old/pourbaix_data.csv.gz")),
            output: Some(PathBuf::from("out.csv.gz")),
        };
        let built = build_annotate_config(args, &config).unwrap();

        assert_eq!(built.data_path, PathBuf::from("w").join("pourbaix_data.csv.gz"));
        assert_eq!(
            built.properties_path,
            PathBuf::from("w").join("precomputed_properties.csv.gz")
        );
        assert_eq!(
            built.baseline_path,
            Some(PathBuf::from("old/pourbaix_data.csv.gz"))
        );
        assert_eq!(built.output_path, PathBuf::from("out.csv.gz"));
    }
}
