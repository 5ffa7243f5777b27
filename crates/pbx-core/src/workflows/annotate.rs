use crate::core::io::table::{read_table, write_table};
use crate::core::models::material::MaterialRecord;
use crate::core::models::records::DataRecord;
use crate::engine::config::AnnotateConfig;
use crate::engine::error::EngineError;
use crate::engine::join::{JoinReport, attach_baseline, join_materials};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::redundancy::{RedundancyReport, filter_redundant};
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateSummary {
    pub redundancy: RedundancyReport,
    pub join: JoinReport,
    /// Rows that received a baseline energy, when a baseline was given.
    pub baseline_matched: Option<usize>,
    pub rows_written: usize,
}

/// Filters the decomposition table, joins it to the material properties and
/// writes the annotated table.
#[instrument(skip_all, name = "annotate_workflow")]
pub fn run(config: &AnnotateConfig, reporter: &ProgressReporter) -> Result<AnnotateSummary, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Loading" });
    let rows: Vec<DataRecord> = read_table(&config.data_path)?;
    let materials: Vec<MaterialRecord> = read_table(&config.properties_path)?;
    let baseline: Option<Vec<DataRecord>> = config
        .baseline_path
        .as_deref()
        .map(read_table::<DataRecord>)
        .transpose()?;
    info!(
        "Loaded {} decomposition row(s) and {} material record(s)",
        rows.len(),
        materials.len()
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Annotate" });
    let (mut rows, redundancy) = filter_redundant(rows);
    let baseline_matched = baseline
        .as_ref()
        .map(|previous| attach_baseline(&mut rows, previous));
    let (annotated, join) = join_materials(rows, &materials)?;
    reporter.report(Progress::PhaseFinish);

    write_table(&config.output_path, &annotated)?;
    info!(
        "Wrote {} annotated row(s) to {:?}",
        annotated.len(),
        config.output_path
    );

    Ok(AnnotateSummary {
        redundancy,
        join,
        baseline_matched,
        rows_written: annotated.len(),
    })
}
