use crate::core::chemistry::composition::Composition;
use crate::core::chemistry::key::CompositionKey;
use crate::core::io::entries::read_entries;
use crate::core::io::table::{read_table, read_table_if_exists, write_table};
use crate::core::models::condition::ConditionPoint;
use crate::core::models::entry::PourbaixEntry;
use crate::core::models::records::{DataRecord, DiagramRecord, DownloadRecord};
use crate::core::pourbaix::diagram::{PourbaixDiagram, target_composition};
use crate::core::pourbaix::{DecompositionSolver, DiagramError};
use crate::core::utils::identifiers::extract_material_id;
use crate::engine::cache::DiagramCache;
use crate::engine::conditions::ConditionSet;
use crate::engine::config::DecomposeConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sharding::{assigned, shard_file_name};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub const DATA_STEM: &str = "pourbaix_data";
pub const DIAGRAMS_STEM: &str = "pourbaix_diagrams";
pub const TABLE_EXTENSION: &str = "csv.gz";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecomposeSummary {
    /// Keys of this shard with an entry file that were processed in this run.
    pub keys_processed: usize,
    /// Keys skipped because an earlier run already built their diagrams.
    pub keys_resumed: usize,
    /// Keys recorded without entries at download time.
    pub keys_without_entries: usize,
    pub diagrams_built: usize,
    pub rows_added: usize,
    /// Solid entries skipped because no condition point applies to them.
    pub entries_without_conditions: usize,
    pub data_path: PathBuf,
    pub diagrams_path: PathBuf,
}

#[instrument(skip_all, name = "decompose_workflow")]
pub fn run(config: &DecomposeConfig, reporter: &ProgressReporter) -> Result<DecomposeSummary, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let conditions = config.conditions.resolve()?;

    let mut downloads: Vec<DownloadRecord> = read_table(&config.downloads_path)?;
    downloads.sort_by(|a, b| a.symbols.cmp(&b.symbols));
    let shard_records = assigned(&downloads, config.shard.as_ref());
    info!(
        "{} of {} composition key(s) assigned to this job",
        shard_records.len(),
        downloads.len()
    );

    let data_path = config
        .output_dir
        .join(shard_file_name(DATA_STEM, TABLE_EXTENSION, config.shard.as_ref()));
    let diagrams_path = config
        .output_dir
        .join(shard_file_name(DIAGRAMS_STEM, TABLE_EXTENSION, config.shard.as_ref()));

    let mut data_rows: Vec<DataRecord> = read_table_if_exists(&data_path)?;
    let mut diagram_rows: Vec<DiagramRecord> = read_table_if_exists(&diagrams_path)?;
    let done: HashSet<CompositionKey> = diagram_rows.iter().map(|r| r.symbols.clone()).collect();
    let previous_rows = data_rows.len();
    let previous_diagrams = diagram_rows.len();
    if !done.is_empty() {
        info!("Resuming: {} key(s) already have diagrams", done.len());
    }
    reporter.report(Progress::PhaseFinish);

    let mut summary = DecomposeSummary {
        data_path: data_path.clone(),
        diagrams_path: diagrams_path.clone(),
        ..Default::default()
    };
    let entries_dir = config
        .downloads_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let (resumed, pending): (Vec<&DownloadRecord>, Vec<&DownloadRecord>) = shard_records
        .iter()
        .copied()
        .partition(|record| done.contains(&record.symbols));
    summary.keys_resumed = resumed.len();
    for record in &resumed {
        debug!("Skipping {}: diagrams already built", record.symbols);
    }

    reporter.report(Progress::PhaseStart { name: "Decompose" });
    reporter.report(Progress::TaskStart {
        total_steps: shard_records.len() as u64,
    });
    if !resumed.is_empty() {
        reporter.report(Progress::TaskAdvance(resumed.len() as u64));
    }
    let mut cache = DiagramCache::new();
    let outcome = (|| -> Result<(), EngineError> {
        for record in &pending {
            reporter.report(Progress::TaskIncrement);
            let Some(outpath) = &record.entries_outpath else {
                debug!("Skipping {}: no entries were downloaded", record.symbols);
                summary.keys_without_entries += 1;
                continue;
            };

            let entries = read_entries(&resolve_entries_path(&entries_dir, outpath))?;
            cache.clear();
            let mut job = KeyJob {
                key: &record.symbols,
                entries: &entries,
                conditions: &conditions,
                cache: &mut cache,
                data_rows: &mut data_rows,
                diagram_rows: &mut diagram_rows,
            };
            summary.entries_without_conditions += job.process()?;
            summary.keys_processed += 1;
        }
        Ok(())
    })();
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    summary.rows_added = data_rows.len() - previous_rows;
    summary.diagrams_built = diagram_rows.len() - previous_diagrams;

    let written = write_table(&data_path, &data_rows).and_then(|_| write_table(&diagrams_path, &diagram_rows));
    if let Err(e) = &outcome {
        warn!(
            "Decomposition stopped early ({}); wrote {} new row(s) gathered so far",
            e, summary.rows_added
        );
    }
    outcome?;
    written?;

    info!(
        "Processed {} key(s): {} diagram(s) built, {} row(s) added",
        summary.keys_processed, summary.diagrams_built, summary.rows_added
    );
    Ok(summary)
}

fn resolve_entries_path(entries_dir: &Path, outpath: &str) -> PathBuf {
    let path = Path::new(outpath);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        entries_dir.join(path)
    }
}

struct KeyJob<'a> {
    key: &'a CompositionKey,
    entries: &'a [PourbaixEntry],
    conditions: &'a ConditionSet,
    cache: &'a mut DiagramCache,
    data_rows: &'a mut Vec<DataRecord>,
    diagram_rows: &'a mut Vec<DiagramRecord>,
}

impl KeyJob<'_> {
    fn diagram_error(&self, source: DiagramError) -> EngineError {
        EngineError::Diagram {
            symbols: self.key.chemsys(),
            source,
        }
    }

    /// Evaluates every solid entry of the key; returns how many had no
    /// condition points.
    fn process(&mut self) -> Result<usize, EngineError> {
        let mut without_conditions = 0;
        for entry in self.entries.iter().filter(|e| e.is_solid()) {
            let material_id = extract_material_id(&entry.entry_id);
            if material_id.is_none() {
                warn!(
                    "Entry id '{}' has no material id prefix; using global conditions only",
                    entry.entry_id
                );
            }
            let points = self.conditions.for_material(material_id.as_ref());
            if points.is_empty() {
                without_conditions += 1;
                continue;
            }

            let target = target_composition(entry, self.key).map_err(|e| self.diagram_error(e))?;
            if !self.cache.contains(&target) {
                let started = Instant::now();
                let composition =
                    Composition::from_pairs(target.iter().map(|(symbol, n)| (symbol.as_str(), *n as f64)));
                let diagram =
                    PourbaixDiagram::new(self.entries, &composition).map_err(|e| self.diagram_error(e))?;
                let diagram_time = started.elapsed().as_secs_f64();
                debug!(
                    "Built diagram for {} ({}) in {:.3}s",
                    self.key, entry.name, diagram_time
                );
                self.diagram_rows.push(DiagramRecord {
                    symbols: self.key.clone(),
                    name: entry.name.clone(),
                    entry_id: entry.entry_id.clone(),
                    diagram_time,
                });
                self.cache.insert(target.clone(), diagram);
            }

            let diagram = self
                .cache
                .get(&target)
                .ok_or_else(|| EngineError::Internal(format!("diagram for {} missing from cache", self.key)))?;
            let rows = evaluate(diagram, self.key, entry, &points).map_err(|e| self.diagram_error(e))?;
            self.data_rows.extend(rows);
        }
        Ok(without_conditions)
    }
}

/// One data row per condition point, timing each lookup.
pub fn evaluate<S: DecompositionSolver + ?Sized>(
    solver: &S,
    key: &CompositionKey,
    entry: &PourbaixEntry,
    points: &[ConditionPoint],
) -> Result<Vec<DataRecord>, DiagramError> {
    points
        .iter()
        .map(|point| {
            let started = Instant::now();
            let energy = solver.decomposition_energy(entry, *point)?;
            Ok(DataRecord {
                symbols: key.clone(),
                name: entry.name.clone(),
                entry_id: entry.entry_id.clone(),
                ph: point.ph,
                voltage: point.voltage,
                decomposition_energy: energy,
                decomposition_energy_lookup_time: started.elapsed().as_secs_f64(),
                decomposition_energy_v0: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::entries::write_entries;
    use crate::core::models::entry::PhaseType;
    use crate::engine::conditions::ConditionSpec;
    use crate::engine::config::DecomposeConfigBuilder;
    use crate::engine::sharding::JobShard;
    use std::path::Path;
    use tempfile::tempdir;

    fn entry(id: &str, name: &str, phase_type: PhaseType, pairs: &[(&str, f64)], energy: f64) -> PourbaixEntry {
        PourbaixEntry {
            entry_id: id.to_string(),
            name: name.to_string(),
            phase_type,
            composition: Composition::from_pairs(pairs.iter().map(|(s, a)| (*s, *a))),
            energy,
            charge: if phase_type == PhaseType::Ion { 2.0 } else { 0.0 },
            concentration: 1e-6,
        }
    }

    fn iron_entries() -> Vec<PourbaixEntry> {
        vec![
            entry("mp-13", "Fe(s)", PhaseType::Solid, &[("Fe", 1.0)], 0.0),
            entry("mp-18905", "FeO(s)", PhaseType::Solid, &[("Fe", 1.0), ("O", 1.0)], -2.6),
            entry("mp-19770", "Fe2O3(s)", PhaseType::Solid, &[("Fe", 2.0), ("O", 3.0)], -7.6),
            entry("ion-25", "Fe[+2]", PhaseType::Ion, &[("Fe", 1.0)], -0.8),
        ]
    }

    fn setup(dir: &Path) -> PathBuf {
        let entries_path = "pourbaix_entries/Fe.json.gz";
        write_entries(&dir.join(entries_path), &iron_entries()).unwrap();

        let mut fe = DownloadRecord::new("Fe".parse().unwrap());
        fe.n_entries = Some(4);
        fe.download_time = Some(0.5);
        fe.entries_outpath = Some(entries_path.to_string());
        let mut ni = DownloadRecord::new("Ni".parse().unwrap());
        ni.error = Some("no data".to_string());

        let downloads = dir.join("pourbaix_downloads.csv.gz");
        write_table(&downloads, &[ni, fe]).unwrap();
        downloads
    }

    fn config(dir: &Path, downloads: PathBuf, shard: Option<JobShard>) -> DecomposeConfig {
        DecomposeConfigBuilder::new()
            .downloads_path(downloads)
            .output_dir(dir.to_path_buf())
            .shard(shard)
            .conditions(ConditionSpec {
                ph: Some("0,7".to_string()),
                voltage: Some("0".to_string()),
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn computes_energies_for_every_solid_entry_and_condition() {
        let dir = tempdir().unwrap();
        let downloads = setup(dir.path());
        let summary = run(&config(dir.path(), downloads, None), &ProgressReporter::new()).unwrap();

        assert_eq!(summary.keys_processed, 1);
        assert_eq!(summary.keys_without_entries, 1);
        assert_eq!(summary.rows_added, 6);
        // Fe and FeO share the Fe1 target; Fe2O3 reduces to Fe2.
        assert_eq!(summary.diagrams_built, 2);

        let rows: Vec<DataRecord> = read_table(&summary.data_path).unwrap();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.symbols.chemsys() == "Fe"));
        assert!(rows.iter().all(|r| r.decomposition_energy.is_some()));
        assert!(!rows.iter().any(|r| r.entry_id == "ion-25"));
        assert_eq!((rows[0].ph, rows[1].ph), (0.0, 7.0));

        let diagrams: Vec<DiagramRecord> = read_table(&summary.diagrams_path).unwrap();
        assert_eq!(diagrams.len(), 2);
        assert_eq!(diagrams[0].entry_id, "mp-13");
        assert_eq!(diagrams[1].entry_id, "mp-19770");
    }

    #[test]
    fn rerun_resumes_without_duplicating_rows() {
        let dir = tempdir().unwrap();
        let downloads = setup(dir.path());
        let config = config(dir.path(), downloads, None);
        run(&config, &ProgressReporter::new()).unwrap();

        let summary = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(summary.keys_resumed, 1);
        assert_eq!(summary.rows_added, 0);
        let rows: Vec<DataRecord> = read_table(&summary.data_path).unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn sharded_run_writes_suffixed_tables_for_its_keys_only() {
        let dir = tempdir().unwrap();
        let downloads = setup(dir.path());
        let shard = JobShard::new(1, 2).unwrap();
        let summary = run(&config(dir.path(), downloads, Some(shard)), &ProgressReporter::new()).unwrap();

        // Sorted keys are [Fe, Ni]; shard 1 only receives Ni, which has no entries.
        assert_eq!(summary.keys_processed, 0);
        assert_eq!(summary.keys_without_entries, 1);
        assert_eq!(summary.data_path, dir.path().join("pourbaix_data_1.csv.gz"));
        assert!(summary.data_path.exists());
        assert!(read_table_if_exists::<DataRecord>(&summary.data_path).unwrap().is_empty());
    }

    #[test]
    fn missing_entry_file_fails_after_writing_outputs() {
        let dir = tempdir().unwrap();
        let mut record = DownloadRecord::new("Co".parse().unwrap());
        record.entries_outpath = Some("pourbaix_entries/Co.json.gz".to_string());
        let downloads = dir.path().join("pourbaix_downloads.csv.gz");
        write_table(&downloads, &[record]).unwrap();

        let result = run(&config(dir.path(), downloads, None), &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::EntryFile { .. })));
        assert!(dir.path().join("pourbaix_data.csv.gz").exists());
    }

    struct FixedSolver(f64);

    impl DecompositionSolver for FixedSolver {
        fn decomposition_energy(
            &self,
            _entry: &PourbaixEntry,
            condition: ConditionPoint,
        ) -> Result<Option<f64>, DiagramError> {
            Ok((condition.voltage >= 0.0).then_some(self.0))
        }
    }

    #[test]
    fn evaluate_records_one_row_per_point() {
        let key: CompositionKey = "Fe".parse().unwrap();
        let entries = iron_entries();
        let points = [ConditionPoint::new(0.0, 1.0), ConditionPoint::new(14.0, -1.0)];
        let rows = evaluate(&FixedSolver(0.25), &key, &entries[2], &points).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].decomposition_energy, Some(0.25));
        assert_eq!(rows[1].decomposition_energy, None);
        assert_eq!(rows[1].ph, 14.0);
        assert!(rows.iter().all(|r| r.decomposition_energy_lookup_time >= 0.0));
    }
}
