use crate::cli::DownloadArgs;
use crate::client::{ApiError, EntrySource, MaterialsClient};
use crate::commands::{ensure_parent, progress_handler};
use crate::config::defaults::{COMPOSITIONS_FILE, DOWNLOADS_STEM, ENTRIES_DIR, TABLE_EXTENSION};
use crate::config::models::AppConfig;
use crate::error::Result;
use pbxscreen::core::chemistry::key::CompositionKey;
use pbxscreen::core::io::entries::write_entries;
use pbxscreen::core::io::table::{read_table, read_table_if_exists, write_table};
use pbxscreen::core::models::records::{CompositionRow, DownloadRecord};
use pbxscreen::engine::progress::{Progress, ProgressReporter};
use pbxscreen::engine::sharding::{JobShard, assigned, shard_file_name};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub assigned: usize,
    pub skipped: usize,
    pub downloaded: usize,
    pub empty: usize,
    pub no_data: usize,
    pub output_path: PathBuf,
}

pub async fn run(args: DownloadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let shard = JobShard::from_options(args.job_index, args.job_count)?;
    let client = MaterialsClient::new(&config.api)?;
    let compositions_path = args
        .input
        .unwrap_or_else(|| config.path(COMPOSITIONS_FILE));

    let handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let summary = download_entries(
        &client,
        &compositions_path,
        &config.work_dir,
        shard.as_ref(),
        &reporter,
    )
    .await?;

    println!(
        "Downloaded {} of {} composition(s) ({} already done, {} empty, {} without data); table: {}",
        summary.downloaded,
        summary.assigned,
        summary.skipped,
        summary.empty,
        summary.no_data,
        summary.output_path.display()
    );
    Ok(())
}

/// Keys recorded in any download table of `work_dir`, from this or other shards.
fn completed_keys(work_dir: &Path) -> Result<BTreeSet<CompositionKey>> {
    let mut done = BTreeSet::new();
    if !work_dir.is_dir() {
        return Ok(done);
    }
    let suffix = format!(".{}", TABLE_EXTENSION);
    for dir_entry in std::fs::read_dir(work_dir)? {
        let path = dir_entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !(name.starts_with(DOWNLOADS_STEM) && name.ends_with(&suffix)) {
            continue;
        }
        let rows: Vec<DownloadRecord> = read_table_if_exists(&path)?;
        debug!("{} key(s) recorded in {:?}", rows.len(), path);
        done.extend(rows.into_iter().map(|r| r.symbols));
    }
    Ok(done)
}

#[instrument(skip_all, name = "download")]
pub(crate) async fn download_entries<S: EntrySource>(
    source: &S,
    compositions_path: &Path,
    work_dir: &Path,
    shard: Option<&JobShard>,
    reporter: &ProgressReporter<'_>,
) -> Result<DownloadSummary> {
    let mut keys: Vec<CompositionKey> = read_table::<CompositionRow>(compositions_path)?
        .into_iter()
        .map(|row| row.symbols)
        .collect();
    keys.sort();
    keys.dedup();
    let mine = assigned(&keys, shard);

    let done = completed_keys(work_dir)?;
    let pending: Vec<&CompositionKey> = mine.iter().copied().filter(|k| !done.contains(*k)).collect();
    info!(
        "{} of {} key(s) assigned to this job, {} still to download",
        mine.len(),
        keys.len(),
        pending.len()
    );

    let output_path = work_dir.join(shard_file_name(DOWNLOADS_STEM, TABLE_EXTENSION, shard));
    let mut rows: Vec<DownloadRecord> = read_table_if_exists(&output_path)?;
    let mut summary = DownloadSummary {
        assigned: mine.len(),
        skipped: mine.len() - pending.len(),
        output_path: output_path.clone(),
        ..Default::default()
    };

    reporter.report(Progress::PhaseStart { name: "Download" });
    reporter.report(Progress::TaskStart {
        total_steps: mine.len() as u64,
    });
    reporter.report(Progress::TaskAdvance(summary.skipped as u64));

    let outcome: Result<()> = async {
        for key in &pending {
            let mut record = DownloadRecord::new((*key).clone());
            let started = Instant::now();
            match source.pourbaix_entries(key).await {
                Ok(entries) => {
                    record.download_time = Some(started.elapsed().as_secs_f64());
                    record.n_entries = Some(entries.len());
                    if entries.is_empty() {
                        debug!("{}: no entries", key);
                        summary.empty += 1;
                    } else {
                        let relative = format!("{}/{}.json.gz", ENTRIES_DIR, key.chemsys());
                        write_entries(&work_dir.join(&relative), &entries)?;
                        debug!("{}: stored {} entries", key, entries.len());
                        record.entries_outpath = Some(relative);
                        summary.downloaded += 1;
                    }
                }
                Err(e @ ApiError::NoData { .. }) => {
                    warn!("{}: {}", key, e);
                    record.error = Some(e.to_string());
                    summary.no_data += 1;
                }
                Err(e) => return Err(e.into()),
            }
            rows.push(record);
            reporter.report(Progress::TaskIncrement);
        }
        Ok(())
    }
    .await;
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    if let Err(e) = &outcome {
        warn!(
            "Download stopped early ({}); saving {} row(s) gathered so far",
            e,
            rows.len()
        );
    }
    ensure_parent(&output_path)?;
    write_table(&output_path, &rows)?;
    outcome?;

    info!(
        "Downloaded {} key(s), {} empty, {} without data",
        summary.downloaded, summary.empty, summary.no_data
    );
    Ok(summary)
}
