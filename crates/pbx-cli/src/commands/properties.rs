use crate::cli::PropertiesArgs;
use crate::client::{MaterialsClient, SummaryDoc, SummarySource, fetch_all_summaries};
use crate::commands::ensure_parent;
use crate::config::defaults::{COMPOSITIONS_FILE, PROPERTIES_FILE};
use crate::config::models::{ApiSettings, AppConfig};
use crate::error::{CliError, Result};
use crate::utils::parser::parse_material_ids;
use pbxscreen::core::io::table::write_table;
use pbxscreen::core::models::material::{MaterialId, MaterialRecord};
use pbxscreen::core::models::records::CompositionRow;
use pbxscreen::engine::enumeration::keys_from_element_sets;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesSummary {
    pub materials: usize,
    pub compositions: usize,
    pub properties_path: PathBuf,
    pub compositions_path: PathBuf,
}

pub async fn run(args: PropertiesArgs, config: &AppConfig) -> Result<()> {
    let material_ids = match &args.material_ids {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let ids = parse_material_ids(&content).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
            info!("Loaded {} material id(s) from {:?}", ids.len(), path);
            Some(ids)
        }
        None => None,
    };
    let client = MaterialsClient::new(&config.api)?;

    let properties_path = args.output.unwrap_or_else(|| config.path(PROPERTIES_FILE));
    let compositions_path = args
        .compositions
        .unwrap_or_else(|| config.path(COMPOSITIONS_FILE));

    println!("Fetching material properties...");
    let summary = fetch_properties(
        &client,
        material_ids.as_deref(),
        &config.api,
        &properties_path,
        &compositions_path,
    )
    .await?;

    println!(
        "Wrote {} material(s) to {} and {} composition(s) to {}",
        summary.materials,
        summary.properties_path.display(),
        summary.compositions,
        summary.compositions_path.display()
    );
    Ok(())
}

pub(crate) async fn fetch_properties<S: SummarySource>(
    source: &S,
    material_ids: Option<&[MaterialId]>,
    api: &ApiSettings,
    properties_path: &Path,
    compositions_path: &Path,
) -> Result<PropertiesSummary> {
    let docs = fetch_all_summaries(source, material_ids, api.page_size, api.id_chunk_size).await?;

    if let Some(requested) = material_ids {
        let missing = requested
            .iter()
            .filter(|id| !docs.iter().any(|d| &d.material_id == *id))
            .count();
        if missing > 0 {
            warn!(
                "{} of {} requested material id(s) were not returned",
                missing,
                requested.len()
            );
        }
    }

    let records: Vec<MaterialRecord> = docs.iter().map(SummaryDoc::record).collect();
    let compositions: Vec<CompositionRow> = keys_from_element_sets(docs.iter().map(|d| &d.elements))
        .into_iter()
        .map(|symbols| CompositionRow { symbols })
        .collect();

    ensure_parent(properties_path)?;
    write_table(properties_path, &records)?;
    ensure_parent(compositions_path)?;
    write_table(compositions_path, &compositions)?;
    info!(
        "Stored {} material record(s) and {} composition key(s)",
        records.len(),
        compositions.len()
    );

    Ok(PropertiesSummary {
        materials: records.len(),
        compositions: compositions.len(),
        properties_path: properties_path.to_path_buf(),
        compositions_path: compositions_path.to_path_buf(),
    })
}
