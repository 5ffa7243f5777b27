use crate::cli::EnumerateArgs;
use crate::commands::ensure_parent;
use crate::config::defaults::COMPOSITIONS_FILE;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_element_list;
use pbxscreen::core::chemistry::elements::DEFAULT_CANDIDATE_ELEMENTS;
use pbxscreen::core::io::table::write_table;
use pbxscreen::core::models::records::CompositionRow;
use pbxscreen::engine::enumeration::keys_from_elements;
use std::path::Path;
use tracing::info;

pub fn run(args: EnumerateArgs, config: &AppConfig) -> Result<()> {
    let elements = match &args.elements {
        Some(list) => parse_element_list(list).map_err(|e| CliError::Argument(e.to_string()))?,
        None => {
            info!("No element list given; using the built-in candidate elements");
            DEFAULT_CANDIDATE_ELEMENTS.iter().map(|s| s.to_string()).collect()
        }
    };
    let output = args
        .output
        .unwrap_or_else(|| config.path(COMPOSITIONS_FILE));

    let count = write_compositions(&elements, args.max_size, &output)?;
    println!(
        "Wrote {} composition(s) of up to {} element(s) to {}",
        count,
        args.max_size,
        output.display()
    );
    Ok(())
}

fn write_compositions(elements: &[String], max_size: usize, output: &Path) -> Result<usize> {
    let rows: Vec<CompositionRow> = keys_from_elements(elements, max_size)?
        .into_iter()
        .map(|symbols| CompositionRow { symbols })
        .collect();
    info!(
        "Enumerated {} composition(s) from {} element(s)",
        rows.len(),
        elements.len()
    );
    ensure_parent(output)?;
    write_table(output, &rows)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbxscreen::core::io::table::read_table;
    use tempfile::tempdir;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writes_every_combination_up_to_max_size() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("compositions.csv.gz");

        let count = write_compositions(&symbols(&["Ni", "Fe", "Co"]), 2, &output).unwrap();
        assert_eq!(count, 6);

        let rows: Vec<CompositionRow> = read_table(&output).unwrap();
        let keys: Vec<String> = rows.iter().map(|r| r.symbols.to_string()).collect();
        assert!(keys.contains(&"Co-Fe".to_string()));
        assert!(keys.contains(&"Ni".to_string()));
        assert!(!keys.iter().any(|k| k.split('-').count() > 2));
    }

    #[test]
    fn unknown_element_is_a_config_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("compositions.csv.gz");
        let result = write_compositions(&symbols(&["Fe", "Xx"]), 2, &output);
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(!output.exists());
    }
}
