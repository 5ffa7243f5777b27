use pbxscreen::core::models::material::MaterialId;
use pbxscreen::core::utils::identifiers::extract_material_id;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Element list is empty. Expected comma-separated symbols (e.g., 'Fe,Ni,Co').")]
    EmptyElementList,

    #[error("Invalid material id '{value}' on line {line}. Expected 'mp-<digits>' or 'mvc-<digits>'.")]
    InvalidMaterialId { line: usize, value: String },
}

/// Splits a comma- or whitespace-separated element list. Symbols are checked
/// against the periodic table later, when composition keys are built.
pub fn parse_element_list(input: &str) -> Result<Vec<String>, ParseError> {
    let symbols: Vec<String> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if symbols.is_empty() {
        return Err(ParseError::EmptyElementList);
    }
    Ok(symbols)
}

/// Reads one material id per line. Text after `#` and blank lines are ignored,
/// duplicates are kept once in first-seen order.
pub fn parse_material_ids(content: &str) -> Result<Vec<MaterialId>, ParseError> {
    let mut ids: Vec<MaterialId> = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let id = extract_material_id(line)
            .filter(|id| id.as_str() == line)
            .ok_or_else(|| ParseError::InvalidMaterialId {
                line: i + 1,
                value: line.to_string(),
            })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_list_accepts_commas_and_spaces() {
        assert_eq!(
            parse_element_list("Fe, Ni,Co  Mn").unwrap(),
            vec!["Fe", "Ni", "Co", "Mn"]
        );
    }

    #[test]
    fn empty_element_list_is_rejected() {
        assert_eq!(parse_element_list(" , "), Err(ParseError::EmptyElementList));
    }

    #[test]
    fn material_ids_skip_comments_and_blank_lines() {
        let content = "# screening set\nmp-149\n\n  mvc-12  # legacy\nmp-149\n";
        assert_eq!(
            parse_material_ids(content).unwrap(),
            vec![MaterialId::new("mp-149"), MaterialId::new("mvc-12")]
        );
    }

    #[test]
    fn malformed_material_id_reports_line_number() {
        let content = "mp-1\nmp-2-extra\n";
        assert_eq!(
            parse_material_ids(content),
            Err(ParseError::InvalidMaterialId {
                line: 2,
                value: "mp-2-extra".to_string()
            })
        );
    }
}
