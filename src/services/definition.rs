//! Grid definitions - columns plus options, read from YAML or JSON

use anyhow::{bail, Context, Result};
use gridview::{Column, GridOptions, Row};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GridDefinition {
    pub columns: Vec<Column>,
    pub options: GridOptions,
}

impl GridDefinition {
    /// Read a definition, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let definition: GridDefinition = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            _ => bail!(
                "Unsupported definition {}: expected .yaml, .yml or .json",
                path.display()
            ),
        };

        if definition.columns.is_empty() {
            bail!("Definition {} declares no columns", path.display());
        }
        Ok(definition)
    }

    /// One sortable column per field of the first row
    pub fn infer(rows: &[Row]) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().map(|field| Column::new(field.as_str()).sortable()).collect())
            .unwrap_or_default();
        Self {
            columns,
            options: GridOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridview::row;

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.yaml");
        fs::write(
            &path,
            "columns:\n  - field: id\n    checkboxSelection: true\n  - field: name\n    label: Name\n    sortable: true\n    filter: true\noptions:\n  pagination:\n    page_size: 25\n",
        )
        .unwrap();

        let definition = GridDefinition::load(&path).unwrap();
        assert_eq!(definition.columns.len(), 2);
        assert!(definition.columns[0].checkbox_selection);
        assert_eq!(definition.columns[1].header(), "Name");
        assert_eq!(definition.options.pagination.page_size, 25);
        assert_eq!(definition.options.pagination.page_sizes, vec![10, 25, 50, 100]);
        assert!(definition.options.searchable);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        fs::write(&path, r#"{"columns": [{"field": "id", "sortable": true}]}"#).unwrap();

        let definition = GridDefinition::load(&path).unwrap();
        assert!(definition.columns[0].sortable);
        assert_eq!(definition.options, GridOptions::default());
    }

    #[test]
    fn test_rejects_unknown_format_and_empty_columns() {
        let dir = tempfile::tempdir().unwrap();
        let toml = dir.path().join("grid.toml");
        fs::write(&toml, "columns = []").unwrap();
        assert!(GridDefinition::load(&toml).is_err());

        let empty = dir.path().join("grid.yml");
        fs::write(&empty, "options:\n  searchable: false\n").unwrap();
        assert!(GridDefinition::load(&empty).is_err());
    }

    #[test]
    fn test_infer_from_first_row() {
        let rows = vec![row! { "id" => 1, "name" => "ann" }, row! { "other" => true }];
        let definition = GridDefinition::infer(&rows);

        let fields: Vec<&str> = definition.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["id", "name"]);
        assert!(definition.columns.iter().all(|c| c.sortable));
        assert!(GridDefinition::infer(&[]).columns.is_empty());
    }
}
