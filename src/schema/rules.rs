// src/schema/rules.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

/// Output column names a point column expands into, after the geometry itself.
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const LATITUDE_COLUMN: &str = "latitude";

/// How a named input column is typed and rendered.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRule {
    /// WKT `POINT (lon lat)`, expanded into geometry, longitude and latitude.
    Point,
    /// Integer primary key; values are cast through float and truncated.
    IntegerKey,
    /// Float cast, `NULL` when the value does not parse.
    Decimal,
    /// Quoted, escaped string. Type comes from the first row.
    Text,
}

/// A `CREATE INDEX` emitted after the data.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct IndexSpec {
    pub column: String,
    /// Index method, e.g. `GIST`. Plain index when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<String>,
}

impl IndexSpec {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            using: None,
        }
    }

    pub fn using(column: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            using: Some(method.into()),
        }
    }
}

/// Per-call configuration: which columns get special treatment and which
/// indexes close the dump.
///
/// `DumpRules::default()` is the stores dataset layout (`id` key, `geometry`
/// point, five decimal columns, indexes on `nps`, `geometry` and `nombre`).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct DumpRules {
    #[serde(default)]
    pub columns: HashMap<String, ColumnRule>,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

impl Default for DumpRules {
    fn default() -> Self {
        let mut columns = HashMap::new();
        columns.insert("id".to_string(), ColumnRule::IntegerKey);
        columns.insert("geometry".to_string(), ColumnRule::Point);
        for name in [
            "nps",
            "fillfoundrate",
            "damage_rate",
            "out_of_stock",
            "complaint_resolution_time_hrs",
        ] {
            columns.insert(name.to_string(), ColumnRule::Decimal);
        }

        Self {
            columns,
            indexes: vec![
                IndexSpec::new("nps"),
                IndexSpec::using("geometry", "GIST"),
                IndexSpec::new("nombre"),
            ],
        }
    }
}

impl DumpRules {
    /// No special columns and no indexes: every column is inferred text.
    pub fn empty() -> Self {
        Self {
            columns: HashMap::new(),
            indexes: Vec::new(),
        }
    }

    pub fn rule_for(&self, column: &str) -> ColumnRule {
        self.columns
            .get(column)
            .copied()
            .unwrap_or(ColumnRule::Text)
    }

    /// Load rules from a YAML file and validate them.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        let rules = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing rules file {}", path.display()))?;
        debug!(
            columns = rules.columns.len(),
            indexes = rules.indexes.len(),
            "loaded rules from {}",
            path.display()
        );
        Ok(rules)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let rules: DumpRules = serde_yaml::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets whose output columns would collide.
    pub fn validate(&self) -> Result<()> {
        let mut points: Vec<&str> = self
            .columns
            .iter()
            .filter(|(_, r)| **r == ColumnRule::Point)
            .map(|(name, _)| name.as_str())
            .collect();
        if points.len() > 1 {
            points.sort_unstable();
            bail!(
                "at most one point column is supported, got {}",
                points.join(", ")
            );
        }
        for name in [LONGITUDE_COLUMN, LATITUDE_COLUMN] {
            if points.len() == 1 && self.columns.contains_key(name) {
                bail!("column `{}` is reserved for the point coordinates", name);
            }
        }
        if let Some(idx) = self.indexes.iter().find(|i| i.column.trim().is_empty()) {
            bail!("index with empty column name (using {:?})", idx.using);
        }
        Ok(())
    }
}
