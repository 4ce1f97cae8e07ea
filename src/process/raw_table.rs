use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashSet, io::Read};
use tracing::warn;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Column names from the header row, in file order. Repeated names are
    /// kept; each column renders its own cell by position.
    pub headers: Vec<String>,
    /// Each data record, one String per field. Rows shorter than the header
    /// are kept short; cells past the header width are dropped.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a whole CSV (header row + records) into memory.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("reading CSV header row")?
            .iter()
            .map(str::to_string)
            .collect();

        let dups = duplicate_headers(&headers);
        if !dups.is_empty() {
            warn!(
                "duplicate header names {:?}; each column keeps its own cells",
                dups
            );
        }

        let mut rows = Vec::new();
        let mut widened = 0usize;
        for (i, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("reading CSV record {}", i + 1))?;
            if record.len() > headers.len() {
                widened += 1;
            }
            rows.push(record.iter().take(headers.len()).map(str::to_string).collect());
        }

        if widened > 0 {
            warn!(
                "{} records have more cells than headers ({} headers); extra cells dropped",
                widened,
                headers.len()
            );
        }

        Ok(Self { headers, rows })
    }

    /// Cell at (`row`, `col`), `None` when the record is too short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header names that occur more than once, in first-seen order.
pub fn duplicate_headers(headers: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for h in headers {
        if !seen.insert(h.as_str()) && !dups.contains(&h.as_str()) {
            dups.push(h.as_str());
        }
    }
    dups
}
