// src/process/mod.rs
use anyhow::{bail, Context, Result};
use std::{
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, info, warn};

pub mod geometry;
pub mod raw_table;
pub mod render;
pub mod utils;

use crate::schema::{create_table_sql, derive_columns, DumpRules, IndexSpec};
use raw_table::RawTable;
use render::{insert_columns, render_row};

/// What a finished dump looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    pub table: String,
    pub records: usize,
    pub output: PathBuf,
}

/// Result of a conversion run that did not hit an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// The dump was written.
    Written(DumpSummary),
    /// Input had a header but no records; nothing was written.
    NoData,
    /// Input file does not exist; nothing was written.
    MissingInput(PathBuf),
}

/// Read `input`, derive the table from its first record and write the whole
/// dump to `output`.
///
/// The dump is rendered in memory first, so `output` is only created once
/// every record has rendered.
#[tracing::instrument(level = "info", skip(input, output, rules), fields(path = %input.as_ref().display()))]
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    table_name: &str,
    rules: &DumpRules,
) -> Result<ConvertOutcome> {
    let start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();

    // 1) Read all records
    let file = match File::open(input) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(ConvertOutcome::MissingInput(input.to_path_buf()));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("opening CSV file {}", input.display()));
        }
    };
    let table = RawTable::from_reader(BufReader::new(file))
        .with_context(|| format!("reading CSV file {}", input.display()))?;

    if table.is_empty() {
        warn!("No data found in CSV file");
        return Ok(ConvertOutcome::NoData);
    }
    debug!(
        columns = table.headers.len(),
        records = table.rows.len(),
        "loaded CSV"
    );

    // 2) Render
    let mut buf = Vec::new();
    write_dump(&mut buf, &table, table_name, rules)?;

    // 3) Write
    fs::write(output, &buf).with_context(|| format!("writing SQL dump {}", output.display()))?;
    info!(
        bytes = buf.len(),
        elapsed = ?start.elapsed(),
        "wrote {}",
        output.display()
    );

    Ok(ConvertOutcome::Written(DumpSummary {
        table: table_name.to_string(),
        records: table.rows.len(),
        output: output.to_path_buf(),
    }))
}

/// Write the complete dump for `table` to `w`: header comments, `DROP TABLE`,
/// `CREATE TABLE`, one multi-row `INSERT` and the configured indexes.
pub fn write_dump<W: Write>(
    w: &mut W,
    table: &RawTable,
    table_name: &str,
    rules: &DumpRules,
) -> Result<()> {
    let Some(first_row) = table.rows.first() else {
        bail!("cannot dump `{}`: no records", table_name);
    };
    let columns = derive_columns(table_name, &table.headers, first_row, rules)?;

    writeln!(w, "-- SQL Dump generated from CSV data")?;
    writeln!(w, "-- Table: {}", table_name)?;
    writeln!(w, "-- Total records: {}\n", table.rows.len())?;

    writeln!(w, "DROP TABLE IF EXISTS {};\n", table_name)?;

    write!(w, "{}\n\n", create_table_sql(table_name, &columns))?;

    writeln!(
        w,
        "INSERT INTO {} ({}) VALUES",
        table_name,
        insert_columns(&table.headers, rules).join(", ")
    )?;
    let last = table.rows.len() - 1;
    for i in 0..table.rows.len() {
        let row = render_row(table, i, rules)?;
        let sep = if i < last { ',' } else { ';' };
        writeln!(w, "  {}{}", row, sep)?;
    }

    if !rules.indexes.is_empty() {
        writeln!(w, "\n-- Create indexes for better performance")?;
        for idx in &rules.indexes {
            writeln!(w, "{}", create_index_sql(table_name, idx))?;
        }
    }

    Ok(())
}

/// `CREATE INDEX idx_<table>_<column> ...`
pub fn create_index_sql(table_name: &str, idx: &IndexSpec) -> String {
    match &idx.using {
        Some(method) => format!(
            "CREATE INDEX idx_{t}_{c} ON {t} USING {m}({c});",
            t = table_name,
            c = idx.column,
            m = method
        ),
        None => format!(
            "CREATE INDEX idx_{t}_{c} ON {t}({c});",
            t = table_name,
            c = idx.column
        ),
    }
}
