use anyhow::{anyhow, Result};
use tracing::debug;

use super::rules::{ColumnRule, DumpRules, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use super::types::{ColumnDef, SqlType};

/// Infer a column type from a single sample value.
///
/// Only the first record is ever sampled, so a column whose first value is
/// empty stays `NULL`-typed and a later mixed-type value is not noticed.
/// Only an exactly empty sample counts as empty; whitespace is a value.
pub fn infer_sql_type(sample: Option<&str>) -> SqlType {
    let v = match sample {
        None | Some("") => return SqlType::Null,
        Some(v) => v.trim(),
    };

    if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false") {
        return SqlType::Boolean;
    }
    if v.parse::<i64>().is_ok() {
        return SqlType::Integer;
    }
    // `f64::from_str` also takes "nan"/"inf"; those are not decimals here
    if v.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
        return SqlType::Decimal;
    }
    if v.starts_with("POINT") {
        return SqlType::Geometry;
    }
    SqlType::Varchar
}

/// Output column definitions for one input column.
///
/// A point column always yields three definitions, an integer key always
/// yields `INTEGER PRIMARY KEY`; everything else is inferred from `sample`.
pub fn column_defs(name: &str, sample: Option<&str>, rules: &DumpRules) -> Vec<ColumnDef> {
    match rules.rule_for(name) {
        ColumnRule::Point => vec![
            ColumnDef::new(name, SqlType::Geometry),
            ColumnDef::new(LONGITUDE_COLUMN, SqlType::Coordinate),
            ColumnDef::new(LATITUDE_COLUMN, SqlType::Coordinate),
        ],
        ColumnRule::IntegerKey => vec![ColumnDef::new(name, SqlType::IntegerKey)],
        ColumnRule::Decimal | ColumnRule::Text => {
            vec![ColumnDef::new(name, infer_sql_type(sample))]
        }
    }
}

/// Derive the table definition from the headers and the first record.
pub fn derive_columns(
    table_name: &str,
    headers: &[String],
    first_row: &[String],
    rules: &DumpRules,
) -> Result<Vec<ColumnDef>> {
    if headers.is_empty() {
        return Err(anyhow!("derive_columns: `{}` has no headers", table_name));
    }

    let mut cols = Vec::with_capacity(headers.len() + 2);
    for (idx, name) in headers.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(anyhow!(
                "derive_columns: header at index {} in `{}` is empty",
                idx,
                table_name
            ));
        }
        let defs = column_defs(name, first_row.get(idx).map(String::as_str), rules);
        debug!(
            "derive_columns: `{}` -> {:?}",
            name,
            defs.iter().map(|d| d.ty).collect::<Vec<_>>()
        );
        cols.extend(defs);
    }

    Ok(cols)
}

/// `CREATE TABLE` statement, one column per line.
pub fn create_table_sql(table_name: &str, columns: &[ColumnDef]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("    {} {}", c.name, c.ty))
        .collect();
    format!("CREATE TABLE {} (\n{}\n);", table_name, defs.join(",\n"))
}
