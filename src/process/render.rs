use anyhow::{anyhow, Result};

use crate::process::geometry::parse_point;
use crate::process::raw_table::RawTable;
use crate::process::utils::{format_decimal, format_integer_key, parse_decimal, quote_sql_string};
use crate::schema::rules::{ColumnRule, DumpRules, LATITUDE_COLUMN, LONGITUDE_COLUMN};

const NULL: &str = "NULL";

/// Column list of the `INSERT` statement; a point column contributes
/// itself plus the two coordinate columns.
pub fn insert_columns(headers: &[String], rules: &DumpRules) -> Vec<String> {
    let mut cols = Vec::with_capacity(headers.len() + 2);
    for h in headers {
        cols.push(h.clone());
        if rules.rule_for(h) == ColumnRule::Point {
            cols.push(LONGITUDE_COLUMN.to_string());
            cols.push(LATITUDE_COLUMN.to_string());
        }
    }
    cols
}

/// SQL literals for one cell. Point cells always give three values.
///
/// `value` is `None` when the record is shorter than the header. A missing
/// point cell renders three `NULL`s and the dump carries on; the old script
/// failed the whole run on such a record.
pub fn render_value(column: &str, value: Option<&str>, rule: ColumnRule) -> Result<Vec<String>> {
    if rule == ColumnRule::Point {
        let Some(wkt) = value else {
            return Ok(vec![NULL.into(), NULL.into(), NULL.into()]);
        };
        let geom = format!("ST_GeomFromText({})", quote_sql_string(wkt));
        return Ok(match parse_point(wkt) {
            Some((lon, lat)) => vec![geom, format_decimal(lon), format_decimal(lat)],
            None => vec![geom, NULL.into(), NULL.into()],
        });
    }

    let v = match value {
        None | Some("") => return Ok(vec![NULL.into()]),
        Some(v) => v,
    };

    let rendered = match rule {
        ColumnRule::IntegerKey => format_integer_key(v)
            .ok_or_else(|| anyhow!("invalid integer value {:?} in column `{}`", v, column))?,
        ColumnRule::Decimal => parse_decimal(v)
            .map(format_decimal)
            .unwrap_or_else(|| NULL.into()),
        ColumnRule::Text | ColumnRule::Point => quote_sql_string(v),
    };
    Ok(vec![rendered])
}

/// `(v1, v2, ...)` for record `row`, without the trailing separator.
pub fn render_row(table: &RawTable, row: usize, rules: &DumpRules) -> Result<String> {
    let mut values = Vec::with_capacity(table.headers.len() + 2);
    for (col, header) in table.headers.iter().enumerate() {
        let cell = table.cell(row, col);
        let rendered = render_value(header, cell, rules.rule_for(header))
            .map_err(|e| e.context(format!("rendering record {}", row + 1)))?;
        values.extend(rendered);
    }
    Ok(format!("({})", values.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> RawTable {
        RawTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn stores_row_renders_exactly() -> Result<()> {
        let t = table("id,nombre,nps,geometry\n1,\"Tienda A\",8.5,\"POINT (-99.1 19.4)\"\n");
        let row = render_row(&t, 0, &DumpRules::default())?;
        assert_eq!(
            row,
            "(1, 'Tienda A', 8.5, ST_GeomFromText('POINT (-99.1 19.4)'), -99.1, 19.4)"
        );
        Ok(())
    }

    #[test]
    fn insert_columns_expand_point() {
        let headers: Vec<String> = ["id", "geometry", "nombre"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            insert_columns(&headers, &DumpRules::default()),
            vec!["id", "geometry", "longitude", "latitude", "nombre"]
        );
        assert_eq!(insert_columns(&headers, &DumpRules::empty()), headers);
    }

    #[test]
    fn text_is_quoted_and_escaped() -> Result<()> {
        let v = render_value("nombre", Some("O'Brien"), ColumnRule::Text)?;
        assert_eq!(v, vec!["'O''Brien'"]);
        // whitespace-only is not empty
        let v = render_value("nombre", Some(" "), ColumnRule::Text)?;
        assert_eq!(v, vec!["' '"]);
        Ok(())
    }

    #[test]
    fn integer_key_is_unquoted() -> Result<()> {
        assert_eq!(render_value("id", Some("42"), ColumnRule::IntegerKey)?, vec!["42"]);
        assert_eq!(render_value("id", Some("7.9"), ColumnRule::IntegerKey)?, vec!["7"]);
        assert_eq!(render_value("id", Some(""), ColumnRule::IntegerKey)?, vec!["NULL"]);
        Ok(())
    }

    #[test]
    fn bad_integer_key_is_an_error() {
        let err = render_value("id", Some("abc"), ColumnRule::IntegerKey).unwrap_err();
        assert!(err.to_string().contains("`id`"), "{}", err);
    }

    #[test]
    fn bad_decimal_is_null() -> Result<()> {
        assert_eq!(render_value("nps", Some("abc"), ColumnRule::Decimal)?, vec!["NULL"]);
        assert_eq!(render_value("nps", Some("nan"), ColumnRule::Decimal)?, vec!["NULL"]);
        assert_eq!(render_value("nps", Some("9"), ColumnRule::Decimal)?, vec!["9.0"]);
        assert_eq!(render_value("nps", None, ColumnRule::Decimal)?, vec!["NULL"]);
        Ok(())
    }

    #[test]
    fn malformed_point_keeps_literal() -> Result<()> {
        let v = render_value("geometry", Some("POINT(1 2)"), ColumnRule::Point)?;
        assert_eq!(v, vec!["ST_GeomFromText('POINT(1 2)')", "NULL", "NULL"]);
        let v = render_value("geometry", Some(""), ColumnRule::Point)?;
        assert_eq!(v, vec!["ST_GeomFromText('')", "NULL", "NULL"]);
        let v = render_value("geometry", None, ColumnRule::Point)?;
        assert_eq!(v, vec!["NULL", "NULL", "NULL"]);
        Ok(())
    }

    #[test]
    fn short_record_pads_with_null() -> Result<()> {
        let t = table("id,nombre,geometry\n5\n");
        let row = render_row(&t, 0, &DumpRules::default())?;
        assert_eq!(row, "(5, NULL, NULL, NULL, NULL)");
        Ok(())
    }

    #[test]
    fn missing_point_cell_still_dumps() -> Result<()> {
        let t = table("id,geometry\n1\n");
        let mut out = Vec::new();
        crate::process::write_dump(&mut out, &t, "stores", &DumpRules::default())?;
        let sql = String::from_utf8(out)?;
        assert!(sql.contains("  (1, NULL, NULL, NULL);\n"), "{}", sql);
        Ok(())
    }

    #[test]
    fn row_error_names_record() {
        let t = table("id\n1\nx\n");
        let err = render_row(&t, 1, &DumpRules::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("record 2"), "{:#}", err);
    }
}
