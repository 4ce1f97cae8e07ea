// src/schema/types.rs

use std::fmt;

/// Column type as written into the `CREATE TABLE` statement.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SqlType {
    /// Sample was empty or missing.
    Null,
    Boolean,
    Integer,
    /// `INTEGER PRIMARY KEY`
    IntegerKey,
    /// `DECIMAL(10,2)`, inferred from a numeric sample.
    Decimal,
    /// `DECIMAL(10,7)`, used for coordinates split out of a point column.
    Coordinate,
    Geometry,
    /// `VARCHAR(255)`
    Varchar,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SqlType::Null => "NULL",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Integer => "INTEGER",
            SqlType::IntegerKey => "INTEGER PRIMARY KEY",
            SqlType::Decimal => "DECIMAL(10,2)",
            SqlType::Coordinate => "DECIMAL(10,7)",
            SqlType::Geometry => "GEOMETRY",
            SqlType::Varchar => "VARCHAR(255)",
        };
        f.write_str(s)
    }
}

/// A single column definition in the generated table.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct ColumnDef {
    pub name: String,
    pub ty: SqlType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
