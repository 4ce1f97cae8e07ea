pub mod derive;
pub mod rules;
pub mod types;

pub use derive::{column_defs, create_table_sql, derive_columns, infer_sql_type};
pub use rules::{ColumnRule, DumpRules, IndexSpec};
pub use types::{ColumnDef, SqlType};
