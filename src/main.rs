use anyhow::Result;
use csv2sql::{
    process::{self, ConvertOutcome},
    schema::DumpRules,
};
use std::{env, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CSV_PATH: &str = "../datos_arca/Reto/arca_data.csv";
const DEFAULT_OUTPUT_PATH: &str = "stores_dump.sql";
const DEFAULT_TABLE: &str = "stores";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(filter).init();

    // ─── 2) configuration ────────────────────────────────────────────
    // usage: csv2sql [CSV_PATH] [OUTPUT_PATH] [TABLE_NAME] [RULES_YAML]
    let mut args = env::args().skip(1);
    let csv_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CSV_PATH.into()));
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT_PATH.into()));
    let table_name = args.next().unwrap_or_else(|| DEFAULT_TABLE.into());

    let rules = match args.next() {
        Some(path) => match DumpRules::from_yaml_file(&path) {
            Ok(r) => r,
            Err(e) => {
                error!("Error loading rules: {:#}", e);
                return Ok(());
            }
        },
        None => DumpRules::default(),
    };

    // ─── 3) convert ──────────────────────────────────────────────────
    info!("Converting CSV to SQL dump...");
    match process::convert(&csv_path, &output_path, &table_name, &rules) {
        Ok(ConvertOutcome::Written(summary)) => {
            info!("SQL dump successfully created: {}", summary.output.display());
            info!("Table name: {}", summary.table);
            info!("Records processed: {}", summary.records);
        }
        Ok(ConvertOutcome::NoData) => {}
        Ok(ConvertOutcome::MissingInput(path)) => {
            error!("Error: CSV file '{}' not found", path.display());
        }
        Err(e) => {
            error!("Error processing CSV file: {:#}", e);
        }
    }

    Ok(())
}
