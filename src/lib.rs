pub mod process;
pub mod schema;
