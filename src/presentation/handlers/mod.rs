mod health;
mod statement_import;

pub use health::health_handler;
pub use statement_import::{NDJSON_CONTENT_TYPE, statement_import_handler};
