use std::sync::Arc;

use crate::application::services::StatementImportService;
use crate::presentation::config::ImportSettings;

#[derive(Clone)]
pub struct AppState {
    pub import_service: Arc<StatementImportService>,
    pub import_settings: ImportSettings,
}

impl AppState {
    pub fn new(
        import_service: Arc<StatementImportService>,
        import_settings: ImportSettings,
    ) -> Self {
        Self {
            import_service,
            import_settings,
        }
    }
}
