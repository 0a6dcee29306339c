/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub level: String,
}

impl TracingConfig {
    pub fn default_directives(&self) -> String {
        format!(
            "{},ledger_intake=debug,tower_http=debug",
            self.level.to_lowercase()
        )
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            json_format: false,
            level: "info".to_string(),
        }
    }
}
