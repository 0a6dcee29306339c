mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, ImportSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
};
