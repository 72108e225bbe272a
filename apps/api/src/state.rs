use std::sync::Arc;

use crate::config::Config;
use crate::jobs::store::JobStore;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; the database behind `store` is the only mutable part.
#[derive(Clone)]
pub struct AppState {
    /// Job postings. Default: PgJobStore.
    pub store: Arc<dyn JobStore>,
    /// CV analysis model. Default: OllamaClient.
    pub llm: Arc<dyn CompletionModel>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(store: Arc<dyn JobStore>, llm: Arc<dyn CompletionModel>) -> Self {
        use crate::config::LlmConfig;

        AppState {
            store,
            llm,
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                db_max_connections: 1,
                llm: LlmConfig {
                    api_base: "http://localhost:10010".to_string(),
                    model: "gemma3:270m".to_string(),
                    timeout_secs: 5,
                },
                max_upload_bytes: 1024 * 1024,
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }
}
