//! Build-time configuration.

use notify::{DEFAULT_WORKER_SCRIPT, MessagingConfig};
use store::AggregatorConfig;

const DEFAULT_API_BASE: &str = "/api";

/// Settings baked in when the WASM bundle is built.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the REST backend
    pub api_base: String,
    pub messaging: MessagingConfig,
    pub loading: AggregatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            messaging: MessagingConfig::default(),
            loading: AggregatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `STAFFDESK_*` variables captured at compile time.
    pub fn from_build_env() -> Self {
        let messaging = MessagingConfig {
            api_key: build_var(option_env!("STAFFDESK_FCM_API_KEY")),
            project_id: build_var(option_env!("STAFFDESK_FCM_PROJECT_ID")),
            messaging_sender_id: build_var(option_env!("STAFFDESK_FCM_SENDER_ID")),
            app_id: build_var(option_env!("STAFFDESK_FCM_APP_ID")),
            vapid_key: build_var(option_env!("STAFFDESK_FCM_VAPID_KEY")),
            worker_script: DEFAULT_WORKER_SCRIPT.to_string(),
        };

        let config = Self {
            api_base: build_var(option_env!("STAFFDESK_API_BASE"))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            messaging,
            ..Self::default()
        };

        if let Some(field) = config.messaging.missing_field() {
            log::info!("push messaging not configured (missing {})", field);
        }
        config
    }
}

fn build_var(value: Option<&'static str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
