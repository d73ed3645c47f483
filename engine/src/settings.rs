use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_address: String,
    pub bearer_token: Option<String>,
    /// Whether stream admissions are filtered against the current viewport.
    #[serde(default = "default_dynamic_bounds")]
    pub dynamic_bounds: bool,
    pub stream: ais_consumer::settings::Settings,
}

fn default_dynamic_bounds() -> bool {
    true
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string());

        Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("VESSEL_ENGINE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
