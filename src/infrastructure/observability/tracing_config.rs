/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        // JSON logs by default outside development; LOG_FORMAT overrides.
        let json_format = match std::env::var("LOG_FORMAT") {
            Ok(v) => v.to_lowercase() == "json",
            Err(_) => environment != "development",
        };
        Self {
            environment,
            json_format,
        }
    }
}
