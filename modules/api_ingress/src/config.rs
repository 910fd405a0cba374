use std::time::Duration;

use runtime::AppConfig;

/// Settings the ingress needs, lifted out of the global `AppConfig`.
#[derive(Debug, Clone)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    /// `None` disables the handler timeout.
    pub request_timeout: Option<Duration>,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl ApiIngressConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        let timeout = cfg.server.timeout_sec;
        Self {
            bind_addr: format!("{}:{}", cfg.server.host, cfg.server.port),
            request_timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
            cors_enabled: cfg.ingress.cors_enabled,
            body_limit_bytes: cfg.ingress.body_limit_bytes,
        }
    }
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}
