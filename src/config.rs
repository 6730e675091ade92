#[derive(Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub gateway_url: Option<String>,
    pub gateway_key: Option<String>,
    pub user_store_url: Option<String>,
    pub push_public_key: Option<String>,
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Noticast".to_string(),
            gateway_url: None,
            gateway_key: None,
            user_store_url: None,
            push_public_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone)]
pub enum GatewayConfigStatus {
    Missing,
    Incomplete,
    Ready(GatewayConfig),
}

pub fn load_gateway_config(config: &AppConfig) -> GatewayConfigStatus {
    match config.gateway_url.as_ref() {
        Some(url) => GatewayConfigStatus::Ready(GatewayConfig {
            url: url.clone(),
            key: config.gateway_key.clone(),
        }),
        None if config.gateway_key.is_some() => GatewayConfigStatus::Incomplete,
        None => GatewayConfigStatus::Missing,
    }
}
