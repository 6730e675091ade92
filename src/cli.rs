use clap::Parser;
use std::net::SocketAddr;

pub(crate) enum RunOutcome {
    Serve {
        config: noticast::config::AppConfig,
        listen: SocketAddr,
    },
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    let listen: SocketAddr = match cli.listen.parse() {
        Ok(addr) => addr,
        Err(err) => {
            eprintln!("error: invalid listen address '{}': {err}", cli.listen);
            return RunOutcome::Exit(2);
        }
    };
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return RunOutcome::Exit(2);
        }
    };
    RunOutcome::Serve { config, listen }
}

#[derive(Parser, Debug)]
#[command(
    name = "noticast",
    version,
    about = "Community push-notification dispatch service"
)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: String,
    #[arg(long, default_value = "Noticast")]
    app_name: String,
    #[arg(long, env = "NOTICAST_GATEWAY_URL")]
    gateway_url: Option<String>,
    #[arg(long, env = "NOTICAST_GATEWAY_KEY")]
    gateway_key: Option<String>,
    #[arg(long, env = "NOTICAST_USER_STORE_URL")]
    user_store_url: Option<String>,
    #[arg(long, env = "NOTICAST_PUSH_PUBLIC_KEY")]
    push_public_key: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<noticast::config::AppConfig, String> {
    if cli.gateway_key.is_some() && cli.gateway_url.is_none() {
        return Err("--gateway-key is set but --gateway-url is missing".to_string());
    }

    let gateway_url = normalize_url(cli.gateway_url.as_deref(), "gateway url")?;
    let user_store_url = normalize_url(cli.user_store_url.as_deref(), "user store url")?;

    Ok(noticast::config::AppConfig {
        app_name: cli.app_name.clone(),
        gateway_url,
        gateway_key: cli.gateway_key.clone(),
        user_store_url,
        push_public_key: cli.push_public_key.clone(),
    })
}

fn normalize_url(raw: Option<&str>, label: &str) -> Result<Option<String>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Err(format!("{label} cannot be empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{label} must start with http:// or https://"));
    }
    Ok(Some(value.trim_end_matches('/').to_string()))
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            listen: "127.0.0.1:3000".to_string(),
            app_name: "Noticast".to_string(),
            gateway_url: None,
            gateway_key: None,
            user_store_url: None,
            push_public_key: None,
        }
    }

    #[test]
    fn resolve_config__should_require_gateway_url_when_key_present() {
        // Given
        let mut cli = base_cli();
        cli.gateway_key = Some("secret".to_string());

        // When
        let result = resolve_config(&cli);

        // Then
        assert!(result.is_err());
    }

    #[test]
    fn resolve_config__should_normalize_trailing_slashes() {
        // Given
        let mut cli = base_cli();
        cli.gateway_url = Some("https://push.example/".to_string());
        cli.user_store_url = Some("https://users.example/".to_string());

        // When
        let config = resolve_config(&cli).expect("resolve config");

        // Then
        assert_eq!(config.gateway_url.as_deref(), Some("https://push.example"));
        assert_eq!(
            config.user_store_url.as_deref(),
            Some("https://users.example")
        );
    }

    #[test]
    fn normalize_url__should_reject_empty_and_non_http_values() {
        // Then
        assert!(normalize_url(Some("  "), "gateway url").is_err());
        assert!(normalize_url(Some("push.example"), "gateway url").is_err());
        assert_eq!(normalize_url(None, "gateway url"), Ok(None));
    }

    #[test]
    fn resolve_config__should_pass_through_optional_settings() {
        // Given
        let mut cli = base_cli();
        cli.push_public_key = Some("BPublicKey".to_string());

        // When
        let config = resolve_config(&cli).expect("resolve config");

        // Then
        assert_eq!(config.app_name, "Noticast");
        assert!(config.gateway_url.is_none());
        assert_eq!(config.push_public_key.as_deref(), Some("BPublicKey"));
    }
}
