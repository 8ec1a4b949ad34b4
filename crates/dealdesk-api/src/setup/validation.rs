//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.
//! Root nesting is checked by the folder store once the roots are canonical.

use anyhow::Result;
use dealdesk_core::Config;

/// Validate critical configuration values
///
/// Runs the checks of [`Config::validate`] and adds the ones that only matter
/// once the server is about to start.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.server_port() == 0 {
        return Err(anyhow::anyhow!("PORT cannot be 0"));
    }

    if config.is_production() {
        tracing::info!(
            environment = config.environment(),
            "Production mode: error details are hidden"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: &'static str) -> Config {
        Config::from_lookup(|key| match key {
            "DEALS_BASE_PATH" => Some("/srv/deals".to_string()),
            "OFFERS_ROOT" => Some("/srv/offers".to_string()),
            "PORT" => Some(port.to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_validate_config_accepts_sibling_roots() {
        assert!(validate_config(&config("8000")).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_port_zero() {
        assert!(validate_config(&config("0")).is_err());
    }
}
