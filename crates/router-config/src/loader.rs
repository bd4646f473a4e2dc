//! TOML loading: read file, expand `{{ env.VAR }}` placeholders, parse,
//! validate.

use std::path::Path;

use crate::Config;

impl Config {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), models = config.models.len(), "configuration loaded");
        Ok(config)
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first inconsistency found: duplicate
    /// model keys, an out-of-range routing parameter, an unknown priority
    /// preset label, or a configured provider with an empty `api_key`.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.routing.validate()?;
        crate::models::validate_models(&self.models)?;
        self.providers.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exercises expansion + parse + validate without touching the
    /// filesystem; `load` itself is a thin wrapper over these three steps.
    fn parse_and_validate(raw: &str) -> anyhow::Result<Config> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!(e))?;
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_loads_with_defaults() {
        let config = parse_and_validate("").unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0:8080");
        assert_eq!(config.routing.request_timeout_ms, 30_000);
        assert!(config.models.is_empty());
    }

    #[test]
    fn env_placeholder_is_expanded_before_parsing() {
        temp_env::with_var("ROUTER_CONFIG_TEST_KEY", Some("sk-from-env"), || {
            let config =
                parse_and_validate("[providers.openai]\napi_key = \"{{ env.ROUTER_CONFIG_TEST_KEY }}\"\n")
                    .unwrap();
            use secrecy::ExposeSecret;
            assert_eq!(config.providers.openai.unwrap().api_key.expose_secret(), "sk-from-env");
        });
    }

    #[test]
    fn invalid_toml_fails_to_load() {
        assert!(parse_and_validate("this is not valid toml [[[").is_err());
    }

    #[test]
    fn out_of_range_timeout_fails_validation() {
        assert!(parse_and_validate("[routing]\nrequest_timeout_ms = 100\n").is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_and_validate("unknown_top_level_key = 1\n").is_err());
    }
}
