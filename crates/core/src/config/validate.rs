use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Discord application id is a numeric snowflake
/// - Public key is 32 hex encoded bytes
/// - Bot token is present when commands get registered
/// - Server port is not 0
/// - Export size and tool timeout are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let discord = &config.discord;

    if discord.application_id.is_empty()
        || !discord.application_id.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ConfigError::ValidationError(
            "discord.application_id must be a numeric id".to_string(),
        ));
    }

    let key = discord.public_key.trim();
    if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::ValidationError(
            "discord.public_key must be 64 hex characters".to_string(),
        ));
    }

    if discord.register_commands && discord.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "discord.token is required when discord.register_commands is enabled".to_string(),
        ));
    }

    if discord.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "discord.request_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.toolchain.export_size == 0 {
        return Err(ConfigError::ValidationError(
            "toolchain.export_size cannot be 0".to_string(),
        ));
    }

    if config.toolchain.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "toolchain.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(&format!(
            r#"
[discord]
application_id = "1234567890"
public_key = "{}"
token = "bot-token"
"#,
            "ab".repeat(32)
        ))
        .unwrap()
    }

    fn assert_invalid(config: &Config) {
        let result = validate_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_application_id() {
        let mut config = valid_config();
        config.discord.application_id = "my-app".to_string();
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_public_key() {
        let mut config = valid_config();
        config.discord.public_key = "abcd".to_string();
        assert_invalid(&config);

        config.discord.public_key = "zz".repeat(32);
        assert_invalid(&config);
    }

    #[test]
    fn test_token_only_required_for_registration() {
        let mut config = valid_config();
        config.discord.token = String::new();
        assert_invalid(&config);

        config.discord.register_commands = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_toolchain_limits() {
        let mut config = valid_config();
        config.toolchain.export_size = 0;
        assert_invalid(&config);

        let mut config = valid_config();
        config.toolchain.timeout_secs = 0;
        assert_invalid(&config);
    }
}
