use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment overrides, e.g. `ORBIFY_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "ORBIFY_";

/// Load configuration from file with environment variable overrides
///
/// A bare `TOKEN` variable is accepted as `discord.token`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::raw().only(&["TOKEN"]).map(|_| "discord.token".into()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[discord]
application_id = "1"
public_key = "ab"

[server]
port = 9000
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_config_from_str_missing_discord() {
        let toml = r#"
[server]
port = 8080
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[discord]
application_id = "1"
public_key = "ab"
token = "from-file"

[server]
host = "127.0.0.1"
port = 3000
"#
        )
        .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let config = load_config(temp_file.path()).unwrap();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.host.to_string(), "127.0.0.1");
            assert_eq!(config.discord.token, "from-file");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "config.toml",
                r#"
[discord]
application_id = "1"
public_key = "ab"
token = "from-file"
"#,
            )?;
            jail.set_env("TOKEN", "from-env");
            jail.set_env("ORBIFY_SERVER__PORT", "9999");
            jail.set_env("ORBIFY_WORKSPACE__RETAIN_FAILED", "true");

            let config = load_config(Path::new("config.toml")).unwrap();
            assert_eq!(config.discord.token, "from-env");
            assert_eq!(config.server.port, 9999);
            assert!(config.workspace.retain_failed);
            Ok(())
        });
    }
}
