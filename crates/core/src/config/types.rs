use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::toolchain::ToolchainConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Discord application settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscordConfig {
    /// Application (client) id
    pub application_id: String,
    /// Hex encoded Ed25519 key used to verify interaction requests
    pub public_key: String,
    /// Bot token, only needed for command registration
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Overwrite the global commands on startup
    #[serde(default = "default_register_commands")]
    pub register_commands: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_register_commands() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Per-job scratch directories
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Parent of the `<id>/` job directories
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,
    /// Keep directories of failed jobs for debugging
    #[serde(default)]
    pub retain_failed: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
            retain_failed: false,
        }
    }
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir().join("orbs")
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub discord: SanitizedDiscordConfig,
    pub server: ServerConfig,
    pub workspace: WorkspaceConfig,
    pub toolchain: ToolchainConfig,
}

/// Sanitized Discord config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDiscordConfig {
    pub application_id: String,
    pub public_key: String,
    pub token_configured: bool,
    pub api_base: String,
    pub register_commands: bool,
    pub request_timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            discord: SanitizedDiscordConfig {
                application_id: config.discord.application_id.clone(),
                public_key: config.discord.public_key.clone(),
                token_configured: !config.discord.token.is_empty(),
                api_base: config.discord.api_base.clone(),
                register_commands: config.discord.register_commands,
                request_timeout_secs: config.discord.request_timeout_secs,
            },
            server: config.server.clone(),
            workspace: config.workspace.clone(),
            toolchain: config.toolchain.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[discord]
application_id = "1234"
public_key = "abcd"
"#;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.discord.application_id, "1234");
        assert_eq!(config.discord.api_base, "https://discord.com/api/v10");
        assert!(config.discord.register_commands);
        assert_eq!(config.discord.request_timeout_secs, 30);
        assert!(config.discord.token.is_empty());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.workspace.root, std::env::temp_dir().join("orbs"));
        assert!(!config.workspace.retain_failed);
        assert_eq!(config.toolchain.export_size, 256);
    }

    #[test]
    fn test_deserialize_missing_discord_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[discord]
application_id = "1234"
public_key = "abcd"
token = "bot-token"
register_commands = false

[server]
host = "127.0.0.1"
port = 9000

[workspace]
root = "/var/lib/orbify"
retain_failed = true

[toolchain]
blender_path = "/opt/blender/blender"
export_size = 128
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.discord.register_commands);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.workspace.root, PathBuf::from("/var/lib/orbify"));
        assert!(config.workspace.retain_failed);
        assert_eq!(
            config.toolchain.blender_path,
            PathBuf::from("/opt/blender/blender")
        );
        assert_eq!(config.toolchain.artifact_suffix(), "-128x128.gif");
    }

    #[test]
    fn test_sanitized_config_hides_token() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.discord.token = "super-secret".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.discord.token_configured);
        assert_eq!(sanitized.discord.application_id, "1234");

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("super-secret"));
    }
}
