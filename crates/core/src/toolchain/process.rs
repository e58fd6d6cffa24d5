//! Toolchain implementation backed by external processes.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::ToolchainConfig;
use super::error::ToolchainError;
use super::traits::Toolchain;
use super::types::{Tool, ToolOutput};

/// Runs ffprobe, ffmpeg, blender and the export script as child processes.
pub struct ProcessToolchain {
    config: ToolchainConfig,
}

impl ProcessToolchain {
    /// Creates a toolchain with the given configuration.
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Creates a toolchain with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ToolchainConfig::default())
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Probe => &self.config.ffprobe_path,
            Tool::Transcode => &self.config.ffmpeg_path,
            Tool::Render => &self.config.blender_path,
            Tool::Export => &self.config.export_script,
        }
    }

    fn build_probe_args(&self, path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=codec_type",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_owned());
        args
    }

    fn build_transcode_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(), // Overwrite output
            "-i".into(),
            input.as_os_str().to_owned(),
            "-loglevel".into(),
            self.config.ffmpeg_log_level.clone().into(),
            output.as_os_str().to_owned(),
        ]
    }

    fn build_render_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-b".into(), // Background mode
            self.config.blend_file.as_os_str().to_owned(),
            "--".into(),
            "--texture".into(),
            input.as_os_str().to_owned(),
            "--output".into(),
            output.as_os_str().to_owned(),
        ]
    }

    fn build_export_args(&self, input: &Path, output_prefix: &Path) -> Vec<OsString> {
        vec![
            input.as_os_str().to_owned(),
            output_prefix.as_os_str().to_owned(),
            self.config.export_size.to_string().into(),
        ]
    }

    /// Path of the GIF the export script writes for this prefix.
    pub fn artifact_path(&self, output_prefix: &Path) -> PathBuf {
        let mut name = output_prefix.as_os_str().to_owned();
        name.push(self.config.artifact_suffix());
        PathBuf::from(name)
    }

    /// Runs a tool to completion, capturing its output.
    async fn run(&self, tool: Tool, args: Vec<OsString>) -> Result<ToolOutput, ToolchainError> {
        let program = self.program(tool);
        debug!("Running {}: {} {:?}", tool, program.display(), args);

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ToolchainError::ToolNotFound {
                        tool,
                        path: program.to_path_buf(),
                    }
                } else {
                    ToolchainError::Io(e)
                }
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ToolchainError::Timeout {
                    tool,
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Runs a tool and turns a non-zero exit into an error.
    async fn run_checked(
        &self,
        tool: Tool,
        args: Vec<OsString>,
    ) -> Result<ToolOutput, ToolchainError> {
        let output = self.run(tool, args).await?;
        if !output.success() {
            return Err(ToolchainError::tool_failed(
                tool,
                output.status.code(),
                &output.stderr,
            ));
        }
        Ok(output)
    }

    async fn ensure_input(path: &Path) -> Result<(), ToolchainError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ToolchainError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    async fn ensure_output(tool: Tool, path: &Path) -> Result<(), ToolchainError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ToolchainError::OutputMissing {
                tool,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

/// Extracts the type token from ffprobe's single-line output.
fn parse_type_token(stdout: &str) -> String {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Toolchain for ProcessToolchain {
    fn name(&self) -> &str {
        "process"
    }

    async fn detect_type(&self, path: &Path) -> Result<String, ToolchainError> {
        Self::ensure_input(path).await?;
        let output = self
            .run_checked(Tool::Probe, self.build_probe_args(path))
            .await?;
        Ok(parse_type_token(&output.stdout))
    }

    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolchainError> {
        Self::ensure_input(input).await?;
        self.run_checked(Tool::Transcode, self.build_transcode_args(input, output))
            .await?;
        Self::ensure_output(Tool::Transcode, output).await
    }

    async fn render(&self, input: &Path, output: &Path) -> Result<(), ToolchainError> {
        Self::ensure_input(input).await?;
        self.run_checked(Tool::Render, self.build_render_args(input, output))
            .await?;
        Self::ensure_output(Tool::Render, output).await
    }

    async fn export(
        &self,
        input: &Path,
        output_prefix: &Path,
    ) -> Result<PathBuf, ToolchainError> {
        Self::ensure_input(input).await?;
        self.run_checked(Tool::Export, self.build_export_args(input, output_prefix))
            .await?;
        let artifact = self.artifact_path(output_prefix);
        Self::ensure_output(Tool::Export, &artifact).await?;
        Ok(artifact)
    }

    async fn validate(&self) -> Result<(), ToolchainError> {
        for (tool, flag) in [
            (Tool::Probe, "-version"),
            (Tool::Transcode, "-version"),
            (Tool::Render, "--version"),
        ] {
            self.run_checked(tool, vec![flag.into()]).await?;
        }

        let script = &self.config.export_script;
        if tokio::fs::metadata(script).await.is_err() {
            return Err(ToolchainError::ToolNotFound {
                tool: Tool::Export,
                path: script.clone(),
            });
        }
        Self::ensure_input(&self.config.blend_file).await
    }
}
