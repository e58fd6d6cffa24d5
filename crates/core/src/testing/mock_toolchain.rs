//! Mock toolchain for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::toolchain::{Tool, Toolchain, ToolchainError};

/// Bytes written as the exported artifact.
pub const MOCK_ARTIFACT: &[u8] = b"GIF89a-mock-orb";

/// A recorded tool invocation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub tool: Tool,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Mock implementation of the Toolchain trait.
///
/// Provides controllable behavior for testing:
/// - Track tool invocations for assertions
/// - Fail chosen tools
/// - Hold renders until released, to inspect the queue mid-job
/// - Count how many renders overlap
///
/// # Example
///
/// ```rust,ignore
/// use orbify_core::testing::MockToolchain;
/// use orbify_core::toolchain::Tool;
///
/// let toolchain = MockToolchain::new();
/// toolchain.pause();
/// toolchain.fail_tool(Tool::Export).await;
///
/// // ... submit jobs, inspect the queue ...
///
/// toolchain.resume();
/// assert_eq!(toolchain.max_concurrent_renders(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockToolchain {
    invocations: Arc<RwLock<Vec<RecordedInvocation>>>,
    failing: Arc<RwLock<HashSet<Tool>>>,
    /// Type token returned by `detect_type`.
    probe_kind: Arc<RwLock<String>>,
    /// `true` while renders may proceed.
    gate: Arc<watch::Sender<bool>>,
    active_renders: Arc<AtomicUsize>,
    max_active_renders: Arc<AtomicUsize>,
    export_suffix: String,
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockToolchain {
    /// Create a new mock toolchain.
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            probe_kind: Arc::new(RwLock::new("video".to_string())),
            gate: Arc::new(gate),
            active_renders: Arc::new(AtomicUsize::new(0)),
            max_active_renders: Arc::new(AtomicUsize::new(0)),
            export_suffix: "-256x256.gif".to_string(),
        }
    }

    /// Get all recorded invocations.
    pub async fn recorded_invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations.read().await.clone()
    }

    /// Tools invoked, in order.
    pub async fn invoked_tools(&self) -> Vec<Tool> {
        self.invocations
            .read()
            .await
            .iter()
            .map(|i| i.tool)
            .collect()
    }

    /// Number of invocations of one tool.
    pub async fn invocation_count(&self, tool: Tool) -> usize {
        self.invocations
            .read()
            .await
            .iter()
            .filter(|i| i.tool == tool)
            .count()
    }

    /// Make every later call of this tool fail.
    pub async fn fail_tool(&self, tool: Tool) {
        self.failing.write().await.insert(tool);
    }

    /// Stop failing this tool.
    pub async fn clear_failure(&self, tool: Tool) {
        self.failing.write().await.remove(&tool);
    }

    /// Set the type token returned by `detect_type`.
    pub async fn set_probe_kind(&self, kind: impl Into<String>) {
        *self.probe_kind.write().await = kind.into();
    }

    /// Hold renders until `resume` is called.
    pub fn pause(&self) {
        self.gate.send_replace(false);
    }

    /// Release held renders.
    pub fn resume(&self) {
        self.gate.send_replace(true);
    }

    /// Renders currently running.
    pub fn active_renders(&self) -> usize {
        self.active_renders.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping renders seen.
    pub fn max_concurrent_renders(&self) -> usize {
        self.max_active_renders.load(Ordering::SeqCst)
    }

    async fn record(&self, tool: Tool, input: &Path, output: &Path) -> Result<(), ToolchainError> {
        self.invocations.write().await.push(RecordedInvocation {
            tool,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });

        if self.failing.read().await.contains(&tool) {
            return Err(ToolchainError::tool_failed(tool, Some(1), "mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    fn name(&self) -> &str {
        "mock"
    }

    async fn detect_type(&self, path: &Path) -> Result<String, ToolchainError> {
        self.record(Tool::Probe, path, path).await?;
        Ok(self.probe_kind.read().await.clone())
    }

    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolchainError> {
        self.record(Tool::Transcode, input, output).await?;
        tokio::fs::write(output, b"mock-mp4").await?;
        Ok(())
    }

    async fn render(&self, input: &Path, output: &Path) -> Result<(), ToolchainError> {
        let active = self.active_renders.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_renders.fetch_max(active, Ordering::SeqCst);

        let result = async {
            self.record(Tool::Render, input, output).await?;
            let mut gate = self.gate.subscribe();
            // The sender lives in `self`, so the channel cannot close here.
            let _ = gate.wait_for(|open| *open).await;
            tokio::fs::write(output, b"mock-render").await?;
            Ok::<(), ToolchainError>(())
        }
        .await;

        self.active_renders.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn export(
        &self,
        input: &Path,
        output_prefix: &Path,
    ) -> Result<PathBuf, ToolchainError> {
        let mut name = output_prefix.as_os_str().to_owned();
        name.push(&self.export_suffix);
        let artifact = PathBuf::from(name);

        self.record(Tool::Export, input, &artifact).await?;
        tokio::fs::write(&artifact, MOCK_ARTIFACT).await?;
        Ok(artifact)
    }
}
