//! Acquirer downloading sources over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::AcquisitionError;
use super::traits::SourceAcquirer;
use super::types::{AcquiredSource, InputSource};
use crate::toolchain::{Toolchain, ToolchainError};
use crate::workspace::JobWorkspace;

/// Probe result for sources with pixels.
const GRAPHICAL_KIND: &str = "video";

/// Downloads the source, stores it as `orb-input.<ext>` and probes it.
pub struct HttpAcquirer {
    client: Client,
    toolchain: Arc<dyn Toolchain>,
    workspace: JobWorkspace,
}

impl HttpAcquirer {
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        workspace: JobWorkspace,
        timeout: Duration,
    ) -> Result<Self, AcquisitionError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("orbify/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, toolchain, workspace))
    }

    pub fn with_client(
        client: Client,
        toolchain: Arc<dyn Toolchain>,
        workspace: JobWorkspace,
    ) -> Self {
        Self {
            client,
            toolchain,
            workspace,
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AcquisitionError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn probe(&self, path: &Path) -> Result<String, AcquisitionError> {
        match self.toolchain.detect_type(path).await {
            Ok(kind) => Ok(kind),
            // ffprobe exits non-zero on files it cannot parse at all.
            Err(ToolchainError::ToolFailed { stderr, .. }) => {
                debug!("Probe rejected {}: {:?}", path.display(), stderr);
                Ok(String::new())
            }
            Err(e) => Err(AcquisitionError::Probe(e)),
        }
    }
}

#[async_trait]
impl SourceAcquirer for HttpAcquirer {
    async fn acquire(
        &self,
        submission_id: &str,
        source: &InputSource,
    ) -> Result<AcquiredSource, AcquisitionError> {
        debug!("Downloading source for {} from {}", submission_id, source.url());
        let bytes = self.download(source.url()).await?;

        self.workspace.create(submission_id).await?;
        let path = self.workspace.input_path(submission_id, &source.extension());
        tokio::fs::write(&path, &bytes).await?;

        let kind = self.probe(&path).await?;
        if kind != GRAPHICAL_KIND {
            warn!(
                "Source for {} is not graphical (probe: {:?})",
                submission_id, kind
            );
            return Err(AcquisitionError::NotGraphical { kind });
        }

        info!(
            "Acquired source for {} ({} bytes) at {}",
            submission_id,
            bytes.len(),
            path.display()
        );

        Ok(AcquiredSource {
            path,
            size_bytes: bytes.len() as u64,
            kind,
        })
    }
}
