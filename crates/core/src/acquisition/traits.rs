//! Trait definitions for source acquisition.

use async_trait::async_trait;

use super::error::AcquisitionError;
use super::types::{AcquiredSource, InputSource};

/// Fetches a submission's source into its job directory and checks that it
/// is something the renderer can texture.
///
/// Implementations only touch the directory of the given submission, so
/// several acquisitions may run at once.
#[async_trait]
pub trait SourceAcquirer: Send + Sync {
    async fn acquire(
        &self,
        submission_id: &str,
        source: &InputSource,
    ) -> Result<AcquiredSource, AcquisitionError>;
}
