//! Source acquisition.
//!
//! Turns an `InputSource` into a file inside the submission's job
//! directory. Acquisition happens before a job is admitted to the queue and
//! may run concurrently with the active render.

mod error;
mod http;
mod traits;
mod types;

pub use error::{AcquisitionError, ACQUISITION_FAILED_MESSAGE, NOT_GRAPHICAL_MESSAGE};
pub use http::HttpAcquirer;
pub use traits::SourceAcquirer;
pub use types::{AcquiredSource, InputSource, FALLBACK_EXTENSION};
