//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits, so the queue and pipeline can be exercised without ffmpeg,
//! blender or Discord.
//!
//! # Example
//!
//! ```rust,ignore
//! use orbify_core::testing::{MockChatSession, MockToolchain};
//!
//! let toolchain = MockToolchain::new();
//! let session = MockChatSession::new("alice");
//!
//! // ... run a job ...
//!
//! assert!(session.result().await.is_some());
//! ```

mod mock_acquirer;
mod mock_chat;
mod mock_toolchain;

pub use mock_acquirer::{AcquireBehavior, MockAcquirer};
pub use mock_chat::{ChatEvent, MockChatSession};
pub use mock_toolchain::{MockToolchain, RecordedInvocation, MOCK_ARTIFACT};
