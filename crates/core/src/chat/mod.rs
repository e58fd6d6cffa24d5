//! Chat platform collaborator.
//!
//! `ChatSession` is the outbound contract the pipeline reports through.
//! The `discord` submodule implements it over Discord's interaction
//! webhooks and also covers the inbound side: request signature checks,
//! payload parsing and the application command definitions.

pub mod discord;
mod error;
mod traits;

pub use error::ChatError;
pub use traits::ChatSession;
