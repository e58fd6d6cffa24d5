//! Discord over HTTP interactions.

mod client;
mod commands;
mod interaction;
mod model;
mod session;
mod signature;

pub use client::DiscordClient;
pub use commands::{
    command_definitions, ORBIFY_COMMAND, ORBIFY_MESSAGE_COMMAND, ORBIFY_USER_COMMAND,
};
pub use interaction::{
    route_interaction, InboundSubmission, InteractionOutcome, AVATAR_SIZE, CDN_BASE,
    UNKNOWN_COMMAND_MESSAGE,
};
pub use model::{
    Attachment, CommandData, CommandOption, Interaction, InteractionResponse, Member, Message,
    Resolved, ResponseMessage, User, FLAG_EPHEMERAL,
};
pub use session::DiscordSession;
pub use signature::{SignatureError, SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
