//! Turns interaction payloads into submissions.

use super::commands::{ORBIFY_COMMAND, ORBIFY_MESSAGE_COMMAND, ORBIFY_USER_COMMAND};
use super::model::{
    find_option, Interaction, Member, User, COMMAND_CHAT_INPUT, COMMAND_MESSAGE, COMMAND_USER,
    INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
};
use crate::acquisition::InputSource;

/// Base URL of Discord's CDN.
pub const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Requested avatar edge length.
pub const AVATAR_SIZE: u32 = 2048;

/// Reply for command names the bot does not know.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "how";

/// Reply for slash invocations that cannot be interpreted.
pub const MALFORMED_COMMAND_MESSAGE: &str = "An error occurred while processing your orb.";

/// Reply when a message command targets a message without attachments.
pub const NO_ATTACHMENT_MESSAGE: &str =
    "The message you used this command on does not contain any attachments.";

/// Reply when a message command targets a non-image attachment.
pub const NOT_MEDIA_MESSAGE: &str =
    "The attachment in the message you used this command on is not an image or video.";

/// A command invocation accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSubmission {
    /// Interaction id, used as the job id.
    pub submission_id: String,
    /// Token for the interaction's webhook.
    pub interaction_token: String,
    /// The invoking user.
    pub user_id: String,
    pub source: InputSource,
}

/// What the endpoint should do with an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Answer a ping.
    Pong,
    /// Acknowledge and process a submission.
    Submit(InboundSubmission),
    /// Reply with a message and do nothing else.
    Reject { message: String, ephemeral: bool },
}

impl InteractionOutcome {
    fn reject(message: &str) -> Self {
        Self::Reject {
            message: message.to_string(),
            ephemeral: true,
        }
    }
}

/// Routes an interaction to a submission or an immediate reply.
pub fn route_interaction(interaction: &Interaction) -> InteractionOutcome {
    match interaction.kind {
        INTERACTION_PING => return InteractionOutcome::Pong,
        INTERACTION_APPLICATION_COMMAND => {}
        _ => return InteractionOutcome::reject(UNKNOWN_COMMAND_MESSAGE),
    }

    let (Some(data), Some(invoker)) = (&interaction.data, interaction.invoking_user()) else {
        return InteractionOutcome::reject(MALFORMED_COMMAND_MESSAGE);
    };

    let source = match (data.kind, data.name.as_str()) {
        (COMMAND_CHAT_INPUT, ORBIFY_COMMAND) => slash_source(interaction),
        (COMMAND_MESSAGE, ORBIFY_MESSAGE_COMMAND) => message_source(interaction),
        (COMMAND_USER, ORBIFY_USER_COMMAND) => user_command_source(interaction),
        _ => Err(InteractionOutcome::reject(UNKNOWN_COMMAND_MESSAGE)),
    };

    match source {
        Ok(source) => InteractionOutcome::Submit(InboundSubmission {
            submission_id: interaction.id.clone(),
            interaction_token: interaction.token.clone(),
            user_id: invoker.id.clone(),
            source,
        }),
        Err(outcome) => outcome,
    }
}

fn slash_source(interaction: &Interaction) -> Result<InputSource, InteractionOutcome> {
    let malformed = || InteractionOutcome::reject(MALFORMED_COMMAND_MESSAGE);
    let data = interaction.data.as_ref().ok_or_else(malformed)?;
    let subcommand = data.options.first().ok_or_else(malformed)?;

    match subcommand.name.as_str() {
        "image" => {
            let attachment = find_option(&subcommand.options, "image")
                .and_then(|o| o.as_str())
                .and_then(|id| data.resolved.attachments.get(id))
                .ok_or_else(malformed)?;
            Ok(InputSource::Attachment {
                url: attachment.url.clone(),
                filename: attachment.filename.clone(),
            })
        }
        "url" => {
            let url = find_option(&subcommand.options, "url")
                .and_then(|o| o.as_str())
                .ok_or_else(malformed)?;
            Ok(InputSource::Url {
                url: url.trim().to_string(),
            })
        }
        "user" => {
            let prefer_server_avatar = find_option(&subcommand.options, "prefer-server-avatar")
                .and_then(|o| o.as_bool())
                .unwrap_or(false);

            let target = find_option(&subcommand.options, "user")
                .and_then(|o| o.as_str())
                .and_then(|id| resolved_target(interaction, id));

            let target = match target {
                Some(target) => target,
                None => invoker_target(interaction).ok_or_else(malformed)?,
            };
            Ok(target.avatar_source(interaction.guild_id.as_deref(), prefer_server_avatar))
        }
        _ => Err(malformed()),
    }
}

fn message_source(interaction: &Interaction) -> Result<InputSource, InteractionOutcome> {
    let data = interaction
        .data
        .as_ref()
        .ok_or_else(|| InteractionOutcome::reject(MALFORMED_COMMAND_MESSAGE))?;

    let attachment = data
        .target_id
        .as_deref()
        .and_then(|id| data.resolved.messages.get(id))
        .and_then(|message| message.attachments.first())
        .ok_or_else(|| InteractionOutcome::reject(NO_ATTACHMENT_MESSAGE))?;

    let is_media = attachment
        .content_type
        .as_deref()
        .map(|ct| ct.starts_with("image/") || ct.starts_with("video/"))
        .unwrap_or(false);
    if !is_media {
        return Err(InteractionOutcome::reject(NOT_MEDIA_MESSAGE));
    }

    Ok(InputSource::Attachment {
        url: attachment.url.clone(),
        filename: attachment.filename.clone(),
    })
}

fn user_command_source(interaction: &Interaction) -> Result<InputSource, InteractionOutcome> {
    let target = interaction
        .data
        .as_ref()
        .and_then(|data| data.target_id.as_deref())
        .and_then(|id| resolved_target(interaction, id))
        .ok_or_else(|| InteractionOutcome::reject(MALFORMED_COMMAND_MESSAGE))?;

    // Context-menu targets use the avatar shown in the guild.
    Ok(target.avatar_source(interaction.guild_id.as_deref(), true))
}

/// A user whose avatar should be orbified.
#[derive(Debug, Clone, Copy)]
struct AvatarTarget<'a> {
    user: &'a User,
    member: Option<&'a Member>,
}

impl AvatarTarget<'_> {
    fn avatar_source(&self, guild_id: Option<&str>, prefer_server_avatar: bool) -> InputSource {
        let guild_avatar = self
            .member
            .and_then(|m| m.avatar.as_deref())
            .zip(guild_id)
            .filter(|_| prefer_server_avatar);

        if let Some((hash, guild_id)) = guild_avatar {
            let animated = is_animated(hash);
            return InputSource::Avatar {
                url: format!(
                    "{}/guilds/{}/users/{}/avatars/{}.{}?size={}",
                    CDN_BASE,
                    guild_id,
                    self.user.id,
                    hash,
                    avatar_extension(animated),
                    AVATAR_SIZE
                ),
                animated,
            };
        }

        match self.user.avatar.as_deref() {
            Some(hash) => {
                let animated = is_animated(hash);
                InputSource::Avatar {
                    url: format!(
                        "{}/avatars/{}/{}.{}?size={}",
                        CDN_BASE,
                        self.user.id,
                        hash,
                        avatar_extension(animated),
                        AVATAR_SIZE
                    ),
                    animated,
                }
            }
            None => InputSource::Avatar {
                url: format!(
                    "{}/embed/avatars/{}.png",
                    CDN_BASE,
                    default_avatar_index(self.user)
                ),
                animated: false,
            },
        }
    }
}

fn resolved_target<'a>(interaction: &'a Interaction, user_id: &str) -> Option<AvatarTarget<'a>> {
    let resolved = &interaction.data.as_ref()?.resolved;
    let member = resolved.members.get(user_id);
    let user = resolved
        .users
        .get(user_id)
        .or_else(|| member.and_then(|m| m.user.as_ref()))?;
    Some(AvatarTarget { user, member })
}

fn invoker_target(interaction: &Interaction) -> Option<AvatarTarget<'_>> {
    let user = interaction.invoking_user()?;
    Some(AvatarTarget {
        user,
        member: interaction.member.as_ref(),
    })
}

fn is_animated(hash: &str) -> bool {
    hash.starts_with("a_")
}

fn avatar_extension(animated: bool) -> &'static str {
    if animated {
        "gif"
    } else {
        "png"
    }
}

/// Index of the embed avatar shown for users without one.
fn default_avatar_index(user: &User) -> u64 {
    match user.discriminator.as_deref() {
        Some(d) if d != "0" => d.parse::<u64>().map(|d| d % 5).unwrap_or(0),
        _ => user.id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0),
    }
}
