//! Application command definitions.

use serde_json::{json, Value};

/// Name of the slash command.
pub const ORBIFY_COMMAND: &str = "orbify";

/// Name of the message context-menu command.
pub const ORBIFY_MESSAGE_COMMAND: &str = "Orbify this image";

/// Name of the user context-menu command.
pub const ORBIFY_USER_COMMAND: &str = "Orbify this user";

/// Installable in guilds and by users.
const INTEGRATION_TYPES: [u8; 2] = [0, 1];

/// Usable in guilds, the bot's DMs and private channels.
const CONTEXTS: [u8; 3] = [0, 1, 2];

/// Body for a bulk overwrite of the global commands.
pub fn command_definitions() -> Value {
    json!([
        {
            "type": 1,
            "name": ORBIFY_COMMAND,
            "description": "Turn your beloved image into an equally beloved orb.",
            "integration_types": INTEGRATION_TYPES,
            "contexts": CONTEXTS,
            "options": [
                {
                    "type": 1,
                    "name": "image",
                    "description": "The image to orbify.",
                    "options": [{
                        "type": 11,
                        "name": "image",
                        "description": "The image to orbify.",
                        "required": true
                    }]
                },
                {
                    "type": 1,
                    "name": "url",
                    "description": "A URL to an image to orbify.",
                    "options": [{
                        "type": 3,
                        "name": "url",
                        "description": "The URL to an image to orbify.",
                        "required": true
                    }]
                },
                {
                    "type": 1,
                    "name": "user",
                    "description": "Orbify a user's avatar.",
                    "options": [
                        {
                            "type": 6,
                            "name": "user",
                            "description": "The user to orbify.",
                            "required": false
                        },
                        {
                            "type": 5,
                            "name": "prefer-server-avatar",
                            "description": "Prefer the server avatar over the user avatar. (Has no effect if used in a DM)",
                            "required": false
                        }
                    ]
                }
            ]
        },
        {
            "type": 3,
            "name": ORBIFY_MESSAGE_COMMAND,
            "integration_types": INTEGRATION_TYPES,
            "contexts": CONTEXTS
        },
        {
            "type": 2,
            "name": ORBIFY_USER_COMMAND,
            "integration_types": INTEGRATION_TYPES,
            "contexts": CONTEXTS
        }
    ])
}
