//! Chat history models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::auth::IdentityId;

pub type ChatMessageId = i64;

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::System => "system",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sender {0:?}")]
pub struct UnknownSender(pub String);

impl FromStr for Sender {
    type Err = UnknownSender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "system" => Ok(Sender::System),
            other => Err(UnknownSender(other.to_string())),
        }
    }
}

/// A stored chat message, owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub owner_id: IdentityId,
    pub message: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// A validated chat line ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub message: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sender_names_the_value() {
        assert_eq!("system".parse::<Sender>(), Ok(Sender::System));
        let err = "robot".parse::<Sender>().unwrap_err();
        assert_eq!(err, UnknownSender("robot".into()));
        assert_eq!(err.to_string(), "unknown sender \"robot\"");
    }
}
