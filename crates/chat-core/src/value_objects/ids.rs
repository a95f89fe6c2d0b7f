//! Conversation and saved-messages topic identifiers
//!
//! Conversations are addressed by a signed 64-bit id assigned by the server.
//! A saved-messages topic is keyed by the conversation whose messages were saved.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Server-assigned conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConversationId(i64);

impl ConversationId {
    /// Create a ConversationId from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Zero is never assigned by the server
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse::<i64>()
            .map(ConversationId)
            .map_err(|_| IdParseError::InvalidFormat)
    }
}

/// Error when parsing an identifier from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ConversationId> for i64 {
    fn from(id: ConversationId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ConversationId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversationId::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for ConversationId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ConversationId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer conversation id")
            }

            fn visit_i64<E>(self, value: i64) -> Result<ConversationId, E>
            where
                E: de::Error,
            {
                Ok(ConversationId(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<ConversationId, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(ConversationId)
                    .map_err(|_| de::Error::custom("conversation id out of range"))
            }

            fn visit_str<E>(self, value: &str) -> Result<ConversationId, E>
            where
                E: de::Error,
            {
                value
                    .parse::<i64>()
                    .map(ConversationId)
                    .map_err(|_| de::Error::custom("invalid conversation id string"))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Saved-messages topic: the conversation the saved messages came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(ConversationId);

impl TopicId {
    #[inline]
    pub const fn new(conversation_id: ConversationId) -> Self {
        Self(conversation_id)
    }

    #[inline]
    pub const fn conversation_id(&self) -> ConversationId {
        self.0
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0.is_valid()
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scope of a saved-tag collection
///
/// The global scope aggregates tags over all saved messages; each topic scope
/// only counts the messages saved from that conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagScope {
    Global,
    Topic(TopicId),
}

impl TagScope {
    /// The topic, if this is a per-topic scope
    #[inline]
    pub fn topic(&self) -> Option<TopicId> {
        match self {
            Self::Global => None,
            Self::Topic(topic) => Some(*topic),
        }
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl From<Option<TopicId>> for TagScope {
    fn from(topic: Option<TopicId>) -> Self {
        topic.map_or(Self::Global, Self::Topic)
    }
}

impl fmt::Display for TagScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Topic(topic) => write!(f, "topic:{topic}"),
        }
    }
}
