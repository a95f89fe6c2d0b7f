//! Sponsored items - promotional content shown in broadcast conversations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ConversationId;

/// Sponsored item exactly as delivered by the server, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSponsoredItem {
    /// Opaque identifier echoed back when the item is viewed
    pub random_id: String,
    pub sponsor: ConversationId,
    pub start_param: String,
    pub text: String,
    /// Items past this instant must not be shown
    pub expires_at: Option<DateTime<Utc>>,
}

impl RawSponsoredItem {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Structured content produced by the content parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsoredContent {
    pub text: String,
    /// Byte ranges of links discovered in `text`
    pub links: Vec<(usize, usize)>,
}

/// Validated sponsored item, ready to be shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsoredItem {
    pub random_id: String,
    pub sponsor: ConversationId,
    pub start_param: String,
    pub content: SponsoredContent,
}
