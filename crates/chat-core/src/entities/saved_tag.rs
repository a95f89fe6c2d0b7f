//! Saved-messages tags - reactions used as labels on saved messages

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::value_objects::{Fingerprint, FingerprintBuilder, ReactionType};

/// Maximum number of characters in a tag title
pub const MAX_TAG_TITLE_LENGTH: usize = 12;

/// One tag with its usage count in a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReactionTag {
    pub reaction_type: ReactionType,
    /// Per-tag fingerprint; supplied by the server or derived from the reaction type
    pub fingerprint: u64,
    pub title: String,
    pub count: i32,
}

impl SavedReactionTag {
    /// Create a tag that was observed locally rather than received from the server
    pub fn new(reaction_type: ReactionType, title: impl Into<String>, count: i32) -> Self {
        let fingerprint = reaction_type.digest();
        Self {
            reaction_type,
            fingerprint,
            title: title.into(),
            count,
        }
    }

    /// A tag is kept only while it is used or has a title
    pub fn is_valid(&self) -> bool {
        !self.reaction_type.is_empty() && self.count >= 0 && (self.count > 0 || !self.title.is_empty())
    }
}

// Higher counts first; reaction type breaks ties for a stable presentation order.
impl Ord for SavedReactionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.reaction_type.cmp(&other.reaction_type))
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.fingerprint.cmp(&other.fingerprint))
    }
}

impl PartialOrd for SavedReactionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Default aggregate fingerprint of a sorted tag collection
pub fn saved_tags_fingerprint(tags: &[SavedReactionTag]) -> Fingerprint {
    let mut builder = FingerprintBuilder::new();
    for tag in tags {
        builder.push(tag.fingerprint);
        if !tag.title.is_empty() {
            builder.push_str(&tag.title);
        }
        builder.push(u64::from(tag.count.unsigned_abs()));
    }
    builder.finish()
}

/// Sorted set of tags of one scope, unique by reaction type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedReactionTags {
    tags: Vec<SavedReactionTag>,
}

impl SavedReactionTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from server records, keeping only valid, first-seen tags
    ///
    /// Returns the collection and the number of records that were dropped.
    pub fn from_records(records: Vec<SavedReactionTag>) -> (Self, usize) {
        let total = records.len();
        let mut tags: Vec<SavedReactionTag> = Vec::with_capacity(total);
        for record in records {
            if record.is_valid() && !tags.iter().any(|tag| tag.reaction_type == record.reaction_type) {
                tags.push(record);
            }
        }
        tags.sort();
        let dropped = total - tags.len();
        (Self { tags }, dropped)
    }

    pub fn tags(&self) -> &[SavedReactionTag] {
        &self.tags
    }

    pub fn get(&self, reaction_type: &ReactionType) -> Option<&SavedReactionTag> {
        self.tags.iter().find(|tag| tag.reaction_type == *reaction_type)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Apply one message's transition from `old_tags` to `new_tags`
    ///
    /// Tags only in `old_tags` lose one use, tags only in `new_tags` gain one.
    /// Returns whether anything changed.
    pub fn apply_message_change(
        &mut self,
        old_tags: &[ReactionType],
        new_tags: &[ReactionType],
    ) -> bool {
        let mut is_changed = false;

        for old_tag in old_tags.iter().filter(|tag| !new_tags.contains(tag)) {
            if let Some(position) = self.position(old_tag) {
                let tag = &mut self.tags[position];
                tag.count -= 1;
                if !tag.is_valid() {
                    self.tags.remove(position);
                }
                is_changed = true;
            }
        }

        for new_tag in new_tags.iter().filter(|tag| !old_tags.contains(tag)) {
            if new_tag.is_empty() {
                continue;
            }
            match self.position(new_tag) {
                Some(position) => self.tags[position].count += 1,
                None => self.tags.push(SavedReactionTag::new(new_tag.clone(), String::new(), 1)),
            }
            is_changed = true;
        }

        if is_changed {
            self.tags.sort();
        }
        is_changed
    }

    /// Set or clear the title of a tag, creating an unused titled tag if needed
    pub fn set_title(&mut self, reaction_type: &ReactionType, title: &str) -> bool {
        match self.position(reaction_type) {
            Some(position) => {
                let tag = &mut self.tags[position];
                if tag.title == title {
                    return false;
                }
                tag.title = title.to_string();
                if !tag.is_valid() {
                    self.tags.remove(position);
                }
            }
            None => {
                if title.is_empty() {
                    return false;
                }
                self.tags
                    .push(SavedReactionTag::new(reaction_type.clone(), title, 0));
            }
        }
        self.tags.sort();
        true
    }

    fn position(&self, reaction_type: &ReactionType) -> Option<usize> {
        self.tags
            .iter()
            .position(|tag| tag.reaction_type == *reaction_type)
    }
}
