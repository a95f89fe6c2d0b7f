//! Reaction definitions - the global catalog of reactions offered by the server

use serde::{Deserialize, Serialize};

use crate::value_objects::ReactionType;

/// References to the sticker files used to render a reaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionAssets {
    pub static_icon: String,
    pub appear_animation: String,
    pub select_animation: String,
    pub activate_animation: String,
    pub effect_animation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub around_animation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_animation: Option<String>,
}

impl ReactionAssets {
    /// All mandatory asset references are present
    pub fn is_complete(&self) -> bool {
        [
            &self.static_icon,
            &self.appear_animation,
            &self.select_animation,
            &self.activate_animation,
            &self.effect_animation,
        ]
        .iter()
        .all(|asset| !asset.is_empty())
    }
}

/// One entry of the reaction catalog
///
/// Definitions are replaced wholesale on catalog reload and never patched
/// field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionDefinition {
    pub reaction_type: ReactionType,
    pub title: String,
    pub is_active: bool,
    /// Only premium accounts may pick it as their default reaction
    pub is_premium: bool,
    pub assets: ReactionAssets,
}

impl ReactionDefinition {
    pub fn new(reaction_type: ReactionType, title: impl Into<String>, assets: ReactionAssets) -> Self {
        Self {
            reaction_type,
            title: title.into(),
            is_active: true,
            is_premium: false,
            assets,
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[must_use]
    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.reaction_type.is_empty() && self.assets.is_complete()
    }
}

/// Reactions allowed in one particular conversation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatReactions {
    pub reaction_types: Vec<ReactionType>,
    /// Every active regular emoji reaction is allowed
    pub allow_all_regular: bool,
    /// Any custom emoji may be used
    pub allow_all_custom: bool,
}

impl ChatReactions {
    pub fn explicit(reaction_types: Vec<ReactionType>) -> Self {
        Self {
            reaction_types,
            allow_all_regular: false,
            allow_all_custom: false,
        }
    }

    pub fn all(allow_all_custom: bool) -> Self {
        Self {
            reaction_types: Vec::new(),
            allow_all_regular: true,
            allow_all_custom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reaction_types.is_empty() && !self.allow_all_regular && !self.allow_all_custom
    }
}

/// Why reactions cannot be added even though some are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailabilityReason {
    AnonymousAdministrator,
    Guest,
}
