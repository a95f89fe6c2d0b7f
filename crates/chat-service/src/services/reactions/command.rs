//! Messages processed by the reaction actor.

use chat_cache::Waiter;
use chat_core::{
    CatalogSnapshot, Fetched, ReactionDefinition, ReactionListKind, ReactionListSnapshot,
    ReactionType, RemoteError, RemoteResult, SavedReactionTag, SavedReactionTags, TagScope,
    TopicId, Update,
};
use tokio::sync::oneshot;

use super::picker::PickerRequest;
use crate::dto::AvailableReactions;
use crate::services::error::ServiceResult;

/// Reply channel of a plain request
pub(super) type Reply<T> = oneshot::Sender<ServiceResult<T>>;

/// Reply channel of a request that may be coalesced with others
pub(super) type FetchWaiter<T> = Waiter<Result<T, RemoteError>>;

pub(super) enum Command {
    // === Catalog ===
    ReloadCatalog {
        waiter: Option<FetchWaiter<()>>,
    },
    IsActive {
        reaction_type: ReactionType,
        reply: oneshot::Sender<bool>,
    },
    GetEmojiReaction {
        emoji: String,
        reply: Reply<ReactionDefinition>,
    },
    GetAvailableReactions {
        row_size: i32,
        reply: oneshot::Sender<AvailableReactions>,
    },
    GetSortedAvailableReactions {
        request: PickerRequest,
        reply: oneshot::Sender<AvailableReactions>,
    },
    CatalogFetched(RemoteResult<Fetched<CatalogSnapshot>>),

    // === Ranked lists ===
    GetReactionList {
        kind: ReactionListKind,
        force: bool,
        waiter: FetchWaiter<Vec<ReactionType>>,
    },
    AddRecent {
        reaction_type: ReactionType,
        reply: oneshot::Sender<()>,
    },
    ClearReactionList {
        kind: ReactionListKind,
        reply: Reply<()>,
    },
    ListFetched {
        kind: ReactionListKind,
        result: RemoteResult<Fetched<ReactionListSnapshot>>,
    },

    // === Default reaction ===
    GetDefaultReaction {
        reply: oneshot::Sender<Option<ReactionType>>,
    },
    SetDefaultReaction {
        reaction_type: ReactionType,
        reply: Reply<()>,
    },

    // === Saved-messages tags ===
    GetTags {
        scope: TagScope,
        waiter: FetchWaiter<SavedReactionTags>,
    },
    ReconcileLocalChange {
        topic: Option<TopicId>,
        old_tags: Vec<ReactionType>,
        new_tags: Vec<ReactionType>,
        reply: oneshot::Sender<()>,
    },
    SetTagTitle {
        reaction_type: ReactionType,
        title: String,
        reply: Reply<()>,
    },
    RemoteTagsChanged,
    TagsFetched {
        scope: TagScope,
        result: RemoteResult<Fetched<Vec<SavedReactionTag>>>,
    },
    TagsLoadedFromStore(Vec<(TagScope, SavedReactionTags)>),

    // === Lifecycle ===
    GetCurrentState {
        reply: oneshot::Sender<Vec<Update>>,
    },
    Flush {
        reply: oneshot::Sender<()>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
