//! Reaction manager handle
//!
//! The public face of the reaction actor. Cloning is cheap; every clone
//! talks to the same actor task.

use chat_core::{
    DomainError, ReactionDefinition, ReactionListKind, ReactionType, RemoteError,
    SavedReactionTags, TagScope, TopicId, Update, MAX_TAG_TITLE_LENGTH,
};
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;
use validator::Validate;

use super::actor::ReactionActor;
use super::command::{Command, FetchWaiter, Reply};
use super::picker::PickerRequest;
use crate::dto::{AvailableReactions, SavedMessagesTags, SetTagTitleRequest};
use crate::services::context::ServiceContext;
use crate::services::error::{ServiceError, ServiceResult};

/// Handle to the actor owning the reaction catalog, the ranked lists, the
/// default reaction and the saved-messages tags
#[derive(Clone)]
pub struct ReactionManager {
    tx: mpsc::UnboundedSender<Command>,
    ctx: ServiceContext,
}

impl ReactionManager {
    /// Start the actor on the current runtime.
    ///
    /// The actor first loads persisted state, then begins serving requests;
    /// requests sent meanwhile are queued.
    pub fn spawn(ctx: ServiceContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = ReactionActor::new(ctx.clone(), rx, tx.downgrade());
        tokio::spawn(actor.run());
        Self { tx, ctx }
    }

    fn send(&self, command: Command) -> ServiceResult<()> {
        self.tx.send(command).map_err(|_| ServiceError::Shutdown)
    }

    /// Send a request whose reply may itself be an error
    async fn call<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> ServiceResult<T> {
        let (reply, rx) = oneshot::channel();
        self.send(command(reply))?;
        rx.await.map_err(|_| ServiceError::Shutdown)?
    }

    /// Send a request that may be coalesced with a remote fetch
    async fn fetch<T>(&self, command: impl FnOnce(FetchWaiter<T>) -> Command) -> ServiceResult<T> {
        let (waiter, rx) = oneshot::channel::<Result<T, RemoteError>>();
        self.send(command(waiter))?;
        let result = rx.await.map_err(|_| ServiceError::Shutdown)?;
        result.map_err(ServiceError::from)
    }

    /// Send a request that always succeeds while the actor is running
    async fn query<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> ServiceResult<T> {
        let (reply, rx) = oneshot::channel();
        self.send(command(reply))?;
        rx.await.map_err(|_| ServiceError::Shutdown)
    }

    // === Catalog ===

    /// Reload the catalog, joining a reload already in progress
    #[instrument(skip(self))]
    pub async fn reload_reactions(&self) -> ServiceResult<()> {
        self.fetch(|waiter| Command::ReloadCatalog {
            waiter: Some(waiter),
        })
        .await
    }

    /// False while the catalog has never loaded
    #[instrument(skip(self))]
    pub async fn is_active_reaction(&self, reaction_type: &ReactionType) -> ServiceResult<bool> {
        let reaction_type = reaction_type.clone();
        self.query(|reply| Command::IsActive {
            reaction_type,
            reply,
        })
        .await
    }

    /// Waits for the first catalog load if needed
    #[instrument(skip(self))]
    pub async fn get_emoji_reaction(&self, emoji: &str) -> ServiceResult<ReactionDefinition> {
        if emoji.is_empty() {
            return Err(DomainError::ReactionNotFound(String::new()).into());
        }
        let emoji = emoji.to_string();
        self.call(|reply| Command::GetEmojiReaction { emoji, reply })
            .await
    }

    /// Picker contents with every active catalog reaction allowed
    #[instrument(skip(self))]
    pub async fn get_available_reactions(&self, row_size: i32) -> ServiceResult<AvailableReactions> {
        self.query(|reply| Command::GetAvailableReactions { row_size, reply })
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn get_sorted_available_reactions(
        &self,
        request: PickerRequest,
    ) -> ServiceResult<AvailableReactions> {
        self.query(|reply| Command::GetSortedAvailableReactions { request, reply })
            .await
    }

    // === Ranked lists ===

    /// Cached list when fresh, otherwise the result of a (coalesced) reload
    #[instrument(skip(self))]
    pub async fn get_reaction_list(&self, kind: ReactionListKind) -> ServiceResult<Vec<ReactionType>> {
        self.fetch(|waiter| Command::GetReactionList {
            kind,
            force: false,
            waiter,
        })
        .await
    }

    /// Like [`Self::get_reaction_list`], but always asks the remote
    #[instrument(skip(self))]
    pub async fn reload_reaction_list(&self, kind: ReactionListKind) -> ServiceResult<Vec<ReactionType>> {
        self.fetch(|waiter| Command::GetReactionList {
            kind,
            force: true,
            waiter,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn add_recent_reaction(&self, reaction_type: ReactionType) -> ServiceResult<()> {
        if reaction_type.is_empty() {
            return Err(ServiceError::validation("Reaction must not be empty"));
        }
        self.query(|reply| Command::AddRecent {
            reaction_type,
            reply,
        })
        .await
    }

    /// Completes once the remote acknowledged the clear
    #[instrument(skip(self))]
    pub async fn clear_reaction_list(&self, kind: ReactionListKind) -> ServiceResult<()> {
        self.call(|reply| Command::ClearReactionList { kind, reply })
            .await
    }

    // === Default reaction ===

    #[instrument(skip(self))]
    pub async fn get_default_reaction(&self) -> ServiceResult<Option<ReactionType>> {
        self.query(|reply| Command::GetDefaultReaction { reply }).await
    }

    #[instrument(skip(self))]
    pub async fn set_default_reaction(&self, reaction_type: ReactionType) -> ServiceResult<()> {
        self.call(|reply| Command::SetDefaultReaction {
            reaction_type,
            reply,
        })
        .await
    }

    // === Saved-messages tags ===

    /// Tags of the global scope (`None`) or of one saved-messages topic
    #[instrument(skip(self))]
    pub async fn get_saved_messages_tags(
        &self,
        topic: Option<TopicId>,
    ) -> ServiceResult<SavedMessagesTags> {
        if let Some(topic) = topic {
            if !self.ctx.directory().has_saved_topic(topic) {
                return Err(DomainError::TopicNotFound(topic).into());
            }
        }

        let scope = TagScope::from(topic);
        let tags: SavedReactionTags = self
            .fetch(|waiter| Command::GetTags { scope, waiter })
            .await?;
        Ok(SavedMessagesTags {
            scope,
            tags: tags.tags().to_vec(),
        })
    }

    /// Account for one saved message whose reactions changed from
    /// `old_tags` to `new_tags`. Never contacts the remote.
    #[instrument(skip(self))]
    pub async fn reconcile_local_change(
        &self,
        topic: Option<TopicId>,
        old_tags: Vec<ReactionType>,
        new_tags: Vec<ReactionType>,
    ) -> ServiceResult<()> {
        if old_tags == new_tags {
            return Ok(());
        }
        self.query(|reply| Command::ReconcileLocalChange {
            topic,
            old_tags,
            new_tags,
            reply,
        })
        .await
    }

    /// Rename a tag. The title is trimmed and must fit the configured limit.
    #[instrument(skip(self))]
    pub async fn set_tag_title(&self, mut request: SetTagTitleRequest) -> ServiceResult<()> {
        request.title = request.title.trim().to_string();
        if request.reaction_type.is_empty() {
            return Err(ServiceError::validation("Reaction must not be empty"));
        }

        let max = self
            .ctx
            .settings()
            .tag_title_max_length
            .min(MAX_TAG_TITLE_LENGTH);
        if request.validate().is_err() || request.title.chars().count() > max {
            return Err(DomainError::TagTitleTooLong { max }.into());
        }

        let SetTagTitleRequest {
            reaction_type,
            title,
        } = request;
        self.call(|reply| Command::SetTagTitle {
            reaction_type,
            title,
            reply,
        })
        .await
    }

    /// The remote reported that the global tag set changed
    #[instrument(skip(self))]
    pub fn on_remote_tags_changed(&self) -> ServiceResult<()> {
        self.send(Command::RemoteTagsChanged)
    }

    // === Lifecycle ===

    /// Updates that bring a new observer up to date
    #[instrument(skip(self))]
    pub async fn get_current_state(&self) -> ServiceResult<Vec<Update>> {
        self.query(|reply| Command::GetCurrentState { reply }).await
    }

    /// Wait until every persistence write issued so far reached the store
    #[instrument(skip(self))]
    pub async fn flush(&self) -> ServiceResult<()> {
        self.query(|reply| Command::Flush { reply }).await
    }

    /// Fail every outstanding waiter and stop the actor
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> ServiceResult<()> {
        self.query(|reply| Command::Shutdown { reply }).await
    }
}

impl std::fmt::Debug for ReactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionManager")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
