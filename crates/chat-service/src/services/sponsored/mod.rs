//! Sponsored content manager
//!
//! Per-conversation cache of promotional items for broadcast conversations.

mod actor;

use chat_core::{ConversationId, ConversationKind, DomainError, RemoteError, SponsoredItem};
use tokio::sync::{mpsc, oneshot};
use tracing::{instrument, warn};

use self::actor::{Command, SponsoredActor};
use crate::dto::SponsoredMessages;
use crate::services::context::ServiceContext;
use crate::services::error::{ServiceError, ServiceResult};

/// Handle to the sponsored content actor
#[derive(Clone)]
pub struct SponsoredManager {
    tx: mpsc::UnboundedSender<Command>,
    ctx: ServiceContext,
}

impl SponsoredManager {
    /// Start the actor on the current runtime
    pub fn spawn(ctx: ServiceContext) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = SponsoredActor::new(ctx.clone(), rx, tx.downgrade());
        tokio::spawn(actor.run());
        Self { tx, ctx }
    }

    /// Whether the conversation may carry sponsored content; unknown ones are an error
    fn eligibility(&self, conversation_id: ConversationId) -> ServiceResult<bool> {
        match self.ctx.directory().conversation_kind(conversation_id) {
            Some(kind) => Ok(kind == ConversationKind::Broadcast),
            None => Err(DomainError::ConversationNotFound(conversation_id).into()),
        }
    }

    /// Fresh sponsored items of a conversation.
    ///
    /// Conversations that cannot carry sponsored content get an empty result.
    #[instrument(skip(self))]
    pub async fn get_sponsored_messages(
        &self,
        conversation_id: ConversationId,
    ) -> ServiceResult<SponsoredMessages> {
        if !self.eligibility(conversation_id)? {
            return Ok(SponsoredMessages::empty(conversation_id));
        }

        let (waiter, rx) = oneshot::channel::<Result<Vec<SponsoredItem>, RemoteError>>();
        self.tx
            .send(Command::GetItems {
                conversation_id,
                waiter,
            })
            .map_err(|_| ServiceError::Shutdown)?;
        let items = rx.await.map_err(|_| ServiceError::Shutdown)??;

        Ok(SponsoredMessages {
            conversation_id,
            items,
        })
    }

    /// Last validated items, without touching the network
    #[instrument(skip(self))]
    pub async fn cached_items(&self, conversation_id: ConversationId) -> ServiceResult<Vec<SponsoredItem>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::CachedItems {
                conversation_id,
                reply,
            })
            .map_err(|_| ServiceError::Shutdown)?;
        rx.await.map_err(|_| ServiceError::Shutdown)
    }

    /// Report that an item was shown. The cache is left untouched.
    #[instrument(skip(self))]
    pub async fn acknowledge_view(
        &self,
        conversation_id: ConversationId,
        random_id: &str,
    ) -> ServiceResult<()> {
        if self.tx.is_closed() {
            return Err(ServiceError::Shutdown);
        }
        if !self.eligibility(conversation_id)? || random_id.is_empty() {
            return Err(DomainError::SponsoredMessageNotFound.into());
        }

        self.ctx
            .sponsored_remote()
            .view_sponsored_item(conversation_id, random_id)
            .await
            .map_err(|e| {
                warn!(conversation_id = %conversation_id, error = %e, "Failed to acknowledge sponsored view");
                ServiceError::from(e)
            })
    }

    /// Fail every outstanding waiter and stop the actor
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> ServiceResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Shutdown { reply })
            .map_err(|_| ServiceError::Shutdown)?;
        rx.await.map_err(|_| ServiceError::Shutdown)
    }
}

impl std::fmt::Debug for SponsoredManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SponsoredManager")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}
