//! The sponsored content actor.
//!
//! Items are ephemeral: every fetch replaces the conversation's cached set
//! wholesale, nothing is persisted and nothing is fingerprinted.

use std::collections::HashMap;
use std::ops::ControlFlow;

use chat_cache::{Join, RequestGroup, Waiter};
use chat_core::{
    ConversationId, RawSponsoredItem, RemoteError, RemoteResult, SponsoredItem,
};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::services::context::ServiceContext;

pub(super) type ItemsWaiter = Waiter<Result<Vec<SponsoredItem>, RemoteError>>;

pub(super) enum Command {
    GetItems {
        conversation_id: ConversationId,
        waiter: ItemsWaiter,
    },
    ItemsFetched {
        conversation_id: ConversationId,
        result: RemoteResult<Vec<RawSponsoredItem>>,
    },
    CachedItems {
        conversation_id: ConversationId,
        reply: oneshot::Sender<Vec<SponsoredItem>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

pub(super) struct SponsoredActor {
    ctx: ServiceContext,
    commands: mpsc::UnboundedReceiver<Command>,
    self_tx: mpsc::WeakUnboundedSender<Command>,
    items: HashMap<ConversationId, Vec<SponsoredItem>>,
    requests: RequestGroup<ConversationId, Result<Vec<SponsoredItem>, RemoteError>>,
}

impl SponsoredActor {
    pub(super) fn new(
        ctx: ServiceContext,
        commands: mpsc::UnboundedReceiver<Command>,
        self_tx: mpsc::WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            ctx,
            commands,
            self_tx,
            items: HashMap::new(),
            requests: RequestGroup::new(),
        }
    }

    pub(super) async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            if self.handle(command).is_break() {
                return;
            }
        }
        debug!("Sponsored content manager stopped, all handles dropped");
    }

    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::GetItems {
                conversation_id,
                waiter,
            } => self.get_items(conversation_id, waiter),
            Command::ItemsFetched {
                conversation_id,
                result,
            } => self.on_items_fetched(conversation_id, result),
            Command::CachedItems {
                conversation_id,
                reply,
            } => {
                let items = self.items.get(&conversation_id).cloned().unwrap_or_default();
                let _ = reply.send(items);
            }
            Command::Shutdown { reply } => {
                let failed = self.requests.abort_all(Err(RemoteError::aborted()));
                info!(failed_waiters = failed, "Sponsored content manager shut down");
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Always asks the remote; concurrent callers share one fetch
    fn get_items(&mut self, conversation_id: ConversationId, waiter: ItemsWaiter) {
        if self.requests.acquire_or_join(conversation_id, Some(waiter)) == Join::Wait {
            debug!(
                conversation_id = %conversation_id,
                waiters = self.requests.waiter_count(&conversation_id),
                "Sponsored items fetch already in flight"
            );
            return;
        }

        debug!(conversation_id = %conversation_id, "Fetching sponsored items");
        let remote = self.ctx.sponsored_remote().clone();
        let self_tx = self.self_tx.clone();
        tokio::spawn(async move {
            let result = remote.get_sponsored_items(conversation_id).await;
            if let Some(tx) = self_tx.upgrade() {
                let _ = tx.send(Command::ItemsFetched {
                    conversation_id,
                    result,
                });
            }
        });
    }

    fn on_items_fetched(
        &mut self,
        conversation_id: ConversationId,
        result: RemoteResult<Vec<RawSponsoredItem>>,
    ) {
        let outcome = match result {
            Ok(raw_items) => {
                let received = raw_items.len();
                let items: Vec<SponsoredItem> = raw_items
                    .into_iter()
                    .filter_map(|raw| self.validate(conversation_id, raw))
                    .collect();
                debug!(
                    conversation_id = %conversation_id,
                    received = received,
                    kept = items.len(),
                    "Sponsored items fetched"
                );
                self.items.insert(conversation_id, items.clone());
                Ok(items)
            }
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "Failed to fetch sponsored items");
                Err(e)
            }
        };
        self.requests.complete(&conversation_id, outcome);
    }

    /// Check one raw item on its own; a bad item never spoils the batch
    fn validate(&self, conversation_id: ConversationId, raw: RawSponsoredItem) -> Option<SponsoredItem> {
        if raw.random_id.is_empty() {
            warn!(conversation_id = %conversation_id, "Dropping sponsored item without identifier");
            return None;
        }
        if raw.is_expired_at(Utc::now()) {
            warn!(conversation_id = %conversation_id, random_id = %raw.random_id, "Dropping expired sponsored item");
            return None;
        }
        if !raw.sponsor.is_valid() || self.ctx.directory().conversation_kind(raw.sponsor).is_none() {
            warn!(
                conversation_id = %conversation_id,
                random_id = %raw.random_id,
                sponsor = %raw.sponsor,
                "Dropping sponsored item with unknown sponsor"
            );
            return None;
        }

        match self.ctx.content_parser().parse(&raw.text, raw.sponsor) {
            Ok(content) => Some(SponsoredItem {
                random_id: raw.random_id,
                sponsor: raw.sponsor,
                start_param: raw.start_param,
                content,
            }),
            Err(reason) => {
                warn!(
                    conversation_id = %conversation_id,
                    random_id = %raw.random_id,
                    reason = %reason,
                    "Dropping sponsored item with unparsable content"
                );
                None
            }
        }
    }
}
