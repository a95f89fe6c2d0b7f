//! The reaction actor: sole owner of every reaction collection.
//!
//! Commands are handled one at a time and never awaited on the network.
//! Remote calls run in spawned tasks that post their outcome back as a
//! command, so other requests keep flowing while a fetch is outstanding and
//! the coalescing tables decide who shares which result.

use std::collections::HashMap;
use std::future::Future;
use std::ops::ControlFlow;

use chat_cache::{decode, PersistQueue, RequestGroup, VersionedCache};
use chat_core::{
    ReactionDefinition, ReactionListKind, ReactionType, RemoteError, RemoteResult,
    SavedReactionTags, TagScope, Update,
};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::catalog::ReactionCatalog;
use super::command::{Command, Reply};
use super::keys::{list_key, StoredList, DEFAULT_REACTION_KEY};
use super::tags::TagScopeState;
use crate::services::context::ServiceContext;
use crate::services::error::ServiceError;

pub(super) struct ReactionActor {
    pub(super) ctx: ServiceContext,
    pub(super) persist: PersistQueue,
    commands: mpsc::UnboundedReceiver<Command>,
    self_tx: mpsc::WeakUnboundedSender<Command>,

    pub(super) catalog: ReactionCatalog,
    pub(super) catalog_requests: RequestGroup<(), Result<(), RemoteError>>,
    /// Emoji lookups waiting for the catalog to load
    pub(super) emoji_queries: Vec<(String, Reply<ReactionDefinition>)>,

    pub(super) lists: HashMap<ReactionListKind, VersionedCache<Vec<ReactionType>>>,
    pub(super) list_requests: RequestGroup<ReactionListKind, Result<Vec<ReactionType>, RemoteError>>,

    pub(super) default_reaction: Option<ReactionType>,

    pub(super) tags: HashMap<TagScope, TagScopeState>,
    pub(super) tag_requests: RequestGroup<TagScope, Result<SavedReactionTags, RemoteError>>,
    pub(super) tags_preload_started: bool,
}

impl ReactionActor {
    pub(super) fn new(
        ctx: ServiceContext,
        commands: mpsc::UnboundedReceiver<Command>,
        self_tx: mpsc::WeakUnboundedSender<Command>,
    ) -> Self {
        let (persist, _writer) = PersistQueue::spawn(ctx.store().clone());
        let lists = ReactionListKind::ALL
            .into_iter()
            .map(|kind| (kind, VersionedCache::default()))
            .collect();

        Self {
            ctx,
            persist,
            commands,
            self_tx,
            catalog: ReactionCatalog::default(),
            catalog_requests: RequestGroup::new(),
            emoji_queries: Vec::new(),
            lists,
            list_requests: RequestGroup::new(),
            default_reaction: None,
            tags: HashMap::new(),
            tag_requests: RequestGroup::new(),
            tags_preload_started: false,
        }
    }

    /// Load persisted state, then process commands until shutdown or until
    /// every handle is gone.
    pub(super) async fn run(mut self) {
        self.load_from_store().await;
        debug!("Reaction manager started");

        while let Some(command) = self.commands.recv().await {
            if self.handle(command).is_break() {
                return;
            }
        }

        debug!("Reaction manager stopped, all handles dropped");
    }

    fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::ReloadCatalog { waiter } => self.reload_catalog(waiter),
            Command::IsActive {
                reaction_type,
                reply,
            } => {
                let _ = reply.send(self.catalog.is_active(&reaction_type));
            }
            Command::GetEmojiReaction { emoji, reply } => self.get_emoji_reaction(emoji, reply),
            Command::GetAvailableReactions { row_size, reply } => {
                let _ = reply.send(self.available_reactions(row_size));
            }
            Command::GetSortedAvailableReactions { request, reply } => {
                let _ = reply.send(self.sorted_available_reactions(&request));
            }
            Command::CatalogFetched(result) => self.on_catalog_fetched(result),

            Command::GetReactionList {
                kind,
                force,
                waiter,
            } => self.get_reaction_list(kind, force, waiter),
            Command::AddRecent {
                reaction_type,
                reply,
            } => {
                self.add_recent(reaction_type);
                let _ = reply.send(());
            }
            Command::ClearReactionList { kind, reply } => self.clear_reaction_list(kind, reply),
            Command::ListFetched { kind, result } => self.on_list_fetched(kind, result),

            Command::GetDefaultReaction { reply } => {
                let _ = reply.send(self.default_reaction.clone());
            }
            Command::SetDefaultReaction {
                reaction_type,
                reply,
            } => self.set_default_reaction(reaction_type, reply),

            Command::GetTags { scope, waiter } => self.get_tags(scope, waiter),
            Command::ReconcileLocalChange {
                topic,
                old_tags,
                new_tags,
                reply,
            } => {
                self.reconcile_local_change(topic, &old_tags, &new_tags);
                let _ = reply.send(());
            }
            Command::SetTagTitle {
                reaction_type,
                title,
                reply,
            } => self.set_tag_title(reaction_type, title, reply),
            Command::RemoteTagsChanged => self.on_remote_tags_changed(),
            Command::TagsFetched { scope, result } => self.on_tags_fetched(scope, result),
            Command::TagsLoadedFromStore(entries) => self.on_tags_loaded_from_store(entries),

            Command::GetCurrentState { reply } => {
                let _ = reply.send(self.current_state());
            }
            Command::Flush { reply } => {
                let persist = self.persist.clone();
                tokio::spawn(async move {
                    persist.flush().await;
                    let _ = reply.send(());
                });
            }
            Command::Shutdown { reply } => {
                self.shutdown();
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Run `task` off the actor and feed the command it yields back in
    pub(super) fn post_back<F>(&self, task: F)
    where
        F: Future<Output = Command> + Send + 'static,
    {
        let self_tx = self.self_tx.clone();
        tokio::spawn(async move {
            let command = task.await;
            match self_tx.upgrade() {
                Some(tx) => {
                    let _ = tx.send(command);
                }
                None => debug!("Reaction manager gone, dropping completion"),
            }
        });
    }

    pub(super) fn notify(&self, update: Update) {
        self.ctx.notifier().notify(update);
    }

    // === Startup ===

    async fn load_from_store(&mut self) {
        self.load_catalog().await;
        for kind in ReactionListKind::ALL {
            self.load_list(kind).await;
        }
        self.load_default_reaction().await;
        self.load_global_tags().await;

        if self.catalog.cache.needs_reload() {
            self.reload_catalog(None);
        }
    }

    async fn load_list(&mut self, kind: ReactionListKind) {
        let key = list_key(kind);
        let Some(stored) = self.read_record::<StoredList>(&key).await else {
            return;
        };
        if let Some(cache) = self.lists.get_mut(&kind) {
            debug!(kind = %kind, len = stored.reactions.len(), "Loaded reaction list from store");
            cache.restore(stored.reactions, stored.fingerprint);
        }
    }

    async fn load_default_reaction(&mut self) {
        self.default_reaction = self
            .read_record::<ReactionType>(DEFAULT_REACTION_KEY)
            .await
            .filter(|reaction_type| !reaction_type.is_empty());
    }

    /// Best-effort read: absence, store failures and corrupt records all
    /// yield `None`; the latter two are logged.
    pub(super) async fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.ctx.store().get(key).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read record from store");
                return None;
            }
        };
        match decode(key, &bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring corrupt record");
                None
            }
        }
    }

    // === Lifecycle ===

    fn shutdown(&mut self) {
        let aborted = RemoteError::aborted();
        let mut failed = self.catalog_requests.abort_all(Err(aborted.clone()));
        failed += self.list_requests.abort_all(Err(aborted.clone()));
        failed += self.tag_requests.abort_all(Err(aborted.clone()));
        for (_, reply) in self.emoji_queries.drain(..) {
            if reply.send(Err(ServiceError::Remote(aborted.clone()))).is_ok() {
                failed += 1;
            }
        }
        info!(failed_waiters = failed, "Reaction manager shut down");
    }

    /// Everything currently known, as the updates a new observer needs
    fn current_state(&self) -> Vec<Update> {
        let mut updates = Vec::new();

        if self.catalog.cache.is_loaded() {
            updates.push(Update::active_reactions(self.catalog.active().to_vec()));
        }
        for kind in ReactionListKind::ALL {
            if let Some(cache) = self.lists.get(&kind).filter(|cache| cache.is_loaded()) {
                updates.push(Update::reaction_list(kind, cache.value().clone()));
            }
        }
        if let Some(reaction_type) = &self.default_reaction {
            updates.push(Update::default_reaction(reaction_type.clone()));
        }

        let mut scopes: Vec<&TagScope> = self
            .tags
            .iter()
            .filter(|(_, state)| state.cache.is_loaded())
            .map(|(scope, _)| scope)
            .collect();
        scopes.sort_by_key(|scope| scope.topic());
        for scope in scopes {
            if let Some(state) = self.tags.get(scope) {
                updates.push(Update::saved_messages_tags(
                    *scope,
                    state.cache.value().tags().to_vec(),
                ));
            }
        }

        updates
    }
}

/// Run a remote call whose only consumer is the caller, and reply with its result
pub(super) fn forward_remote<F>(operation: &'static str, reply: Reply<()>, call: F)
where
    F: Future<Output = RemoteResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = call.await;
        if let Err(e) = &result {
            warn!(operation = operation, error = %e, "Remote call failed");
        }
        let _ = reply.send(result.map_err(ServiceError::from));
    });
}
