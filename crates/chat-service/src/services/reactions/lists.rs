//! Ranked reaction lists and the default reaction.

use chat_cache::Join;
use chat_core::{
    promote_reaction, reaction_types_fingerprint, DomainError, Fetched, ReactionListKind,
    ReactionListSnapshot, ReactionType, RemoteResult, Update, MAX_RECENT_REACTIONS,
};
use tracing::{debug, warn};

use super::actor::{forward_remote, ReactionActor};
use super::command::{Command, FetchWaiter, Reply};
use super::keys::{list_key, StoredList, DEFAULT_REACTION_KEY};

impl ReactionActor {
    pub(super) fn list_value(&self, kind: ReactionListKind) -> &[ReactionType] {
        self.lists.get(&kind).map_or(&[], |cache| cache.value().as_slice())
    }

    /// Local cap of `kind`, never above the kind's own capacity
    fn list_capacity(&self, kind: ReactionListKind) -> Option<usize> {
        kind.capacity()
            .map(|capacity| capacity.min(self.ctx.settings().recent_limit.max(1)))
    }

    /// Serve a fresh list from cache, otherwise join or start its fetch
    pub(super) fn get_reaction_list(
        &mut self,
        kind: ReactionListKind,
        force: bool,
        waiter: FetchWaiter<Vec<ReactionType>>,
    ) {
        let Some(cache) = self.lists.get_mut(&kind) else {
            return;
        };
        if force {
            cache.mark_stale();
        }
        if !cache.needs_reload() {
            let _ = waiter.send(Ok(cache.value().clone()));
            return;
        }
        self.reload_list(kind, Some(waiter));
    }

    fn reload_list(&mut self, kind: ReactionListKind, waiter: Option<FetchWaiter<Vec<ReactionType>>>) {
        match self.list_requests.acquire_or_join(kind, waiter) {
            Join::Wait => {
                debug!(
                    kind = %kind,
                    waiters = self.list_requests.waiter_count(&kind),
                    "Reaction list reload already in flight"
                );
            }
            Join::Initiate => {
                let Some(cache) = self.lists.get_mut(&kind) else {
                    return;
                };
                let fingerprint = cache.fingerprint();
                let remote = self.ctx.reaction_remote().clone();
                debug!(kind = %kind, fingerprint = %fingerprint, "Reloading reaction list");
                self.post_back(async move {
                    Command::ListFetched {
                        kind,
                        result: remote.get_reaction_list(kind, fingerprint).await,
                    }
                });
            }
        }
    }

    pub(super) fn on_list_fetched(
        &mut self,
        kind: ReactionListKind,
        result: RemoteResult<Fetched<ReactionListSnapshot>>,
    ) {
        let capacity = self.list_capacity(kind);
        let Some(cache) = self.lists.get_mut(&kind) else {
            return;
        };

        let mut is_changed = false;
        let outcome = match result {
            Ok(Fetched::NotModified) => {
                cache.confirm();
                Ok(cache.value().clone())
            }
            Ok(Fetched::Modified(snapshot)) => {
                let reactions = normalize_list(snapshot.reactions, capacity);
                is_changed = cache.reconcile(reactions, snapshot.fingerprint);
                Ok(cache.value().clone())
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "Failed to reload reaction list");
                Err(e)
            }
        };

        debug!(kind = %kind, changed = is_changed, "Reaction list reload complete");
        if is_changed {
            self.persist_list(kind);
            self.notify_list(kind);
        }
        self.list_requests.complete(&kind, outcome);
    }

    pub(super) fn add_recent(&mut self, reaction_type: ReactionType) {
        let kind = ReactionListKind::Recent;
        let capacity = self.list_capacity(kind).unwrap_or(MAX_RECENT_REACTIONS);
        let Some(cache) = self.lists.get_mut(&kind) else {
            return;
        };

        let mut is_promoted = false;
        cache.modify(
            |list| is_promoted = promote_reaction(list, reaction_type, capacity),
            |list| reaction_types_fingerprint(list),
        );
        if is_promoted {
            self.persist_list(kind);
            self.notify_list(kind);
        }
    }

    /// Clear locally right away, then acknowledge once the remote has
    pub(super) fn clear_reaction_list(&mut self, kind: ReactionListKind, reply: Reply<()>) {
        if let Some(cache) = self.lists.get_mut(&kind) {
            let was_empty = cache.value().is_empty();
            cache.modify(Vec::clear, |list| reaction_types_fingerprint(list));
            self.persist_list(kind);
            if !was_empty {
                self.notify_list(kind);
            }
        }

        let remote = self.ctx.reaction_remote().clone();
        forward_remote("clear_reaction_list", reply, async move {
            remote.clear_reaction_list(kind).await
        });
    }

    fn persist_list(&self, kind: ReactionListKind) {
        if let Some(cache) = self.lists.get(&kind) {
            self.persist.save(
                list_key(kind),
                &StoredList {
                    reactions: cache.value().clone(),
                    fingerprint: cache.fingerprint(),
                },
            );
        }
    }

    fn notify_list(&self, kind: ReactionListKind) {
        self.notify(Update::reaction_list(kind, self.list_value(kind).to_vec()));
    }

    // === Default reaction ===

    /// Must be an active catalog reaction, or a custom emoji for premium users
    pub(super) fn set_default_reaction(&mut self, reaction_type: ReactionType, reply: Reply<()>) {
        let is_premium_user = self.ctx.directory().is_premium();
        let is_allowed = match &reaction_type {
            ReactionType::Emoji(_) => {
                self.catalog.is_active(&reaction_type)
                    && self
                        .catalog
                        .find(&reaction_type)
                        .is_some_and(|definition| !definition.is_premium || is_premium_user)
            }
            ReactionType::CustomEmoji(_) => is_premium_user,
        };
        if reaction_type.is_empty() || !is_allowed {
            let _ = reply.send(Err(DomainError::ReactionUnavailable(reaction_type).into()));
            return;
        }
        if self.default_reaction.as_ref() == Some(&reaction_type) {
            let _ = reply.send(Ok(()));
            return;
        }

        self.default_reaction = Some(reaction_type.clone());
        self.persist.save(DEFAULT_REACTION_KEY, &reaction_type);
        self.notify(Update::default_reaction(reaction_type.clone()));

        let remote = self.ctx.reaction_remote().clone();
        forward_remote("set_default_reaction", reply, async move {
            remote.set_default_reaction(&reaction_type).await
        });
    }
}

/// Drop empty and repeated entries and apply the local cap
fn normalize_list(reactions: Vec<ReactionType>, capacity: Option<usize>) -> Vec<ReactionType> {
    let mut list: Vec<ReactionType> = Vec::with_capacity(reactions.len());
    for reaction_type in reactions {
        if !reaction_type.is_empty() && !list.contains(&reaction_type) {
            list.push(reaction_type);
        }
    }
    if let Some(capacity) = capacity {
        list.truncate(capacity);
    }
    list
}
