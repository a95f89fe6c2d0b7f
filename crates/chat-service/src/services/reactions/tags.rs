//! Saved-message tags, one collection per scope.
//!
//! The aggregate fingerprint of a scope is computed locally from its tags.
//! Per-tag fingerprints are kept as the server sent them; only tags first
//! seen locally derive theirs from the reaction type.

use chat_cache::{decode, Join, VersionedCache};
use chat_core::{
    saved_tags_fingerprint, Fetched, ReactionType, RemoteResult, SavedReactionTag,
    SavedReactionTags, TagScope, TopicId, Update,
};
use tracing::{debug, info, warn};

use super::actor::{forward_remote, ReactionActor};
use super::command::{Command, FetchWaiter, Reply};
use super::keys::{parse_tags_key, tags_key, TAGS_KEY_PREFIX};

#[derive(Debug, Default)]
pub(super) struct TagScopeState {
    pub(super) cache: VersionedCache<SavedReactionTags>,
    /// A local change landed while a fetch was in flight
    pub(super) dirty: bool,
    /// Titles set while a fetch was in flight, re-applied over its result
    pub(super) pending_titles: Vec<(ReactionType, String)>,
}

impl TagScopeState {
    fn hold_title(&mut self, reaction_type: &ReactionType, title: &str) {
        self.dirty = true;
        self.pending_titles.retain(|(pending, _)| pending != reaction_type);
        self.pending_titles.push((reaction_type.clone(), title.to_string()));
    }
}

impl ReactionActor {
    pub(super) async fn load_global_tags(&mut self) {
        let scope = TagScope::Global;
        let Some(tags) = self.read_record::<SavedReactionTags>(&tags_key(scope)).await else {
            return;
        };
        debug!(len = tags.len(), "Loaded global saved messages tags from store");
        let fingerprint = saved_tags_fingerprint(tags.tags());
        self.tags.entry(scope).or_default().cache.restore(tags, fingerprint);
    }

    pub(super) fn get_tags(&mut self, scope: TagScope, waiter: FetchWaiter<SavedReactionTags>) {
        if scope.is_global() && !self.tags_preload_started {
            self.tags_preload_started = true;
            self.preload_topic_tags();
        }

        let state = self.tags.entry(scope).or_default();
        if !state.cache.needs_reload() {
            let _ = waiter.send(Ok(state.cache.value().clone()));
            return;
        }
        self.reload_tags(scope, Some(waiter));
    }

    /// Read every persisted topic scope in one prefix scan
    fn preload_topic_tags(&self) {
        let store = self.ctx.store().clone();
        self.post_back(async move {
            let entries = match store.get_by_prefix(TAGS_KEY_PREFIX).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Failed to scan saved messages tags");
                    Vec::new()
                }
            };

            let scopes = entries
                .into_iter()
                .filter_map(|(key, bytes)| {
                    let scope = parse_tags_key(&key)?;
                    match decode::<SavedReactionTags>(&key, &bytes) {
                        Ok(tags) => Some((scope, tags)),
                        Err(e) => {
                            warn!(key = %key, error = %e, "Ignoring corrupt saved messages tags");
                            None
                        }
                    }
                })
                .collect();
            Command::TagsLoadedFromStore(scopes)
        });
    }

    fn reload_tags(&mut self, scope: TagScope, waiter: Option<FetchWaiter<SavedReactionTags>>) {
        match self.tag_requests.acquire_or_join(scope, waiter) {
            Join::Wait => {
                debug!(scope = %scope, "Saved messages tags reload already in flight");
            }
            Join::Initiate => {
                let state = self.tags.entry(scope).or_default();
                let fingerprint = state.cache.fingerprint();
                let remote = self.ctx.reaction_remote().clone();
                debug!(scope = %scope, fingerprint = %fingerprint, "Reloading saved messages tags");
                self.post_back(async move {
                    Command::TagsFetched {
                        scope,
                        result: remote.get_saved_tags(scope.topic(), fingerprint).await,
                    }
                });
            }
        }
    }

    pub(super) fn on_tags_fetched(
        &mut self,
        scope: TagScope,
        result: RemoteResult<Fetched<Vec<SavedReactionTag>>>,
    ) {
        let state = self.tags.entry(scope).or_default();

        let mut is_changed = false;
        let outcome = match result {
            Ok(Fetched::NotModified) => {
                state.cache.confirm();
                Ok(())
            }
            Ok(Fetched::Modified(records)) => {
                let (tags, dropped) = SavedReactionTags::from_records(records);
                if dropped > 0 {
                    warn!(scope = %scope, dropped = dropped, "Dropped invalid saved messages tags");
                }
                let fingerprint = saved_tags_fingerprint(tags.tags());
                is_changed = state.cache.reconcile(tags, fingerprint);
                Ok(())
            }
            Err(e) => {
                warn!(scope = %scope, error = %e, "Failed to reload saved messages tags");
                Err(e)
            }
        };

        let pending_titles = std::mem::take(&mut state.pending_titles);
        if outcome.is_ok() && !pending_titles.is_empty() {
            debug!(scope = %scope, titles = pending_titles.len(), "Re-applying local tag titles");
            is_changed |= state.cache.modify(
                |tags| {
                    for (reaction_type, title) in &pending_titles {
                        tags.set_title(reaction_type, title);
                    }
                },
                |tags| saved_tags_fingerprint(tags.tags()),
            );
        }
        let outcome = outcome.map(|()| state.cache.value().clone());
        let is_dirty = std::mem::take(&mut state.dirty);

        debug!(scope = %scope, changed = is_changed, "Saved messages tags reload complete");
        if is_changed {
            self.publish_tags(scope);
        }
        self.tag_requests.complete(&scope, outcome);

        if is_dirty {
            debug!(scope = %scope, "Local change raced the reload, fetching again");
            self.reload_tags(scope, None);
        }
    }

    /// Adjust counts for one message moving from `old_tags` to `new_tags`.
    ///
    /// Touches the global scope and, when given, the topic scope. Scopes
    /// that were never loaded are left alone; they get the change with their
    /// first fetch.
    pub(super) fn reconcile_local_change(
        &mut self,
        topic: Option<TopicId>,
        old_tags: &[ReactionType],
        new_tags: &[ReactionType],
    ) {
        let scopes = std::iter::once(TagScope::Global).chain(topic.map(TagScope::Topic));
        for scope in scopes {
            let in_flight = self.tag_requests.is_in_flight(&scope);
            let Some(state) = self.tags.get_mut(&scope) else {
                continue;
            };
            if in_flight {
                state.dirty = true;
            }
            if !state.cache.is_loaded() {
                continue;
            }

            let is_changed = state.cache.modify(
                |tags| {
                    tags.apply_message_change(old_tags, new_tags);
                },
                |tags| saved_tags_fingerprint(tags.tags()),
            );
            if is_changed {
                self.publish_tags(scope);
            }
        }
    }

    /// Titles exist only in the global scope
    pub(super) fn set_tag_title(&mut self, reaction_type: ReactionType, title: String, reply: Reply<()>) {
        let scope = TagScope::Global;
        if self.tag_requests.is_in_flight(&scope) {
            self.tags
                .entry(scope)
                .or_default()
                .hold_title(&reaction_type, &title);
        }
        if let Some(state) = self.tags.get_mut(&scope).filter(|state| state.cache.is_loaded()) {
            let mut is_updated = false;
            state.cache.modify(
                |tags| is_updated = tags.set_title(&reaction_type, &title),
                |tags| saved_tags_fingerprint(tags.tags()),
            );
            if !is_updated {
                debug!(reaction = %reaction_type, "Tag title unchanged");
                let _ = reply.send(Ok(()));
                return;
            }
            self.publish_tags(scope);
        }

        let remote = self.ctx.reaction_remote().clone();
        forward_remote("update_saved_tag", reply, async move {
            remote.update_saved_tag(&reaction_type, &title).await
        });
    }

    pub(super) fn on_remote_tags_changed(&mut self) {
        let scope = TagScope::Global;
        let in_flight = self.tag_requests.is_in_flight(&scope);
        let state = self.tags.entry(scope).or_default();
        state.cache.mark_stale();
        state.dirty |= in_flight;
        info!("Saved messages tags changed remotely");
        self.reload_tags(scope, None);
    }

    pub(super) fn on_tags_loaded_from_store(&mut self, scopes: Vec<(TagScope, SavedReactionTags)>) {
        let mut restored = 0usize;
        for (scope, tags) in scopes {
            if scope.is_global() {
                continue;
            }
            let state = self.tags.entry(scope).or_default();
            if state.cache.is_loaded() {
                continue;
            }
            let fingerprint = saved_tags_fingerprint(tags.tags());
            state.cache.restore(tags, fingerprint);
            restored += 1;
        }
        debug!(scopes = restored, "Restored topic saved messages tags from store");
    }

    /// Persist a scope and tell observers about it
    fn publish_tags(&self, scope: TagScope) {
        let Some(state) = self.tags.get(&scope) else {
            return;
        };
        let tags = state.cache.value();
        self.persist.save(tags_key(scope), tags);
        self.notify(Update::saved_messages_tags(scope, tags.tags().to_vec()));
    }
}
