//! Reaction catalog: the global list of reaction definitions.

use std::collections::HashSet;

use chat_cache::{Join, VersionedCache};
use chat_core::{
    CatalogSnapshot, DomainError, Fetched, ReactionDefinition, ReactionListKind, ReactionType,
    RemoteError, RemoteResult, Update,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::actor::ReactionActor;
use super::command::{Command, FetchWaiter, Reply};
use super::keys::{StoredCatalog, CATALOG_KEY};
use super::picker::{sort_available_reactions, PickerRequest, PickerSources};
use crate::dto::AvailableReactions;
use crate::services::error::ServiceError;

/// Catalog cache plus the derived active-reaction index
#[derive(Debug, Default)]
pub(super) struct ReactionCatalog {
    pub(super) cache: VersionedCache<Vec<ReactionDefinition>>,
    active: Vec<ReactionType>,
    active_index: HashSet<ReactionType>,
    saved_at: Option<DateTime<Utc>>,
}

impl ReactionCatalog {
    /// False until the catalog has loaded at least once
    pub(super) fn is_active(&self, reaction_type: &ReactionType) -> bool {
        self.active_index.contains(reaction_type)
    }

    /// Active reactions in catalog order
    pub(super) fn active(&self) -> &[ReactionType] {
        &self.active
    }

    pub(super) fn find(&self, reaction_type: &ReactionType) -> Option<&ReactionDefinition> {
        self.cache
            .value()
            .iter()
            .find(|definition| definition.reaction_type == *reaction_type)
    }

    pub(super) fn find_emoji(&self, emoji: &str) -> Option<&ReactionDefinition> {
        self.cache
            .value()
            .iter()
            .find(|definition| matches!(&definition.reaction_type, ReactionType::Emoji(e) if e == emoji))
    }

    /// Whether the persisted copy is older than `max_age`
    pub(super) fn is_older_than(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.saved_at.map_or(true, |saved_at| now - saved_at > max_age)
    }

    /// Recompute the active subset; returns whether it changed
    fn rebuild_active(&mut self) -> bool {
        let mut active_index = HashSet::new();
        let active: Vec<ReactionType> = self
            .cache
            .value()
            .iter()
            .filter(|definition| definition.is_active)
            .filter(|definition| active_index.insert(definition.reaction_type.clone()))
            .map(|definition| definition.reaction_type.clone())
            .collect();

        let is_changed = active != self.active;
        self.active = active;
        self.active_index = active_index;
        is_changed
    }
}

impl ReactionActor {
    pub(super) async fn load_catalog(&mut self) {
        let Some(stored) = self.read_record::<StoredCatalog>(CATALOG_KEY).await else {
            debug!("No persisted reaction catalog");
            return;
        };

        let reactions = valid_definitions(stored.reactions);
        debug!(reactions = reactions.len(), saved_at = %stored.saved_at, "Loaded reaction catalog from store");
        self.catalog.cache.restore(reactions, stored.fingerprint);
        self.catalog.saved_at = Some(stored.saved_at);
        self.catalog.rebuild_active();

        if stored.fingerprint.is_empty() || self.catalog.is_older_than(self.catalog_max_age(), Utc::now()) {
            debug!("Persisted reaction catalog is stale");
            self.catalog.cache.mark_stale();
        }
    }

    /// Join or start the single outstanding catalog fetch
    pub(super) fn reload_catalog(&mut self, waiter: Option<FetchWaiter<()>>) {
        match self.catalog_requests.acquire_or_join((), waiter) {
            Join::Wait => {
                debug!(
                    waiters = self.catalog_requests.waiter_count(&()),
                    "Catalog reload already in flight"
                );
            }
            Join::Initiate => {
                let fingerprint = self.catalog.cache.fingerprint();
                let remote = self.ctx.reaction_remote().clone();
                debug!(fingerprint = %fingerprint, "Reloading reaction catalog");
                self.post_back(async move {
                    Command::CatalogFetched(remote.get_available_reactions(fingerprint).await)
                });
            }
        }
    }

    pub(super) fn on_catalog_fetched(&mut self, result: RemoteResult<Fetched<CatalogSnapshot>>) {
        let outcome = match result {
            Ok(Fetched::NotModified) => {
                debug!("Reaction catalog not modified");
                self.catalog.cache.confirm();
                self.refresh_catalog_age();
                Ok(())
            }
            Ok(Fetched::Modified(snapshot)) => {
                self.apply_catalog(snapshot);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to reload reaction catalog");
                Err(e)
            }
        };

        let delivered = self.catalog_requests.complete(&(), outcome.clone());
        debug!(waiters = delivered, "Catalog reload complete");
        self.answer_emoji_queries(outcome.err());
    }

    fn apply_catalog(&mut self, snapshot: CatalogSnapshot) {
        let reactions = valid_definitions(snapshot.reactions);
        if !self.catalog.cache.reconcile(reactions, snapshot.fingerprint) {
            debug!(fingerprint = %snapshot.fingerprint, "Reaction catalog unchanged");
            self.refresh_catalog_age();
            return;
        }

        self.persist_catalog();

        info!(
            reactions = self.catalog.cache.value().len(),
            fingerprint = %snapshot.fingerprint,
            "Reaction catalog updated"
        );
        if self.catalog.rebuild_active() {
            self.notify(Update::active_reactions(self.catalog.active().to_vec()));
        }
    }

    fn catalog_max_age(&self) -> Duration {
        i64::try_from(self.ctx.settings().catalog_max_age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    /// Re-stamp a persisted catalog that the remote just confirmed, so it is
    /// not considered stale again on the next start. Observers are not told.
    fn refresh_catalog_age(&mut self) {
        if self.catalog.saved_at.is_none()
            || !self.catalog.is_older_than(self.catalog_max_age(), Utc::now())
        {
            return;
        }
        debug!("Persisted reaction catalog confirmed, refreshing its age");
        self.persist_catalog();
    }

    fn persist_catalog(&mut self) {
        let saved_at = Utc::now();
        self.catalog.saved_at = Some(saved_at);
        self.persist.save(
            CATALOG_KEY,
            &StoredCatalog {
                reactions: self.catalog.cache.value().clone(),
                fingerprint: self.catalog.cache.fingerprint(),
                saved_at,
            },
        );
    }

    pub(super) fn get_emoji_reaction(&mut self, emoji: String, reply: Reply<ReactionDefinition>) {
        if self.catalog.cache.is_loaded() {
            let _ = reply.send(self.lookup_emoji(emoji));
            return;
        }
        debug!(emoji = %emoji, "Catalog not loaded, parking emoji query");
        self.emoji_queries.push((emoji, reply));
        self.reload_catalog(None);
    }

    fn answer_emoji_queries(&mut self, error: Option<RemoteError>) {
        for (emoji, reply) in std::mem::take(&mut self.emoji_queries) {
            let result = match &error {
                Some(e) => Err(ServiceError::Remote(e.clone())),
                None => self.lookup_emoji(emoji),
            };
            let _ = reply.send(result);
        }
    }

    fn lookup_emoji(&self, emoji: String) -> Result<ReactionDefinition, ServiceError> {
        self.catalog
            .find_emoji(&emoji)
            .cloned()
            .ok_or_else(|| DomainError::ReactionNotFound(emoji).into())
    }

    pub(super) fn available_reactions(&self, row_size: i32) -> AvailableReactions {
        self.sorted_available_reactions(&PickerRequest::all_reactions(row_size))
    }

    pub(super) fn sorted_available_reactions(&self, request: &PickerRequest) -> AvailableReactions {
        let top_kind = if request.is_tag {
            ReactionListKind::DefaultTag
        } else {
            ReactionListKind::Top
        };
        let sources = PickerSources {
            catalog_active: self.catalog.active(),
            top: self.list_value(top_kind),
            recent: self.list_value(ReactionListKind::Recent),
            is_premium: self.ctx.directory().is_premium(),
        };
        sort_available_reactions(&sources, request)
    }
}

fn valid_definitions(reactions: Vec<ReactionDefinition>) -> Vec<ReactionDefinition> {
    let total = reactions.len();
    let valid: Vec<ReactionDefinition> = reactions
        .into_iter()
        .filter(ReactionDefinition::is_valid)
        .collect();
    if valid.len() < total {
        warn!(dropped = total - valid.len(), "Dropped invalid reaction definitions");
    }
    valid
}
