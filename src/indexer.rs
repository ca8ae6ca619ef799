//! The indexing pass orchestrator.
//!
//! Composes scope resolution, fetching, category filtering, content shaping
//! and index writes into one pass per indexer configuration, and renders the
//! human-readable summary for it.

use chrono::Utc;
use tracing::info;

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::filter;
use crate::hooks::HookRegistry;
use crate::index::SearchIndex;
use crate::scope;
use crate::store::RecordStore;
use crate::transform;
use crate::writer;

/// Drives one indexing pass per [`run`](EventIndexer::run) call.
///
/// Stateless across runs: every call resolves scope, fetches, filters,
/// transforms and writes from scratch. Concurrent passes for different
/// configurations share nothing but the store and the index themselves.
pub struct EventIndexer<'a> {
    store: &'a dyn RecordStore,
    index: &'a dyn SearchIndex,
    hooks: &'a HookRegistry,
}

impl<'a> EventIndexer<'a> {
    /// Kind discriminator this indexer serves. Configurations addressed to
    /// any other kind are declined with an empty summary.
    pub const KIND: &'static str = "sfeventmgt";

    pub fn new(
        store: &'a dyn RecordStore,
        index: &'a dyn SearchIndex,
        hooks: &'a HookRegistry,
    ) -> Self {
        Self {
            store,
            index,
            hooks,
        }
    }

    /// Runs one pass for `config` and returns its summary string.
    ///
    /// Three summary forms exist: an empty string when the configuration is
    /// addressed to a different indexer kind, a failure sentence when the
    /// resolved container scope is empty, and the indexed-count sentence
    /// otherwise — including the zero-candidate case, which reports
    /// `0 Elements`.
    pub async fn run(&self, config: &IndexerConfig) -> Result<String> {
        if config.kind != Self::KIND {
            return Ok(String::new());
        }

        let scope = scope::resolve_scope(
            self.store,
            &config.startingpoints_recursive,
            config.sysfolder,
        )
        .await?;
        if scope.is_empty() {
            return Ok(format!(
                "Event indexer \"{}\" failed: no storage containers configured.",
                config.title
            ));
        }

        // One notion of "now" per pass; the restriction predicate must not
        // drift while the loop runs.
        let now = Utc::now().timestamp();
        let events = self
            .store
            .select_events(&scope, config.event_restriction, now)
            .await?;

        let mut indexed = 0u64;
        for event in &events {
            if !filter::category_passes(self.store, event.uid, config).await? {
                continue;
            }

            let content = transform::transform_event(event, self.hooks)?;
            writer::write_event(self.store, self.index, config, event, &content).await?;
            indexed += 1;
        }

        info!(
            title = %config.title,
            candidates = events.len(),
            indexed,
            "indexing pass complete"
        );

        Ok(format!(
            "Event indexer \"{}\": {} Elements have been indexed.",
            config.title, indexed
        ))
    }
}
