//! Commits one transformed event to the search index.

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::index::SearchIndex;
use crate::models::{EventRecord, LinkParams};
use crate::store::RecordStore;
use crate::transform::IndexContent;

/// Content-type tag attached to every committed event entry.
pub const CONTENT_TYPE: &str = "sfeventmgt";

/// Facet tag present on every event entry.
pub const EVENT_TAG: &str = "#event#";

/// Facet tag for one assigned category.
pub fn category_tag(category_uid: i64) -> String {
    format!("#category_{category_uid}#")
}

/// Writes one event into the index under the pass's partition and target
/// container.
///
/// Facet tags always start with [`EVENT_TAG`] followed by one tag per
/// category actually assigned to the event — mirroring the record, not the
/// filter: tags are never filtered, only inclusion is. Writes are never
/// marked debug-only.
pub async fn write_event(
    store: &dyn RecordStore,
    index: &dyn SearchIndex,
    config: &IndexerConfig,
    event: &EventRecord,
    content: &IndexContent,
) -> Result<()> {
    let mut tags = vec![EVENT_TAG.to_string()];
    for category_uid in store.event_category_uids(event.uid).await? {
        tags.push(category_tag(category_uid));
    }

    let link_params = LinkParams::detail(event.uid).to_query();

    index
        .store_document(
            config.storagepid,
            &content.title,
            CONTENT_TYPE,
            config.targetpid,
            &content.body,
            &tags.join(","),
            &link_params,
            &content.teaser,
            event.language,
            event.visible_from,
            event.visible_until,
            &event.access_groups,
            false,
            &content.additional,
        )
        .await
}
