//! Category-based inclusion filtering.

use tracing::debug;

use crate::config::IndexerConfig;
use crate::error::Result;
use crate::models::CategoryMode;
use crate::store::RecordStore;

/// Returns whether `event_uid` passes the indexer's category restriction.
///
/// `ignore` mode always passes, whatever the selection contains. `restrict`
/// mode with an empty selection always fails: an administrator who switched
/// restriction on but selected nothing almost certainly did not intend to
/// index everything, so the filter fails closed instead of erroring or
/// falling back to `ignore`. This is intentional and pinned by tests; do not
/// "fix" it. Otherwise the event passes iff its assigned categories
/// intersect the configured selection.
pub async fn category_passes(
    store: &dyn RecordStore,
    event_uid: i64,
    config: &IndexerConfig,
) -> Result<bool> {
    if config.category_mode == CategoryMode::Ignore {
        return Ok(true);
    }

    if config.category_selection.is_empty() {
        debug!(event_uid, "restrict mode with empty selection, failing closed");
        return Ok(false);
    }

    let assigned = store.event_category_uids(event_uid).await?;
    Ok(assigned
        .iter()
        .any(|uid| config.category_selection.contains(uid)))
}
