use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{CategoryMode, Restriction};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub index: IndexConfig,
    #[serde(default)]
    pub indexers: Vec<IndexerConfig>,
}

/// The relational store the pipeline reads event records from.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

/// The search index the pipeline commits entries to.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    pub path: PathBuf,
}

/// One `[[indexers]]` entry: the full configuration of a single indexing
/// pass. Immutable for the duration of the pass.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexerConfig {
    /// Display label used in summary output.
    pub title: String,
    /// Indexer kind discriminator. Entries with a kind this indexer does not
    /// serve are declined with an empty summary.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target index partition.
    pub storagepid: i64,
    /// Container holding the detail view that committed entries link to.
    pub targetpid: i64,
    /// Container scope roots, expanded recursively.
    #[serde(default)]
    pub startingpoints_recursive: Vec<i64>,
    /// Optional single extra container appended to the resolved scope.
    #[serde(default)]
    pub sysfolder: Option<i64>,
    /// Time-window restriction on fetched events.
    #[serde(default)]
    pub event_restriction: Restriction,
    /// Whether category-based inclusion filtering applies.
    #[serde(default)]
    pub category_mode: CategoryMode,
    /// Category uids an event must intersect in `restrict` mode.
    #[serde(default)]
    pub category_selection: Vec<i64>,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_indexer_entry() {
        let config: Config = toml::from_str(
            r#"
            [store]
            path = "./data/events.sqlite"

            [index]
            path = "./data/index.sqlite"

            [[indexers]]
            title = "Community events"
            type = "sfeventmgt"
            storagepid = 1
            targetpid = 44
            startingpoints_recursive = [12, 13]
            sysfolder = 87
            event_restriction = "past-only"
            category_mode = "restrict"
            category_selection = [7, 9]
            "#,
        )
        .unwrap();

        let entry = &config.indexers[0];
        assert_eq!(entry.kind, "sfeventmgt");
        assert_eq!(entry.startingpoints_recursive, vec![12, 13]);
        assert_eq!(entry.sysfolder, Some(87));
        assert_eq!(entry.event_restriction, Restriction::PastOnly);
        assert_eq!(entry.category_mode, CategoryMode::Restrict);
        assert_eq!(entry.category_selection, vec![7, 9]);
    }

    #[test]
    fn test_optional_knobs_default() {
        let config: Config = toml::from_str(
            r#"
            [store]
            path = "./data/events.sqlite"

            [index]
            path = "./data/index.sqlite"

            [[indexers]]
            title = "Minimal"
            type = "sfeventmgt"
            storagepid = 1
            targetpid = 44
            "#,
        )
        .unwrap();

        let entry = &config.indexers[0];
        assert!(entry.startingpoints_recursive.is_empty());
        assert_eq!(entry.sysfolder, None);
        assert_eq!(entry.event_restriction, Restriction::None);
        assert_eq!(entry.category_mode, CategoryMode::Ignore);
        assert!(entry.category_selection.is_empty());
    }
}
