//! Core data models used throughout the indexing pipeline.
//!
//! These types represent the event records read from the relational store and
//! the metadata that accompanies each committed index entry.

use serde::Deserialize;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A row from the event store. Read-only input to the pipeline.
///
/// `start_date`/`end_date` are the event's own schedule and drive the
/// time-window restriction; `visible_from`/`visible_until` are the record's
/// visibility window and become the index entry's validity window.
#[derive(Debug, Clone, FromRow)]
pub struct EventRecord {
    pub uid: i64,
    pub pid: i64,
    pub title: String,
    pub teaser: String,
    pub description: String,
    pub program: String,
    pub created_at: i64,
    pub start_date: i64,
    pub end_date: i64,
    pub visible_from: i64,
    pub visible_until: i64,
    pub access_groups: String,
    pub language: i64,
}

/// Time-window restriction applied when fetching candidate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Restriction {
    /// No additional predicate.
    #[default]
    None,
    /// Only events whose start date is at or after the current time.
    FutureOnly,
    /// Only events whose end date is before the current time.
    PastOnly,
}

/// Controls whether category-based inclusion filtering is applied at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryMode {
    /// Every fetched event is indexed.
    #[default]
    Ignore,
    /// Only events sharing at least one category with the configured
    /// selection are indexed.
    Restrict,
}

/// Link parameters for the detail view of an indexed event, as an
/// action/controller/event-id triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParams {
    pub action: &'static str,
    pub controller: &'static str,
    pub event: i64,
}

impl LinkParams {
    /// The detail-view triple for one event.
    pub fn detail(event_uid: i64) -> Self {
        Self {
            action: "detail",
            controller: "Event",
            event: event_uid,
        }
    }

    /// Serialized query-string form stored with the index entry.
    pub fn to_query(&self) -> String {
        format!(
            "action={}&controller={}&event={}",
            self.action, self.controller, self.event
        )
    }
}

/// Open map of extra indexed fields.
///
/// Seeded with `sortdate`, `orig_uid` and `orig_pid` before hooks run; hooks
/// may add or overwrite entries. A `BTreeMap` keeps the serialized form
/// stable across runs.
pub type AdditionalFields = BTreeMap<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_params_query_form() {
        let params = LinkParams::detail(42);
        assert_eq!(params.to_query(), "action=detail&controller=Event&event=42");
    }

    #[test]
    fn test_enums_parse_from_config_literals() {
        #[derive(Deserialize)]
        struct Probe {
            restriction: Restriction,
            mode: CategoryMode,
        }

        let probe: Probe =
            toml::from_str("restriction = \"future-only\"\nmode = \"restrict\"").unwrap();
        assert_eq!(probe.restriction, Restriction::FutureOnly);
        assert_eq!(probe.mode, CategoryMode::Restrict);
    }
}
