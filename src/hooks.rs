//! Extension hooks for customizing indexed content.
//!
//! Host systems embedding the indexer can implement [`AdditionalFieldsHook`]
//! and [`IndexContentHook`] to reshape what gets committed for each event,
//! and collect them in a [`HookRegistry`] injected into the pipeline. Hooks
//! run in registration order and mutate their arguments in place. An empty
//! registry is the default, no-op case.
//!
//! A hook that returns an error aborts the entire pass; the failure reaches
//! the caller instead of a summary string.
//!
//! # Example
//!
//! ```rust
//! use anyhow::Result;
//! use serde_json::json;
//! use event_indexer::hooks::{AdditionalFieldsHook, HookRegistry};
//! use event_indexer::models::{AdditionalFields, EventRecord};
//!
//! /// Indexes the event's own schedule alongside the standard fields.
//! struct ScheduleFields;
//!
//! impl AdditionalFieldsHook for ScheduleFields {
//!     fn name(&self) -> &str {
//!         "schedule_fields"
//!     }
//!
//!     fn modify(&self, fields: &mut AdditionalFields, event: &EventRecord) -> Result<()> {
//!         fields.insert("startdate".to_string(), json!(event.start_date));
//!         fields.insert("enddate".to_string(), json!(event.end_date));
//!         Ok(())
//!     }
//! }
//!
//! let mut hooks = HookRegistry::new();
//! hooks.register_additional_fields(Box::new(ScheduleFields));
//! ```

use anyhow::Result;

use crate::models::{AdditionalFields, EventRecord};

/// Rewrites or extends the additional-field map of an entry before it is
/// committed.
///
/// Called once per indexed event, after the map has been seeded with
/// `sortdate`, `orig_uid` and `orig_pid`.
pub trait AdditionalFieldsHook: Send + Sync {
    /// Name used in diagnostics and error reporting.
    fn name(&self) -> &str;

    /// Mutate `fields` in place for `event`.
    fn modify(&self, fields: &mut AdditionalFields, event: &EventRecord) -> Result<()>;
}

/// Rewrites the title, body and teaser of an entry before it is committed.
///
/// Called once per indexed event, after markup stripping and after all
/// [`AdditionalFieldsHook`]s have run.
pub trait IndexContentHook: Send + Sync {
    /// Name used in diagnostics and error reporting.
    fn name(&self) -> &str;

    /// Mutate any of the three content strings in place for `event`.
    fn modify(
        &self,
        title: &mut String,
        body: &mut String,
        teaser: &mut String,
        event: &EventRecord,
    ) -> Result<()>;
}

/// Ordered collection of registered hooks, injected into the pipeline.
pub struct HookRegistry {
    additional_fields: Vec<Box<dyn AdditionalFieldsHook>>,
    index_content: Vec<Box<dyn IndexContentHook>>,
}

impl HookRegistry {
    /// Create an empty registry (the no-op default).
    pub fn new() -> Self {
        Self {
            additional_fields: Vec::new(),
            index_content: Vec::new(),
        }
    }

    /// Register an additional-fields hook. Invocation order is registration
    /// order.
    pub fn register_additional_fields(&mut self, hook: Box<dyn AdditionalFieldsHook>) {
        self.additional_fields.push(hook);
    }

    /// Register an index-content hook. Invocation order is registration
    /// order.
    pub fn register_index_content(&mut self, hook: Box<dyn IndexContentHook>) {
        self.index_content.push(hook);
    }

    /// Registered additional-fields hooks, in invocation order.
    pub fn additional_fields(&self) -> &[Box<dyn AdditionalFieldsHook>] {
        &self.additional_fields
    }

    /// Registered index-content hooks, in invocation order.
    pub fn index_content(&self) -> &[Box<dyn IndexContentHook>] {
        &self.index_content
    }

    /// True when no hook of either kind is registered.
    pub fn is_empty(&self) -> bool {
        self.additional_fields.is_empty() && self.index_content.is_empty()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
