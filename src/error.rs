//! Pass-level error taxonomy.
//!
//! Only two conditions are recovered into normal summary strings by the
//! orchestrator (a kind mismatch and an empty resolved scope). Everything in
//! [`IndexError`] is fatal to the running pass: the loop stops, no summary is
//! produced, and the caller's scheduler is expected to log and retry on the
//! next run. Entries committed before the failure stay committed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    /// The pipeline was invoked with unusable configuration, e.g. an empty
    /// container list reaching the fetch step.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A query against the relational store failed.
    #[error("store query failed")]
    StoreQuery(#[from] sqlx::Error),

    /// A single index write failed. No rollback of earlier writes.
    #[error("index write failed")]
    IndexWrite(#[source] anyhow::Error),

    /// An extension hook returned an error.
    #[error("hook '{hook}' failed")]
    Hook {
        hook: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T, E = IndexError> = std::result::Result<T, E>;
