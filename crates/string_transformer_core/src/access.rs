//! crates/string_transformer_core/src/access.rs
//!
//! The one-time-access state machine: pattern resolution, the submission
//! path, the view path, and the admin reaccess toggle. Everything here is a
//! read-then-write against the storage port; the controller itself holds no
//! state between calls.

use std::sync::Arc;

use crate::domain::StringEntry;
use crate::ports::{PortResult, StorageService};

//=========================================================================================
// Outcome Types
//=========================================================================================

/// The result of submitting a raw input string.
///
/// `NoMatch` and `AlreadyAccessed` are ordinary outcomes, not errors. The
/// web surface renders them identically; callers that need to tell them
/// apart (logging, tests) still can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A viewable entry exists; redirect the client to the view step.
    Created { entry_id: i64 },
    /// No pattern matches the input. No entry is created.
    NoMatch,
    /// This (IP, input) pair has already seen its reveal and no reaccess
    /// grant is active.
    AlreadyAccessed,
}

/// The result of viewing an entry by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The one permitted disclosure of the transformed value.
    Revealed {
        input_string: String,
        transformed_string: String,
    },
    /// The entry was already revealed and no grant is active.
    Locked,
    NotFound,
}

//=========================================================================================
// Access Controller
//=========================================================================================

/// Orchestrates the one-time-reveal protocol over the storage port.
#[derive(Clone)]
pub struct AccessController {
    db: Arc<dyn StorageService>,
}

impl AccessController {
    pub fn new(db: Arc<dyn StorageService>) -> Self {
        Self { db }
    }

    /// Looks up the transformation for a raw input. Matching is exact on the
    /// lowercased input; there is no partial or fuzzy matching. Side-effect
    /// free.
    pub async fn resolve(&self, raw_input: &str) -> PortResult<Option<String>> {
        let normalized = raw_input.to_lowercase();
        let pair = self.db.find_pair_by_input(&normalized).await?;
        Ok(pair.map(|p| p.output_pattern))
    }

    /// The submission path.
    ///
    /// A matching pattern is required before anything is written. If this
    /// (IP, input) pair already has a revealed entry, the submission is
    /// refused unless an admin granted reaccess; the grant is consumed here,
    /// at submission time, by resetting the existing entry in place. The
    /// transformed value is never returned from this step.
    pub async fn submit(&self, raw_input: &str, client_ip: &str) -> PortResult<SubmitOutcome> {
        let normalized = raw_input.to_lowercase();

        // 1. Resolve the pattern. No match means no entry is created.
        let transformed = match self.resolve(raw_input).await? {
            Some(t) => t,
            None => return Ok(SubmitOutcome::NoMatch),
        };

        // 2. Has this IP already seen this pattern?
        let existing = self.db.find_accessed_entry(client_ip, &normalized).await?;

        match existing {
            Some(entry) if !entry.reaccessible => Ok(SubmitOutcome::AlreadyAccessed),
            Some(entry) => {
                // 3. Consume the reaccess grant: clear both flags and reuse
                // the entry's identity as the view token. The conditional
                // update can lose against a concurrent submission that
                // already consumed the grant; the entry is then fresh again
                // either way, so the id stays valid.
                self.db.reset_entry_for_reaccess(entry.id).await?;
                Ok(SubmitOutcome::Created { entry_id: entry.id })
            }
            None => {
                // 4. First submission for this (IP, input): record it.
                let entry = self
                    .db
                    .create_entry(&normalized, &transformed, client_ip)
                    .await?;
                Ok(SubmitOutcome::Created { entry_id: entry.id })
            }
        }
    }

    /// The view path: the sole place the transformed value is disclosed.
    ///
    /// The reveal transition is a compare-and-set at the store; of N
    /// concurrent views on the same fresh entry exactly one claims the row
    /// and the rest observe `Locked`.
    pub async fn view(&self, entry_id: i64) -> PortResult<ViewOutcome> {
        let entry = match self.db.find_entry(entry_id).await? {
            Some(e) => e,
            None => return Ok(ViewOutcome::NotFound),
        };

        if !self.db.mark_entry_accessed(entry_id).await? {
            return Ok(ViewOutcome::Locked);
        }

        Ok(ViewOutcome::Revealed {
            input_string: entry.input_string,
            transformed_string: entry.transformed_string,
        })
    }

    /// Admin toggle of the reaccess grant.
    ///
    /// Turning the grant on also resets `accessed`, so the next submission
    /// or view proceeds. Turning it off when it is already off writes the
    /// same flags back, leaving the entry unchanged. Returns the entry's new
    /// grant state, or `None` when the id is unknown.
    pub async fn toggle_reaccess(&self, entry_id: i64) -> PortResult<Option<bool>> {
        let entry = match self.db.find_entry(entry_id).await? {
            Some(e) => e,
            None => return Ok(None),
        };

        let enable = !entry.reaccessible;
        let accessed = if enable { false } else { entry.accessed };
        self.db
            .set_entry_reaccess(entry_id, enable, accessed)
            .await?;
        Ok(Some(enable))
    }

    /// Snapshot of an entry, for callers that need the flags (dashboard,
    /// logging) rather than a reveal.
    pub async fn find_entry(&self, entry_id: i64) -> PortResult<Option<StringEntry>> {
        self.db.find_entry(entry_id).await
    }
}

//=========================================================================================
// Tests
//=========================================================================================
