//! Submission service
//!
//! The validate-then-persist seam between the HTTP surface and the store.
//! A submission has exactly two states: not yet created, and created and
//! immutable.

use tracing::info;

use crate::error::VigilError;
use crate::store::SubmissionStore;
use crate::submission::{NewSubmission, Submission};

/// Accepts validated payloads, persists them, and lists stored records.
#[derive(Debug, Clone)]
pub struct SubmissionService {
    store: SubmissionStore,
}

impl SubmissionService {
    pub fn new(store: SubmissionStore) -> Self {
        Self { store }
    }

    /// Validate and persist a payload; returns the stored record with its
    /// server-assigned id and creation timestamp.
    pub async fn create(&self, payload: NewSubmission) -> Result<Submission, VigilError> {
        payload.validate()?;
        let stored = self.store.create(&payload).await?;
        info!(
            id = stored.id,
            risk_score = stored.risk_score,
            "submission created"
        );
        Ok(stored)
    }

    /// Parse a raw JSON body, validate it field by field, and persist it.
    pub async fn create_from_json(&self, body: &[u8]) -> Result<Submission, VigilError> {
        let payload = NewSubmission::from_json(body)?;
        self.store.create(&payload).await
    }

    /// All stored submissions, ascending by creation time.
    pub async fn list(&self) -> Result<Vec<Submission>, VigilError> {
        self.store.list().await
    }
}
