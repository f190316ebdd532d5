use serde::{Deserialize, Serialize};

use super::domain::{LifecycleState, Listing, Submission, SubmissionId};

/// Storage abstraction over the submission and listing stores. The core only
/// needs filter-by-metro and insert/update-record capabilities; the hosted
/// row store stays behind an implementation of this trait.
pub trait BoardRepository: Send + Sync {
    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError>;

    /// Persist `submission` only if the stored record is still in
    /// `expected`. Concurrent decisions on one submission serialize through
    /// this compare-and-swap: the loser gets [`RepositoryError::Conflict`].
    fn update_submission(
        &self,
        submission: Submission,
        expected: LifecycleState,
    ) -> Result<Submission, RepositoryError>;

    fn fetch_submission(&self, id: &SubmissionId)
        -> Result<Option<Submission>, RepositoryError>;

    /// The queue an operator examines.
    fn pending_review(&self) -> Result<Vec<Submission>, RepositoryError>;

    fn insert_listing(&self, listing: Listing) -> Result<Listing, RepositoryError>;

    fn listings_for_metro(&self, metro_slug: &str) -> Result<Vec<Listing>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists or was decided concurrently")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook signalling that a rejected submission must be refunded.
/// Refund execution itself belongs to the payment collaborator; the core
/// only raises the obligation.
pub trait RefundPublisher: Send + Sync {
    fn publish(&self, intent: RefundIntent) -> Result<(), RefundError>;
}

/// Refund obligation payload, kept small enough for a webhook or queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundIntent {
    pub submission_id: SubmissionId,
    pub metro_slug: String,
    pub reason: String,
}

/// Refund dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum RefundError {
    #[error("refund transport unavailable: {0}")]
    Transport(String),
}
