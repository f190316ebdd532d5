use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use coffeeboard::listings::{
    BoardRepository, LifecycleState, Listing, RefundError, RefundIntent, RefundPublisher,
    RepositoryError, Submission, SubmissionId,
};
use coffeeboard::metro::{Metro, MetroDirectory};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The metros the board is live in. New regions are added here without
/// touching the core.
pub(crate) fn default_metros() -> MetroDirectory {
    MetroDirectory::new([Metro {
        slug: "portland-or".to_string(),
        city: "Portland".to_string(),
        state: "OR".to_string(),
        title: "Portland Coffee Jobs".to_string(),
    }])
}

/// In-memory stand-in for the hosted row store. Submission updates take the
/// whole map lock, which makes the compare-and-swap on lifecycle state
/// genuinely atomic per record.
#[derive(Default)]
pub(crate) struct InMemoryBoardRepository {
    submissions: Mutex<HashMap<SubmissionId, Submission>>,
    listings: Mutex<Vec<Listing>>,
}

impl BoardRepository for InMemoryBoardRepository {
    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.submissions.lock().expect("repository mutex poisoned");
        if guard.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn update_submission(
        &self,
        submission: Submission,
        expected: LifecycleState,
    ) -> Result<Submission, RepositoryError> {
        let mut guard = self.submissions.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&submission.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.lifecycle != expected {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn fetch_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<Submission>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending_review(&self) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.submissions.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|submission| submission.lifecycle == LifecycleState::PendingReview)
            .cloned()
            .collect())
    }

    fn insert_listing(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.listings.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(listing.clone());
        Ok(listing)
    }

    fn listings_for_metro(&self, metro_slug: &str) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|listing| listing.metro_slug == metro_slug)
            .cloned()
            .collect())
    }
}

/// Collects refund obligations so an operator (or a future worker hook) can
/// drain them; execution stays with the payment collaborator.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRefundPublisher {
    events: Arc<Mutex<Vec<RefundIntent>>>,
}

impl RefundPublisher for InMemoryRefundPublisher {
    fn publish(&self, intent: RefundIntent) -> Result<(), RefundError> {
        let mut guard = self.events.lock().expect("refund mutex poisoned");
        tracing::info!(submission = %intent.submission_id, "refund obligation recorded");
        guard.push(intent);
        Ok(())
    }
}

impl InMemoryRefundPublisher {
    pub(crate) fn events(&self) -> Vec<RefundIntent> {
        self.events.lock().expect("refund mutex poisoned").clone()
    }
}
