use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::listings::checkout::{
    CheckoutError, CheckoutRequest, CheckoutSession, PaymentGateway,
};
use crate::listings::domain::{JobDraft, LifecycleState, Listing, Submission, SubmissionId};
use crate::listings::pipeline::BoardService;
use crate::listings::repository::{
    BoardRepository, RefundError, RefundIntent, RefundPublisher, RepositoryError,
};
use crate::metro::{Metro, MetroDirectory};

pub(super) fn portland() -> Metro {
    Metro {
        slug: "portland-or".to_string(),
        city: "Portland".to_string(),
        state: "OR".to_string(),
        title: "Portland Coffee Jobs".to_string(),
    }
}

pub(super) fn metros() -> MetroDirectory {
    MetroDirectory::new([portland()])
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        cafe_name: "Blue Door".to_string(),
        role: "Barista".to_string(),
        pay: "$18/hr".to_string(),
        apply_email: "hr@bluedoor.com".to_string(),
        ..JobDraft::default()
    }
}

pub(super) fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn listing(id: &str, pinned: bool, pinned_until: Option<&str>, created_at: &str) -> Listing {
    Listing {
        id: SubmissionId(id.to_string()),
        metro_slug: "portland-or".to_string(),
        cafe_name: "Blue Door".to_string(),
        role: "Barista".to_string(),
        pay: "$18/hr".to_string(),
        hours: None,
        neighborhood: None,
        apply_url: None,
        apply_email: Some("hr@bluedoor.com".to_string()),
        description: None,
        pinned,
        pinned_until: pinned_until.map(str::to_string),
        created_at: created_at.to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    submissions: Mutex<HashMap<SubmissionId, Submission>>,
    listings: Mutex<Vec<Listing>>,
}

impl BoardRepository for MemoryRepository {
    fn insert_submission(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.submissions.lock().expect("lock");
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
        let mut guard = self.submissions.lock().expect("lock");
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
        let guard = self.submissions.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn pending_review(&self) -> Result<Vec<Submission>, RepositoryError> {
        let guard = self.submissions.lock().expect("lock");
        Ok(guard
            .values()
            .filter(|submission| submission.lifecycle == LifecycleState::PendingReview)
            .cloned()
            .collect())
    }

    fn insert_listing(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.listings.lock().expect("lock");
        if guard.iter().any(|existing| existing.id == listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(listing.clone());
        Ok(listing)
    }

    fn listings_for_metro(&self, metro_slug: &str) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("lock");
        Ok(guard
            .iter()
            .filter(|listing| listing.metro_slug == metro_slug)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryRefunds {
    events: Mutex<Vec<RefundIntent>>,
}

impl MemoryRefunds {
    pub(super) fn events(&self) -> Vec<RefundIntent> {
        self.events.lock().expect("lock").clone()
    }
}

impl RefundPublisher for MemoryRefunds {
    fn publish(&self, intent: RefundIntent) -> Result<(), RefundError> {
        self.events.lock().expect("lock").push(intent);
        Ok(())
    }
}

/// Gateway that hands back a canned redirect and records what it was asked.
#[derive(Default)]
pub(super) struct StubGateway {
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl StubGateway {
    pub(super) fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl PaymentGateway for StubGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        self.requests.lock().expect("lock").push(request);
        Ok(CheckoutSession {
            url: "https://checkout.example.test/s/stub".to_string(),
        })
    }
}

pub(super) type TestService = BoardService<MemoryRepository, StubGateway, MemoryRefunds>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryRepository>,
    Arc<StubGateway>,
    Arc<MemoryRefunds>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let payments = Arc::new(StubGateway::default());
    let refunds = Arc::new(MemoryRefunds::default());
    let service = Arc::new(BoardService::new(
        metros(),
        repository.clone(),
        payments.clone(),
        refunds.clone(),
    ));
    (service, repository, payments, refunds)
}
