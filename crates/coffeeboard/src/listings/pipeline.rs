use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::metro::MetroDirectory;

use super::checkout::{CheckoutError, CheckoutRequest, CheckoutSession, PaymentGateway};
use super::domain::{
    JobDraft, LifecycleState, Listing, Submission, SubmissionId, SubmissionStatusView,
};
use super::intake::{DraftIntake, ValidationError};
use super::rank::rank;
use super::repository::{
    BoardRepository, RefundError, RefundIntent, RefundPublisher, RepositoryError,
};

/// Errors surfaced at the operator boundary when a transition is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot transition submission from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
    #[error("payment confirmation for unknown submission {0}")]
    OrphanPaymentConfirmation(SubmissionId),
    #[error("a rejection requires a non-empty reason")]
    MissingRejectionReason,
}

impl LifecycleState {
    /// The explicit transition table. Everything not listed here is refused;
    /// terminal states appear on no left-hand side.
    pub fn allows(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Submitted, Paid)
                | (Paid, PendingReview)
                | (PendingReview, Approved)
                | (PendingReview, Rejected)
                | (Approved, Published)
                | (Rejected, Refunded)
        )
    }
}

/// Operational dials owned by the moderation side.
#[derive(Debug, Clone)]
pub struct BoardPolicy {
    /// How long an approved pin request holds its slot.
    pub pin_days: i64,
}

impl Default for BoardPolicy {
    fn default() -> Self {
        Self { pin_days: 30 }
    }
}

impl BoardPolicy {
    fn pin_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.pin_days)
    }
}

/// Error raised by the board service.
#[derive(Debug, thiserror::Error)]
pub enum BoardServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Refund(#[from] RefundError),
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

/// Service composing intake, the payment gateway, the moderation state
/// machine, and the ranked read path.
pub struct BoardService<R, P, N> {
    intake: DraftIntake,
    repository: Arc<R>,
    payments: Arc<P>,
    refunds: Arc<N>,
    policy: BoardPolicy,
}

impl<R, P, N> BoardService<R, P, N>
where
    R: BoardRepository + 'static,
    P: PaymentGateway + 'static,
    N: RefundPublisher + 'static,
{
    pub fn new(
        metros: MetroDirectory,
        repository: Arc<R>,
        payments: Arc<P>,
        refunds: Arc<N>,
    ) -> Self {
        Self::with_policy(metros, repository, payments, refunds, BoardPolicy::default())
    }

    pub fn with_policy(
        metros: MetroDirectory,
        repository: Arc<R>,
        payments: Arc<P>,
        refunds: Arc<N>,
        policy: BoardPolicy,
    ) -> Self {
        Self {
            intake: DraftIntake::new(metros),
            repository,
            payments,
            refunds,
            policy,
        }
    }

    pub fn metros(&self) -> &MetroDirectory {
        self.intake.metros()
    }

    /// Accept a draft: validate, persist the submission pre-payment, then
    /// ask the payment collaborator for a redirect. The durable submission
    /// is the source of truth and exists before any `paid` transition can
    /// reference it; if checkout fails the record simply stays `submitted`.
    pub async fn submit(
        &self,
        metro_slug: &str,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<(SubmissionId, CheckoutSession), BoardServiceError> {
        let (metro, normalized) = self.intake.normalized(metro_slug, draft)?;

        let submission =
            Submission::accepted(next_submission_id(), &metro, normalized.clone(), now);
        let stored = self.repository.insert_submission(submission)?;

        let session = self
            .payments
            .create_checkout(CheckoutRequest::new(&metro, &normalized))
            .await?;

        Ok((stored.id, session))
    }

    /// Payment collaborator callback. Stamps `paid_at` and moves the
    /// submission straight through `paid` into the review queue.
    pub fn confirm_payment(
        &self,
        id: &SubmissionId,
        now: DateTime<Utc>,
    ) -> Result<SubmissionStatusView, BoardServiceError> {
        let Some(mut submission) = self.repository.fetch_submission(id)? else {
            return Err(PipelineError::OrphanPaymentConfirmation(id.clone()).into());
        };

        submission.paid_at = Some(now);
        let submission = self.transition(submission, LifecycleState::Paid)?;
        let submission = self.transition(submission, LifecycleState::PendingReview)?;
        Ok(submission.status_view())
    }

    /// Operator decision: publish. `reviewed_at` is stamped at the moment of
    /// decision; the listing row is created between the `approved` and
    /// `published` steps.
    pub fn approve(
        &self,
        id: &SubmissionId,
        now: DateTime<Utc>,
    ) -> Result<SubmissionStatusView, BoardServiceError> {
        let mut submission = self.require(id)?;
        submission.reviewed_at = Some(now);
        let submission = self.transition(submission, LifecycleState::Approved)?;

        let pin_until = submission
            .draft
            .requested_pinned
            .then(|| self.policy.pin_until(now));
        self.repository
            .insert_listing(Listing::from_submission(&submission, pin_until))?;

        let submission = self.transition(submission, LifecycleState::Published)?;
        Ok(submission.status_view())
    }

    /// Operator decision: decline. Requires a non-empty reason and raises
    /// the refund obligation; the submission is retained for audit.
    pub fn reject(
        &self,
        id: &SubmissionId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionStatusView, BoardServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PipelineError::MissingRejectionReason.into());
        }

        let mut submission = self.require(id)?;
        submission.reviewed_at = Some(now);
        submission.rejection_reason = Some(reason.to_string());
        let submission = self.transition(submission, LifecycleState::Rejected)?;

        self.refunds.publish(RefundIntent {
            submission_id: submission.id.clone(),
            metro_slug: submission.metro_slug.clone(),
            reason: reason.to_string(),
        })?;

        Ok(submission.status_view())
    }

    /// Refund confirmation from the payment collaborator closes the
    /// rejected branch.
    pub fn confirm_refund(
        &self,
        id: &SubmissionId,
    ) -> Result<SubmissionStatusView, BoardServiceError> {
        let submission = self.require(id)?;
        let submission = self.transition(submission, LifecycleState::Refunded)?;
        Ok(submission.status_view())
    }

    /// The ranked public list for one metro. Fails closed on a metro that
    /// is not live.
    pub fn listings(
        &self,
        metro_slug: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Listing>, BoardServiceError> {
        if !self.intake.metros().is_live(metro_slug) {
            return Err(ValidationError::UnknownMetro(metro_slug.to_string()).into());
        }

        let rows = self.repository.listings_for_metro(metro_slug)?;
        Ok(rank(rows, now))
    }

    pub fn status(&self, id: &SubmissionId) -> Result<SubmissionStatusView, BoardServiceError> {
        Ok(self.require(id)?.status_view())
    }

    pub fn review_queue(&self) -> Result<Vec<SubmissionStatusView>, BoardServiceError> {
        let queue = self.repository.pending_review()?;
        Ok(queue.iter().map(Submission::status_view).collect())
    }

    fn require(&self, id: &SubmissionId) -> Result<Submission, BoardServiceError> {
        Ok(self
            .repository
            .fetch_submission(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    /// Apply one edge of the transition table through the repository's
    /// compare-and-swap. A losing concurrent decision surfaces as
    /// `InvalidTransition` against the state that actually won.
    fn transition(
        &self,
        mut submission: Submission,
        to: LifecycleState,
    ) -> Result<Submission, BoardServiceError> {
        let from = submission.lifecycle;
        if !from.allows(to) {
            return Err(PipelineError::InvalidTransition { from, to }.into());
        }

        let id = submission.id.clone();
        submission.lifecycle = to;
        match self.repository.update_submission(submission, from) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => {
                let actual = self
                    .repository
                    .fetch_submission(&id)?
                    .map(|current| current.lifecycle)
                    .unwrap_or(from);
                Err(PipelineError::InvalidTransition { from: actual, to }.into())
            }
            Err(other) => Err(other.into()),
        }
    }
}
