use super::common::{at, build_service, draft};
use crate::listings::domain::{LifecycleState, SubmissionId};
use crate::listings::pipeline::{BoardServiceError, PipelineError};
use crate::listings::repository::{BoardRepository, RepositoryError};

#[test]
fn pending_review_reaches_only_a_decision_and_terminal_states_reach_nothing() {
    use LifecycleState::*;
    let all = [
        Submitted,
        Paid,
        PendingReview,
        Approved,
        Rejected,
        Published,
        Refunded,
    ];

    for next in all {
        assert_eq!(
            PendingReview.allows(next),
            matches!(next, Approved | Rejected),
            "pending_review -> {next}"
        );
    }

    for from in all.into_iter().filter(|state| state.is_terminal()) {
        for next in all {
            assert!(!from.allows(next), "{from} -> {next} must be refused");
        }
    }
}

#[tokio::test]
async fn submission_is_persisted_before_checkout_is_initiated() {
    let (service, repository, payments, _) = build_service();

    let (id, session) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit succeeds");

    assert_eq!(session.url, "https://checkout.example.test/s/stub");
    let stored = repository
        .fetch_submission(&id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored.lifecycle, LifecycleState::Submitted);

    let requests = payments.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].metro_slug, "portland-or");
    assert_eq!(requests[0].city, "Portland");
    assert_eq!(requests[0].state, "OR");
    assert_eq!(requests[0].cafe_name, "Blue Door");
}

#[tokio::test]
async fn full_path_from_submit_to_published_listing() {
    let (service, repository, _, _) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");

    let view = service.confirm_payment(&id, at(10)).expect("payment lands");
    assert_eq!(view.lifecycle, "pending_review");
    assert!(view.paid_at.is_some());

    let view = service.approve(&id, at(11)).expect("approve publishes");
    assert_eq!(view.lifecycle, "published");
    assert!(view.reviewed_at.is_some());

    let listings = repository
        .listings_for_metro("portland-or")
        .expect("listing query");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, id);
    assert!(!listings[0].pinned);
}

#[tokio::test]
async fn approved_pin_request_carries_an_expiry() {
    let (service, repository, _, _) = build_service();

    let mut pinned_draft = draft();
    pinned_draft.requested_pinned = true;
    let (id, _) = service
        .submit("portland-or", pinned_draft, at(9))
        .await
        .expect("submit");
    service.confirm_payment(&id, at(10)).expect("payment");
    service.approve(&id, at(11)).expect("approve");

    let listings = repository
        .listings_for_metro("portland-or")
        .expect("listing query");
    assert!(listings[0].pinned);
    let until = listings[0].pinned_until.as_deref().expect("bounded pin");
    assert!(until.starts_with("2025-07-01"));
}

#[test]
fn payment_confirmation_for_unknown_submission_is_reported() {
    let (service, _, _, _) = build_service();

    let orphan = SubmissionId("sub-999999".to_string());
    let err = service.confirm_payment(&orphan, at(10)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::OrphanPaymentConfirmation(id)) if id == orphan
    ));
}

#[tokio::test]
async fn rejection_requires_a_reason_and_leaves_state_alone() {
    let (service, repository, _, refunds) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");
    service.confirm_payment(&id, at(10)).expect("payment");

    let err = service.reject(&id, "  ", at(11)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::MissingRejectionReason)
    ));

    let stored = repository
        .fetch_submission(&id)
        .expect("repo fetch")
        .expect("record present");
    assert_eq!(stored.lifecycle, LifecycleState::PendingReview);
    assert!(refunds.events().is_empty());
}

#[tokio::test]
async fn rejection_raises_a_refund_obligation_and_refund_confirmation_closes_it() {
    let (service, repository, _, refunds) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");
    service.confirm_payment(&id, at(10)).expect("payment");

    let view = service
        .reject(&id, "not a coffee job", at(11))
        .expect("reject");
    assert_eq!(view.lifecycle, "rejected");
    assert_eq!(view.rejection_reason.as_deref(), Some("not a coffee job"));

    let events = refunds.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].submission_id, id);
    assert_eq!(events[0].reason, "not a coffee job");

    let view = service.confirm_refund(&id).expect("refund confirmed");
    assert_eq!(view.lifecycle, "refunded");

    // No listing was ever created for the rejected submission.
    assert!(repository
        .listings_for_metro("portland-or")
        .expect("listing query")
        .is_empty());
}

#[tokio::test]
async fn terminal_states_admit_no_further_transitions() {
    let (service, _, _, _) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");
    service.confirm_payment(&id, at(10)).expect("payment");
    service.approve(&id, at(11)).expect("approve");

    let err = service.reject(&id, "second thoughts", at(12)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::InvalidTransition {
            from: LifecycleState::Published,
            to: LifecycleState::Rejected,
        })
    ));

    let err = service.approve(&id, at(12)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::InvalidTransition {
            from: LifecycleState::Published,
            to: LifecycleState::Approved,
        })
    ));
}

#[tokio::test]
async fn review_cannot_skip_the_paid_step() {
    let (service, _, _, _) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");

    let err = service.approve(&id, at(10)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::InvalidTransition {
            from: LifecycleState::Submitted,
            to: LifecycleState::Approved,
        })
    ));
}

#[tokio::test]
async fn concurrent_decisions_serialize_through_compare_and_swap() {
    let (service, repository, _, _) = build_service();

    let (id, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");
    service.confirm_payment(&id, at(10)).expect("payment");

    // Two operators race: both read pending_review, one lands first.
    let snapshot = repository
        .fetch_submission(&id)
        .expect("repo fetch")
        .expect("record present");

    service.reject(&id, "duplicate post", at(11)).expect("first decision wins");

    let mut stale = snapshot;
    stale.lifecycle = LifecycleState::Approved;
    let err = repository
        .update_submission(stale, LifecycleState::PendingReview)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict));

    // Through the service the loser sees the decided state, not corruption.
    let err = service.approve(&id, at(11)).unwrap_err();
    assert!(matches!(
        err,
        BoardServiceError::Pipeline(PipelineError::InvalidTransition {
            from: LifecycleState::Rejected,
            to: LifecycleState::Approved,
        })
    ));
}

#[tokio::test]
async fn review_queue_lists_only_pending_submissions() {
    let (service, _, _, _) = build_service();

    let (first, _) = service
        .submit("portland-or", draft(), at(8))
        .await
        .expect("submit");
    let (second, _) = service
        .submit("portland-or", draft(), at(9))
        .await
        .expect("submit");
    service.confirm_payment(&first, at(10)).expect("payment");
    service.confirm_payment(&second, at(10)).expect("payment");
    service.approve(&first, at(11)).expect("approve");

    let queue = service.review_queue().expect("queue");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].submission_id, second);
    assert_eq!(queue[0].lifecycle, "pending_review");
}
