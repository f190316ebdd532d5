//! Listing lifecycle and ranking engine.
//!
//! A draft enters through [`intake`], is persisted as a [`domain::Submission`],
//! pays through [`checkout`], moves through the moderation transitions in
//! [`pipeline`], and once published is ordered for display by [`rank`] with
//! pin expiry computed in [`pin`]. Storage and the refund obligation live
//! behind the traits in [`repository`]; [`router`] exposes the whole thing
//! over HTTP for the external renderer and the operator.

pub mod checkout;
pub mod domain;
pub mod intake;
pub mod pin;
pub mod pipeline;
pub mod rank;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use checkout::{
    checkout_base_url, CheckoutError, CheckoutRequest, CheckoutSession, HttpPaymentGateway,
    PaymentGateway, CHECKOUT_PATH,
};
pub use domain::{
    JobDraft, LifecycleState, Listing, NormalizedDraft, Submission, SubmissionId,
    SubmissionStatusView,
};
pub use intake::{DraftIntake, ValidationError};
pub use pin::is_pinned_now;
pub use pipeline::{BoardPolicy, BoardService, BoardServiceError, PipelineError};
pub use rank::rank;
pub use repository::{
    BoardRepository, RefundError, RefundIntent, RefundPublisher, RepositoryError,
};
pub use router::board_router;
