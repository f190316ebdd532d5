use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metro::Metro;

/// Identifier wrapper for tracked submissions. Published listings reuse the
/// id of the submission they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl core::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Raw posting form data, exactly as the poster typed it. Every text field
/// defaults to empty so a sparse form body deserializes cleanly; intake
/// decides what counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub cafe_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub pay: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub apply_url: String,
    #[serde(default)]
    pub apply_email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub requested_pinned: bool,
}

/// A draft that passed intake: required fields trimmed and non-empty,
/// optional fields trimmed with empty-after-trim collapsed to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDraft {
    pub cafe_name: String,
    pub role: String,
    pub pay: String,
    pub hours: Option<String>,
    pub neighborhood: Option<String>,
    pub apply_url: Option<String>,
    pub apply_email: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub requested_pinned: bool,
}

/// Lifecycle of a submission from acceptance to its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Submitted,
    Paid,
    PendingReview,
    Approved,
    Rejected,
    Published,
    Refunded,
}

impl LifecycleState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Paid => "paid",
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Published => "published",
            Self::Refunded => "refunded",
        }
    }

    /// Terminal states admit no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Published | Self::Refunded)
    }
}

impl core::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated draft bound to its metro and tracked through moderation.
/// Owned by the pipeline: created at accept, mutated only through the
/// transition table, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub metro_slug: String,
    pub city: String,
    pub state: String,
    pub draft: NormalizedDraft,
    pub lifecycle: LifecycleState,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl Submission {
    /// A freshly accepted, not-yet-paid submission.
    pub fn accepted(
        id: SubmissionId,
        metro: &Metro,
        draft: NormalizedDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            metro_slug: metro.slug.clone(),
            city: metro.city.clone(),
            state: metro.state.clone(),
            draft,
            lifecycle: LifecycleState::Submitted,
            created_at: now,
            paid_at: None,
            reviewed_at: None,
            rejection_reason: None,
        }
    }

    /// What the operator and status endpoints are allowed to see.
    pub fn status_view(&self) -> SubmissionStatusView {
        SubmissionStatusView {
            submission_id: self.id.clone(),
            lifecycle: self.lifecycle.label(),
            cafe_name: self.draft.cafe_name.clone(),
            role: self.draft.role.clone(),
            paid_at: self.paid_at.map(|at| at.to_rfc3339()),
            reviewed_at: self.reviewed_at.map(|at| at.to_rfc3339()),
            rejection_reason: self.rejection_reason.clone(),
        }
    }
}

/// The published, publicly visible projection of an approved submission.
/// `created_at` and `pinned_until` stay in the row store's RFC 3339 string
/// form; the pin scheduler and ranker own the parsing and must survive
/// rows that do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: SubmissionId,
    pub metro_slug: String,
    pub cafe_name: String,
    pub role: String,
    pub pay: String,
    pub hours: Option<String>,
    pub neighborhood: Option<String>,
    pub apply_url: Option<String>,
    pub apply_email: Option<String>,
    pub description: Option<String>,
    pub pinned: bool,
    pub pinned_until: Option<String>,
    pub created_at: String,
}

impl Listing {
    /// Project an approved submission into its public listing. A granted pin
    /// carries the expiry the operator policy computed; `pinned=true` with no
    /// expiry stays representable for legacy unbounded pins.
    pub fn from_submission(submission: &Submission, pin_until: Option<DateTime<Utc>>) -> Self {
        let pinned = submission.draft.requested_pinned;
        Self {
            id: submission.id.clone(),
            metro_slug: submission.metro_slug.clone(),
            cafe_name: submission.draft.cafe_name.clone(),
            role: submission.draft.role.clone(),
            pay: submission.draft.pay.clone(),
            hours: submission.draft.hours.clone(),
            neighborhood: submission.draft.neighborhood.clone(),
            apply_url: submission.draft.apply_url.clone(),
            apply_email: submission.draft.apply_email.clone(),
            description: submission.draft.description.clone(),
            pinned,
            pinned_until: pin_until.filter(|_| pinned).map(|at| at.to_rfc3339()),
            created_at: submission.created_at.to_rfc3339(),
        }
    }
}

/// Sanitized status snapshot for the operator and render boundaries.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusView {
    pub submission_id: SubmissionId,
    pub lifecycle: &'static str,
    pub cafe_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
