use crate::metro::{Metro, MetroDirectory};

use super::domain::{JobDraft, NormalizedDraft};

/// Validation errors raised before a draft may proceed to payment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("metro '{0}' is not live")]
    UnknownMetro(String),
    #[error("required field '{0}' is empty")]
    MissingField(&'static str),
    #[error("either an apply URL or an apply email is required")]
    MissingApplyContact,
}

/// Guard between the posting form and the rest of the pipeline. Rules run
/// in a fixed order and the first failure wins; a UI that wants to show
/// every problem at once re-runs per field on its own side.
#[derive(Debug, Clone)]
pub struct DraftIntake {
    metros: MetroDirectory,
}

impl DraftIntake {
    pub fn new(metros: MetroDirectory) -> Self {
        Self { metros }
    }

    pub fn metros(&self) -> &MetroDirectory {
        &self.metros
    }

    /// Validate and normalize a draft against a metro slug. No network or
    /// persistence side effects.
    pub fn normalized(
        &self,
        metro_slug: &str,
        draft: JobDraft,
    ) -> Result<(Metro, NormalizedDraft), ValidationError> {
        let metro = self
            .metros
            .get(metro_slug)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownMetro(metro_slug.to_string()))?;

        let cafe_name = required(&draft.cafe_name, "cafe_name")?;
        let role = required(&draft.role, "role")?;
        let pay = required(&draft.pay, "pay")?;

        let apply_url = optional(draft.apply_url);
        let apply_email = optional(draft.apply_email);
        if apply_url.is_none() && apply_email.is_none() {
            return Err(ValidationError::MissingApplyContact);
        }

        Ok((
            metro,
            NormalizedDraft {
                cafe_name,
                role,
                pay,
                hours: optional(draft.hours),
                neighborhood: optional(draft.neighborhood),
                apply_url,
                apply_email,
                description: optional(draft.description),
                contact_email: optional(draft.contact_email),
                requested_pinned: draft.requested_pinned,
            },
        ))
    }
}

fn required(value: &str, name: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(trimmed.to_string())
}

/// Empty-after-trim collapses to absent, never `Some("")`.
fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
