use chrono::{DateTime, Utc};

use super::domain::Listing;

/// Whether a listing occupies a pinned slot at `now`.
///
/// Pure function of the listing row and the clock; it is recomputed on
/// every render pass and never cached, since a pin lapses without any
/// write to the row. A pin with no expiry is unbounded (legacy rows); a
/// bounded pin lapses exactly at its expiry instant, not after. An expiry
/// that does not parse is treated as already elapsed.
pub fn is_pinned_now(listing: &Listing, now: DateTime<Utc>) -> bool {
    if !listing.pinned {
        return false;
    }

    match listing.pinned_until.as_deref() {
        None => true,
        Some(raw) => parse_instant(raw).map(|until| until > now).unwrap_or(false),
    }
}

pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
