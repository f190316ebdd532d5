use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::domain::Listing;
use super::pin::{is_pinned_now, parse_instant};

/// Total, deterministic display order over the visible set: currently
/// pinned listings first, then newest first, then id descending as the
/// final tie-break. The whole set is re-sorted on every render; at
/// single-metro board sizes an O(n log n) pass per load is the simplest
/// correct choice.
pub fn rank(mut listings: Vec<Listing>, now: DateTime<Utc>) -> Vec<Listing> {
    listings.sort_by(|a, b| compare(a, b, now));
    listings
}

/// First non-zero rule decides. A `created_at` that does not parse never
/// panics the comparator: it loses to any parsable value and falls through
/// to the id tie-break against another unparsable one.
fn compare(a: &Listing, b: &Listing, now: DateTime<Utc>) -> Ordering {
    let by_pin = is_pinned_now(b, now).cmp(&is_pinned_now(a, now));
    if by_pin != Ordering::Equal {
        return by_pin;
    }

    match (created_instant(a), created_instant(b)) {
        (Some(at_a), Some(at_b)) if at_a != at_b => at_b.cmp(&at_a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => b.id.cmp(&a.id),
    }
}

fn created_instant(listing: &Listing) -> Option<DateTime<Utc>> {
    parse_instant(&listing.created_at)
}
