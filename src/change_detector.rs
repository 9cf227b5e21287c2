//! Decides whether a freshly fetched item has already been announced.
//!
//! Only the single latest item of a source is ever compared. Items published
//! between two ticks are not seen, and an older item resurfacing (e.g. the
//! latest upload got deleted) counts as new.

/// `candidate` is new iff it is non-empty and differs from `stored`
/// (exact, case-sensitive).
pub fn is_new(stored: &str, candidate: &str) -> bool {
    !candidate.is_empty() && candidate != stored
}
