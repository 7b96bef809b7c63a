//! Containment-based heading deduplication.

use crate::model::HeadingCandidate;

/// Whether either text contains the other.
pub fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Drop candidates whose text contains, or is contained in, an earlier
/// retained candidate. The first occurrence in document order wins.
///
/// Title-level candidates pass through untouched and never absorb a
/// heading; they are not part of the outline.
pub fn dedup_candidates(candidates: Vec<HeadingCandidate>) -> Vec<HeadingCandidate> {
    candidates
        .into_iter()
        .fold(Vec::new(), |mut kept: Vec<HeadingCandidate>, candidate| {
            if candidate.level.is_title() {
                kept.push(candidate);
                return kept;
            }
            match kept
                .iter()
                .filter(|k| !k.level.is_title())
                .find(|k| overlaps(&k.text, &candidate.text))
            {
                Some(existing) => log::trace!(
                    "Dropped duplicate heading {:?} (overlaps {:?})",
                    candidate.text,
                    existing.text
                ),
                None => kept.push(candidate),
            }
            kept
        })
}
