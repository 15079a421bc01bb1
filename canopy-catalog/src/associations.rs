use std::collections::HashSet;
use uuid::Uuid;

/// Collapses a requested reference-id list to a set, keeping first-seen
/// order. Duplicate ids in a payload count once against the reference
/// lookup, so `[T1, T1]` validates and links exactly like `[T1]`.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.insert(*id) {
            out.push(*id);
        }
    }
    out
}
