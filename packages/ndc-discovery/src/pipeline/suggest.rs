//! Plausible passenger combinations near a known one.
//!
//! Used to widen a lookup when a document's exact combination was never
//! learned.

use indexmap::IndexSet;

use crate::types::fingerprint::PassengerCombination;

/// Upper bound on suggestions returned.
pub const MAX_SUGGESTIONS: usize = 10;

/// Combinations seen often enough in real bookings to always be worth
/// checking: a couple, families with one or two children, a couple with an
/// infant, a family with a child and an infant, a single parent with an
/// infant.
const COMMON_COMBINATIONS: &[(u32, u32, u32)] = &[
    (2, 0, 0),
    (2, 1, 0),
    (2, 2, 0),
    (2, 0, 1),
    (2, 1, 1),
    (1, 0, 1),
];

/// Suggest combinations related to `base`.
///
/// Neighbours (one more of each party type already present) come first,
/// then the common combinations. A count already at `u32::MAX` gets no
/// neighbour. The base signature and duplicates are skipped and at most
/// [`MAX_SUGGESTIONS`] are returned.
pub fn suggest_combinations(base: &PassengerCombination) -> Vec<PassengerCombination> {
    let (adults, children, infants) = (base.adults(), base.children(), base.infants());

    // A count already at u32::MAX has no neighbour
    let bump = |count: u32| (count > 0).then(|| count.checked_add(1)).flatten();

    let mut neighbours = Vec::with_capacity(3);
    if let Some(more) = bump(adults) {
        neighbours.push((more, children, infants));
    }
    if let Some(more) = bump(children) {
        neighbours.push((adults, more, infants));
    }
    if let Some(more) = bump(infants) {
        neighbours.push((adults, children, more));
    }

    let mut seen: IndexSet<String> = IndexSet::new();
    seen.insert(base.signature().to_string());

    neighbours
        .into_iter()
        .chain(COMMON_COMBINATIONS.iter().copied())
        .map(|(a, c, i)| PassengerCombination::new(a, c, i))
        .filter(|combo| seen.insert(combo.signature().to_string()))
        .take(MAX_SUGGESTIONS)
        .collect()
}
