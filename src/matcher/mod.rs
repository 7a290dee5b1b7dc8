//! Address to neighbourhood matching
//!
//! An address matches a neighbourhood when its suburb and one of the
//! neighbourhood's suburbs contain each other, in either direction, after
//! normalization. Provider suburbs are sometimes finer and sometimes coarser
//! than the taxonomy's, so one-way containment misses real matches.
//!
//! Precedence: an exact (normalized) suburb match anywhere in the taxonomy
//! beats a containment match; within each tier the first neighbourhood in
//! declaration order wins.

use crate::address::{normalize, ParsedAddress};
use crate::taxonomy::{NeighbourhoodEntry, Taxonomy};

/// How strongly a suburb string matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchStrength {
    Contains,
    Exact,
}

/// Strength of the best match between `suburb` (normalized) and an entry
fn strength(entry: &NeighbourhoodEntry, suburb: &str) -> Option<MatchStrength> {
    entry
        .suburbs
        .iter()
        .map(|s| normalize(s))
        .filter_map(|s| {
            if s == suburb {
                Some(MatchStrength::Exact)
            } else if s.contains(suburb) || suburb.contains(s.as_str()) {
                Some(MatchStrength::Contains)
            } else {
                None
            }
        })
        .max()
}

/// Match an address against the taxonomy
///
/// Returns None when the address has no suburb; the city alone cannot tell
/// neighbourhoods apart.
pub fn match_address<'a>(
    taxonomy: &'a Taxonomy,
    address: &ParsedAddress,
) -> Option<&'a NeighbourhoodEntry> {
    let suburb = normalize(&address.suburb);
    if suburb.is_empty() {
        return None;
    }

    let mut first_contains = None;
    for entry in taxonomy.all_entries() {
        match strength(entry, &suburb) {
            Some(MatchStrength::Exact) => return Some(entry),
            Some(MatchStrength::Contains) if first_contains.is_none() => {
                first_contains = Some(entry)
            }
            _ => {}
        }
    }
    first_contains
}
