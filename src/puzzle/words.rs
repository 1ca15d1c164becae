//! Word Pool and Selection
//!
//! Pool entries keep the display form (accents and all) next to the
//! normalized form that actually lands in the grid. Selection filters by
//! grid size, dedupes on the normalized form and draws uniformly without
//! replacement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::letters::normalize_word;
use crate::core::rng::SeededRng;

/// A word as offered to the puzzle: display form plus canonical form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWord {
    /// Original spelling, shown in the word list.
    pub display: String,
    /// Uppercase, diacritic-free form used for placement and matching.
    pub normalized: String,
}

impl PoolWord {
    /// Build a pool entry from a display form.
    pub fn new(display: &str) -> Self {
        Self {
            display: display.to_string(),
            normalized: normalize_word(display),
        }
    }
}

/// Names bundled with the crate. Several carry diacritics on purpose so
/// normalization is exercised by default.
const DEFAULT_NAMES: &[&str] = &[
    "Abraham", "Sara", "Isaac", "Rebeca", "Jacob", "Raquel", "Lea", "José", "Moisés", "Aarón",
    "Miriam", "Josué", "Caleb", "Samuel", "David", "Salomón", "Elías", "Eliseo", "Isaías",
    "Jeremías", "Ezequiel", "Daniel", "Oseas", "Joel", "Amós", "Abdías", "Jonás", "Miqueas",
    "Nahúm", "Habacuc", "Sofonías", "Hageo", "Zacarías", "Malaquías", "Ester", "Rut", "Noemí",
    "Job", "Nehemías", "Esdras", "Débora", "Gedeón", "Sansón", "Natán", "Elí", "Zaqueo",
    "Lázaro", "Marta", "María", "Juan", "Pedro", "Santiago", "Andrés", "Felipe", "Bartolomé",
    "Tomás", "Mateo", "Simón", "Judas", "Pablo", "Bernabé", "Timoteo", "Tito", "Filemón",
    "Silas", "Lucas", "Marcos",
];

/// The built-in word pool.
pub fn default_pool() -> Vec<PoolWord> {
    DEFAULT_NAMES.iter().map(|name| PoolWord::new(name)).collect()
}

/// Select up to `count` distinct words that fit a `size` x `size` grid.
///
/// Entries whose normalized form is empty or longer than `size` are
/// filtered out first; duplicates (by normalized form) keep their first
/// occurrence. The draw is uniform without replacement, so fewer than
/// `count` results simply means the filtered pool ran dry.
pub fn pick_words(pool: &[PoolWord], count: usize, size: u32, rng: &mut SeededRng) -> Vec<PoolWord> {
    let mut seen = BTreeSet::new();
    let mut candidates: Vec<PoolWord> = pool
        .iter()
        .filter(|w| {
            !w.normalized.is_empty()
                && w.normalized.len() <= size as usize
                && seen.insert(w.normalized.clone())
        })
        .cloned()
        .collect();

    let mut selected = Vec::new();
    while selected.len() < count && !candidates.is_empty() {
        let idx = rng.next_int(candidates.len() as u32) as usize;
        selected.push(candidates.remove(idx));
    }
    selected
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_normalizes() {
        let pool = default_pool();
        let moises = pool.iter().find(|w| w.display == "Moisés").unwrap();
        assert_eq!(moises.normalized, "MOISES");
    }

    #[test]
    fn test_pick_respects_count_and_size() {
        let pool = default_pool();
        let mut rng = SeededRng::from_seed("pick");
        let picked = pick_words(&pool, 10, 14, &mut rng);

        assert_eq!(picked.len(), 10);
        for w in &picked {
            assert!(w.normalized.len() <= 14);
        }
    }

    #[test]
    fn test_pick_is_distinct() {
        let pool = vec![
            PoolWord::new("CASA"),
            PoolWord::new("casa"),
            PoolWord::new("SOL"),
        ];
        let mut rng = SeededRng::from_seed("dup");
        let picked = pick_words(&pool, 10, 10, &mut rng);

        // "CASA" and "casa" normalize identically, so only two candidates
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_pick_filters_oversized_words() {
        let pool = vec![PoolWord::new("LOUGHBOROUGH"), PoolWord::new("FE")];
        let mut rng = SeededRng::from_seed("size");
        let picked = pick_words(&pool, 5, 6, &mut rng);

        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].normalized, "FE");
    }

    #[test]
    fn test_pick_is_deterministic() {
        let pool = default_pool();
        let a = pick_words(&pool, 12, 14, &mut SeededRng::from_seed("same"));
        let b = pick_words(&pool, 12, 14, &mut SeededRng::from_seed("same"));
        assert_eq!(a, b);
    }
}
