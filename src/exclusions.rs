//! Ingredient-exclusion resolution.
//!
//! Given an offering's ingredient associations and either an explicit list of
//! names to exclude or free-text special instructions, decides which
//! ingredients may actually be removed. Two modes:
//!
//! 1. **Explicit list** (preferred): every requested name is classified into
//!    exactly one of `removable`, `missing`, or `locked`.
//! 2. **Instruction inference** (fallback, only when no explicit list was
//!    given): "without X" / "no X" / "hold X" phrases are scanned out of the
//!    instruction text and matched against removable ingredients by word
//!    overlap. The overlap match is deliberately fuzzy; it can over- and
//!    under-match multi-word ingredient names, and callers wanting precision
//!    should pass the explicit list.
//!
//! Everything here is pure; the ledger feeds it association snapshots.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::model::IngredientId;

/// Phrases captured after an exclusion keyword. No word boundary on the
/// keyword itself; kept identical to the shipped matching behavior.
static EXCLUSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"without\s+([a-z\s,'-]+)", r"no\s+([a-z\s,'-]+)", r"hold\s+([a-z\s,'-]+)"]
        .iter()
        .map(|p| Regex::new(p).expect("exclusion pattern"))
        .collect()
});

/// A captured phrase ends at the first conjunction or punctuation mark.
static TRUNCATE_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\band\b|\bplease\b|\bwith\b|\bthanks\b|[.,!]").expect("truncation pattern"));

static WORD_TOKENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").expect("token pattern"));

/// Snapshot of one offering-ingredient association, as the resolver sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRef {
    pub id: IngredientId,
    /// Canonical ingredient name as stored in the catalog.
    pub name: String,
    pub removable: bool,
}

/// The three disjoint outcomes of classifying an exclusion request list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExclusionOutcome {
    /// Ingredients that will actually be excluded, deduplicated by id.
    pub removable: Vec<IngredientRef>,
    /// Requested names that match no ingredient of the offering (raw text).
    pub missing: Vec<String>,
    /// Requested ingredients present but not removable (canonical names).
    pub locked: Vec<String>,
}

/// Case- and whitespace-normalized ingredient identifier.
///
/// "olive oil", "OLIVE OIL" and "Olive  Oil" are the same ingredient for
/// removal purposes.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Partition the requested names: every non-empty request lands in exactly
/// one of `removable`, `missing`, or `locked`.
///
/// Deduplication is by ingredient id, not by string, so two spellings that
/// normalize to the same ingredient count once.
pub fn classify_requests(associations: &[IngredientRef], requested: &[String]) -> ExclusionOutcome {
    let lookup: HashMap<String, &IngredientRef> = associations
        .iter()
        .map(|assoc| (normalize_name(&assoc.name), assoc))
        .collect();

    let mut outcome = ExclusionOutcome::default();
    let mut seen_ids: HashSet<IngredientId> = HashSet::new();

    for raw in requested {
        let cleaned = raw.trim();
        if cleaned.is_empty() {
            continue;
        }
        let normalized = normalize_name(cleaned);

        match lookup.get(&normalized) {
            None => outcome.missing.push(cleaned.to_string()),
            Some(assoc) if !assoc.removable => outcome.locked.push(assoc.name.clone()),
            Some(assoc) => {
                if seen_ids.insert(assoc.id) {
                    outcome.removable.push((*assoc).clone());
                }
            }
        }
    }

    outcome
}

/// Derive exclusion candidates from free-text special instructions.
///
/// Returns canonical names of removable associations whose word tokens
/// overlap a captured "without/no/hold" phrase, in association order,
/// deduplicated preserving first occurrence. Output feeds
/// [`classify_requests`].
pub fn infer_exclusions(associations: &[IngredientRef], special_instructions: &str) -> Vec<String> {
    let text = special_instructions.to_lowercase();

    let mut phrases: Vec<String> = Vec::new();
    for pattern in EXCLUSION_PATTERNS.iter() {
        for captures in pattern.captures_iter(&text) {
            let fragment = captures[1].trim();
            if fragment.is_empty() {
                continue;
            }
            let fragment = TRUNCATE_AT.splitn(fragment, 2).next().unwrap_or("").trim();
            if !fragment.is_empty() {
                phrases.push(fragment.to_string());
            }
        }
    }

    if phrases.is_empty() {
        return Vec::new();
    }

    let phrase_tokens: Vec<HashSet<&str>> = phrases
        .iter()
        .map(|phrase| WORD_TOKENS.find_iter(phrase).map(|m| m.as_str()).collect())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();
    for assoc in associations {
        if !assoc.removable {
            continue;
        }
        let name = assoc.name.to_lowercase();
        let tokens: HashSet<String> =
            WORD_TOKENS.find_iter(&name).map(|m| m.as_str().to_string()).collect();
        if tokens.is_empty() {
            continue;
        }
        let overlaps = phrase_tokens
            .iter()
            .filter(|set| !set.is_empty())
            .any(|set| set.iter().any(|token| tokens.contains(*token)));
        if overlaps && seen.insert(assoc.name.as_str()) {
            candidates.push(assoc.name.clone());
        }
    }

    candidates
}
