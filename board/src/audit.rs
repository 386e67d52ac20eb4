//! Transition auditing.
//!
//! The oracle is the only move-resolution authority for non-standard
//! games, and it is unreliable: pieces vanish from its position strings
//! without a word of explanation. The auditor compares a claimed
//! transition against the narrative that justifies it and flags every
//! piece change the prose never mentions. A failed audit never blocks a
//! turn; it only decorates the turn summary with diagnostics.
//!
//! The narrative cross-check is a coarse textual heuristic (symbol
//! containment), not a semantic diff. False positives where the prose
//! describes the right piece without using its symbol are a known and
//! accepted limitation.

use std::collections::{BTreeMap, BTreeSet};

use crate::fen::Position;
use crate::square;

/// Outcome of auditing one half-move transition. Ephemeral; produced
/// once per half-move and folded into the turn summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    pub is_valid: bool,
    pub mismatches: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AuditOutcome {
    fn valid() -> Self {
        Self {
            is_valid: true,
            mismatches: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn invalid(mismatches: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            is_valid: false,
            mismatches,
            suggestions,
        }
    }
}

/// Audit a claimed transition from `prev` to `next` against the
/// narrative describing it. Codec failures become invalid outcomes, not
/// errors: an unparseable claim is the strongest inconsistency there is.
pub fn audit_transition(prev: &str, next: &str, narrative: &str) -> AuditOutcome {
    let prev_pos = match Position::parse(prev) {
        Ok(pos) => pos,
        Err(err) => {
            return AuditOutcome::invalid(
                vec![format!("previous position failed to parse: {err}")],
                vec!["discard this transition and keep the prior board".to_string()],
            );
        }
    };
    let next_pos = match Position::parse(next) {
        Ok(pos) => pos,
        Err(err) => {
            return AuditOutcome::invalid(
                vec![format!("claimed position failed to parse: {err}")],
                vec!["ask for the resulting position again".to_string()],
            );
        }
    };

    // Boards may legally grow or shrink; per-rank consistency was
    // already enforced by the parse above, so a dimension change is
    // only worth a log line here.
    if prev_pos.num_files() != next_pos.num_files()
        || prev_pos.num_ranks() != next_pos.num_ranks()
    {
        tracing::info!(
            from = format!("{}x{}", prev_pos.num_files(), prev_pos.num_ranks()),
            to = format!("{}x{}", next_pos.num_files(), next_pos.num_ranks()),
            "board dimensions changed across transition"
        );
    }

    let before = occupancy(&prev_pos);
    let after = occupancy(&next_pos);

    // Ground truth: which coordinates actually changed, independent of
    // anything the narrative says.
    let mut touched_symbols: BTreeSet<char> = BTreeSet::new();
    for (coord, occupant) in &before {
        if after.get(coord) != Some(occupant) {
            touched_symbols.insert(occupant.0);
            if let Some(replacement) = after.get(coord) {
                touched_symbols.insert(replacement.0);
            }
        }
    }
    for (coord, occupant) in &after {
        if !before.contains_key(coord) {
            touched_symbols.insert(occupant.0);
        }
    }

    if touched_symbols.is_empty() {
        return AuditOutcome::valid();
    }

    let mut mismatches = Vec::new();
    let mut suggestions = Vec::new();
    for symbol in touched_symbols {
        if narrative.contains(symbol) {
            continue;
        }
        let delta = count(&after, symbol) as i64 - count(&before, symbol) as i64;
        if delta == 0 {
            mismatches.push(format!(
                "piece '{symbol}' moved but is not mentioned in the narrative"
            ));
        } else {
            mismatches.push(format!(
                "piece '{symbol}' count changed by {delta:+} but is not mentioned in the narrative"
            ));
        }
        suggestions.push(format!(
            "verify that '{symbol}' was meant to change; if not, correct the reported position"
        ));
    }

    if mismatches.is_empty() {
        AuditOutcome::valid()
    } else {
        AuditOutcome::invalid(mismatches, suggestions)
    }
}

/// Occupied coordinates keyed by algebraic square so positions of
/// different heights still share the bottom-anchored frame.
fn occupancy(position: &Position) -> BTreeMap<String, (char, String)> {
    let num_ranks = position.num_ranks();
    let mut map = BTreeMap::new();
    for (row, rank) in position.rows().enumerate() {
        for (col, occupied) in rank.iter().enumerate() {
            if let Some(occupant) = occupied {
                map.insert(
                    square::to_algebraic(row, col, num_ranks),
                    (occupant.symbol, occupant.side.name().to_string()),
                );
            }
        }
    }
    map
}

fn count(occupancy: &BTreeMap<String, (char, String)>, symbol: char) -> usize {
    occupancy.values().filter(|(s, _)| *s == symbol).count()
}
