// ABOUTME: Pure XP progression engine computing levels, ranks, and level-up events
// ABOUTME: Holds the static rank table and the per-level XP formula
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

//! XP progression engine
//!
//! Pure, stateless arithmetic over a fixed rank table: every operation is a
//! deterministic function of its inputs and performs no I/O. The level
//! formula is `xp / 500 + 1` (integer division) and the rank is the highest
//! table entry whose threshold is at or below the XP total. Level and rank
//! are always recomputed fresh from the XP total rather than tracked
//! incrementally, so stored display fields can never drift from the source
//! of truth.
//!
//! [`award_xp`] detects level transitions and produces a [`LevelUpEvent`]
//! for the presentation layer; it never persists anything. The caller is
//! responsible for writing the new XP total back atomically (see
//! `Database::award_workout_xp`).

use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// XP span of every level; level N covers `[(N-1)*500, N*500)`
pub const XP_PER_LEVEL: i64 = 500;

/// A named rank tier with its XP threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    /// Display name
    pub name: &'static str,
    /// Minimum XP at which this rank applies
    pub min_xp: i64,
    /// Icon key resolved by the client UI
    pub icon: &'static str,
}

/// The fixed rank ladder, ascending by `min_xp`
///
/// Thresholds are deliberately not aligned with level boundaries (Fedaykin
/// starts mid-level at 2500 XP); the table is flavor design, not derived
/// from the level formula.
pub static RANKS: &[Rank] = &[
    Rank {
        name: "Cadet",
        min_xp: 0,
        icon: "rank-cadet",
    },
    Rank {
        name: "Trooper",
        min_xp: 500,
        icon: "rank-trooper",
    },
    Rank {
        name: "Centurion",
        min_xp: 1000,
        icon: "rank-centurion",
    },
    Rank {
        name: "Fedaykin",
        min_xp: 2500,
        icon: "rank-fedaykin",
    },
    Rank {
        name: "Master",
        min_xp: 5000,
        icon: "rank-master",
    },
    Rank {
        name: "Kwisatz Haderach",
        min_xp: 10000,
        icon: "rank-kwisatz",
    },
];

/// Validate the rank table invariants once at startup
///
/// The table must be non-empty, start at threshold 0, and be strictly
/// ascending by `min_xp`. Lookups assume this and do not re-validate.
///
/// # Errors
///
/// Returns a configuration error if any invariant is violated.
pub fn validate_rank_table() -> AppResult<()> {
    let first = RANKS
        .first()
        .ok_or_else(|| AppError::config("Rank table is empty"))?;
    if first.min_xp != 0 {
        return Err(AppError::config(format!(
            "Lowest rank '{}' must start at 0 XP, found {}",
            first.name, first.min_xp
        )));
    }
    for pair in RANKS.windows(2) {
        if pair[1].min_xp <= pair[0].min_xp {
            return Err(AppError::config(format!(
                "Rank thresholds must be strictly ascending: '{}' ({}) then '{}' ({})",
                pair[0].name, pair[0].min_xp, pair[1].name, pair[1].min_xp
            )));
        }
    }
    Ok(())
}

/// Event emitted when an XP award crosses a level boundary
///
/// Created inside [`award_xp`], serialized into the workout-completion
/// response, consumed by the client for its celebration state, and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUpEvent {
    /// Level before the award
    pub old_level: i64,
    /// Level after the award
    pub new_level: i64,
    /// The new rank, present only when the rank name changed with this award
    pub new_rank: Option<Rank>,
}

/// Result of applying an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    /// XP total after the award
    pub new_xp: i64,
    /// Level transition, if the award crossed a level boundary
    pub event: Option<LevelUpEvent>,
}

/// Progress toward the next level, for progress-bar display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    /// Current level
    pub level: i64,
    /// XP earned since entering the current level
    pub current_level_xp: i64,
    /// XP required to complete a level (fixed, not rank-dependent)
    pub xp_needed_for_level: i64,
    /// `current_level_xp / xp_needed_for_level`, clamped to `[0, 1]`
    pub fraction: f64,
}

/// Compute the level for an XP total
///
/// `level = xp / 500 + 1`, so level 1 covers 0..=499. Always `>= 1` and
/// non-decreasing in `xp`.
///
/// # Errors
///
/// Returns an invalid input error if `xp` is negative.
pub fn compute_level(xp: i64) -> AppResult<i64> {
    ensure_non_negative(xp, "xp")?;
    Ok(xp / XP_PER_LEVEL + 1)
}

/// Compute the rank for an XP total
///
/// Scans the table from the highest threshold down and returns the first
/// rank whose `min_xp` is at or below `xp`. The lowest rank starts at 0, so
/// the fallback only guards against an empty table.
///
/// # Errors
///
/// Returns an invalid input error if `xp` is negative.
pub fn compute_rank(xp: i64) -> AppResult<Rank> {
    ensure_non_negative(xp, "xp")?;
    Ok(RANKS
        .iter()
        .rev()
        .find(|rank| xp >= rank.min_xp)
        .copied()
        .unwrap_or(RANKS[0]))
}

/// Total XP at which the level after `level` begins
#[must_use]
pub const fn next_level_threshold(level: i64) -> i64 {
    level * XP_PER_LEVEL
}

/// XP remaining until the next level boundary
///
/// # Errors
///
/// Returns an invalid input error if `xp` is negative.
pub fn xp_to_next_level(xp: i64) -> AppResult<i64> {
    let level = compute_level(xp)?;
    Ok(next_level_threshold(level) - xp)
}

/// Compute progress-bar data for an XP total
///
/// # Errors
///
/// Returns an invalid input error if `xp` is negative.
pub fn compute_progress(xp: i64) -> AppResult<LevelProgress> {
    let level = compute_level(xp)?;
    let current_level_xp = xp - (level - 1) * XP_PER_LEVEL;
    #[allow(clippy::cast_precision_loss)]
    let fraction = (current_level_xp as f64 / XP_PER_LEVEL as f64).clamp(0.0, 1.0);
    Ok(LevelProgress {
        level,
        current_level_xp,
        xp_needed_for_level: XP_PER_LEVEL,
        fraction,
    })
}

/// Apply an XP award and detect level/rank transitions
///
/// Computes the new total and independently recomputes level and rank at
/// both the old and new totals. A [`LevelUpEvent`] is produced only when the
/// level increased; the event's `new_rank` is set only when the rank name
/// also changed. Rank changes are gated on a level change: the current table
/// never moves rank without a level crossing, but the gate is on the level
/// comparison alone so an extended table cannot change the contract.
///
/// # Errors
///
/// Returns an invalid input error if `current_xp` or `amount` is negative.
pub fn award_xp(current_xp: i64, amount: i64) -> AppResult<XpAward> {
    ensure_non_negative(current_xp, "current_xp")?;
    ensure_non_negative(amount, "amount")?;

    let new_xp = current_xp
        .checked_add(amount)
        .ok_or_else(|| AppError::invalid_input("XP award overflows"))?;

    let old_level = compute_level(current_xp)?;
    let new_level = compute_level(new_xp)?;
    let old_rank = compute_rank(current_xp)?;
    let new_rank = compute_rank(new_xp)?;

    let event = (new_level > old_level).then(|| LevelUpEvent {
        old_level,
        new_level,
        new_rank: (new_rank.name != old_rank.name).then_some(new_rank),
    });

    Ok(XpAward { new_xp, event })
}

fn ensure_non_negative(value: i64, field: &str) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::invalid_input(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_rank_table_is_valid() {
        validate_rank_table().unwrap();
    }

    #[test]
    fn test_level_formula_exactness() {
        assert_eq!(compute_level(0).unwrap(), 1);
        assert_eq!(compute_level(499).unwrap(), 1);
        assert_eq!(compute_level(500).unwrap(), 2);
        assert_eq!(compute_level(999).unwrap(), 2);
        assert_eq!(compute_level(1000).unwrap(), 3);
    }

    #[test]
    fn test_level_monotonicity() {
        let mut previous = 0;
        for xp in (0..20_000).step_by(37) {
            let level = compute_level(xp).unwrap();
            assert!(level >= 1);
            assert!(level >= previous, "level decreased at xp={xp}");
            previous = level;
        }
    }

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(compute_rank(0).unwrap().name, "Cadet");
        assert_eq!(compute_rank(499).unwrap().name, "Cadet");
        assert_eq!(compute_rank(500).unwrap().name, "Trooper");
        assert_eq!(compute_rank(999).unwrap().name, "Trooper");
        assert_eq!(compute_rank(1000).unwrap().name, "Centurion");
        assert_eq!(compute_rank(2499).unwrap().name, "Centurion");
        assert_eq!(compute_rank(2500).unwrap().name, "Fedaykin");
        assert_eq!(compute_rank(4999).unwrap().name, "Fedaykin");
        assert_eq!(compute_rank(5000).unwrap().name, "Master");
        assert_eq!(compute_rank(10000).unwrap().name, "Kwisatz Haderach");
        assert_eq!(compute_rank(1_000_000).unwrap().name, "Kwisatz Haderach");
    }

    #[test]
    fn test_progress_fraction_bounds() {
        for xp in (0..15_000).step_by(13) {
            let progress = compute_progress(xp).unwrap();
            assert!(progress.fraction >= 0.0);
            assert!(progress.fraction <= 1.0);
        }
        let at_boundary = compute_progress(500).unwrap();
        assert_eq!(at_boundary.level, 2);
        assert_eq!(at_boundary.current_level_xp, 0);
        assert!((at_boundary.fraction - 0.0).abs() < f64::EPSILON);

        let near_boundary = compute_progress(999).unwrap();
        assert_eq!(near_boundary.current_level_xp, 499);
        assert!((near_boundary.fraction - 499.0 / 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_award_zero_is_noop() {
        for xp in [0, 1, 499, 500, 12_345] {
            let award = award_xp(xp, 0).unwrap();
            assert_eq!(award.new_xp, xp);
            assert!(award.event.is_none());
        }
    }

    #[test]
    fn test_award_below_threshold_no_event() {
        let award = award_xp(100, 50).unwrap();
        assert_eq!(award.new_xp, 150);
        assert!(award.event.is_none());
    }

    #[test]
    fn test_level_up_with_rank_change() {
        // 450 + 60 crosses both the level boundary and the Trooper threshold at 500
        let award = award_xp(450, 60).unwrap();
        assert_eq!(award.new_xp, 510);
        let event = award.event.unwrap();
        assert_eq!(event.old_level, 1);
        assert_eq!(event.new_level, 2);
        assert_eq!(event.new_rank.unwrap().name, "Trooper");
    }

    #[test]
    fn test_level_up_recomputes_rank_independently() {
        // 950 is Trooper / level 2; 1010 is Centurion / level 3
        let award = award_xp(950, 60).unwrap();
        assert_eq!(award.new_xp, 1010);
        let event = award.event.unwrap();
        assert_eq!(event.old_level, 2);
        assert_eq!(event.new_level, 3);
        assert_eq!(event.new_rank.unwrap().name, "Centurion");
    }

    #[test]
    fn test_level_up_without_rank_change() {
        // 1000 -> 1600 stays Centurion but crosses the level-4 boundary at 1500
        let award = award_xp(1000, 600).unwrap();
        let event = award.event.unwrap();
        assert_eq!(event.old_level, 3);
        assert_eq!(event.new_level, 4);
        assert!(event.new_rank.is_none());
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(compute_level(-1).is_err());
        assert!(compute_rank(-1).is_err());
        assert!(compute_progress(-1).is_err());
        assert!(award_xp(-1, 10).is_err());
        assert!(award_xp(10, -5).is_err());
    }

    #[test]
    fn test_xp_to_next_level_never_negative() {
        for xp in (0..10_000).step_by(7) {
            let remaining = xp_to_next_level(xp).unwrap();
            assert!(remaining >= 1, "remaining {remaining} at xp={xp}");
            assert!(remaining <= XP_PER_LEVEL);
        }
        assert_eq!(xp_to_next_level(0).unwrap(), 500);
        assert_eq!(xp_to_next_level(499).unwrap(), 1);
        assert_eq!(xp_to_next_level(500).unwrap(), 500);
    }
}
