//! Greedy waterfall allocation of the pooled vault balance over goals.
//!
//! The allocator is a pure function over an immutable snapshot: it borrows
//! the goal list and the vault balance, owns no state, and its output is
//! recomputed on every read instead of being persisted. Higher-priority
//! (lower-numbered) goals are always funded to completion before any
//! lower-priority goal receives anything.

use serde::{Deserialize, Serialize};

use crate::Goal;

/// A goal paired with the share of the vault currently allocated to it.
///
/// Invariant: `0 <= saved_amount_minor <= goal.target_amount_minor`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundedGoal {
    pub goal: Goal,
    pub saved_amount_minor: i64,
}

impl FundedGoal {
    /// The allocation covers the full target.
    #[must_use]
    pub fn is_fully_funded(&self) -> bool {
        self.saved_amount_minor >= self.goal.target_amount_minor
    }

    /// The goal the waterfall is currently filling, or has just filled.
    ///
    /// True for a strictly partial allocation, and for an exactly-full
    /// positive one (the most recently completed goal in the waterfall).
    #[must_use]
    pub fn is_actively_funding(&self) -> bool {
        (self.saved_amount_minor > 0 && self.saved_amount_minor < self.goal.target_amount_minor)
            || (self.saved_amount_minor == self.goal.target_amount_minor
                && self.saved_amount_minor > 0)
    }
}

/// Distributes `vault_balance_minor` over `goals` in priority order.
///
/// `goals` must already be sorted ascending by priority; the output keeps
/// that order. Completion flags are ignored: funding follows priority alone.
/// A negative vault balance allocates zero everywhere; no `saved_amount_minor`
/// is ever negative.
#[must_use]
pub fn allocate(goals: Vec<Goal>, vault_balance_minor: i64) -> Vec<FundedGoal> {
    let mut remaining = vault_balance_minor;

    goals
        .into_iter()
        .map(|goal| {
            let saved_amount_minor = if remaining <= 0 {
                0
            } else if remaining >= goal.target_amount_minor {
                remaining -= goal.target_amount_minor;
                goal.target_amount_minor
            } else {
                let funded = remaining;
                remaining = 0;
                funded
            };

            FundedGoal {
                goal,
                saved_amount_minor,
            }
        })
        .collect()
}

/// First goal in priority order whose allocation has not reached its target.
///
/// This is "the current frontier": everything before it is fully funded,
/// everything after it has received nothing.
#[must_use]
pub fn frontier(funded: &[FundedGoal]) -> Option<&FundedGoal> {
    funded.iter().find(|f| !f.is_fully_funded())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(name: &str, target_minor: i64, priority: i32) -> Goal {
        Goal::new(
            "alice".to_string(),
            name.to_string(),
            target_minor,
            priority,
            None,
        )
        .unwrap()
    }

    #[test]
    fn waterfall_funds_in_priority_order() {
        let goals = vec![goal("Laptop", 1000, 1), goal("Trip", 500, 2)];
        let funded = allocate(goals, 1200);

        assert_eq!(funded[0].saved_amount_minor, 1000);
        assert_eq!(funded[1].saved_amount_minor, 200);
    }

    #[test]
    fn conservation_holds_for_non_negative_balances() {
        let goals = vec![
            goal("A", 300, 1),
            goal("B", 700, 2),
            goal("C", 450, 3),
        ];
        let targets_total: i64 = goals.iter().map(|g| g.target_amount_minor).sum();

        for balance in [0, 299, 300, 1000, targets_total, targets_total + 5000] {
            let funded = allocate(goals.clone(), balance);
            let allocated: i64 = funded.iter().map(|f| f.saved_amount_minor).sum();
            assert_eq!(allocated, balance.min(targets_total));
        }
    }

    #[test]
    fn later_goal_never_funded_before_earlier_is_full() {
        let goals = vec![goal("A", 800, 1), goal("B", 200, 2), goal("C", 100, 3)];

        for balance in 0..=1100 {
            let funded = allocate(goals.clone(), balance);
            for pair in funded.windows(2) {
                if pair[1].saved_amount_minor > 0 {
                    assert!(pair[0].is_fully_funded());
                }
            }
        }
    }

    #[test]
    fn negative_balance_allocates_nothing() {
        let funded = allocate(vec![goal("A", 100, 1), goal("B", 100, 2)], -250);
        assert!(funded.iter().all(|f| f.saved_amount_minor == 0));
    }

    #[test]
    fn completed_goals_still_consume_the_waterfall() {
        let mut done = goal("Done", 400, 1);
        done.is_completed = true;
        let funded = allocate(vec![done, goal("Next", 400, 2)], 500);

        assert_eq!(funded[0].saved_amount_minor, 400);
        assert_eq!(funded[1].saved_amount_minor, 100);
    }

    #[test]
    fn frontier_is_first_unfilled_goal() {
        let goals = vec![goal("A", 300, 1), goal("B", 300, 2), goal("C", 300, 3)];

        let funded = allocate(goals.clone(), 450);
        assert_eq!(frontier(&funded).map(|f| f.goal.name.as_str()), Some("B"));

        let funded = allocate(goals.clone(), 900);
        assert!(frontier(&funded).is_none());

        let funded = allocate(goals, 0);
        assert_eq!(frontier(&funded).map(|f| f.goal.name.as_str()), Some("A"));
    }

    #[test]
    fn at_most_one_goal_is_strictly_partial() {
        let goals = vec![goal("A", 250, 1), goal("B", 250, 2), goal("C", 250, 3)];

        for balance in 0..=800 {
            let funded = allocate(goals.clone(), balance);
            let partial = funded
                .iter()
                .filter(|f| f.saved_amount_minor > 0 && !f.is_fully_funded())
                .count();
            assert!(partial <= 1);
        }
    }
}
