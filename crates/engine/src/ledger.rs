//! Budget arithmetic for a single club.
//!
//! The ledger is always rebuilt from the salaries currently assigned to the
//! club; there is no running total that could drift from the roster. The
//! cached `remaining` figure on the club row is only ever written from a
//! freshly built [`ClubLedger`].

use serde::Deserialize;

use crate::{ClubRoster, Money};

/// How much of the declared budget may be committed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// The remaining budget must stay strictly positive.
    #[default]
    Strict,
    /// The remaining budget may reach exactly zero.
    AllowZero,
}

impl BudgetPolicy {
    fn fits(self, amount: Money, limit: Money) -> bool {
        match self {
            Self::Strict => amount < limit,
            Self::AllowZero => amount <= limit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClubLedger {
    pub declared: Money,
    pub committed: Money,
}

impl ClubLedger {
    pub fn new(declared: Money, salaries: impl IntoIterator<Item = Money>) -> Self {
        Self {
            declared,
            committed: salaries.into_iter().sum(),
        }
    }

    /// `declared - Σ active salaries`.
    pub fn remaining(&self) -> Money {
        self.declared - self.committed
    }

    /// Budget an entity can use in this club.
    ///
    /// `current` is the entity's salary when it is already counted here, so
    /// its own commitment is handed back before comparing.
    pub fn available_for(&self, current: Option<Money>) -> Money {
        self.remaining() + current.unwrap_or(Money::ZERO)
    }

    /// Whether `salary` can be committed without breaking `policy`.
    pub fn admits(&self, salary: Money, current: Option<Money>, policy: BudgetPolicy) -> bool {
        policy.fits(salary, self.available_for(current))
    }

    /// Whether a new declared budget still covers what is already committed.
    pub fn covers(&self, new_budget: Money, policy: BudgetPolicy) -> bool {
        policy.fits(self.committed, new_budget)
    }

    /// The same ledger with a different declared budget.
    pub fn with_declared(self, declared: Money) -> Self {
        Self { declared, ..self }
    }
}

/// Breakdown of a club's budget, as returned by the ledger endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReport {
    pub club_code: String,
    pub declared: Money,
    pub players_committed: Money,
    pub coach_committed: Money,
    pub remaining: Money,
    pub player_count: usize,
    pub has_coach: bool,
}

impl LedgerReport {
    pub fn from_roster(roster: &ClubRoster) -> Self {
        let players_committed = roster.players.iter().map(|p| p.salary).sum();
        let coach_committed = roster.coach.iter().map(|c| c.salary).sum();
        Self {
            club_code: roster.club.code.clone(),
            declared: roster.club.budget,
            players_committed,
            coach_committed,
            remaining: roster.ledger().remaining(),
            player_count: roster.players.len(),
            has_coach: roster.coach.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(value: i64) -> Money {
        Money::from_units(value)
    }

    #[test]
    fn remaining_subtracts_every_salary() {
        let ledger = ClubLedger::new(units(10_000_000), [units(2_000_000), units(500_000)]);
        assert_eq!(ledger.committed, units(2_500_000));
        assert_eq!(ledger.remaining(), units(7_500_000));
    }

    #[test]
    fn strict_policy_rejects_exhausting_the_budget() {
        let ledger = ClubLedger::new(units(1_000), [units(400)]);
        assert!(ledger.admits(units(599), None, BudgetPolicy::Strict));
        assert!(!ledger.admits(units(600), None, BudgetPolicy::Strict));
        assert!(ledger.admits(units(600), None, BudgetPolicy::AllowZero));
        assert!(!ledger.admits(units(601), None, BudgetPolicy::AllowZero));
    }

    #[test]
    fn own_salary_is_added_back() {
        // The 400 salary already belongs to the entity being updated.
        let ledger = ClubLedger::new(units(1_000), [units(400)]);
        assert_eq!(ledger.available_for(Some(units(400))), units(1_000));
        assert!(ledger.admits(units(999), Some(units(400)), BudgetPolicy::Strict));
        assert!(!ledger.admits(units(1_000), Some(units(400)), BudgetPolicy::Strict));
    }

    #[test]
    fn new_budget_must_cover_commitments() {
        let ledger = ClubLedger::new(units(1_000), [units(300), units(300)]);
        assert!(ledger.covers(units(601), BudgetPolicy::Strict));
        assert!(!ledger.covers(units(600), BudgetPolicy::Strict));
        assert!(ledger.covers(units(600), BudgetPolicy::AllowZero));
        assert!(!ledger.covers(units(599), BudgetPolicy::AllowZero));
    }

    #[test]
    fn empty_club_keeps_full_budget() {
        let ledger = ClubLedger::new(units(50), []);
        assert_eq!(ledger.remaining(), units(50));
        assert_eq!(ledger.with_declared(units(80)).remaining(), units(80));
    }

    #[test]
    fn report_splits_players_and_coach() {
        use crate::{Club, Coach, Player};

        let club = Club::new(
            "RMA".to_string(),
            "Real Madrid".to_string(),
            1902,
            "Madrid".to_string(),
            "Bernabeu".to_string(),
            units(1_000),
        );
        let code = Some("RMA".to_string());
        let players = vec![
            Player::new("Luka".into(), "Modric".into(), 10, units(200), code.clone()),
            Player::new("Toni".into(), "Kroos".into(), 8, units(150), code.clone()),
        ];
        let coach = Coach::new(
            "12345678Z".into(),
            "Carlo".into(),
            "Ancelotti".into(),
            units(100),
            code,
        );

        let report = LedgerReport::from_roster(&ClubRoster::new(club, players, Some(coach)));
        assert_eq!(report.players_committed, units(350));
        assert_eq!(report.coach_committed, units(100));
        assert_eq!(report.remaining, units(550));
        assert_eq!(report.player_count, 2);
        assert!(report.has_coach);
    }
}
