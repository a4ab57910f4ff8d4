//! League engine: clubs, players and coaches under budget constraints.
//!
//! The [`Engine`] is the only entry point that writes. Every mutation is
//! validated against a snapshot of the affected clubs, applied inside one
//! database transaction, and followed by a recomputation of each affected
//! club's remaining budget.

pub use assignment::{Member, Seat, Taken, Target};
pub use clubs::{Club, ClubRoster};
pub use coaches::Coach;
pub use commands::{
    ClubNewCmd, ClubUpdateCmd, CoachNewCmd, CoachUpdateCmd, ListFilter, PlayerNewCmd,
    PlayerUpdateCmd,
};
pub use error::EngineError;
pub use ledger::{BudgetPolicy, ClubLedger, LedgerReport};
pub use money::Money;
pub use notify::{LeagueEvent, LogNotifier, NotifyError, Notifier};
pub use ops::{Engine, EngineBuilder, Page};
pub use outcome::MutationOutcome;
pub use players::Player;
pub use validation::{
    DEFAULT_FORBIDDEN_CHARS, ValidationRules, Violation, ViolationKind, Violations, field,
};

mod assignment;
pub mod clubs;
pub mod coaches;
mod commands;
mod error;
mod ledger;
mod money;
mod notify;
mod ops;
mod outcome;
pub mod players;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;
