//! Post-commit notifications.
//!
//! The engine calls the configured [`Notifier`] only after a mutation has been
//! committed. A failing notifier is logged and otherwise ignored: it can never
//! undo the change it reports.

use thiserror::Error;
use uuid::Uuid;

/// Something worth telling the outside world about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeagueEvent {
    PlayerCreated {
        id: Uuid,
        name: String,
        club: Option<String>,
    },
    PlayerRemoved {
        id: Uuid,
        name: String,
        club: Option<String>,
    },
    CoachCreated {
        id: Uuid,
        name: String,
        club: Option<String>,
    },
    CoachRemoved {
        id: Uuid,
        name: String,
        club: Option<String>,
    },
}

#[derive(Error, Debug)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

pub trait Notifier: Send + Sync {
    fn notify(&self, event: &LeagueEvent) -> Result<(), NotifyError>;
}

/// Default notifier: writes the event to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &LeagueEvent) -> Result<(), NotifyError> {
        tracing::info!(?event, "league event");
        Ok(())
    }
}
