//! The module contains the `Club` struct, its roster view and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{ClubLedger, Coach, EngineError, Money, Player, ResultEngine};

/// A club.
///
/// The code identifies the club and never changes after creation. `remaining`
/// is a cached figure rewritten by the engine after every roster mutation;
/// `version` is bumped with it so concurrent writers can detect each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Club {
    pub code: String,
    pub name: String,
    pub founded: i32,
    pub city: String,
    pub stadium: String,
    pub budget: Money,
    pub remaining: Money,
    pub version: i64,
}

impl Club {
    pub fn new(
        code: String,
        name: String,
        founded: i32,
        city: String,
        stadium: String,
        budget: Money,
    ) -> Self {
        Self {
            code,
            name,
            founded,
            city,
            stadium,
            budget,
            remaining: budget,
            version: 0,
        }
    }
}

/// A club together with everyone currently assigned to it.
///
/// This is the snapshot the assignment validator works on.
#[derive(Clone, Debug)]
pub struct ClubRoster {
    pub club: Club,
    pub players: Vec<Player>,
    pub coach: Option<Coach>,
}

impl ClubRoster {
    pub fn new(club: Club, players: Vec<Player>, coach: Option<Coach>) -> Self {
        Self {
            club,
            players,
            coach,
        }
    }

    /// Ledger built from the active salaries of the roster.
    pub fn ledger(&self) -> ClubLedger {
        ClubLedger::new(
            self.club.budget,
            self.players
                .iter()
                .map(|p| p.salary)
                .chain(self.coach.iter().map(|c| c.salary)),
        )
    }

    /// Salary already counted in this club for the given entity.
    pub fn salary_of(&self, member: Uuid) -> Option<Money> {
        self.players
            .iter()
            .find(|p| p.id == member)
            .map(|p| p.salary)
            .or_else(|| {
                self.coach
                    .as_ref()
                    .filter(|c| c.id == member)
                    .map(|c| c.salary)
            })
    }

    /// Whether another player of this club wears `number`.
    pub fn shirt_taken(&self, number: i32, except: Option<Uuid>) -> bool {
        self.players
            .iter()
            .any(|p| p.shirt_number == number && Some(p.id) != except)
    }

    /// The coach occupying the slot, unless it is `except`.
    pub fn other_coach(&self, except: Option<Uuid>) -> Option<&Coach> {
        self.coach.as_ref().filter(|c| Some(c.id) != except)
    }
}

/// Key used for case-insensitive club name uniqueness.
pub fn normalize_name(name: &str) -> String {
    name.trim().nfkc().collect::<String>().to_lowercase()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clubs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub name_norm: String,
    pub founded: i32,
    pub city: String,
    pub stadium: String,
    pub budget_minor: i64,
    pub remaining_minor: i64,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::players::Entity")]
    Players,
    #[sea_orm(has_many = "super::coaches::Entity")]
    Coaches,
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::coaches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coaches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Club> for ActiveModel {
    fn from(value: &Club) -> Self {
        Self {
            code: ActiveValue::Set(value.code.clone()),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::Set(normalize_name(&value.name)),
            founded: ActiveValue::Set(value.founded),
            city: ActiveValue::Set(value.city.clone()),
            stadium: ActiveValue::Set(value.stadium.clone()),
            budget_minor: ActiveValue::Set(value.budget.cents()),
            remaining_minor: ActiveValue::Set(value.remaining.cents()),
            version: ActiveValue::Set(value.version),
        }
    }
}

impl TryFrom<Model> for Club {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        if model.budget_minor <= 0 {
            return Err(EngineError::Corrupted(format!(
                "club '{}' has a non-positive budget",
                model.code
            )));
        }
        Ok(Self {
            code: model.code,
            name: model.name,
            founded: model.founded,
            city: model.city,
            stadium: model.stadium,
            budget: Money::new(model.budget_minor),
            remaining: Money::new(model.remaining_minor),
            version: model.version,
        })
    }
}
