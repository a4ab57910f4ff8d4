//! The module contains `Player` struct and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// A player.
///
/// A player without a club has no shirt number constraint to satisfy; once
/// assigned, its shirt number must be unique within the club and its salary
/// counts against the club budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub shirt_number: i32,
    pub salary: Money,
    pub club: Option<String>,
}

impl Player {
    pub fn new(
        first_name: String,
        last_name: String,
        shirt_number: i32,
        salary: Money,
        club: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            shirt_number,
            salary,
            club,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub shirt_number: i32,
    pub salary_minor: i64,
    pub club_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clubs::Entity",
        from = "Column::ClubCode",
        to = "super::clubs::Column::Code",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Clubs,
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clubs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Player> for ActiveModel {
    fn from(value: &Player) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            first_name: ActiveValue::Set(value.first_name.clone()),
            last_name: ActiveValue::Set(value.last_name.clone()),
            shirt_number: ActiveValue::Set(value.shirt_number),
            salary_minor: ActiveValue::Set(value.salary.cents()),
            club_code: ActiveValue::Set(value.club.clone()),
        }
    }
}

impl TryFrom<Model> for Player {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        if model.salary_minor <= 0 {
            return Err(EngineError::Corrupted(format!(
                "player '{}' has a non-positive salary",
                model.id
            )));
        }
        Ok(Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            shirt_number: model.shirt_number,
            salary: Money::new(model.salary_minor),
            club: model.club_code,
        })
    }
}
