//! The module contains `Coach` struct and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// A coach. A club has at most one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coach {
    pub id: Uuid,
    /// Globally unique, immutable after creation.
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub salary: Money,
    pub club: Option<String>,
}

impl Coach {
    pub fn new(
        national_id: String,
        first_name: String,
        last_name: String,
        salary: Money,
        club: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            national_id,
            first_name,
            last_name,
            salary,
            club,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coaches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
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

impl From<&Coach> for ActiveModel {
    fn from(value: &Coach) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            national_id: ActiveValue::Set(value.national_id.clone()),
            first_name: ActiveValue::Set(value.first_name.clone()),
            last_name: ActiveValue::Set(value.last_name.clone()),
            salary_minor: ActiveValue::Set(value.salary.cents()),
            club_code: ActiveValue::Set(value.club.clone()),
        }
    }
}

impl TryFrom<Model> for Coach {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        if model.salary_minor <= 0 {
            return Err(EngineError::Corrupted(format!(
                "coach '{}' has a non-positive salary",
                model.id
            )));
        }
        Ok(Self {
            id: model.id,
            national_id: model.national_id,
            first_name: model.first_name,
            last_name: model.last_name,
            salary: Money::new(model.salary_minor),
            club: model.club_code,
        })
    }
}
