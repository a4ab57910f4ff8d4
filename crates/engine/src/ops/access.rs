use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Club, ClubRoster, Coach, EngineError, Player, ResultEngine, Target, clubs, coaches, players,
};

use super::Engine;

/// Pick the validator target for a club reference and its loaded roster.
pub(super) fn target_for<'a>(code: Option<&'a str>, roster: Option<&'a ClubRoster>) -> Target<'a> {
    match (code, roster) {
        (None, _) => Target::Unassigned,
        (Some(_), Some(roster)) => Target::Club(roster),
        (Some(code), None) => Target::Missing(code),
    }
}

impl Engine {
    /// Load a club with everyone currently assigned to it.
    pub(super) async fn find_roster(
        &self,
        db: &DatabaseTransaction,
        code: &str,
    ) -> ResultEngine<Option<ClubRoster>> {
        let Some(model) = clubs::Entity::find_by_id(code.to_string()).one(db).await? else {
            return Ok(None);
        };
        let club = Club::try_from(model)?;

        let players = players::Entity::find()
            .filter(players::Column::ClubCode.eq(code))
            .order_by_asc(players::Column::ShirtNumber)
            .all(db)
            .await?
            .into_iter()
            .map(Player::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let mut coaches = coaches::Entity::find()
            .filter(coaches::Column::ClubCode.eq(code))
            .all(db)
            .await?
            .into_iter()
            .map(Coach::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        if coaches.len() > 1 {
            return Err(EngineError::Corrupted(format!(
                "club '{code}' has {} coaches",
                coaches.len()
            )));
        }

        Ok(Some(ClubRoster::new(club, players, coaches.pop())))
    }

    pub(super) async fn require_roster(
        &self,
        db: &DatabaseTransaction,
        code: &str,
    ) -> ResultEngine<ClubRoster> {
        self.find_roster(db, code)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("club '{code}' not exists")))
    }

    pub(super) async fn club_code_taken(
        &self,
        db: &DatabaseTransaction,
        code: &str,
    ) -> ResultEngine<bool> {
        Ok(clubs::Entity::find_by_id(code.to_string())
            .one(db)
            .await?
            .is_some())
    }

    /// Whether a club other than `except` already uses this name, ignoring case.
    pub(super) async fn club_name_taken(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        except: Option<&str>,
    ) -> ResultEngine<bool> {
        let mut query =
            clubs::Entity::find().filter(clubs::Column::NameNorm.eq(clubs::normalize_name(name)));
        if let Some(code) = except {
            query = query.filter(clubs::Column::Code.ne(code));
        }
        Ok(query.one(db).await?.is_some())
    }

    pub(super) async fn national_id_taken(
        &self,
        db: &DatabaseTransaction,
        national_id: &str,
    ) -> ResultEngine<bool> {
        Ok(coaches::Entity::find()
            .filter(coaches::Column::NationalId.eq(national_id.trim()))
            .one(db)
            .await?
            .is_some())
    }

    pub(super) async fn require_player(
        &self,
        db: &DatabaseTransaction,
        id: Uuid,
    ) -> ResultEngine<Player> {
        let model = players::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("player '{id}' not exists")))?;
        Player::try_from(model)
    }

    pub(super) async fn require_coach(
        &self,
        db: &DatabaseTransaction,
        id: Uuid,
    ) -> ResultEngine<Coach> {
        let model = coaches::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("coach '{id}' not exists")))?;
        Coach::try_from(model)
    }
}
