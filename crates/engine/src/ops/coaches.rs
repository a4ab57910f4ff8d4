use sea_orm::{
    ActiveModelTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{Coach, CoachNewCmd, CoachUpdateCmd, LeagueEvent, ListFilter, ResultEngine, coaches};

use super::{Engine, Page, access::target_for, club_ref, with_tx};

impl Engine {
    /// Register a coach, optionally straight into a club without one.
    pub async fn create_coach(&self, cmd: CoachNewCmd) -> ResultEngine<Coach> {
        let coach = with_tx!(self, |db_tx| {
            let national_id_taken = match cmd.national_id.as_deref() {
                Some(national_id) => self.national_id_taken(&db_tx, national_id).await?,
                None => false,
            };
            let code = club_ref(cmd.club.as_deref());
            let roster = match code {
                Some(code) => self.find_roster(&db_tx, code).await?,
                None => None,
            };
            let coach = self.rules.validate_create_coach(
                &cmd,
                national_id_taken,
                target_for(code, roster.as_ref()),
            )?;

            coaches::ActiveModel::from(&coach).insert(&db_tx).await?;
            if let Some(roster) = &roster {
                self.commit_ledger(&db_tx, &roster.club.code, roster.club.version)
                    .await?;
            }
            ResultEngine::Ok(coach)
        })?;

        tracing::info!(coach = %coach.id, club = ?coach.club, "coach created");
        self.notify(LeagueEvent::CoachCreated {
            id: coach.id,
            name: format!("{} {}", coach.first_name, coach.last_name),
            club: coach.club.clone(),
        });
        Ok(coach)
    }

    /// Update a coach. The national id never changes; a club change is a
    /// transfer into a club whose coach slot must be free.
    pub async fn update_coach(&self, id: Uuid, cmd: CoachUpdateCmd) -> ResultEngine<Coach> {
        let coach = with_tx!(self, |db_tx| {
            let current = self.require_coach(&db_tx, id).await?;
            let destination = match &cmd.club {
                None => current.club.clone(),
                Some(code) => club_ref(code.as_deref()).map(ToString::to_string),
            };

            let origin = match current.club.as_deref() {
                Some(code) if current.club != destination => self.find_roster(&db_tx, code).await?,
                _ => None,
            };
            let roster = match destination.as_deref() {
                Some(code) => self.find_roster(&db_tx, code).await?,
                None => None,
            };
            let coach = self.rules.validate_update_coach(
                &current,
                &cmd,
                target_for(destination.as_deref(), roster.as_ref()),
            )?;

            coaches::ActiveModel::from(&coach).update(&db_tx).await?;
            for affected in origin.iter().chain(roster.iter()) {
                self.commit_ledger(&db_tx, &affected.club.code, affected.club.version)
                    .await?;
            }
            ResultEngine::Ok(coach)
        })?;

        tracing::info!(coach = %coach.id, club = ?coach.club, "coach updated");
        Ok(coach)
    }

    /// Remove a coach; its club gets the salary back and a free coach slot.
    pub async fn delete_coach(&self, id: Uuid) -> ResultEngine<Coach> {
        let coach = with_tx!(self, |db_tx| {
            let coach = self.require_coach(&db_tx, id).await?;
            let roster = match coach.club.as_deref() {
                Some(code) => self.find_roster(&db_tx, code).await?,
                None => None,
            };

            coaches::Entity::delete_by_id(id).exec(&db_tx).await?;
            if let Some(roster) = &roster {
                self.commit_ledger(&db_tx, &roster.club.code, roster.club.version)
                    .await?;
            }
            ResultEngine::Ok(coach)
        })?;

        tracing::info!(coach = %coach.id, club = ?coach.club, "coach deleted");
        self.notify(LeagueEvent::CoachRemoved {
            id: coach.id,
            name: format!("{} {}", coach.first_name, coach.last_name),
            club: coach.club.clone(),
        });
        Ok(coach)
    }

    pub async fn coach(&self, id: Uuid) -> ResultEngine<Coach> {
        with_tx!(self, |db_tx| { self.require_coach(&db_tx, id).await })
    }

    /// List coaches ordered by last and first name.
    pub async fn list_coaches(&self, filter: &ListFilter) -> ResultEngine<Page<Coach>> {
        let (page, page_size) = filter.clamped();
        with_tx!(self, |db_tx| {
            let mut condition = Condition::all();
            if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                condition = condition.add(
                    Condition::any()
                        .add(coaches::Column::FirstName.contains(name))
                        .add(coaches::Column::LastName.contains(name)),
                );
            }
            if let Some(code) = club_ref(filter.club.as_deref()) {
                condition = condition.add(coaches::Column::ClubCode.eq(code));
            }

            let paginator = coaches::Entity::find()
                .filter(condition)
                .order_by_asc(coaches::Column::LastName)
                .order_by_asc(coaches::Column::FirstName)
                .order_by_asc(coaches::Column::Id)
                .paginate(&db_tx, page_size);
            let totals = paginator.num_items_and_pages().await?;
            let items = paginator
                .fetch_page(page - 1)
                .await?
                .into_iter()
                .map(Coach::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(Page {
                items,
                page,
                page_size,
                total_items: totals.number_of_items,
                total_pages: totals.number_of_pages,
            })
        })
    }
}
