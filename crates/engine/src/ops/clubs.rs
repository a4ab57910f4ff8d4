use sea_orm::{
    ActiveModelTrait, ActiveValue, Condition, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    Club, ClubNewCmd, ClubRoster, ClubUpdateCmd, EngineError, ListFilter, ResultEngine, Taken,
    clubs, coaches, players,
};

use super::{Engine, Page, current_year, with_tx};

impl Engine {
    /// Register a new club. Its remaining budget starts at the declared one.
    pub async fn create_club(&self, cmd: ClubNewCmd) -> ResultEngine<Club> {
        let club = with_tx!(self, |db_tx| {
            let taken = Taken {
                code: match cmd.code.as_deref() {
                    Some(code) => self.club_code_taken(&db_tx, code).await?,
                    None => false,
                },
                name: match cmd.name.as_deref() {
                    Some(name) => self.club_name_taken(&db_tx, name, None).await?,
                    None => false,
                },
            };
            let club = self
                .rules
                .validate_create_club(&cmd, taken, current_year())?;

            clubs::ActiveModel::from(&club).insert(&db_tx).await?;
            ResultEngine::Ok(club)
        })?;

        tracing::info!(club = %club.code, budget = %club.budget, "club created");
        Ok(club)
    }

    /// Update the attributes of a club. The code never changes.
    ///
    /// A new budget must still cover every salary the club pays.
    pub async fn update_club(&self, code: &str, cmd: ClubUpdateCmd) -> ResultEngine<Club> {
        let club = with_tx!(self, |db_tx| {
            let roster = self.require_roster(&db_tx, code).await?;
            let name_taken = match cmd.name.as_deref() {
                Some(name) => self.club_name_taken(&db_tx, name, Some(code)).await?,
                None => false,
            };
            let mut club = self
                .rules
                .validate_update_club(&roster, &cmd, name_taken, current_year())?;

            clubs::ActiveModel {
                code: ActiveValue::Set(club.code.clone()),
                name: ActiveValue::Set(club.name.clone()),
                name_norm: ActiveValue::Set(clubs::normalize_name(&club.name)),
                founded: ActiveValue::Set(club.founded),
                city: ActiveValue::Set(club.city.clone()),
                stadium: ActiveValue::Set(club.stadium.clone()),
                budget_minor: ActiveValue::Set(club.budget.cents()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            let ledger = self
                .commit_ledger(&db_tx, code, roster.club.version)
                .await?;
            club.remaining = ledger.remaining();
            club.version = roster.club.version + 1;
            ResultEngine::Ok(club)
        })?;

        tracing::info!(club = %club.code, budget = %club.budget, "club updated");
        Ok(club)
    }

    /// Delete a club. Its players and coach are kept, without a club.
    pub async fn delete_club(&self, code: &str) -> ResultEngine<ClubRoster> {
        let roster = with_tx!(self, |db_tx| {
            let roster = self.require_roster(&db_tx, code).await?;

            players::Entity::update_many()
                .col_expr(players::Column::ClubCode, Expr::value(Option::<String>::None))
                .filter(players::Column::ClubCode.eq(code))
                .exec(&db_tx)
                .await?;
            coaches::Entity::update_many()
                .col_expr(coaches::Column::ClubCode, Expr::value(Option::<String>::None))
                .filter(coaches::Column::ClubCode.eq(code))
                .exec(&db_tx)
                .await?;

            let result = clubs::Entity::delete_many()
                .filter(clubs::Column::Code.eq(code))
                .filter(clubs::Column::Version.eq(roster.club.version))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::Conflict(format!(
                    "club '{code}' was modified concurrently"
                )));
            }
            ResultEngine::Ok(roster)
        })?;

        tracing::info!(
            club = code,
            released_players = roster.players.len(),
            released_coach = roster.coach.is_some(),
            "club deleted"
        );
        Ok(roster)
    }

    /// Return a club with its players and coach.
    pub async fn club(&self, code: &str) -> ResultEngine<ClubRoster> {
        with_tx!(self, |db_tx| { self.require_roster(&db_tx, code).await })
    }

    /// List clubs ordered by code. `filter.club` is ignored.
    pub async fn list_clubs(&self, filter: &ListFilter) -> ResultEngine<Page<Club>> {
        let (page, page_size) = filter.clamped();
        with_tx!(self, |db_tx| {
            let mut condition = Condition::all();
            if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                condition = condition.add(clubs::Column::NameNorm.contains(clubs::normalize_name(name)));
            }

            let paginator = clubs::Entity::find()
                .filter(condition)
                .order_by_asc(clubs::Column::Code)
                .paginate(&db_tx, page_size);
            let totals = paginator.num_items_and_pages().await?;
            let items = paginator
                .fetch_page(page - 1)
                .await?
                .into_iter()
                .map(Club::try_from)
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
