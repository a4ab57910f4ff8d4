use sea_orm::{
    ActiveModelTrait, Condition, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    LeagueEvent, ListFilter, Player, PlayerNewCmd, PlayerUpdateCmd, ResultEngine, players,
};

use super::{Engine, Page, access::target_for, club_ref, with_tx};

impl Engine {
    /// Register a player, optionally straight into a club.
    pub async fn create_player(&self, cmd: PlayerNewCmd) -> ResultEngine<Player> {
        let player = with_tx!(self, |db_tx| {
            let code = club_ref(cmd.club.as_deref());
            let roster = match code {
                Some(code) => self.find_roster(&db_tx, code).await?,
                None => None,
            };
            let player = self
                .rules
                .validate_create_player(&cmd, target_for(code, roster.as_ref()))?;

            players::ActiveModel::from(&player).insert(&db_tx).await?;
            if let Some(roster) = &roster {
                self.commit_ledger(&db_tx, &roster.club.code, roster.club.version)
                    .await?;
            }
            ResultEngine::Ok(player)
        })?;

        tracing::info!(player = %player.id, club = ?player.club, "player created");
        self.notify(LeagueEvent::PlayerCreated {
            id: player.id,
            name: format!("{} {}", player.first_name, player.last_name),
            club: player.club.clone(),
        });
        Ok(player)
    }

    /// Update a player. Changing its club is a transfer: the old club gets
    /// the salary back and the new one must afford it.
    pub async fn update_player(&self, id: Uuid, cmd: PlayerUpdateCmd) -> ResultEngine<Player> {
        let player = with_tx!(self, |db_tx| {
            let current = self.require_player(&db_tx, id).await?;
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
            let player = self.rules.validate_update_player(
                &current,
                &cmd,
                target_for(destination.as_deref(), roster.as_ref()),
            )?;

            players::ActiveModel::from(&player).update(&db_tx).await?;
            for affected in origin.iter().chain(roster.iter()) {
                self.commit_ledger(&db_tx, &affected.club.code, affected.club.version)
                    .await?;
            }
            ResultEngine::Ok(player)
        })?;

        tracing::info!(player = %player.id, club = ?player.club, "player updated");
        Ok(player)
    }

    /// Remove a player; its club gets the salary back.
    pub async fn delete_player(&self, id: Uuid) -> ResultEngine<Player> {
        let player = with_tx!(self, |db_tx| {
            let player = self.require_player(&db_tx, id).await?;
            let roster = match player.club.as_deref() {
                Some(code) => self.find_roster(&db_tx, code).await?,
                None => None,
            };

            players::Entity::delete_by_id(id).exec(&db_tx).await?;
            if let Some(roster) = &roster {
                self.commit_ledger(&db_tx, &roster.club.code, roster.club.version)
                    .await?;
            }
            ResultEngine::Ok(player)
        })?;

        tracing::info!(player = %player.id, club = ?player.club, "player deleted");
        self.notify(LeagueEvent::PlayerRemoved {
            id: player.id,
            name: format!("{} {}", player.first_name, player.last_name),
            club: player.club.clone(),
        });
        Ok(player)
    }

    pub async fn player(&self, id: Uuid) -> ResultEngine<Player> {
        with_tx!(self, |db_tx| { self.require_player(&db_tx, id).await })
    }

    /// List players ordered by last and first name.
    ///
    /// `filter.name` matches either name, ignoring ASCII case.
    pub async fn list_players(&self, filter: &ListFilter) -> ResultEngine<Page<Player>> {
        let (page, page_size) = filter.clamped();
        with_tx!(self, |db_tx| {
            let mut condition = Condition::all();
            if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                condition = condition.add(
                    Condition::any()
                        .add(players::Column::FirstName.contains(name))
                        .add(players::Column::LastName.contains(name)),
                );
            }
            if let Some(code) = club_ref(filter.club.as_deref()) {
                condition = condition.add(players::Column::ClubCode.eq(code));
            }

            let paginator = players::Entity::find()
                .filter(condition)
                .order_by_asc(players::Column::LastName)
                .order_by_asc(players::Column::FirstName)
                .order_by_asc(players::Column::Id)
                .paginate(&db_tx, page_size);
            let totals = paginator.num_items_and_pages().await?;
            let items = paginator
                .fetch_page(page - 1)
                .await?
                .into_iter()
                .map(Player::try_from)
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
