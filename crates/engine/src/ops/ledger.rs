use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{ClubLedger, EngineError, LedgerReport, ResultEngine, clubs};

use super::{Engine, with_tx};

impl Engine {
    /// Rebuild the ledger of `code` from its roster and store the remaining
    /// budget.
    ///
    /// The write only lands if the club row still carries `expected_version`,
    /// the version read when the mutation took its snapshot. Otherwise another
    /// writer got there first and the whole unit of work fails with
    /// [`EngineError::Conflict`].
    pub(super) async fn commit_ledger(
        &self,
        db: &DatabaseTransaction,
        code: &str,
        expected_version: i64,
    ) -> ResultEngine<ClubLedger> {
        let roster = self.require_roster(db, code).await?;
        let ledger = roster.ledger();

        let result = clubs::Entity::update_many()
            .col_expr(
                clubs::Column::RemainingMinor,
                Expr::value(ledger.remaining().cents()),
            )
            .col_expr(clubs::Column::Version, Expr::col(clubs::Column::Version).add(1))
            .filter(clubs::Column::Code.eq(code))
            .filter(clubs::Column::Version.eq(expected_version))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(format!(
                "club '{code}' was modified concurrently"
            )));
        }

        tracing::debug!(
            club = code,
            remaining = %ledger.remaining(),
            version = expected_version + 1,
            "club ledger stored"
        );
        Ok(ledger)
    }

    /// Budget breakdown of one club.
    pub async fn club_ledger(&self, code: &str) -> ResultEngine<LedgerReport> {
        with_tx!(self, |db_tx| {
            let roster = self.require_roster(&db_tx, code).await?;
            Ok(LedgerReport::from_roster(&roster))
        })
    }

    /// Recompute and store the remaining budget of every club.
    ///
    /// Running it twice in a row changes nothing but the club versions.
    pub async fn recompute_budgets(&self) -> ResultEngine<Vec<LedgerReport>> {
        let reports = with_tx!(self, |db_tx| {
            let codes: Vec<(String, i64)> = clubs::Entity::find()
                .order_by_asc(clubs::Column::Code)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|model| (model.code, model.version))
                .collect();

            let mut reports = Vec::with_capacity(codes.len());
            for (code, version) in codes {
                self.commit_ledger(&db_tx, &code, version).await?;
                let roster = self.require_roster(&db_tx, &code).await?;
                reports.push(LedgerReport::from_roster(&roster));
            }
            ResultEngine::Ok(reports)
        })?;

        tracing::info!(clubs = reports.len(), "club budgets recomputed");
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, ActiveValue, Database};

    use super::*;
    use crate::{ClubNewCmd, Money, PlayerNewCmd};

    async fn engine() -> Engine {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build().await.unwrap()
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let engine = engine().await;
        engine
            .create_club(ClubNewCmd::new("RMA", "Real Madrid", 1902, "Madrid", "Bernabeu", "1000"))
            .await
            .unwrap();

        let tx = engine.database.begin().await.unwrap();
        let err = engine.commit_ledger(&tx, "RMA", 41).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(
            err,
            EngineError::Conflict("club 'RMA' was modified concurrently".to_string())
        );
    }

    #[tokio::test]
    async fn commit_bumps_version_and_stores_remaining() {
        let engine = engine().await;
        engine
            .create_club(ClubNewCmd::new("RMA", "Real Madrid", 1902, "Madrid", "Bernabeu", "1000"))
            .await
            .unwrap();
        engine
            .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "300").club("RMA"))
            .await
            .unwrap();

        let roster = engine.club("RMA").await.unwrap();
        assert_eq!(roster.club.remaining, Money::from_units(700));
        assert_eq!(roster.club.version, 1);

        // A stale cached figure is repaired by the recompute.
        let tx = engine.database.begin().await.unwrap();
        clubs::ActiveModel {
            code: ActiveValue::Set("RMA".to_string()),
            remaining_minor: ActiveValue::Set(1),
            ..Default::default()
        }
        .update(&tx)
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let reports = engine.recompute_budgets().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].remaining, Money::from_units(700));
        let again = engine.recompute_budgets().await.unwrap();
        assert_eq!(reports, again);
        assert_eq!(engine.club("RMA").await.unwrap().club.version, 3);
    }
}
