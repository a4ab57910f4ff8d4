use std::sync::{Arc, Mutex};

use sea_orm::{Database, DatabaseConnection};

use engine::{
    BudgetPolicy, ClubNewCmd, ClubUpdateCmd, CoachNewCmd, CoachUpdateCmd, Engine, EngineError,
    LeagueEvent, ListFilter, Money, Notifier, NotifyError, PlayerNewCmd,
    PlayerUpdateCmd, ValidationRules, ViolationKind, field,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn connect(url: &str) -> DatabaseConnection {
    let db = Database::connect(url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn engine_with_db() -> Engine {
    let db = connect("sqlite::memory:").await;
    Engine::builder().database(db).build().await.unwrap()
}

async fn engine_with_file_db() -> (Engine, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("league_{}.db", Uuid::new_v4()));
    let db = connect(&format!("sqlite:{}?mode=rwc", path.display())).await;
    let engine = Engine::builder().database(db).build().await.unwrap();
    (engine, path)
}

fn units(value: i64) -> Money {
    Money::from_units(value)
}

async fn new_club(engine: &Engine, code: &str, name: &str, budget: &str) {
    engine
        .create_club(ClubNewCmd::new(code, name, 1902, "Madrid", "Estadio", budget))
        .await
        .unwrap();
}

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<LeagueEvent>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &LeagueEvent) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _event: &LeagueEvent) -> Result<(), NotifyError> {
        Err(NotifyError("mail server unreachable".to_string()))
    }
}

#[tokio::test]
async fn salary_above_budget_is_rejected() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000000").await;

    let err = engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "2000000").club("RMA"))
        .await
        .unwrap_err();
    let violation = err.violations().unwrap().get(field::SALARY).unwrap();
    assert_eq!(violation.kind, ViolationKind::Budget);
    assert!(violation.message.contains("budget"));
    assert!(violation.message.contains("1000000.00"));

    let roster = engine.club("RMA").await.unwrap();
    assert!(roster.players.is_empty());
    assert_eq!(roster.club.remaining, units(1_000_000));
    assert_eq!(roster.club.version, 0);
    assert_eq!(
        engine.list_players(&ListFilter::default()).await.unwrap().total_items,
        0
    );
}

#[tokio::test]
async fn accepted_salary_reduces_remaining_budget() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000000").await;

    engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "2000000").club("RMA"))
        .await
        .unwrap();

    let report = engine.club_ledger("RMA").await.unwrap();
    assert_eq!(report.remaining, units(8_000_000));
    assert_eq!(report.players_committed, units(2_000_000));
    assert_eq!(report.player_count, 1);
    assert!(!report.has_coach);
}

#[tokio::test]
async fn second_coach_for_a_club_is_rejected() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000000").await;

    let first = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "1000").club("RMA"))
        .await
        .unwrap();
    let err = engine
        .create_coach(CoachNewCmd::new("87654321X", "Xabi", "Alonso", "1000").club("RMA"))
        .await
        .unwrap_err();

    let violations = err.violations().unwrap();
    let violation = violations.get(field::CLUB).unwrap();
    assert_eq!(violation.kind, ViolationKind::Uniqueness);
    assert!(violation.message.contains("already has a coach"));

    let roster = engine.club("RMA").await.unwrap();
    assert_eq!(roster.coach.map(|c| c.id), Some(first.id));
}

#[tokio::test]
async fn coach_cannot_move_into_an_occupied_club() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000").await;
    new_club(&engine, "FCB", "Barcelona", "1000").await;
    engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "300").club("RMA"))
        .await
        .unwrap();
    let other = engine
        .create_coach(CoachNewCmd::new("87654321X", "Xabi", "Alonso", "300").club("FCB"))
        .await
        .unwrap();

    let err = engine
        .update_coach(other.id, CoachUpdateCmd::default().transfer_to("RMA"))
        .await
        .unwrap_err();
    let violation = err.violations().unwrap().get(field::CLUB).unwrap();
    assert_eq!(violation.kind, ViolationKind::Uniqueness);
    assert!(violation.message.contains("already has a coach"));

    let other = engine.coach(other.id).await.unwrap();
    assert_eq!(other.club.as_deref(), Some("FCB"));
    assert_eq!(engine.club("FCB").await.unwrap().club.remaining, units(700));
    assert_eq!(engine.club("RMA").await.unwrap().club.remaining, units(700));
}

#[tokio::test]
async fn deleting_a_coach_frees_the_slot_and_the_budget() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000").await;
    new_club(&engine, "FCB", "Barcelona", "1000").await;
    let coach = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "300").club("RMA"))
        .await
        .unwrap();
    let other = engine
        .create_coach(CoachNewCmd::new("87654321X", "Xabi", "Alonso", "300").club("FCB"))
        .await
        .unwrap();

    engine.delete_coach(coach.id).await.unwrap();
    let roster = engine.club("RMA").await.unwrap();
    assert!(roster.coach.is_none());
    assert_eq!(roster.club.remaining, units(1_000));
    assert_eq!(
        engine.coach(coach.id).await.unwrap_err(),
        EngineError::KeyNotFound(format!("coach '{}' not exists", coach.id))
    );

    let moved = engine
        .update_coach(other.id, CoachUpdateCmd::default().transfer_to("RMA"))
        .await
        .unwrap();
    assert_eq!(moved.club.as_deref(), Some("RMA"));
    assert_eq!(engine.club("FCB").await.unwrap().club.remaining, units(1_000));
    assert_eq!(engine.club("RMA").await.unwrap().club.remaining, units(700));
}

#[tokio::test]
async fn shirt_numbers_are_unique_per_club() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000000").await;
    new_club(&engine, "FCB", "Barcelona", "10000000").await;

    engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "1000").club("RMA"))
        .await
        .unwrap();
    let err = engine
        .create_player(PlayerNewCmd::new("Mesut", "Ozil", 10, "1000").club("RMA"))
        .await
        .unwrap_err();
    assert_eq!(
        err.violations().unwrap().get(field::SHIRT_NUMBER).unwrap().kind,
        ViolationKind::Uniqueness
    );

    let other = engine
        .create_player(PlayerNewCmd::new("Mesut", "Ozil", 10, "1000").club("FCB"))
        .await
        .unwrap();
    assert_eq!(other.club.as_deref(), Some("FCB"));
}

#[tokio::test]
async fn budget_below_commitments_is_rejected() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000").await;
    engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "6000").club("RMA"))
        .await
        .unwrap();

    let err = engine
        .update_club("RMA", ClubUpdateCmd::default().budget("5000"))
        .await
        .unwrap_err();
    let violation = err.violations().unwrap().get(field::BUDGET).unwrap();
    assert_eq!(violation.kind, ViolationKind::Budget);
    assert!(violation.message.contains("insufficient for existing commitments"));

    let club = engine
        .update_club("RMA", ClubUpdateCmd::default().budget("20000"))
        .await
        .unwrap();
    assert_eq!(club.budget, units(20_000));
    assert_eq!(club.remaining, units(14_000));
}

#[tokio::test]
async fn removing_a_player_restores_the_budget() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "5000").await;

    let player = engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "1250.50").club("RMA"))
        .await
        .unwrap();
    assert_eq!(
        engine.club("RMA").await.unwrap().club.remaining,
        "3749.50".parse::<Money>().unwrap()
    );

    engine.delete_player(player.id).await.unwrap();
    assert_eq!(engine.club("RMA").await.unwrap().club.remaining, units(5_000));
    assert_eq!(
        engine.player(player.id).await.unwrap_err(),
        EngineError::KeyNotFound(format!("player '{}' not exists", player.id))
    );
}

#[tokio::test]
async fn transfer_moves_the_salary_between_clubs() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "5000").await;
    new_club(&engine, "FCB", "Barcelona", "3000").await;

    let player = engine
        .create_player(PlayerNewCmd::new("Luis", "Figo", 7, "2000").club("FCB"))
        .await
        .unwrap();
    let moved = engine
        .update_player(player.id, PlayerUpdateCmd::default().transfer_to("RMA"))
        .await
        .unwrap();
    assert_eq!(moved.club.as_deref(), Some("RMA"));
    assert_eq!(engine.club_ledger("FCB").await.unwrap().remaining, units(3_000));
    assert_eq!(engine.club_ledger("RMA").await.unwrap().remaining, units(3_000));

    // Too expensive for the club it would move back to.
    let err = engine
        .update_player(
            player.id,
            PlayerUpdateCmd::default().salary("3000").transfer_to("FCB"),
        )
        .await
        .unwrap_err();
    assert!(err.violations().unwrap().contains(field::SALARY));
    assert_eq!(engine.player(player.id).await.unwrap(), moved);

    let released = engine
        .update_player(player.id, PlayerUpdateCmd::default().release())
        .await
        .unwrap();
    assert_eq!(released.club, None);
    assert_eq!(engine.club_ledger("RMA").await.unwrap().remaining, units(5_000));
}

#[tokio::test]
async fn raise_inside_the_same_club_counts_own_salary_once() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000").await;
    let coach = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "600").club("RMA"))
        .await
        .unwrap();

    let coach = engine
        .update_coach(coach.id, CoachUpdateCmd::default().salary("900"))
        .await
        .unwrap();
    assert_eq!(coach.salary, units(900));
    assert_eq!(engine.club_ledger("RMA").await.unwrap().remaining, units(100));

    let err = engine
        .update_coach(coach.id, CoachUpdateCmd::default().salary("1000"))
        .await
        .unwrap_err();
    assert!(err.violations().unwrap().contains(field::SALARY));
}

#[tokio::test]
async fn allow_zero_policy_accepts_an_exhausted_budget() {
    let db = connect("sqlite::memory:").await;
    let engine = Engine::builder()
        .database(db)
        .rules(ValidationRules::default().with_budget_policy(BudgetPolicy::AllowZero))
        .build()
        .await
        .unwrap();
    new_club(&engine, "RMA", "Real Madrid", "1000").await;

    engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "1000").club("RMA"))
        .await
        .unwrap();
    assert_eq!(engine.club_ledger("RMA").await.unwrap().remaining, Money::ZERO);
}

#[tokio::test]
async fn identifiers_cannot_change() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000").await;
    let coach = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "100"))
        .await
        .unwrap();

    let err = engine
        .update_club(
            "RMA",
            ClubUpdateCmd {
                code: Some("RMB".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.violations().unwrap().get(field::CLUB).unwrap().kind,
        ViolationKind::Structural
    );

    let err = engine
        .update_coach(
            coach.id,
            CoachUpdateCmd {
                national_id: Some("87654321X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.violations().unwrap().contains(field::NATIONAL_ID));

    // Resending the current value is fine.
    let same = engine
        .update_coach(
            coach.id,
            CoachUpdateCmd {
                national_id: Some("12345678Z".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same, coach);
}

#[tokio::test]
async fn duplicates_are_uniqueness_violations() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "1000").await;
    engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "100"))
        .await
        .unwrap();

    let err = engine
        .create_club(ClubNewCmd::new("RMA", "REAL MADRID", 1902, "Madrid", "Estadio", "1000"))
        .await
        .unwrap_err();
    let violations = err.violations().unwrap();
    assert!(violations.contains(field::CLUB));
    assert!(violations.contains(field::NAME));
    assert!(violations.all_of_kind(ViolationKind::Uniqueness));

    let err = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Xabi", "Alonso", "100"))
        .await
        .unwrap_err();
    assert!(err.violations().unwrap().contains(field::NATIONAL_ID));
}

#[tokio::test]
async fn invalid_payload_reports_every_field() {
    let engine = engine_with_db().await;

    let err = engine
        .create_club(ClubNewCmd {
            code: Some("R".to_string()),
            name: Some("Real#Madrid".to_string()),
            founded: Some(1700),
            city: None,
            stadium: Some("Estadio".to_string()),
            budget: Some("-5".to_string()),
        })
        .await
        .unwrap_err();
    let violations = err.violations().unwrap();
    for field in [field::CLUB, field::NAME, field::FOUNDED, field::CITY, field::BUDGET] {
        assert!(violations.contains(field), "{field} missing");
    }
    assert!(!violations.contains(field::STADIUM));

    let err = engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "100").club("XXX"))
        .await
        .unwrap_err();
    let errors = err.violations().unwrap().messages();
    assert_eq!(errors.len(), 1);
    assert!(errors["id_club"].contains("XXX"));
}

#[tokio::test]
async fn deleting_a_club_detaches_its_members() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000").await;
    let player = engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "100").club("RMA"))
        .await
        .unwrap();
    let coach = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "100").club("RMA"))
        .await
        .unwrap();

    let removed = engine.delete_club("RMA").await.unwrap();
    assert_eq!(removed.players.len(), 1);
    assert!(removed.coach.is_some());

    assert_eq!(engine.player(player.id).await.unwrap().club, None);
    assert_eq!(engine.coach(coach.id).await.unwrap().club, None);
    assert!(matches!(
        engine.club("RMA").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn same_update_twice_yields_same_state() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "10000").await;
    new_club(&engine, "FCB", "Barcelona", "10000").await;
    let player = engine
        .create_player(PlayerNewCmd::new("Luis", "Figo", 7, "100").club("FCB"))
        .await
        .unwrap();

    let cmd = PlayerUpdateCmd::default()
        .transfer_to("RMA")
        .salary("250")
        .shirt_number(10);
    let first = engine.update_player(player.id, cmd.clone()).await.unwrap();
    let second = engine.update_player(player.id, cmd).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.club_ledger("RMA").await.unwrap().remaining, units(9_750));
    assert_eq!(engine.club_ledger("FCB").await.unwrap().remaining, units(10_000));
}

#[tokio::test]
async fn listings_are_paginated_and_filtered() {
    let engine = engine_with_db().await;
    new_club(&engine, "RMA", "Real Madrid", "100000").await;
    for (n, last) in ["Alba", "Busquets", "Casillas", "Dani", "Eto", "Fabregas", "Guti"]
        .into_iter()
        .enumerate()
    {
        let shirt = i64::try_from(n).unwrap() + 1;
        let cmd = PlayerNewCmd::new("Jugador", last, shirt, "100");
        let cmd = if n % 2 == 0 { cmd.club("RMA") } else { cmd };
        engine.create_player(cmd).await.unwrap();
    }

    let first = engine.list_players(&ListFilter::default()).await.unwrap();
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.total_items, 7);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next());
    assert!(!first.has_prev());
    assert_eq!(first.items[0].last_name, "Alba");

    let second = engine
        .list_players(&ListFilter::default().page(2))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_next());

    let in_club = engine
        .list_players(&ListFilter::default().club("RMA").page_size(500))
        .await
        .unwrap();
    assert_eq!(in_club.total_items, 4);
    assert_eq!(in_club.page_size, ListFilter::MAX_PAGE_SIZE);

    let named = engine
        .list_players(&ListFilter::default().name("GUTI"))
        .await
        .unwrap();
    assert_eq!(named.items.len(), 1);

    let clubs = engine
        .list_clubs(&ListFilter::default().name("madrid"))
        .await
        .unwrap();
    assert_eq!(clubs.total_items, 1);
}

#[tokio::test]
async fn notifier_sees_committed_changes_only() {
    let db = connect("sqlite::memory:").await;
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Engine::builder()
        .database(db)
        .notifier(notifier.clone())
        .build()
        .await
        .unwrap();
    new_club(&engine, "RMA", "Real Madrid", "1000").await;

    let player = engine
        .create_player(PlayerNewCmd::new("Luka", "Modric", 10, "100").club("RMA"))
        .await
        .unwrap();
    engine
        .create_player(PlayerNewCmd::new("Mesut", "Ozil", 10, "100").club("RMA"))
        .await
        .unwrap_err();
    engine.delete_player(player.id).await.unwrap();

    let events = notifier.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            LeagueEvent::PlayerCreated {
                id: player.id,
                name: "Luka Modric".to_string(),
                club: Some("RMA".to_string()),
            },
            LeagueEvent::PlayerRemoved {
                id: player.id,
                name: "Luka Modric".to_string(),
                club: Some("RMA".to_string()),
            },
        ]
    );
}

#[tokio::test]
async fn failing_notifier_does_not_undo_the_change() {
    let db = connect("sqlite::memory:").await;
    let engine = Engine::builder()
        .database(db)
        .notifier(Arc::new(FailingNotifier))
        .build()
        .await
        .unwrap();

    let coach = engine
        .create_coach(CoachNewCmd::new("12345678Z", "Carlo", "Ancelotti", "100"))
        .await
        .unwrap();
    assert_eq!(engine.coach(coach.id).await.unwrap(), coach);
}

#[tokio::test]
async fn concurrent_signings_never_overspend() {
    let (engine, path) = engine_with_file_db().await;
    let engine = Arc::new(engine);
    new_club(&engine, "RMA", "Real Madrid", "1000").await;

    let mut handles = Vec::new();
    for shirt in 1..=8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .create_player(PlayerNewCmd::new("Jugador", "Suplente", shirt, "300").club("RMA"))
                .await
        }));
    }
    let mut signed = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            signed += 1;
        }
    }

    let report = engine.club_ledger("RMA").await.unwrap();
    assert!(signed <= 3);
    assert_eq!(report.player_count, signed);
    assert!(report.remaining.is_positive());
    assert_eq!(report.remaining, units(1_000 - 300 * i64::try_from(signed).unwrap()));

    drop(engine);
    let _ = std::fs::remove_file(path);
}
