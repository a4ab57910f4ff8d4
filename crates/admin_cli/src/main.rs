use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{BudgetPolicy, Engine, LedgerReport, ListFilter, ValidationRules};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

#[derive(Parser, Debug)]
#[command(name = "league_admin")]
#[command(about = "Maintenance utilities for the league database")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./league.db?mode=rwc")]
    database_url: String,

    /// Whether a club may spend its whole budget.
    #[arg(long, value_enum, default_value_t = Policy::Strict)]
    budget_policy: Policy,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Strict,
    AllowZero,
}

impl From<Policy> for BudgetPolicy {
    fn from(value: Policy) -> Self {
        match value {
            Policy::Strict => BudgetPolicy::Strict,
            Policy::AllowZero => BudgetPolicy::AllowZero,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Club(Club),
    /// Apply or inspect the database schema.
    #[command(subcommand)]
    Schema(SchemaCommand),
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Apply every pending migration.
    Up,
    /// Roll back the last applied migration.
    Down,
    /// Drop every table and migrate from scratch.
    Fresh,
    /// Print which migrations are applied.
    Status,
}

#[derive(Args, Debug)]
struct Club {
    #[command(subcommand)]
    command: ClubCommand,
}

#[derive(Subcommand, Debug)]
enum ClubCommand {
    /// Recompute and store the remaining budget of every club.
    RecomputeBudgets,
    /// Print the budget breakdown of one club.
    Ledger(LedgerArgs),
    /// Print every club with its remaining budget.
    List,
}

#[derive(Args, Debug)]
struct LedgerArgs {
    #[arg(long)]
    code: String,
}

fn print_report(report: &LedgerReport) {
    println!(
        "{}: budget {} | players {} ({}) | coach {} | remaining {}",
        report.club_code,
        report.declared,
        report.players_committed,
        report.player_count,
        if report.has_coach {
            report.coach_committed.to_string()
        } else {
            "-".to_string()
        },
        report.remaining,
    );
}

async fn schema(db: &DatabaseConnection, command: SchemaCommand) -> Result<(), DbErr> {
    match command {
        SchemaCommand::Up => Migrator::up(db, None).await,
        SchemaCommand::Down => Migrator::down(db, Some(1)).await,
        SchemaCommand::Fresh => Migrator::fresh(db).await,
        SchemaCommand::Status => {
            for migration in Migrator::get_migration_with_status(db).await? {
                println!("{} {}", migration.status(), migration.name());
            }
            Ok(())
        }
    }
}

async fn club(engine: &Engine, command: ClubCommand) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        ClubCommand::RecomputeBudgets => {
            let reports = engine.recompute_budgets().await?;
            for report in &reports {
                print_report(report);
            }
            println!("recomputed budgets of {} clubs", reports.len());
        }
        ClubCommand::Ledger(args) => {
            let report = match engine.club_ledger(&args.code).await {
                Ok(report) => report,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            };
            print_report(&report);
        }
        ClubCommand::List => {
            let mut filter = ListFilter::default().page_size(ListFilter::MAX_PAGE_SIZE);
            loop {
                let page = engine.list_clubs(&filter).await?;
                for club in &page.items {
                    println!(
                        "{} {} ({}, {}) remaining {} of {}",
                        club.code, club.name, club.city, club.founded, club.remaining, club.budget
                    );
                }
                if !page.has_next() {
                    break;
                }
                filter = filter.page(page.page + 1);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let db = Database::connect(&cli.database_url).await?;

    match cli.command {
        Command::Schema(command) => schema(&db, command).await?,
        Command::Club(Club { command }) => {
            Migrator::up(&db, None).await?;
            let engine = Engine::builder()
                .database(db)
                .rules(ValidationRules::default().with_budget_policy(cli.budget_policy.into()))
                .build()
                .await?;
            club(&engine, command).await?;
        }
    }

    Ok(())
}
