//! Initial schema migration.
//!
//! - `clubs`: declared budget, cached remaining budget and the version used
//!   for optimistic concurrency
//! - `players`: at most one club each, shirt numbers unique per club
//! - `coaches`: at most one club each, at most one coach per club
//!
//! Deleting a club keeps its players and coaches: their `club_code` is set
//! to `NULL`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Clubs {
    Table,
    Code,
    Name,
    NameNorm,
    Founded,
    City,
    Stadium,
    BudgetMinor,
    RemainingMinor,
    Version,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    FirstName,
    LastName,
    ShirtNumber,
    SalaryMinor,
    ClubCode,
}

#[derive(Iden)]
enum Coaches {
    Table,
    Id,
    NationalId,
    FirstName,
    LastName,
    SalaryMinor,
    ClubCode,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Clubs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Clubs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clubs::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clubs::Name).string().not_null())
                    .col(ColumnDef::new(Clubs::NameNorm).string().not_null())
                    .col(ColumnDef::new(Clubs::Founded).integer().not_null())
                    .col(ColumnDef::new(Clubs::City).string().not_null())
                    .col(ColumnDef::new(Clubs::Stadium).string().not_null())
                    .col(ColumnDef::new(Clubs::BudgetMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Clubs::RemainingMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Clubs::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-clubs-name_norm-unique")
                    .table(Clubs::Table)
                    .col(Clubs::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Players
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Players::FirstName).string().not_null())
                    .col(ColumnDef::new(Players::LastName).string().not_null())
                    .col(ColumnDef::new(Players::ShirtNumber).integer().not_null())
                    .col(ColumnDef::new(Players::SalaryMinor).big_integer().not_null())
                    .col(ColumnDef::new(Players::ClubCode).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-players-club_code")
                            .from(Players::Table, Players::ClubCode)
                            .to(Clubs::Table, Clubs::Code)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-players-club_code-shirt_number-unique")
                    .table(Players::Table)
                    .col(Players::ClubCode)
                    .col(Players::ShirtNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Coaches
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Coaches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coaches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Coaches::NationalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Coaches::FirstName).string().not_null())
                    .col(ColumnDef::new(Coaches::LastName).string().not_null())
                    .col(ColumnDef::new(Coaches::SalaryMinor).big_integer().not_null())
                    .col(ColumnDef::new(Coaches::ClubCode).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coaches-club_code")
                            .from(Coaches::Table, Coaches::ClubCode)
                            .to(Clubs::Table, Clubs::Code)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-coaches-club_code-unique")
                    .table(Coaches::Table)
                    .col(Coaches::ClubCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Coaches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clubs::Table).to_owned())
            .await?;
        Ok(())
    }
}
