use sea_orm_migration::prelude::*;

/// Campaigns: one raffle cycle each.
///
/// - status: 'active' | 'closed'; at most one active row, enforced by the
///   service inside the activating transaction
/// - last_serial: ticket serial cursor, starts at 0
/// - total_*: running counters maintained by issuance
/// - winner_*: filled only by a successful draw
#[derive(DeriveIden)]
pub enum Campaigns {
    Table,
    Id,
    Name,
    DrawDate,
    MainPrize,
    Prizes,
    GoalKg,
    Status,
    LastSerial,
    TotalWeightKg,
    TotalTickets,
    TotalDonors,
    TotalClasses,
    WinnerTicketCode,
    WinnerDonorId,
    WinnerDonorName,
    WinnerClassName,
    WinnerDrawnAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Campaigns::DrawDate).date().not_null())
                    .col(ColumnDef::new(Campaigns::MainPrize).string_len(255).not_null())
                    .col(ColumnDef::new(Campaigns::Prizes).json().not_null())
                    .col(ColumnDef::new(Campaigns::GoalKg).double().null())
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Campaigns::LastSerial)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TotalWeightKg)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TotalTickets)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TotalDonors)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::TotalClasses)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Campaigns::WinnerTicketCode).string_len(32).null())
                    .col(ColumnDef::new(Campaigns::WinnerDonorId).integer().null())
                    .col(ColumnDef::new(Campaigns::WinnerDonorName).string_len(255).null())
                    .col(ColumnDef::new(Campaigns::WinnerClassName).string_len(255).null())
                    .col(
                        ColumnDef::new(Campaigns::WinnerDrawnAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaigns_status")
                    .table(Campaigns::Table)
                    .col(Campaigns::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Campaigns::Table).to_owned())
            .await?;
        Ok(())
    }
}
