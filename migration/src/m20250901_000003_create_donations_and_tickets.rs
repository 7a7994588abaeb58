use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_roster::{Classes, Donors};
use super::m20250901_000002_create_campaigns::Campaigns;

/// Donations: one row per issuance; donor/class names are snapshots taken at
/// write time and are not updated when the roster changes.
#[derive(DeriveIden)]
enum Donations {
    Table,
    Id,
    CampaignId,
    DonorId,
    DonorName,
    ClassId,
    ClassName,
    WeightKg,
    TicketCodes,
    DonatedAt,
    RecordedById,
    RecordedByName,
    CreatedAt,
}

/// Tickets: one row per whole kilogram donated.
#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    CampaignId,
    DonationId,
    Serial,
    Code,
    DonorId,
    DonorName,
    ClassId,
    ClassName,
    IssuedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::CampaignId).integer().not_null())
                    .col(ColumnDef::new(Donations::DonorId).integer().not_null())
                    .col(ColumnDef::new(Donations::DonorName).string_len(255).not_null())
                    .col(ColumnDef::new(Donations::ClassId).integer().not_null())
                    .col(ColumnDef::new(Donations::ClassName).string_len(255).not_null())
                    .col(ColumnDef::new(Donations::WeightKg).double().not_null())
                    .col(ColumnDef::new(Donations::TicketCodes).json().not_null())
                    .col(
                        ColumnDef::new(Donations::DonatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::RecordedById).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Donations::RecordedByName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_campaign")
                            .from(Donations::Table, Donations::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_donor")
                            .from(Donations::Table, Donations::DonorId)
                            .to(Donors::Table, Donors::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_class")
                            .from(Donations::Table, Donations::ClassId)
                            .to(Classes::Table, Classes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // first-donation checks look up (campaign, donor) and (campaign, class)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_donations_campaign_donor")
                    .table(Donations::Table)
                    .col(Donations::CampaignId)
                    .col(Donations::DonorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_donations_campaign_class")
                    .table(Donations::Table)
                    .col(Donations::CampaignId)
                    .col(Donations::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::CampaignId).integer().not_null())
                    .col(ColumnDef::new(Tickets::DonationId).integer().not_null())
                    .col(ColumnDef::new(Tickets::Serial).big_integer().not_null())
                    .col(ColumnDef::new(Tickets::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Tickets::DonorId).integer().not_null())
                    .col(ColumnDef::new(Tickets::DonorName).string_len(255).not_null())
                    .col(ColumnDef::new(Tickets::ClassId).integer().not_null())
                    .col(ColumnDef::new(Tickets::ClassName).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Tickets::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_campaign")
                            .from(Tickets::Table, Tickets::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_donation")
                            .from(Tickets::Table, Tickets::DonationId)
                            .to(Donations::Table, Donations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // codes never collide within a campaign
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tickets_campaign_code_unique")
                    .table(Tickets::Table)
                    .col(Tickets::CampaignId)
                    .col(Tickets::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Tickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Donations::Table).to_owned())
            .await?;
        Ok(())
    }
}
