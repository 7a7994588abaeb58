use sea_orm_migration::prelude::*;

use super::m20250901_000002_create_campaigns::Campaigns;

/// Append-only audit trail.
/// action: issue_donation | draw_winner | create_campaign | update_campaign_status
#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    ActorId,
    ActorName,
    Action,
    CampaignId,
    Before,
    After,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::ActorId).string_len(128).not_null())
                    .col(ColumnDef::new(AuditLogs::ActorName).string_len(255).not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AuditLogs::CampaignId).integer().not_null())
                    .col(ColumnDef::new(AuditLogs::Before).json().null())
                    .col(ColumnDef::new(AuditLogs::After).json().null())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_campaign")
                            .from(AuditLogs::Table, AuditLogs::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_campaign")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::CampaignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(AuditLogs::Table).to_owned())
            .await?;
        Ok(())
    }
}
