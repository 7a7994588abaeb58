pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_roster;
mod m20250901_000002_create_campaigns;
mod m20250901_000003_create_donations_and_tickets;
mod m20250901_000004_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_roster::Migration),
            Box::new(m20250901_000002_create_campaigns::Migration),
            Box::new(m20250901_000003_create_donations_and_tickets::Migration),
            Box::new(m20250901_000004_create_audit_logs::Migration),
        ]
    }
}
