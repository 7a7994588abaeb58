#![allow(dead_code)]

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use rifa_backend::entities::AuditAction;
use rifa_backend::models::{
    Actor, AuditLogQuery, AuditLogResponse, CampaignPrizes, CampaignResponse,
    CreateCampaignRequest, CreateClassRequest, CreateDonorRequest, DonorResponse,
    IssueTicketsRequest, Role,
};
use rifa_backend::services::{
    AuditService, CampaignService, DrawService, RosterService, TicketService,
};
use rifa_backend::utils::RetryPolicy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestApp {
    pub pool: DatabaseConnection,
    pub audit: AuditService,
    pub roster: RosterService,
    pub campaigns: CampaignService,
    pub tickets: TicketService,
    pub draws: DrawService,
    // keeps a file-backed database alive for the test's duration
    _dir: Option<TempDir>,
}

/// Donors seeded by [`seed_roster`]: Ana and Bruno in 3A, Carla in 3B.
pub struct Roster {
    pub ana: DonorResponse,
    pub bruno: DonorResponse,
    pub carla: DonorResponse,
}

pub fn admin() -> Actor {
    Actor {
        id: "admin-1".into(),
        name: "Diretora Helena".into(),
        role: Role::Admin,
    }
}

pub fn monitor() -> Actor {
    Actor {
        id: "monitor-7".into(),
        name: "Monitor Caio".into(),
        role: Role::Monitor,
    }
}

/// Fresh in-memory database. A single connection keeps every task on the
/// same SQLite database and serialises transactions.
pub async fn setup() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);
    let retry = RetryPolicy {
        max_retries: 3,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
        multiplier: 2.0,
    };
    build(options, retry, None).await
}

/// File-backed database shared by `connections` pooled connections, so
/// concurrent tasks really run overlapping transactions. Conflicts surface
/// as SQLITE_BUSY and are resolved by a generous retry budget.
pub async fn setup_shared(connections: u32) -> TestApp {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("rifa.db").display());
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(connections)
        .min_connections(connections)
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);
    let retry = RetryPolicy {
        max_retries: 200,
        initial_delay: Duration::from_millis(2),
        max_delay: Duration::from_millis(50),
        multiplier: 2.0,
    };
    build(options, retry, Some(dir)).await
}

async fn build(options: ConnectOptions, retry: RetryPolicy, dir: Option<TempDir>) -> TestApp {
    let pool = Database::connect(options).await.unwrap();
    Migrator::up(&pool, None).await.unwrap();

    let audit = AuditService::new(pool.clone());
    TestApp {
        roster: RosterService::new(pool.clone()),
        campaigns: CampaignService::new(pool.clone(), audit.clone(), retry.clone()),
        tickets: TicketService::new(pool.clone(), audit.clone(), retry.clone()),
        draws: DrawService::new(pool.clone(), audit.clone(), retry),
        audit,
        pool,
        _dir: dir,
    }
}

pub async fn seed_roster(app: &TestApp) -> Roster {
    let a3 = app
        .roster
        .create_class(&CreateClassRequest { name: "3A".into() }, &admin())
        .await
        .unwrap();
    let b3 = app
        .roster
        .create_class(&CreateClassRequest { name: "3B".into() }, &admin())
        .await
        .unwrap();

    let donor = |name: &str, class_id: i32| CreateDonorRequest {
        name: name.into(),
        class_id,
    };
    Roster {
        ana: app
            .roster
            .create_donor(&donor("Ana", a3.id), &admin())
            .await
            .unwrap(),
        bruno: app
            .roster
            .create_donor(&donor("Bruno", a3.id), &admin())
            .await
            .unwrap(),
        carla: app
            .roster
            .create_donor(&donor("Carla", b3.id), &admin())
            .await
            .unwrap(),
    }
}

pub fn campaign_request(name: &str, year: i32) -> CreateCampaignRequest {
    CreateCampaignRequest {
        name: name.into(),
        draw_date: NaiveDate::from_ymd_opt(year, 11, 30).unwrap(),
        main_prize: "Bicicleta".into(),
        prizes: CampaignPrizes {
            student1: "Tablet".into(),
            student2: "Fone".into(),
            student3: "Livro".into(),
            class1: Some("Passeio".into()),
        },
        goal_kg: Some(500.0),
        activate: true,
    }
}

pub async fn active_campaign(app: &TestApp, year: i32) -> CampaignResponse {
    app.campaigns
        .create_campaign(&campaign_request("Arrecadação", year), &admin())
        .await
        .unwrap()
}

pub fn donation(donor_id: i32, weight_kg: f64) -> IssueTicketsRequest {
    IssueTicketsRequest {
        donor_id,
        weight_kg,
        donation_date: None,
        recorder: None,
    }
}

/// Audit records of one action for a campaign, newest first
pub async fn audit_records(
    app: &TestApp,
    campaign_id: i32,
    action: AuditAction,
) -> Vec<AuditLogResponse> {
    app.audit
        .list_for_campaign(
            campaign_id,
            &AuditLogQuery {
                page: Some(1),
                per_page: Some(100),
                action: Some(action),
            },
        )
        .await
        .unwrap()
        .data
}
