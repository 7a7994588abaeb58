mod common;

use common::*;
use rifa_backend::AppError;
use rifa_backend::entities::{AuditAction, CampaignStatus};
use rifa_backend::models::TicketQuery;

#[tokio::test]
async fn test_draw_closes_campaign_with_winner() {
    let app = setup().await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.ana.id, 3.7), &admin())
        .await
        .unwrap();
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.carla.id, 2.0), &admin())
        .await
        .unwrap();

    let winner = app.draws.draw_winner(campaign.id, &admin()).await.unwrap();

    let tickets = app
        .tickets
        .list_tickets(
            campaign.id,
            &TicketQuery {
                page: None,
                per_page: None,
                search: None,
            },
        )
        .await
        .unwrap();
    let drawn = tickets
        .data
        .iter()
        .find(|t| t.code == winner.ticket_code)
        .expect("winning ticket exists");
    assert_eq!(drawn.donor_id, winner.donor_id);
    assert_eq!(drawn.donor_name, winner.donor_name);
    assert_eq!(drawn.class_name, winner.class_name);

    let closed = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(closed.status, CampaignStatus::Closed);
    let stored = closed.winner.expect("winner stored");
    assert_eq!(stored.ticket_code, winner.ticket_code);
    assert_eq!(stored.donor_id, winner.donor_id);
    assert_eq!(stored.class_name, winner.class_name);

    let logs = audit_records(&app, campaign.id, AuditAction::DrawWinner).await;
    assert_eq!(logs.len(), 1);
    let after = logs[0].after.as_ref().unwrap();
    assert_eq!(after["ticketCode"], winner.ticket_code.as_str());
    assert_eq!(after["donorId"], winner.donor_id);
}

#[tokio::test]
async fn test_second_draw_is_rejected() {
    let app = setup().await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.bruno.id, 1.0), &admin())
        .await
        .unwrap();

    let winner = app.draws.draw_winner(campaign.id, &admin()).await.unwrap();
    assert_eq!(winner.ticket_code, "RF-2024-000001");

    let err = app.draws.draw_winner(campaign.id, &admin()).await.unwrap_err();
    assert!(matches!(err, AppError::CampaignNotActive(_)));

    let err = app
        .tickets
        .issue_tickets(campaign.id, &donation(roster.bruno.id, 4.0), &admin())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CampaignNotActive(_)));

    let campaign = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(campaign.winner.map(|w| w.ticket_code), Some(winner.ticket_code));
    assert_eq!(campaign.counters.total_tickets, 1);
}

#[tokio::test]
async fn test_draw_without_tickets_keeps_campaign_active() {
    let app = setup().await;
    let campaign = active_campaign(&app, 2024).await;

    let err = app.draws.draw_winner(campaign.id, &admin()).await.unwrap_err();
    assert!(matches!(err, AppError::NoTicketsAvailable(_)));

    let campaign = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
    assert!(campaign.winner.is_none());
}

#[tokio::test]
async fn test_draw_requires_admin_and_existing_campaign() {
    let app = setup().await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.ana.id, 5.0), &admin())
        .await
        .unwrap();

    let err = app.draws.draw_winner(campaign.id, &monitor()).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    let still_active = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(still_active.status, CampaignStatus::Active);

    let err = app.draws.draw_winner(777, &admin()).await.unwrap_err();
    assert!(matches!(err, AppError::CampaignNotFound(777)));
}
