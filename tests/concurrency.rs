mod common;

use common::*;
use rifa_backend::AppError;
use rifa_backend::entities::{AuditAction, CampaignStatus};
use std::collections::HashSet;

const CONNECTIONS: u32 = 4;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_issuances_never_reuse_a_serial() {
    let app = setup_shared(CONNECTIONS).await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = app.tickets.clone();
        let donor_id = [roster.ana.id, roster.bruno.id, roster.carla.id][i % 3];
        let weight = 1.0 + (i % 4) as f64;
        let campaign_id = campaign.id;
        handles.push(tokio::spawn(async move {
            service
                .issue_tickets(campaign_id, &donation(donor_id, weight), &monitor())
                .await
        }));
    }

    let mut codes = Vec::new();
    let mut committed = 0usize;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(issued) => {
                committed += 1;
                codes.extend(issued.ticket_codes);
            }
            Err(AppError::OperationFailed(_)) => {}
            Err(other) => panic!("unexpected issuance error: {other}"),
        }
    }
    assert!(committed > 0);

    let campaign = app.campaigns.get_campaign(campaign.id).await.unwrap();
    let unique: HashSet<&String> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
    assert_eq!(codes.len() as i64, campaign.counters.total_tickets);
    assert_eq!(campaign.last_serial, campaign.counters.total_tickets);

    // committed serials form one gap-free run starting at 1
    let expected: HashSet<String> = (1..=campaign.last_serial)
        .map(|s| format!("RF-2024-{s:06}"))
        .collect();
    let issued: HashSet<String> = codes.into_iter().collect();
    assert_eq!(issued, expected);

    let records = audit_records(&app, campaign.id, AuditAction::IssueDonation).await;
    assert_eq!(records.len(), committed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_draws_pick_exactly_one_winner() {
    let app = setup_shared(CONNECTIONS).await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.ana.id, 6.0), &admin())
        .await
        .unwrap();
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.carla.id, 4.0), &admin())
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = app.draws.clone();
        let campaign_id = campaign.id;
        handles.push(tokio::spawn(async move {
            service.draw_winner(campaign_id, &admin()).await
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(winner) => winners.push(winner),
            Err(AppError::CampaignNotActive(_)) | Err(AppError::OperationFailed(_)) => {}
            Err(other) => panic!("unexpected draw error: {other}"),
        }
    }
    assert_eq!(winners.len(), 1);

    let closed = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(closed.status, CampaignStatus::Closed);
    assert_eq!(
        closed.winner.map(|w| w.ticket_code),
        Some(winners[0].ticket_code.clone())
    );

    let records = audit_records(&app, campaign.id, AuditAction::DrawWinner).await;
    assert_eq!(records.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_issuance_racing_a_draw_stays_consistent() {
    let app = setup_shared(CONNECTIONS).await;
    let roster = seed_roster(&app).await;
    let campaign = active_campaign(&app, 2024).await;
    app.tickets
        .issue_tickets(campaign.id, &donation(roster.bruno.id, 2.0), &admin())
        .await
        .unwrap();

    let mut issuances = Vec::new();
    for i in 0..6 {
        let service = app.tickets.clone();
        let donor_id = [roster.ana.id, roster.carla.id][i % 2];
        let campaign_id = campaign.id;
        issuances.push(tokio::spawn(async move {
            service
                .issue_tickets(campaign_id, &donation(donor_id, 3.0), &monitor())
                .await
        }));
    }
    let draws = app.draws.clone();
    let campaign_id = campaign.id;
    let draw = tokio::spawn(async move { draws.draw_winner(campaign_id, &admin()).await });

    let mut committed_codes = vec![
        "RF-2024-000001".to_string(),
        "RF-2024-000002".to_string(),
    ];
    for handle in issuances {
        match handle.await.unwrap() {
            Ok(issued) => committed_codes.extend(issued.ticket_codes),
            Err(AppError::CampaignNotActive(_)) | Err(AppError::OperationFailed(_)) => {}
            Err(other) => panic!("unexpected issuance error: {other}"),
        }
    }
    let winner = draw.await.unwrap().unwrap();

    // the winner is a committed ticket and nothing was minted after closing
    assert!(committed_codes.contains(&winner.ticket_code));
    let closed = app.campaigns.get_campaign(campaign.id).await.unwrap();
    assert_eq!(closed.status, CampaignStatus::Closed);
    assert_eq!(closed.counters.total_tickets, committed_codes.len() as i64);
    assert_eq!(closed.last_serial, closed.counters.total_tickets);
}
