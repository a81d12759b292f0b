mod common;

use serde_json::json;

use common::setup_test_context;
use rusty_teesheet::ClubError;
use rusty_teesheet::controller::seed::{SeedSummary, seed_roster};
use rusty_teesheet::model::{LoyaltyTier, MembershipStatus};
use rusty_teesheet::storage::Storage;

#[tokio::test]
async fn roster_json_is_upserted() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context("").await?;
    let roster = json!({
        "members": [
            {"id": "M1", "name": "Ann Park", "handicapIndex": 8.2,
             "loyaltyTier": "gold", "membershipStatus": "active"},
            {"id": "M2", "name": "Ben Ortiz", "handicapIndex": 14.5,
             "loyaltyTier": "silver", "membershipStatus": "suspended"}
        ],
        "caddies": [
            {"id": "C1", "name": "Alice", "rating": 4.8, "yearsExperience": 12,
             "specialty": {"min": 0.0, "max": 15.0}, "rateCents": 5000, "available": true}
        ]
    });

    let summary = seed_roster(tc.storage.as_ref(), &roster).await?;
    assert_eq!(
        summary,
        SeedSummary {
            members: 2,
            caddies: 1
        }
    );
    // a second run only rewrites
    seed_roster(tc.storage.as_ref(), &roster).await?;

    let m2 = tc.storage.get_member("M2").await?.unwrap();
    assert_eq!(m2.loyalty_tier, LoyaltyTier::Silver);
    assert_eq!(m2.membership_status, MembershipStatus::Suspended);
    let caddies = tc.storage.list_caddies().await?;
    assert_eq!(caddies.len(), 1);
    assert_eq!(caddies[0].rate_cents, 5000);
    Ok(())
}

#[tokio::test]
async fn malformed_roster_is_rejected() {
    let tc = setup_test_context("").await.unwrap();
    let bad_tier = json!({"members": [{"id": "M1", "name": "Ann", "handicapIndex": 1.0,
        "loyaltyTier": "diamond", "membershipStatus": "active"}]});
    assert!(matches!(
        seed_roster(tc.storage.as_ref(), &bad_tier).await,
        Err(ClubError::Validation(_))
    ));

    let negative_rate = json!({"caddies": [{"id": "C1", "name": "Alice", "rating": 4.8,
        "yearsExperience": 12, "specialty": {"min": 0.0, "max": 15.0},
        "rateCents": -1, "available": true}]});
    assert!(matches!(
        seed_roster(tc.storage.as_ref(), &negative_rate).await,
        Err(ClubError::Validation(_))
    ));
    assert!(tc.storage.list_caddies().await.unwrap().is_empty());
}
