mod common;

use common::{CLUB_FIXTURE, at, book, round_in_progress, setup_test_context};
use rusty_teesheet::ClubError;
use rusty_teesheet::controller::{booking, scoring};
use rusty_teesheet::model::{
    BookingStatus, InviteResponse, ScoreEntry, ScorecardStatus, VerificationState,
};
use rusty_teesheet::storage::Storage;

fn entry(player_id: &str, hole: u8, strokes: u32) -> ScoreEntry {
    ScoreEntry {
        player_id: player_id.to_string(),
        hole,
        strokes: Some(strokes),
    }
}

#[tokio::test]
async fn scorecard_opens_once_the_round_starts() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let scheduled = book(ctx, "M4", 1, at(8, 0)).await;
    assert!(matches!(
        scoring::get_scorecard(ctx, scheduled.id).await,
        Err(ClubError::State(_))
    ));
    assert!(tc.storage.get_scorecard(scheduled.id).await?.is_none());

    let b = round_in_progress(ctx).await;
    let card = scoring::open_scorecard(ctx, b.id).await?;
    assert_eq!(
        card.players.iter().map(|p| p.player_id.as_str()).collect::<Vec<_>>(),
        vec!["M1", "M2"]
    );
    assert_eq!(card.players[0].holes.len(), 18);
    assert_eq!(card.status(), ScorecardStatus::InProgress);

    // opening again hands back the same card
    let again = scoring::open_scorecard(ctx, b.id).await?;
    assert_eq!(again, card);
    Ok(())
}

#[tokio::test]
async fn late_answers_do_not_change_the_card() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = book(ctx, "M1", 3, at(9, 0)).await;
    booking::invite_member(ctx, b.id, "M2").await?;
    booking::invite_member(ctx, b.id, "M3").await?;
    booking::respond_to_invite(ctx, b.id, "M2", InviteResponse::Accepted).await?;
    booking::start_round(ctx, b.id).await?;
    scoring::open_scorecard(ctx, b.id).await?;

    assert!(matches!(
        booking::respond_to_invite(ctx, b.id, "M3", InviteResponse::Accepted).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        booking::respond_to_invite(ctx, b.id, "M2", InviteResponse::Declined).await,
        Err(ClubError::State(_))
    ));
    let card = scoring::get_scorecard(ctx, b.id).await?;
    assert_eq!(
        card.players.iter().map(|p| p.player_id.as_str()).collect::<Vec<_>>(),
        vec!["M1", "M2"]
    );
    Ok(())
}

#[tokio::test]
async fn recorded_holes_add_up() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;

    scoring::record_hole_score(ctx, b.id, "M1", 1, Some(4)).await?;
    scoring::record_scores(
        ctx,
        b.id,
        &[entry("M1", 2, 5), entry("M1", 3, 3), entry("M2", 1, 6)],
    )
    .await?;

    let card = tc.storage.get_scorecard(b.id).await?.unwrap();
    assert_eq!(card.player("M1").unwrap().total(), 12);
    assert_eq!(card.player("M2").unwrap().total(), 6);

    // clearing a hole drops it from the total
    let card = scoring::record_hole_score(ctx, b.id, "M1", 2, None).await?;
    assert_eq!(card.player("M1").unwrap().total(), 7);
    Ok(())
}

#[tokio::test]
async fn clearing_the_first_hole_leaves_the_second() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;

    scoring::record_hole_score(ctx, b.id, "M2", 1, Some(4)).await?;
    let card = scoring::record_hole_score(ctx, b.id, "M2", 2, Some(5)).await?;
    assert_eq!(card.player("M2").unwrap().total(), 9);
    let card = scoring::record_hole_score(ctx, b.id, "M2", 1, None).await?;
    assert_eq!(card.player("M2").unwrap().total(), 5);
    Ok(())
}

#[tokio::test]
async fn invalid_entries_change_nothing() {
    let tc = setup_test_context(CLUB_FIXTURE).await.unwrap();
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;

    for (hole, strokes) in [(0, Some(4)), (19, Some(4)), (3, Some(0))] {
        assert!(matches!(
            scoring::record_hole_score(ctx, b.id, "M1", hole, strokes).await,
            Err(ClubError::Validation(_))
        ));
    }
    assert!(matches!(
        scoring::record_hole_score(ctx, b.id, "M3", 1, Some(4)).await,
        Err(ClubError::NotFound(_))
    ));
    assert!(matches!(
        scoring::record_scores(ctx, b.id, &[entry("M1", 1, 4), entry("M2", 20, 4)]).await,
        Err(ClubError::Validation(_))
    ));

    let card = scoring::get_scorecard(ctx, b.id).await.unwrap();
    assert_eq!(card.player("M1").unwrap().total(), 0);
    assert_eq!(card.player("M2").unwrap().holes_played(), 0);
}

#[tokio::test]
async fn verification_handshake() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;
    scoring::record_hole_score(ctx, b.id, "M1", 1, Some(4)).await?;

    let code = scoring::request_verification(ctx, b.id, "M1", Some("123".into())).await?;
    assert_eq!(code, "123");
    let card = scoring::get_scorecard(ctx, b.id).await?;
    assert_eq!(card.status(), ScorecardStatus::PendingVerification);

    let err = scoring::verify_scores(ctx, b.id, "M1", "999", Some("M2".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClubError::Auth(_)));
    let card = tc.storage.get_scorecard(b.id).await?.unwrap();
    assert!(matches!(
        card.player("M1").unwrap().verification,
        VerificationState::Pending {
            failed_attempts: 1,
            ..
        }
    ));

    // the wrong guess did not burn the code
    scoring::verify_scores(ctx, b.id, "M1", "123", Some("M2".into())).await?;
    let card = tc.storage.get_scorecard(b.id).await?.unwrap();
    let m1 = card.player("M1").unwrap();
    assert!(m1.verified());
    assert!(matches!(
        &m1.verification,
        VerificationState::Verified { verified_by: Some(by), .. } if by == "M2"
    ));

    // consumed
    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M1", "123", None).await,
        Err(ClubError::Auth(_))
    ));
    assert!(matches!(
        scoring::request_verification(ctx, b.id, "M1", None).await,
        Err(ClubError::State(_))
    ));
    Ok(())
}

#[tokio::test]
async fn verification_requires_an_outstanding_code() {
    let tc = setup_test_context(CLUB_FIXTURE).await.unwrap();
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;

    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M2", "000000", None).await,
        Err(ClubError::Auth(_))
    ));
    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M2", "  ", None).await,
        Err(ClubError::Validation(_))
    ));
    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M2", "1", Some("M2".into())).await,
        Err(ClubError::Validation(_))
    ));
    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M2", "1", Some("M4".into())).await,
        Err(ClubError::Validation(_))
    ));

    let generated = scoring::request_verification(ctx, b.id, "M2", None)
        .await
        .unwrap();
    assert_eq!(generated.len(), 6);
    let replaced = scoring::request_verification(ctx, b.id, "M2", Some("abc".into()))
        .await
        .unwrap();
    assert_eq!(replaced, "abc");
    if generated != "abc" {
        assert!(matches!(
            scoring::verify_scores(ctx, b.id, "M2", &generated, None).await,
            Err(ClubError::Auth(_))
        ));
    }
    scoring::verify_scores(ctx, b.id, "M2", "abc", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn editing_after_verification_needs_a_new_one() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;

    scoring::request_verification(ctx, b.id, "M2", Some("77".into())).await?;
    scoring::verify_scores(ctx, b.id, "M2", "77", Some("M1".into())).await?;
    let card = scoring::record_hole_score(ctx, b.id, "M2", 5, Some(4)).await?;
    assert!(!card.player("M2").unwrap().verified());
    Ok(())
}

#[tokio::test]
async fn resaving_an_unchanged_card_keeps_verification() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;
    scoring::record_scores(ctx, b.id, &[entry("M1", 1, 4), entry("M1", 2, 5)]).await?;
    scoring::request_verification(ctx, b.id, "M1", Some("31".into())).await?;
    scoring::verify_scores(ctx, b.id, "M1", "31", Some("M2".into())).await?;

    scoring::record_hole_score(ctx, b.id, "M1", 1, Some(4)).await?;
    scoring::record_scores(ctx, b.id, &[entry("M1", 1, 4), entry("M1", 2, 5)]).await?;
    let card = tc.storage.get_scorecard(b.id).await?.unwrap();
    assert!(card.player("M1").unwrap().verified());
    assert_eq!(card.player("M1").unwrap().total(), 9);
    Ok(())
}

#[tokio::test]
async fn cancelled_round_scorecard_is_frozen() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;
    scoring::record_hole_score(ctx, b.id, "M1", 1, Some(4)).await?;
    scoring::request_verification(ctx, b.id, "M2", Some("55".into())).await?;
    let before = scoring::open_scorecard(ctx, b.id).await?;

    let cancelled = booking::cancel_booking(ctx, b.id).await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    assert!(matches!(
        scoring::record_hole_score(ctx, b.id, "M1", 2, Some(3)).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::record_scores(ctx, b.id, &[entry("M2", 1, 5)]).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::record_scores(ctx, b.id, &[]).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::request_verification(ctx, b.id, "M1", Some("9".into())).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::verify_scores(ctx, b.id, "M2", "55", Some("M1".into())).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::complete_round(ctx, b.id).await,
        Err(ClubError::State(_))
    ));

    // the card is still readable and unchanged
    let after = scoring::get_scorecard(ctx, b.id).await?;
    assert_eq!(after, before);
    assert_eq!(after.player("M1").unwrap().total(), 4);
    Ok(())
}

#[tokio::test]
async fn round_completes_only_when_everyone_is_verified() -> Result<(), Box<dyn std::error::Error>> {
    let tc = setup_test_context(CLUB_FIXTURE).await?;
    let ctx = &tc.ctx;
    let b = round_in_progress(ctx).await;
    scoring::record_scores(ctx, b.id, &[entry("M1", 1, 4), entry("M2", 1, 5)]).await?;

    scoring::request_verification(ctx, b.id, "M1", Some("11".into())).await?;
    scoring::verify_scores(ctx, b.id, "M1", "11", Some("M2".into())).await?;
    assert!(matches!(
        scoring::complete_round(ctx, b.id).await,
        Err(ClubError::State(_))
    ));
    assert_eq!(
        booking::get_booking(ctx, b.id).await?.status,
        BookingStatus::InProgress
    );

    scoring::request_verification(ctx, b.id, "M2", Some("22".into())).await?;
    scoring::verify_scores(ctx, b.id, "M2", "22", Some("M1".into())).await?;
    assert_eq!(
        scoring::get_scorecard(ctx, b.id).await?.status(),
        ScorecardStatus::Verified
    );

    let card = scoring::complete_round(ctx, b.id).await?;
    assert_eq!(card.status(), ScorecardStatus::Completed);
    assert_eq!(
        booking::get_booking(ctx, b.id).await?.status,
        BookingStatus::Completed
    );

    assert!(matches!(
        scoring::record_hole_score(ctx, b.id, "M1", 2, Some(3)).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        scoring::complete_round(ctx, b.id).await,
        Err(ClubError::State(_))
    ));
    assert!(matches!(
        booking::cancel_booking(ctx, b.id).await,
        Err(ClubError::State(_))
    ));
    Ok(())
}
