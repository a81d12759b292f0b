use rand::Rng;

use super::scorecard_service::load_for_update;
use crate::controller::context::ClubContext;
use crate::error::{ClubError, ClubResult};
use crate::model::{MAX_CODE_LEN, VerificationOutcome};

const GENERATED_CODE_DIGITS: usize = 6;

fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn normalize_code(code: Option<String>) -> ClubResult<String> {
    let Some(code) = code else {
        return Ok(generate_code());
    };
    let code = code.trim();
    if code.is_empty() {
        return Err(ClubError::validation("verification code cannot be blank"));
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(ClubError::validation(format!(
            "verification code is longer than {MAX_CODE_LEN} characters"
        )));
    }
    Ok(code.to_string())
}

/// Sets the player's single outstanding code, replacing any earlier one, and
/// returns it so it can be handed to the verifying partner. Without a code one
/// is generated.
///
/// # Errors
///
/// `Validation` for a blank or overlong code, `NotFound` for an unknown booking
/// or player, `State` when the player is already verified or the round is not
/// open for scoring.
pub async fn request_verification(
    ctx: &ClubContext,
    booking_id: i64,
    player_id: &str,
    code: Option<String>,
) -> ClubResult<String> {
    let code = normalize_code(code)?;
    let _guard = ctx.locks.lock(booking_id).await;
    let booking = ctx.booking(booking_id).await?;
    let mut card = load_for_update(ctx, &booking).await?;
    card.request_verification(player_id, code.clone(), ctx.now())?;
    ctx.storage.save_scorecard(&card).await?;
    tracing::info!(booking_id, player_id, "verification code issued");
    Ok(code)
}

/// Checks `code` against the player's outstanding code. A match verifies the
/// player and consumes the code. A mismatch is counted and leaves the code in
/// place.
///
/// # Errors
///
/// `Validation` for a blank code or a player naming themselves as verifier,
/// `Auth` for a wrong code or when none is outstanding, `NotFound` for an
/// unknown booking or player.
pub async fn verify_scores(
    ctx: &ClubContext,
    booking_id: i64,
    player_id: &str,
    code: &str,
    verified_by: Option<String>,
) -> ClubResult<()> {
    if code.trim().is_empty() {
        return Err(ClubError::validation("verification code is required"));
    }
    if verified_by.as_deref() == Some(player_id) {
        return Err(ClubError::validation(
            "scores must be verified by another player",
        ));
    }
    let _guard = ctx.locks.lock(booking_id).await;
    let booking = ctx.booking(booking_id).await?;
    let mut card = load_for_update(ctx, &booking).await?;
    if let Some(verifier) = verified_by.as_deref() {
        if card.player(verifier).is_none() {
            return Err(ClubError::validation(format!(
                "verifier {verifier} is not playing in booking {booking_id}"
            )));
        }
    }

    let outcome = card.verify(player_id, code, verified_by, ctx.now())?;
    ctx.storage.save_scorecard(&card).await?;
    match outcome {
        VerificationOutcome::Verified => {
            tracing::info!(booking_id, player_id, "scores verified");
            Ok(())
        }
        VerificationOutcome::Rejected { failed_attempts } => {
            tracing::warn!(
                booking_id,
                player_id,
                failed_attempts,
                "verification code rejected"
            );
            Err(ClubError::auth("incorrect verification code"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        let code = generate_code();
        assert_eq!(code.len(), GENERATED_CODE_DIGITS);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn supplied_codes_are_trimmed_and_bounded() {
        assert_eq!(normalize_code(Some(" 123 ".into())).unwrap(), "123");
        assert!(matches!(
            normalize_code(Some("   ".into())),
            Err(ClubError::Validation(_))
        ));
        assert!(matches!(
            normalize_code(Some("x".repeat(MAX_CODE_LEN + 1))),
            Err(ClubError::Validation(_))
        ));
    }
}
