use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use serde::Deserialize;
use serde_json::json;

use super::scorecard_service::{self, ScorecardView};
use super::verification;
use crate::controller::context::ClubContext;
use crate::error::ClubError;
use crate::model::ScoreEntry;

#[derive(Deserialize, Debug)]
pub struct SaveScoresRequest {
    pub scores: Vec<ScoreEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CodeRequest {
    pub player_id: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub player_id: String,
    pub verification_code: String,
    #[serde(default)]
    pub verified_by: Option<String>,
}

pub async fn get_scores(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let card = scorecard_service::get_scorecard(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ScorecardView::from(card)))
}

pub async fn save_scores(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<SaveScoresRequest>,
) -> Result<HttpResponse, ClubError> {
    let card = scorecard_service::record_scores(&ctx, path.into_inner(), &body.scores).await?;
    Ok(HttpResponse::Ok().json(ScorecardView::from(card)))
}

pub async fn request_code(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<CodeRequest>,
) -> Result<HttpResponse, ClubError> {
    let CodeRequest { player_id, code } = body.into_inner();
    let code =
        verification::request_verification(&ctx, path.into_inner(), &player_id, code).await?;
    Ok(HttpResponse::Ok().json(json!({
        "playerId": player_id,
        "code": code,
    })))
}

pub async fn verify(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ClubError> {
    let VerifyRequest {
        player_id,
        verification_code,
        verified_by,
    } = body.into_inner();
    verification::verify_scores(
        &ctx,
        path.into_inner(),
        &player_id,
        &verification_code,
        verified_by,
    )
    .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "playerId": player_id,
    })))
}

pub async fn complete_round(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let card = scorecard_service::complete_round(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ScorecardView::from(card)))
}
