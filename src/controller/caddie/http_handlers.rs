use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::assignment::{self, AssignCaddieRequest};
use crate::controller::booking::BookingView;
use crate::controller::context::ClubContext;
use crate::error::ClubError;
use crate::model::time_slot_format;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
}

pub async fn assign_caddie(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
    body: web::Json<AssignCaddieRequest>,
) -> Result<HttpResponse, ClubError> {
    let AssignCaddieRequest {
        caddie_id,
        player_count,
    } = body.into_inner();
    let booking =
        assignment::assign_caddie(&ctx, path.into_inner(), &caddie_id, player_count).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn release_caddie(
    ctx: Data<ClubContext>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, ClubError> {
    let (booking_id, caddie_id) = path.into_inner();
    let booking = assignment::release_caddie(&ctx, booking_id, &caddie_id).await?;
    Ok(HttpResponse::Ok().json(BookingView::from(booking)))
}

pub async fn caddie_availability(
    ctx: Data<ClubContext>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, ClubError> {
    let roster = assignment::caddie_availability(&ctx, query.date, query.time_slot).await?;
    Ok(HttpResponse::Ok().json(roster))
}

pub async fn suggest_caddies(
    ctx: Data<ClubContext>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ClubError> {
    let suggestions = assignment::suggest_caddies(&ctx, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(suggestions))
}
